#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines the command-line interface for the solver binary.
//!
//! Uses `clap` for parsing arguments.

use crate::puzzle::board::Board;
use crate::puzzle::parse::{parse_puzzle_file, parse_puzzle_text};
use crate::puzzle::render::TextRenderer;
use crate::solver::engine::{SolveOptions, Solver};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// A solver for monochrome and colored nonogram puzzles.
#[derive(Parser, Debug)]
#[command(name = "nonogram_solver", version, about = "A nonogram puzzle solver")]
pub struct Cli {
    /// Specifies the subcommand to execute.
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The common options of whichever subcommand was chosen.
    #[must_use]
    pub const fn common(&self) -> &CommonOptions {
        match &self.command {
            Commands::Solve { common, .. } | Commands::Text { common, .. } => common,
        }
    }
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a puzzle file in the line-based text format.
    Solve {
        /// Path to the puzzle file.
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as plain text in the same format.
    Text {
        /// The puzzle text (use `\n`-separated sections).
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonOptions {
    /// Stop after this many distinct solutions. Two detects non-uniqueness.
    #[arg(long, default_value_t = 2)]
    pub max_solutions: usize,

    /// Wall-clock budget for the solve, in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Prune search branches deeper than this.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Skip contradiction probing and go straight from propagation to search.
    #[arg(long, default_value_t = false)]
    pub no_probing: bool,

    /// Upper bound on contradiction-probing rounds.
    #[arg(long)]
    pub probe_rounds: Option<usize>,

    /// Print solving statistics after the result.
    #[arg(short, long, default_value_t = false)]
    pub stats: bool,

    /// Enable verbose log output from the solver.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CommonOptions {
    /// Maps the flags onto solver options.
    #[must_use]
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            max_solutions: self.max_solutions,
            timeout: self.timeout_ms.map(Duration::from_millis),
            max_depth: self.max_depth,
            enable_probing: !self.no_probing,
            probe_max_rounds: self.probe_rounds,
        }
    }
}

/// Executes the parsed command line.
///
/// # Errors
///
/// I/O and parse failures loading the puzzle.
pub fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Commands::Solve { path, common } => {
            let board = parse_puzzle_file(path)?;
            solve_and_print(&board, common);
        }
        Commands::Text { input, common } => {
            let board = parse_puzzle_text(input)?;
            solve_and_print(&board, common);
        }
    }
    Ok(())
}

fn solve_and_print(board: &Board, common: &CommonOptions) {
    let solver = Solver::new(common.solve_options());
    let result = solver.solve(board);

    println!("{}", result.status);
    let palette = board.palette();
    for (index, solution) in result.solutions.iter().enumerate() {
        println!("solution {}:", index + 1);
        for row in solution.rows() {
            let text: String = row.iter().map(|&code| palette.symbol_of(code)).collect();
            println!("{text}");
        }
    }
    if result.solutions.is_empty() {
        println!("{}", TextRenderer::new(&result.board));
    }

    if common.stats {
        let stats = result.stats;
        println!("lines solved:   {}", stats.lines_solved);
        println!("contradictions: {}", stats.contradictions);
        println!("probe rounds:   {}", stats.probe_rounds);
        println!("search nodes:   {}", stats.nodes_explored);
        println!("search depth:   {}", stats.search_depth);
        println!("elapsed:        {:?}", stats.elapsed);
    }
}
