use clap::Parser;
use log::LevelFilter;
use nonogram_solver::command_line::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    let level = if cli.common().verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
