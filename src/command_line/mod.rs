#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The command-line interface of the solver binary.

pub mod cli;
