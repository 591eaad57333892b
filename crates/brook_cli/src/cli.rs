use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a source file and print its syntax tree.
    Parse {
        /// The input file.
        input: PathBuf,
    },

    /// Lex a source file and print one token per line.
    Tokens {
        /// The input file.
        input: PathBuf,
    },
}
