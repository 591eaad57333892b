use std::io::{self, Write};
use std::process::ExitCode;

use brook_frontend::token::TokenKind;
use brook_frontend::{Lexer, Parser};
use clap::Parser as _;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::{Cli, Command};

mod cli;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Frontend(#[from] brook_frontend::Error),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if report_error(&err).is_err() {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { input } => {
            let source = std::fs::read_to_string(input)?;
            let mut lexer = Lexer::new(&source);
            let program = Parser::new(&mut lexer).parse()?;
            println!("{program:#?}");
        }

        Command::Tokens { input } => {
            let source = std::fs::read_to_string(input)?;
            let mut lexer = Lexer::new(&source);
            loop {
                let token = lexer
                    .advance_token()
                    .map_err(brook_frontend::Error::from)?;
                println!("{token}");
                if token.kind == TokenKind::EndOfInput {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn report_error(err: &CliError) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stderr, "error")?;
    stderr.reset()?;
    writeln!(stderr, ": {err}")
}
