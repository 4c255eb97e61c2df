use crate::errors::SemanticResult;
use crate::logger;

use colored::Colorize;
use std::{io, process};
use structopt::StructOpt;

mod encode;
mod legend;

pub use encode::{EncodeOptions, OutputFormat};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "qmd-semantic",
    about = "Encodes analyzer name occurrences as LSP semantic tokens"
)]
pub struct Cli {
    #[structopt(
        long, env = "LOG_LEVEL",
        help = "Sets the log level",
        default_value = "warn",
        possible_values = &["off", "error", "warn", "info", "debug", "trace"],
        global = true
    )]
    log_level: log::LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Encode a JSON list of name occurrences
    Encode(EncodeOptions),
    /// Print the token legend as JSON
    Legend,
}

pub fn run() {
    let cli: Cli = Cli::from_args();

    if let Err(err) = logger::init(cli.log_level) {
        eprintln!("{} {}", "logger error:".red(), err);
    }

    let result: SemanticResult = match cli.cmd {
        Command::Encode(options) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            encode::action(options, io::stdin(), &mut out)
        }
        Command::Legend => legend::action(),
    };

    if let Err(err) = result {
        err.emit();
        process::exit(1);
    }
}
