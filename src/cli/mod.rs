use colored::{Color, ColoredString, Colorize};
use log::Level;
use std::io::{self, Read};
use std::path::PathBuf;
use structopt::StructOpt;

use crate::errors::Diagnostic;
use crate::span::{FileSource, Source, TextSource};

mod parse;
mod tokens;

#[derive(Debug, StructOpt)]
#[structopt(name = "sprig", about = "Front end for the sprig language")]
pub struct Cli {
    #[structopt(
        long, env = "LOG_LEVEL",
        help = "Sets the log level",
        default_value = "info",
        possible_values = &["off", "error", "warn", "info", "debug", "trace"],
        global = true
    )]
    log_level: log::LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Prints the tokens of a source
    Tokens(InputOptions),
    /// Parses a source and prints the tree
    Parse(parse::ParseCommand),
}

#[derive(Debug, StructOpt)]
pub struct InputOptions {
    #[structopt(
        name = "INPUT",
        parse(from_os_str),
        help = "source file, standard input if left out"
    )]
    pub input_path: Option<PathBuf>,
}

impl InputOptions {
    /// The requested source, with standard input read up front.
    fn source(&self) -> Result<Box<dyn Source>, Diagnostic> {
        let source: Box<dyn Source> = match &self.input_path {
            Some(path) => Box::new(FileSource::new(path)),
            None => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Box::new(TextSource::new("<stdin>", text))
            }
        };
        Ok(source)
    }
}

pub fn run() {
    let cli: Cli = Cli::from_args();

    // set up logging
    let dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            out.finish(format_args!(
                "{} {}",
                ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                    .color(color)
                    .to_string(),
                message
            ))
        })
        .level(cli.log_level)
        .chain(io::stderr())
        .apply();
    if let Err(err) = dispatch {
        eprintln!("{} {}", "logging error:".red(), err);
    }

    let ok = match cli.cmd {
        Command::Tokens(options) => tokens::action(options),
        Command::Parse(options) => parse::action(options),
    };
    if !ok {
        std::process::exit(1);
    }
}
