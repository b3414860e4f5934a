#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use owlr_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "owlr")]
#[command(author, version, about = "Opal load-path resolver inspector", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print the load paths in search order
    Paths,

    /// Print the indexed load-path entries
    Entries,

    /// Resolve a module specifier to an absolute path
    Resolve {
        /// Module specifier (e.g. "./foo.rb")
        specifier: String,

        /// Directory of the requesting file (defaults to the working directory)
        #[arg(long, value_name = "DIR")]
        from: Option<PathBuf>,
    },

    /// Delete the cache document and regenerate it
    Rebuild,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    logging::init(cli.verbose, cli.json);

    let config = Config::new(cwd);

    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Paths => commands::cache::paths(&config, cli.json),
        Commands::Entries => commands::cache::entries(&config, cli.json),
        Commands::Resolve { specifier, from } => {
            commands::resolve::run(&config, &specifier, from.as_deref(), cli.json)
        }
        Commands::Rebuild => commands::cache::rebuild(&config, cli.json),
    }
}
