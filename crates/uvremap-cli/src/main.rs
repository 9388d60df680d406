use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod extract;
mod logging;
mod remap;

#[derive(Parser, Debug)]
#[command(name = "uvremap", version, about = "Move texture content between region layouts")]
struct Cli {
    /// More output (debug level).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn the named rectangles of SVG files into annotation JSON.
    Extract(extract::ExtractArgs),
    /// Remap images from one annotation layout onto another.
    Remap(remap::RemapArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.cmd {
        Command::Extract(args) => extract::run(args),
        Command::Remap(args) => remap::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
