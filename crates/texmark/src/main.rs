//! texmark CLI - Markdown to LaTeX converter.
//!
//! Reads markdown from a file or stdin and writes LaTeX to a file or stdout.

mod convert;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use convert::ConvertArgs;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// texmark - Convert markdown to LaTeX.
#[derive(Parser)]
#[command(name = "texmark", version, about)]
struct Cli {
    #[command(flatten)]
    args: ConvertArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN.
    // Logs go to stderr so they never mix with LaTeX on stdout.
    let filter = if cli.args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute(VERSION) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
