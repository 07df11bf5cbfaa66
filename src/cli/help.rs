//! CLI help: usage banner and the global options listing.

use crate::cli::parse::Cli;
use clap::CommandFactory;

/// Invocation shape shown at the top of every overview.
pub const USAGE: &str = "choria [options] <agent> <action> [agent options] [request options]";

/// Global options as rendered by clap, without its own usage header.
pub fn options_text() -> String {
    Cli::command()
        .help_template("Options:\n{options}")
        .render_help()
        .to_string()
}
