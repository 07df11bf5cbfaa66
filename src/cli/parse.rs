//! CLI parse: clap types and positional extraction. No behavior beyond shaping arguments.

use crate::cli::help::USAGE;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const SHOW_CONFIG_FLAGS: [&str; 2] = ["--show-config", "--show_config"];
const HELP_FLAGS: [&str; 2] = ["--help", "-h"];
const GLOBAL_SWITCHES: [&str; 2] = ["--no-color", "--verbose"];
const GLOBAL_VALUE_FLAGS: [&str; 7] = [
    "--config",
    "--environment",
    "--instance",
    "--log-level",
    "--log-format",
    "--log-output",
    "--log-file",
];

/// Choria CLI - Choria Orchestrator
#[derive(Parser, Debug)]
#[command(name = "choria")]
#[command(about = "Choria Orchestrator")]
#[command(override_usage = USAGE)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Shows the active configuration
    #[arg(long = "show-config", alias = "show_config")]
    pub show_config: bool,

    /// Show the available agents, or help for the given agent
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Configuration file path (overrides the system and user files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Puppet environment to scope requests to
    #[arg(long, default_value = "production")]
    pub environment: String,

    /// Choria instance to address
    #[arg(long)]
    pub instance: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// <agent> <action> [agent options] [request options]
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        hide = true
    )]
    pub words: Vec<String>,
}

/// Parsed invocation. `None` is the only marker for an absent agent or action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub agent: Option<String>,
    pub action: Option<String>,
    /// Remaining words in their original order, for the dispatcher
    pub arguments: Vec<String>,
    pub show_config: bool,
    pub help: bool,
    pub config_file: Option<PathBuf>,
    pub environment: String,
    pub instance: Option<String>,
    pub color: bool,
}

impl Configuration {
    pub fn from_cli(cli: &Cli) -> Self {
        let positionals = extract_positionals(&cli.words);

        Self {
            agent: positionals.agent,
            action: positionals.action,
            arguments: positionals.remaining,
            show_config: cli.show_config || positionals.show_config,
            help: cli.help || positionals.help,
            config_file: cli.config.clone(),
            environment: cli.environment.clone(),
            instance: cli.instance.clone(),
            color: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Result of splitting the raw word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positionals {
    pub agent: Option<String>,
    pub action: Option<String>,
    pub remaining: Vec<String>,
    pub show_config: bool,
    pub help: bool,
}

fn is_flag(word: &str) -> bool {
    word.starts_with('-')
}

/// The first non-flag word is the agent, the second the action. Every other word is
/// kept in order, except `--show-config` and help flags which are lifted out.
pub fn extract_positionals(words: &[String]) -> Positionals {
    let mut out = Positionals::default();

    for word in words {
        if SHOW_CONFIG_FLAGS.contains(&word.as_str()) {
            out.show_config = true;
        } else if HELP_FLAGS.contains(&word.as_str()) {
            out.help = true;
        } else if is_flag(word) {
            out.remaining.push(word.clone());
        } else if out.agent.is_none() {
            out.agent = Some(word.clone());
        } else if out.action.is_none() {
            out.action = Some(word.clone());
        } else {
            out.remaining.push(word.clone());
        }
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlobalFlag {
    /// Complete on its own: a switch or `--flag=value`
    Standalone,
    /// Takes the following word as its value
    WithValue,
}

fn classify(word: &str) -> Option<GlobalFlag> {
    if SHOW_CONFIG_FLAGS.contains(&word)
        || HELP_FLAGS.contains(&word)
        || GLOBAL_SWITCHES.contains(&word)
    {
        return Some(GlobalFlag::Standalone);
    }
    if GLOBAL_VALUE_FLAGS.contains(&word) {
        return Some(GlobalFlag::WithValue);
    }
    match word.split_once('=') {
        Some((name, _)) if GLOBAL_VALUE_FLAGS.contains(&name) => Some(GlobalFlag::Standalone),
        _ => None,
    }
}

/// Move global flags (and their values) ahead of the agent words so they are honoured
/// wherever they appear. Words after `--` are left alone.
pub fn hoist_global_flags<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv.into_iter().map(Into::into);
    let mut globals: Vec<OsString> = argv.next().into_iter().collect();
    let mut rest = Vec::new();

    while let Some(arg) = argv.next() {
        if arg == "--" {
            rest.push(arg);
            rest.extend(argv.by_ref());
            break;
        }

        let kind = arg.to_str().and_then(classify);
        match kind {
            Some(GlobalFlag::Standalone) => globals.push(arg),
            Some(GlobalFlag::WithValue) => {
                globals.push(arg);
                globals.extend(argv.next());
            }
            None => rest.push(arg),
        }
    }

    globals.extend(rest);
    globals
}

/// Parse a full argument vector, program name included.
pub fn parse<I, T>(argv: I) -> Result<Configuration, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = Cli::try_parse_from(hoist_global_flags(argv))?;
    Ok(Configuration::from_cli(&cli))
}
