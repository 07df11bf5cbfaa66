//! CLI domain: parse, route, help, output, and presentation only.
//! Resolution, catalogue and dispatch live behind the seams in `resolver`, `catalog`
//! and `dispatch`; the route table only sequences them.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{options_text, USAGE};
pub use output::{critical_error_line, paint, Tone};
pub use parse::{extract_positionals, hoist_global_flags, parse, Cli, Configuration, Positionals};
pub use presentation::{format_agent_help, format_config_report, format_overview, ConfigFiles};
pub use route::RunContext;
