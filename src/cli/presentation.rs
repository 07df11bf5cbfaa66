//! CLI presentation: text formatters for the agent overview, agent help and the
//! configuration report.

mod agents;
mod report;

pub use agents::{format_agent_help, format_overview};
pub use report::{format_config_report, ConfigFiles};
