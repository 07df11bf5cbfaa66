//! Agent presentation: overview table and per-agent help.

use crate::cli::help::USAGE;
use crate::ddl::AgentDdl;

/// Usage banner plus an aligned `name  description` table of every agent.
pub fn format_overview(ddls: &[AgentDdl]) -> String {
    let mut lines = vec![
        USAGE.to_string(),
        String::new(),
        "Available Agents:".to_string(),
        String::new(),
    ];

    if ddls.is_empty() {
        lines.push("   No agent DDL files found".to_string());
        return lines.join("\n");
    }

    let longest = ddls.iter().map(|ddl| ddl.name().chars().count()).max().unwrap_or(0);
    for ddl in ddls {
        lines.push(format!(
            "  {:<width$}       {}",
            ddl.name(),
            ddl.description(),
            width = longest
        ));
    }

    lines.push(String::new());
    lines.push("See choria <agent> --help for details about the agent".to_string());
    lines.join("\n")
}

pub fn format_agent_help(ddl: &AgentDdl) -> String {
    let meta = &ddl.metadata;
    let mut output = format!(
        "choria {} <action> [agent options] [request options]\n\n{}\n",
        meta.name, meta.description
    );

    let mut details = Vec::new();
    if !meta.author.is_empty() {
        details.push(format!("    Author: {}", meta.author));
    }
    if !meta.version.is_empty() {
        details.push(format!("   Version: {}", meta.version));
    }
    if !meta.license.is_empty() {
        details.push(format!("   License: {}", meta.license));
    }
    if meta.timeout > 0 {
        details.push(format!("   Timeout: {}", meta.timeout));
    }
    if !details.is_empty() {
        output.push('\n');
        output.push_str(&details.join("\n"));
        output.push('\n');
    }

    output.push_str("\nActions:\n\n");
    if ddl.actions.is_empty() {
        output.push_str("   No actions defined");
        return output;
    }

    let longest = ddl.actions.iter().map(|a| a.action.chars().count()).max().unwrap_or(0);
    let rows: Vec<String> = ddl
        .actions
        .iter()
        .map(|a| format!("  {:<width$}       {}", a.action, a.description, width = longest))
        .collect();
    output.push_str(&rows.join("\n"));
    output
}
