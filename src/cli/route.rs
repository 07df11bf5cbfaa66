//! CLI route: run context, validation gate and the single route table.

use crate::catalog::{Catalogue, FsDdlSource};
use crate::cli::help::{options_text, USAGE};
use crate::cli::output::critical_error_line;
use crate::cli::parse::Configuration;
use crate::cli::presentation::{
    format_agent_help, format_config_report, format_overview, ConfigFiles,
};
use crate::config::LoadedConfig;
use crate::ddl::AgentDdl;
use crate::dispatch::{CommandDispatcher, RpcDispatcher, RpcRequest};
use crate::error::{ChoriaError, Outcome};
use crate::resolver::{ConfigResolver, PuppetResolver};
use std::io::Write;

/// Runtime context for one invocation: resolved files, resolver, agent catalogue and
/// dispatcher. Built once at process start and passed to everything that needs them.
pub struct RunContext {
    files: ConfigFiles,
    resolver: Box<dyn ConfigResolver>,
    catalogue: Catalogue,
    dispatcher: Box<dyn RpcDispatcher>,
}

impl RunContext {
    /// Build the default resolver, filesystem catalogue and command dispatcher.
    pub fn with_config(loaded: &LoadedConfig, configuration: &Configuration) -> Self {
        let resolver = PuppetResolver::new(&loaded.config, &configuration.environment);
        let catalogue = Catalogue::new(Box::new(FsDdlSource::new(loaded.config.libdir.clone())));
        let dispatcher = CommandDispatcher::new(&loaded.config.dispatcher);

        Self::from_parts(
            ConfigFiles::from_loaded(loaded),
            Box::new(resolver),
            catalogue,
            Box::new(dispatcher),
        )
    }

    pub fn from_parts(
        files: ConfigFiles,
        resolver: Box<dyn ConfigResolver>,
        catalogue: Catalogue,
        dispatcher: Box<dyn RpcDispatcher>,
    ) -> Self {
        Self {
            files,
            resolver,
            catalogue,
            dispatcher,
        }
    }

    /// Every installed agent whose DDL loaded. Computed once.
    pub fn agent_catalogue(&self) -> &[AgentDdl] {
        self.catalogue.agent_ddls()
    }

    pub fn overview_text(&self) -> String {
        format_overview(self.agent_catalogue())
    }

    /// A client certificate is required unless only the configuration is shown.
    pub fn validate(&self, configuration: &Configuration) -> Result<(), ChoriaError> {
        if configuration.show_config || self.resolver.has_client_public_cert() {
            return Ok(());
        }

        Err(ChoriaError::User(format!(
            "A certificate is needed from the Puppet CA for `{}`, please use the `choria request_cert` command",
            self.resolver.certname()
        )))
    }

    /// Entry point used by the binary.
    pub fn run(
        &self,
        configuration: &Configuration,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Outcome, ChoriaError> {
        // The banner only reaches stdout as the head of the overview; here it is logged.
        tracing::debug!(usage = USAGE, "Choria CLI run");
        self.main(configuration, stdout, stderr)
    }

    /// Execute and translate the result: `User` errors go to stderr and still
    /// complete, `Abort` ends the run silently, anything else propagates. Output a
    /// failed request already produced is printed before either.
    pub fn main(
        &self,
        configuration: &Configuration,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Outcome, ChoriaError> {
        match self.execute(configuration) {
            Ok(output) => {
                writeln!(stdout, "{}", output)?;
                Ok(Outcome::Completed)
            }
            Err(ChoriaError::User(message)) => {
                report_user_error(message, configuration.color, stderr)
            }
            Err(ChoriaError::RequestFailed { output, reason }) => {
                writeln!(stdout, "{}", output)?;
                report_user_error(reason, configuration.color, stderr)
            }
            Err(ChoriaError::Abort(reason)) => {
                tracing::error!("Aborted: {}", reason);
                Ok(Outcome::FatalAbort)
            }
            Err(ChoriaError::RequestAborted { output, reason }) => {
                writeln!(stdout, "{}", output)?;
                tracing::error!("Aborted: {}", reason);
                Ok(Outcome::FatalAbort)
            }
            Err(other) => Err(other),
        }
    }

    /// Validate, then produce the text to print.
    pub fn execute(&self, configuration: &Configuration) -> Result<String, ChoriaError> {
        self.validate(configuration)?;

        if configuration.show_config {
            return self.show_config(configuration.color);
        }

        self.route(configuration)
    }

    /// Disconnects first; the report only needs resolved local state.
    pub fn show_config(&self, color: bool) -> Result<String, ChoriaError> {
        self.resolver.disconnect();
        format_config_report(&self.files, self.resolver.as_ref(), color)
    }

    fn route(&self, configuration: &Configuration) -> Result<String, ChoriaError> {
        let agent = match configuration.agent.as_deref() {
            Some(agent) => agent,
            None => return Ok(format!("{}\n\n{}", self.overview_text(), options_text().trim_end())),
        };

        let action = match configuration.action.as_deref() {
            Some(action) if !configuration.help => action,
            _ => {
                return self
                    .catalogue
                    .find(agent)
                    .map(format_agent_help)
                    .ok_or_else(|| {
                        ChoriaError::User(format!(
                            "Unknown agent `{}`, see `choria --help`",
                            agent
                        ))
                    });
            }
        };

        if let Some(ddl) = self.catalogue.find(agent) {
            if ddl.action(action).is_none() {
                return Err(ChoriaError::User(format!(
                    "Agent `{}` has no action `{}`, see `choria {} --help`",
                    agent, action, agent
                )));
            }
        }

        let request = RpcRequest {
            agent: agent.to_string(),
            action: action.to_string(),
            arguments: configuration.arguments.clone(),
            environment: configuration.environment.clone(),
            instance: configuration.instance.clone(),
        };
        self.dispatcher.dispatch(&request)
    }
}

fn report_user_error(
    message: String,
    color: bool,
    stderr: &mut dyn Write,
) -> Result<Outcome, ChoriaError> {
    tracing::error!("User error: {}", message);
    writeln!(stderr, "{}", critical_error_line(&message, color))?;
    Ok(Outcome::UserFacingFailure(message))
}
