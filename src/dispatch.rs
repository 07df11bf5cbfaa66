//! RPC dispatch: hands a parsed agent/action request to whatever performs the call.

use crate::config::DispatcherConfig;
use crate::error::ChoriaError;
use std::process::Command;

/// A fully parsed request ready for invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub agent: String,
    pub action: String,
    /// Agent and request options, untouched
    pub arguments: Vec<String>,
    pub environment: String,
    pub instance: Option<String>,
}

pub trait RpcDispatcher {
    /// Perform the request and return the text to print.
    fn dispatch(&self, request: &RpcRequest) -> Result<String, ChoriaError>;
}

/// Runs `<command> <args...> <agent> <action> <arguments...>` and captures stdout.
pub struct CommandDispatcher {
    command: String,
    args: Vec<String>,
}

impl CommandDispatcher {
    pub fn new(config: &DispatcherConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }

    fn build(&self, request: &RpcRequest) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(&request.agent)
            .arg(&request.action)
            .args(&request.arguments)
            .env("CHORIA_ENVIRONMENT", &request.environment);
        if let Some(instance) = &request.instance {
            cmd.env("CHORIA_INSTANCE", instance);
        }
        cmd
    }
}

impl RpcDispatcher for CommandDispatcher {
    fn dispatch(&self, request: &RpcRequest) -> Result<String, ChoriaError> {
        tracing::info!(
            agent = %request.agent,
            action = %request.action,
            command = %self.command,
            "Dispatching request"
        );

        let output = self.build(request).output().map_err(|e| {
            ChoriaError::User(format!("Could not run `{}`: {}", self.command, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();

        match output.status.code() {
            Some(0) => Ok(stdout),
            Some(code) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let reason = if stderr.is_empty() {
                    format!("`{}` exited with status {}", self.command, code)
                } else {
                    stderr
                };
                if stdout.is_empty() {
                    Err(ChoriaError::User(reason))
                } else {
                    Err(ChoriaError::RequestFailed {
                        output: stdout,
                        reason,
                    })
                }
            }
            None => {
                let reason = format!("`{}` was terminated by a signal", self.command);
                if stdout.is_empty() {
                    Err(ChoriaError::Abort(reason))
                } else {
                    Err(ChoriaError::RequestAborted {
                        output: stdout,
                        reason,
                    })
                }
            }
        }
    }
}
