//! Choria CLI Binary
//!
//! Command-line front-end for the Choria orchestrator.

use choria::cli::{hoist_global_flags, Cli, Configuration, RunContext};
use choria::config::ConfigLoader;
use choria::logging::{init_logging, LoggingConfig};
use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_from(hoist_global_flags(std::env::args_os()));
    let configuration = Configuration::from_cli(&cli);

    let loaded = match ConfigLoader::load_for(configuration.config_file.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &loaded.config.logging);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Choria CLI starting");

    let context = RunContext::with_config(&loaded, &configuration);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let code = match context.run(&configuration, &mut out, &mut err) {
        Ok(outcome) => {
            info!(?outcome, "Command finished");
            outcome.exit_code()
        }
        Err(e) => {
            error!("Command failed: {}", e);
            let _ = writeln!(err, "{}", e);
            1
        }
    };

    let _ = out.flush();
    let _ = err.flush();
    process::exit(code);
}

/// Build logging configuration from CLI args and the config file `[logging]` table.
fn build_logging_config(cli: &Cli, file_config: &LoggingConfig) -> LoggingConfig {
    // Logging stays off unless --verbose is given
    if !cli.verbose {
        return LoggingConfig {
            level: "off".to_string(),
            ..LoggingConfig::default()
        };
    }

    let mut config = file_config.clone();

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    if cli.no_color {
        config.color = false;
    }

    config
}
