use std::io;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{
    resolve_accounts, resolve_deploy_config, resolve_infura_keys, resolve_logging_format,
    CliConfig, Command, LoggingFormat, ProcessEnv,
};

mod commands;
mod config;

/// Diagnostics go to stderr; stdout is reserved for the deployed addresses. `RUST_LOG` overrides
/// the default `info` level.
fn init_logging(format: LoggingFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter);

    match format {
        LoggingFormat::Json => subscriber.json().try_init(),
        LoggingFormat::Text => subscriber.compact().try_init(),
    }
    .map_err(|err| anyhow!("cannot install the log subscriber: {err}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli_config = CliConfig::parse();
    init_logging(resolve_logging_format(cli_config.logging_format, &ProcessEnv)?)?;

    match cli_config.command {
        Command::PatchVerifiers { root } => commands::patch_verifiers(&root),
        Command::Deploy(cmd) => commands::deploy(resolve_deploy_config(cmd, &ProcessEnv)?).await,
        Command::Networks => {
            let accounts = resolve_accounts(None, &ProcessEnv)?;
            commands::list_networks(&resolve_infura_keys(&ProcessEnv), &accounts);
            Ok(())
        }
    }
}
