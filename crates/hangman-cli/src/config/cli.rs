use std::{num::ParseIntError, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

use crate::config::{defaults::*, enums::LoggingFormat, *};

/// Build and deployment tooling for the zk-Hangman contracts.
#[derive(Clone, Debug, Parser)]
#[clap(name = "zk-hangman")]
pub struct CliConfig {
    #[clap(
        long,
        value_enum,
        global = true,
        help = "Logging format configuration.",
        long_help = format!("Logging format configuration. If not provided, the value from the \
            environment variable `{LOGGING_FORMAT_ENV}` will be used. If that is not set, the \
            default value is `{DEFAULT_LOGGING_FORMAT:?}`.")
    )]
    pub logging_format: Option<LoggingFormat>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Normalize the generated verifier sources: pin the compiler pragma and give each verifier
    /// its own contract name. Files are rewritten in place.
    PatchVerifiers {
        /// Project root containing `contracts/InitVerifier.sol` and `contracts/GuessVerifier.sol`.
        #[clap(long, default_value = ".")]
        root: PathBuf,
    },
    /// Deploy the two verifiers and the game factory, then print their addresses.
    ///
    /// On failure, the error names the failed stage and every contract confirmed before it.
    Deploy(DeployCmd),
    /// List the built-in network configurations.
    Networks,
}

/// Configuration of a deployment run.
///
/// All fields are optional, as they can be provided either through environment variables or,
/// in some cases, through default values.
#[derive(Clone, Debug, Args)]
pub struct DeployCmd {
    #[clap(
        long,
        help = "Name of the target network.",
        long_help = format!("Name of the target network. If not provided, the value from the \
            environment variable `{NETWORK_ENV}` will be used. If that is not set, the default \
            value is `{DEFAULT_NETWORK}`.")
    )]
    pub network: Option<String>,

    #[clap(
        long,
        help = "Override of the network's RPC endpoint.",
        long_help = format!("Override of the network's RPC endpoint. Required for networks \
            without a built-in configuration. If not provided, the value from the environment \
            variable `{RPC_URL_ENV}` will be used.")
    )]
    pub rpc_url: Option<String>,

    #[clap(
        long,
        help = "Mnemonic of the deploying account.",
        long_help = format!("Mnemonic of the deploying account. If not provided, the value from \
            the environment variable `{MNEMONIC_ENV}` will be used. If that is not set, the \
            well-known development mnemonic is used.")
    )]
    pub mnemonic: Option<String>,

    #[clap(
        long,
        help = "Index of the derived account used for deployment.",
        long_help = format!("Index of the derived account used for deployment. If not provided, \
            the value from the environment variable `{ACCOUNT_INDEX_ENV}` will be used. If that \
            is not set, the default value is `{DEFAULT_ACCOUNT_INDEX}`.")
    )]
    pub account_index: Option<u32>,

    #[clap(
        long,
        help = "Directory with Hardhat compilation artifacts.",
        long_help = format!("Directory with Hardhat compilation artifacts. If not provided, the \
            value from the environment variable `{ARTIFACTS_DIR_ENV}` will be used. If that is \
            not set, the default value is `{DEFAULT_ARTIFACTS_DIR}`.")
    )]
    pub artifacts_dir: Option<PathBuf>,

    #[clap(
        long,
        help = "Compile sources from this directory with `solc` instead of using artifacts.",
        long_help = format!("Compile `<dir>/<Contract>.sol` with a local `solc` instead of \
            reading compilation artifacts. If not provided, the value from the environment \
            variable `{SOURCES_DIR_ENV}` will be used.")
    )]
    pub sources_dir: Option<PathBuf>,

    #[clap(
        long,
        help = "The `solc` executable used with `--sources-dir`.",
        long_help = format!("The `solc` executable used with `--sources-dir`. If not provided, \
            the value from the environment variable `{SOLC_ENV}` will be used. If that is not \
            set, `{DEFAULT_SOLC}` is looked up on `PATH`.")
    )]
    pub solc: Option<PathBuf>,

    #[clap(
        long,
        help = "Time (in seconds) to wait for each deployment to be confirmed.",
        long_help = format!("Time (in seconds) to wait for each deployment to be confirmed. If \
            not provided, the value from the environment variable `{CONFIRMATION_TIMEOUT_ENV}` \
            will be used. If that is not set, the default value is `{}`.",
            DEFAULT_CONFIRMATION_TIMEOUT.as_secs()),
        value_parser = parse_seconds
    )]
    pub confirmation_timeout: Option<Duration>,

    #[clap(
        long,
        help = "JSON file in which deployed addresses are recorded.",
        long_help = format!("JSON file in which deployed addresses are recorded, right after each \
            confirmation. If not provided, the value from the environment variable \
            `{DEPLOYMENTS_PATH_ENV}` will be used. If that is not set, nothing is recorded.")
    )]
    pub deployments_path: Option<PathBuf>,
}

pub fn parse_seconds(value: &str) -> Result<Duration, ParseIntError> {
    value.parse().map(Duration::from_secs)
}
