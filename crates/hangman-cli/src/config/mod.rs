use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};
pub use cli::{CliConfig, Command, DeployCmd};
use defaults::{
    DEFAULT_ACCOUNT_INDEX, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATION_TIMEOUT,
    DEFAULT_LOGGING_FORMAT, DEFAULT_NETWORK, DEFAULT_SOLC,
};
pub use enums::LoggingFormat;
use hangman_deployer::{
    network::{DEFAULT_INFURA_KEY, DEFAULT_MNEMONIC},
    AccountDerivation, ArtifactSource, ConfigError, InfuraKeys, NetworkConfig,
};

mod cli;
mod defaults;
mod enums;

pub const LOGGING_FORMAT_ENV: &str = "HANGMAN_LOGGING_FORMAT";
pub const NETWORK_ENV: &str = "HANGMAN_NETWORK";
pub const RPC_URL_ENV: &str = "HANGMAN_RPC_URL";
pub const MNEMONIC_ENV: &str = "MNEMONIC";
pub const ACCOUNT_INDEX_ENV: &str = "HANGMAN_ACCOUNT_INDEX";
pub const ARTIFACTS_DIR_ENV: &str = "HANGMAN_ARTIFACTS_DIR";
pub const SOURCES_DIR_ENV: &str = "HANGMAN_SOURCES_DIR";
pub const SOLC_ENV: &str = "HANGMAN_SOLC";
pub const CONFIRMATION_TIMEOUT_ENV: &str = "HANGMAN_CONFIRMATION_TIMEOUT";
pub const DEPLOYMENTS_PATH_ENV: &str = "HANGMAN_DEPLOYMENTS_PATH";
pub const INFURA_KEY_ROPSTEN_ENV: &str = "INFURA_KEY_ROPSTEN";
pub const INFURA_KEY_RINKEBY_ENV: &str = "INFURA_KEY_RINKEBY";

/// Resolved configuration of a deployment run. Order of precedence is:
/// 1. Command line arguments (`DeployCmd`).
/// 2. Environment variables.
/// 3. Default values (available only for some fields).
///
/// For field documentation, see their counterparts in `DeployCmd`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DeployConfig {
    pub network: NetworkConfig,
    pub account_index: u32,
    pub artifacts: ArtifactSource,
    pub confirmation_timeout: Duration,
    pub deployments_path: Option<PathBuf>,
}

/// Source of environment variables. Production code reads the process environment.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

pub fn resolve_logging_format(
    value: Option<LoggingFormat>,
    env: &impl Env,
) -> Result<LoggingFormat> {
    resolve_value(value, LOGGING_FORMAT_ENV, Some(DEFAULT_LOGGING_FORMAT), env)
}

pub fn resolve_infura_keys(env: &impl Env) -> InfuraKeys {
    let key = |var: &str| env.var(var).unwrap_or_else(|| DEFAULT_INFURA_KEY.to_string());
    InfuraKeys {
        ropsten: key(INFURA_KEY_ROPSTEN_ENV),
        rinkeby: key(INFURA_KEY_RINKEBY_ENV),
    }
}

pub fn resolve_accounts(mnemonic: Option<String>, env: &impl Env) -> Result<AccountDerivation> {
    let mnemonic = resolve_value(
        mnemonic,
        MNEMONIC_ENV,
        Some(DEFAULT_MNEMONIC.to_string()),
        env,
    )?;
    Ok(AccountDerivation::new(mnemonic))
}

pub fn resolve_deploy_config(
    DeployCmd {
        network,
        rpc_url,
        mnemonic,
        account_index,
        artifacts_dir,
        sources_dir,
        solc,
        confirmation_timeout,
        deployments_path,
    }: DeployCmd,
    env: &impl Env,
) -> Result<DeployConfig> {
    let name = resolve_value(network, NETWORK_ENV, Some(DEFAULT_NETWORK.to_string()), env)?;
    let accounts = resolve_accounts(mnemonic, env)?;
    let keys = resolve_infura_keys(env);

    let network = match resolve_optional(rpc_url, RPC_URL_ENV, env)? {
        Some(rpc_url) => match NetworkConfig::lookup(&name, &keys, accounts.clone()) {
            Ok(config) => NetworkConfig { rpc_url, ..config },
            Err(ConfigError::UnknownNetwork(_)) => {
                NetworkConfig::custom(&name, &rpc_url, accounts)
            }
            Err(err) => return Err(err.into()),
        },
        None => NetworkConfig::lookup(&name, &keys, accounts)?,
    };

    let artifacts = match resolve_optional(sources_dir, SOURCES_DIR_ENV, env)? {
        Some(sources_dir) => ArtifactSource::Solc {
            sources_dir,
            solc: resolve_value(solc, SOLC_ENV, Some(PathBuf::from(DEFAULT_SOLC)), env)?,
        },
        None => ArtifactSource::Hardhat {
            artifacts_dir: resolve_value(
                artifacts_dir,
                ARTIFACTS_DIR_ENV,
                Some(PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
                env,
            )?,
        },
    };

    let confirmation_timeout = match confirmation_timeout {
        Some(timeout) => timeout,
        None => resolve_value(
            None,
            CONFIRMATION_TIMEOUT_ENV,
            Some(DEFAULT_CONFIRMATION_TIMEOUT.as_secs()),
            env,
        )
        .map(Duration::from_secs)?,
    };

    Ok(DeployConfig {
        network,
        account_index: resolve_value(
            account_index,
            ACCOUNT_INDEX_ENV,
            Some(DEFAULT_ACCOUNT_INDEX),
            env,
        )?,
        artifacts,
        confirmation_timeout,
        deployments_path: resolve_optional(deployments_path, DEPLOYMENTS_PATH_ENV, env)?,
    })
}

fn resolve_value<T: FromStr>(
    value: Option<T>,
    env_var: &str,
    default: Option<T>,
    env: &impl Env,
) -> Result<T> {
    resolve_optional(value, env_var, env)?
        .or(default)
        .ok_or_else(|| anyhow!("Missing required configuration: `{env_var}`"))
}

fn resolve_optional<T: FromStr>(
    value: Option<T>,
    env_var: &str,
    env: &impl Env,
) -> Result<Option<T>> {
    match value {
        Some(value) => Ok(Some(value)),
        None => env
            .var(env_var)
            .map(|raw| {
                T::from_str(&raw).map_err(|_| anyhow!("Invalid value `{raw}` in `{env_var}`"))
            })
            .transpose(),
    }
}
