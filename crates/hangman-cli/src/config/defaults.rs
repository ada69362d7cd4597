use std::time::Duration;

use hangman_deployer::{
    compilation::DEFAULT_SOLC as DEPLOYER_SOLC,
    DEFAULT_CONFIRMATION_TIMEOUT as DEPLOYER_CONFIRMATION_TIMEOUT,
};

use crate::config::LoggingFormat;

pub const DEFAULT_LOGGING_FORMAT: LoggingFormat = LoggingFormat::Text;
pub const DEFAULT_NETWORK: &str = "local";
pub const DEFAULT_ACCOUNT_INDEX: u32 = 0;
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = DEPLOYER_CONFIRMATION_TIMEOUT;
pub const DEFAULT_SOLC: &str = DEPLOYER_SOLC;
