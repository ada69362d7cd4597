//! Deployment of the zk-Hangman contract suite: the two proof verifiers followed by the game
//! factory, one confirmed transaction at a time, from a single funded account.

pub mod alias;
pub mod artifacts;
pub mod compilation;
mod deployer;
pub mod deployments_file;
pub mod network;
pub mod providers;
mod sequencer;

pub use alias::resolve_alias;
pub use alloy_primitives;
pub use artifacts::{
    deployment_plan, ArtifactError, ArtifactSource, ContractArtifact, HangmanContract,
};
pub use deployer::{
    ContractDeployer, DeployError, ProviderDeployer, DEFAULT_CONFIRMATION_TIMEOUT,
};
pub use network::{AccountDerivation, ConfigError, InfuraKeys, NetworkConfig};
pub use sequencer::{DeployedContract, DeploymentReport, DeploymentSequencer, SequencerError};
