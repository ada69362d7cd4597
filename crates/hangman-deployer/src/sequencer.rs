use std::path::PathBuf;

use alloy_primitives::Address;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    deployments_file::{write_deployed_address, DeploymentsFileError},
    resolve_alias, ContractArtifact, ContractDeployer, DeployError,
};

/// A contract whose creation has been confirmed on chain.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DeployedContract {
    pub name: String,
    pub label: String,
    pub address: Address,
    /// 1-based position in the deployment plan.
    pub position: usize,
}

#[derive(Debug, Error)]
pub enum SequencerError {
    /// Deployment stopped at `position`. Everything in `completed` stays on chain.
    #[error(
        "deployment of `{contract}` (stage {position} of {total}) failed; confirmed so far: {}",
        summarize(.completed)
    )]
    Stage {
        position: usize,
        total: usize,
        contract: String,
        completed: Vec<DeployedContract>,
        #[source]
        source: DeployError,
    },

    /// `contract` is on chain (it is the last entry of `completed`), but it could not be recorded.
    #[error(
        "`{contract}` (stage {position}) was deployed but not recorded; confirmed so far: {}",
        summarize(.completed)
    )]
    DeploymentsFile {
        position: usize,
        contract: String,
        completed: Vec<DeployedContract>,
        #[source]
        source: DeploymentsFileError,
    },
}

fn summarize(completed: &[DeployedContract]) -> String {
    if completed.is_empty() {
        return "none".to_string();
    }
    completed
        .iter()
        .map(|contract| format!("{} at {}", contract.name, contract.address))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a fully successful run.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DeploymentReport {
    pub network: String,
    pub alias: String,
    pub contracts: Vec<DeployedContract>,
}

impl DeploymentReport {
    /// One `const <alias><Label> = "<address>"` line per contract, in deployment order.
    pub fn output_lines(&self) -> Vec<String> {
        self.contracts
            .iter()
            .map(|contract| {
                format!(
                    "const {}{} = \"{}\"",
                    self.alias, contract.label, contract.address
                )
            })
            .collect()
    }
}

/// Deploys a plan strictly in order, waiting for each contract to be confirmed before submitting
/// the next one. The first failure ends the run; nothing is rolled back.
pub struct DeploymentSequencer<D> {
    deployer: D,
    network: String,
    deployments_file: Option<PathBuf>,
}

impl<D: ContractDeployer> DeploymentSequencer<D> {
    pub fn new(deployer: D, network: impl Into<String>) -> Self {
        Self {
            deployer,
            network: network.into(),
            deployments_file: None,
        }
    }

    /// Record every confirmed address in `path` as soon as it is known.
    pub fn with_deployments_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.deployments_file = Some(path.into());
        self
    }

    pub async fn run(&self, plan: &[ContractArtifact]) -> Result<DeploymentReport, SequencerError> {
        let total = plan.len();
        let mut completed = Vec::with_capacity(total);

        for (index, artifact) in plan.iter().enumerate() {
            let position = index + 1;
            info!(network = %self.network, "Deploying {} ({position}/{total})", artifact.name);

            let address = match self.deployer.deploy(artifact).await {
                Ok(address) => address,
                Err(source) => {
                    error!(contract = %artifact.name, position, "Deployment failed: {source}");
                    return Err(SequencerError::Stage {
                        position,
                        total,
                        contract: artifact.name.clone(),
                        completed,
                        source,
                    });
                }
            };
            info!("{} deployed to: {address}", artifact.name);

            completed.push(DeployedContract {
                name: artifact.name.clone(),
                label: artifact.label.clone(),
                address,
                position,
            });

            if let Some(path) = &self.deployments_file {
                if let Err(source) =
                    write_deployed_address(path, &self.network, &artifact.label, address)
                {
                    error!(
                        contract = %artifact.name,
                        %address,
                        "Cannot record deployment: {source}"
                    );
                    return Err(SequencerError::DeploymentsFile {
                        position,
                        contract: artifact.name.clone(),
                        completed,
                        source,
                    });
                }
            }
        }

        Ok(DeploymentReport {
            alias: resolve_alias(&self.network).to_string(),
            network: self.network.clone(),
            contracts: completed,
        })
    }
}
