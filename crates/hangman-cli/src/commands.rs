use std::path::Path;

use anyhow::Result;
use hangman_deployer::{
    deployment_plan, providers::create_provider_with_signer, resolve_alias, AccountDerivation,
    DeploymentSequencer, InfuraKeys, NetworkConfig, ProviderDeployer,
};
use tracing::info;

use crate::config::DeployConfig;

pub fn patch_verifiers(root: &Path) -> Result<()> {
    for outcome in verifier_patcher::patch_verifiers(root)? {
        info!(
            path = %outcome.path.display(),
            rewritten = outcome.rewritten,
            already_applied = outcome.already_applied,
            changed = outcome.changed,
            "Verifier source normalized"
        );
    }
    Ok(())
}

pub async fn deploy(
    DeployConfig {
        network,
        account_index,
        artifacts,
        confirmation_timeout,
        deployments_path,
    }: DeployConfig,
) -> Result<()> {
    let signer = network.accounts.signer(account_index)?;
    info!(
        network = %network.name,
        rpc_url = %network.rpc_url,
        deployer = %signer.address(),
        "Starting deployment"
    );

    // Every artifact is resolved before the first transaction goes out.
    let plan = deployment_plan(&artifacts)?;

    let provider = create_provider_with_signer(&network.rpc_url, signer).await?;
    let deployer = ProviderDeployer::new(provider)
        .with_gas_limit(network.gas_limit)
        .with_confirmation_timeout(confirmation_timeout);

    let mut sequencer = DeploymentSequencer::new(deployer, network.name);
    if let Some(path) = deployments_path {
        sequencer = sequencer.with_deployments_file(path);
    }

    let report = sequencer.run(&plan).await?;

    println!();
    for line in report.output_lines() {
        println!("{line}");
    }
    Ok(())
}

pub fn list_networks(keys: &InfuraKeys, accounts: &AccountDerivation) {
    for network in NetworkConfig::all(keys, accounts) {
        println!(
            "{:<10} {:<6} {}",
            network.name,
            resolve_alias(&network.name),
            network.rpc_url
        );
    }
}
