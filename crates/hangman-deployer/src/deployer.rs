use std::{future::Future, time::Duration};

use alloy_network::{ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{PendingTransactionError, Provider, WatchTxError};
use alloy_rpc_types::TransactionRequest;
use alloy_transport::TransportError;
use thiserror::Error;
use tracing::debug;

use crate::ContractArtifact;

/// How long to wait for a creation transaction to be included before giving up.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum DeployError {
    /// The node is unreachable or rejected a request.
    #[error("RPC request failed")]
    Network(#[from] TransportError),

    /// Submission went through, but watching for the receipt broke down.
    #[error("lost track of transaction {tx_hash}")]
    Watch {
        tx_hash: TxHash,
        #[source]
        source: PendingTransactionError,
    },

    #[error("contract creation reverted (transaction {tx_hash})")]
    TransactionRevert { tx_hash: TxHash },

    #[error("transaction {tx_hash} not included within {}s", .timeout.as_secs())]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },
}

/// Something that can put a contract on chain and report its address once the creation is
/// confirmed.
pub trait ContractDeployer {
    fn deploy(
        &self,
        artifact: &ContractArtifact,
    ) -> impl Future<Output = Result<Address, DeployError>>;
}

/// Deploys through an RPC provider with an attached signer.
pub struct ProviderDeployer<P> {
    provider: P,
    gas_limit: Option<u64>,
    confirmation_timeout: Duration,
}

impl<P: Provider> ProviderDeployer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            gas_limit: None,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }
}

impl<P: Provider> ContractDeployer for ProviderDeployer<P> {
    async fn deploy(&self, artifact: &ContractArtifact) -> Result<Address, DeployError> {
        // No constructor arguments: the calldata is the bare creation bytecode.
        let mut tx = TransactionRequest::default().with_deploy_code(artifact.bytecode.clone());
        if let Some(gas_limit) = self.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(contract = %artifact.name, %tx_hash, "Creation transaction submitted");

        let receipt = pending
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| confirmation_error(e, tx_hash, self.confirmation_timeout))?;

        created_address(
            ReceiptResponse::status(&receipt),
            ReceiptResponse::contract_address(&receipt),
            tx_hash,
        )
    }
}

fn confirmation_error(
    error: PendingTransactionError,
    tx_hash: TxHash,
    timeout: Duration,
) -> DeployError {
    match error {
        PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
            DeployError::ConfirmationTimeout { tx_hash, timeout }
        }
        source => DeployError::Watch { tx_hash, source },
    }
}

/// A creation counts only if the receipt is successful and names the new contract.
fn created_address(
    status: bool,
    contract_address: Option<Address>,
    tx_hash: TxHash,
) -> Result<Address, DeployError> {
    match (status, contract_address) {
        (true, Some(address)) => Ok(address),
        _ => Err(DeployError::TransactionRevert { tx_hash }),
    }
}
