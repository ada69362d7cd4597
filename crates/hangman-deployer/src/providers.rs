use alloy_network::{Ethereum, EthereumWallet, Network};
use alloy_primitives::TxKind;
use alloy_provider::{
    fillers::{FillerControlFlow, TxFiller, WalletFiller},
    Provider, ProviderBuilder, SendableTx,
};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{Transport, TransportResult};

use crate::DeployError;

/// Creates a provider for the given RPC URL, with the given signer. This provider is suitable for
/// doing write operations, as it will sign transactions with the given signer.
///
/// The nonce is fetched from the node before every transaction. Deployments are confirmed one by
/// one, so the fetched nonce is always the next free one.
pub async fn create_provider_with_signer(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<impl Provider, DeployError> {
    ProviderBuilder::new()
        .with_recommended_fillers()
        .filler(WalletFiller::new(EthereumWallet::from(signer)))
        .filler(CreationTraceFiller)
        .on_builtin(rpc_url)
        .await
        .map_err(DeployError::Network)
}

/// Leaves the transaction as is. Once the other fillers are done, it traces what a contract
/// creation is about to cost.
#[derive(Copy, Clone, Debug, Default)]
pub struct CreationTraceFiller;

impl TxFiller for CreationTraceFiller {
    type Fillable = ();

    fn status(&self, _tx: &<Ethereum as Network>::TransactionRequest) -> FillerControlFlow {
        FillerControlFlow::Finished
    }

    fn fill_sync(&self, tx: &mut SendableTx<Ethereum>) {
        let SendableTx::Builder(tx) = tx else {
            return;
        };
        if matches!(tx.to, Some(TxKind::Create)) {
            tracing::debug!(
                deployer = ?tx.from,
                nonce = tx.nonce,
                gas_limit = tx.gas,
                max_fee_per_gas = tx.max_fee_per_gas,
                init_code_len = tx.input.input().map(|code| code.len()),
                "Submitting contract creation"
            );
        }
    }

    async fn prepare<P: Provider<T, Ethereum>, T: Transport + Clone>(
        &self,
        _provider: &P,
        _tx: &<Ethereum as Network>::TransactionRequest,
    ) -> TransportResult<Self::Fillable> {
        Ok(())
    }

    async fn fill(
        &self,
        _fillable: Self::Fillable,
        tx: SendableTx<Ethereum>,
    ) -> TransportResult<SendableTx<Ethereum>> {
        Ok(tx)
    }
}
