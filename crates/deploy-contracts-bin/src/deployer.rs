//! Submission of contract creation transactions.

use {
    alloy::{
        network::{EthereumWallet, TransactionBuilder},
        primitives::{Address, Bytes, U256},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result, ensure},
    url::Url,
};

/// Abstracts the chain so deployments can be tested without a node.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait Deploying: Send + Sync {
    /// Submits a contract creation transaction carrying `code` (creation
    /// bytecode followed by the encoded constructor arguments) and `value`
    /// wei, waits until it is mined and returns the address of the new
    /// contract.
    async fn deploy(&self, code: Bytes, value: Option<U256>) -> Result<Address>;
}

/// Deploys through an Ethereum node.
#[derive(Clone)]
pub struct NodeDeployer {
    provider: DynProvider,
    from: Address,
}

impl NodeDeployer {
    /// Connects to the node at `url`. Transactions are signed locally with
    /// `signer`, or sent from the node's first unlocked account when there is
    /// none.
    pub async fn connect(url: &Url, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let deployer = match signer {
            Some(signer) => {
                let from = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::new(signer))
                    .connect_http(url.clone())
                    .erased();
                Self { provider, from }
            }
            None => {
                let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
                let from = provider
                    .get_accounts()
                    .await
                    .context("failed to fetch node accounts")?
                    .first()
                    .copied()
                    .context("node has no unlocked accounts, configure a private key")?;
                Self { provider, from }
            }
        };
        tracing::info!(from = %deployer.from, "deploying from account");
        Ok(deployer)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("failed to fetch chain ID")
    }
}

#[async_trait::async_trait]
impl Deploying for NodeDeployer {
    async fn deploy(&self, code: Bytes, value: Option<U256>) -> Result<Address> {
        let mut tx = TransactionRequest::default()
            .from(self.from)
            .with_deploy_code(code);
        if let Some(value) = value {
            tx = tx.value(value);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to send deployment transaction")?;
        tracing::debug!(tx_hash = ?pending.tx_hash(), "deployment transaction sent");

        let receipt = pending
            .with_required_confirmations(1)
            .get_receipt()
            .await
            .context("failed to get deployment receipt")?;
        ensure!(
            receipt.status(),
            "deployment transaction {:?} reverted",
            receipt.transaction_hash
        );
        receipt.contract_address.with_context(|| {
            format!(
                "receipt of {:?} has no contract address",
                receipt.transaction_hash
            )
        })
    }
}
