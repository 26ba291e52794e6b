use super::chain::{Chain, ChainRef};
use crate::types::transaction::{Receipt, Transaction};
use crate::types::wallet_type::WalletType;
use alloy::network::{Ethereum, EthereumWallet, NetworkWallet};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::signers::ledger::{HDPath as LedgerHDPath, LedgerSigner};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::trezor::{HDPath as TrezorHDPath, TrezorSigner};
use async_trait::async_trait;
use dotenv::dotenv;
use eyre::{Result, eyre};
use log::{debug, info};
use std::env;
use std::sync::Arc;

/// JSON-RPC backed chain that signs with a single wallet.
pub struct RpcChain<P> {
    provider: P,
    sender: Address,
}

impl<P> RpcChain<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(provider: P, sender: Address) -> Self {
        Self { provider, sender }
    }
}

/// Connects to `rpc_url` with a wallet of the given type.
pub async fn connect(rpc_url: &str, wallet_type: WalletType) -> Result<ChainRef> {
    let wallet = build_wallet(rpc_url, wallet_type).await?;
    let sender = <EthereumWallet as NetworkWallet<Ethereum>>::default_signer_address(&wallet);
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .on_builtin(rpc_url)
        .await?;
    info!("Connected to {} as {}", rpc_url, sender);
    let chain: ChainRef = Arc::new(RpcChain::new(provider, sender));
    Ok(chain)
}

async fn build_wallet(rpc_url: &str, wallet_type: WalletType) -> Result<EthereumWallet> {
    match wallet_type {
        WalletType::PrivateKey => {
            dotenv().ok();
            let key = env::var("PRIVATE_KEY")
                .map_err(|_| eyre!("Environment variable PRIVATE_KEY not set"))?;
            let signer: PrivateKeySigner = key.trim().parse()?;
            Ok(EthereumWallet::from(signer))
        }
        WalletType::Ledger => {
            let chain_id = fetch_chain_id(rpc_url).await?;
            info!("Waiting for Ledger (chain id {})", chain_id);
            let signer = LedgerSigner::new(LedgerHDPath::LedgerLive(0), Some(chain_id)).await?;
            Ok(EthereumWallet::from(signer))
        }
        WalletType::Trezor => {
            let chain_id = fetch_chain_id(rpc_url).await?;
            info!("Waiting for Trezor (chain id {})", chain_id);
            let signer = TrezorSigner::new(TrezorHDPath::TrezorLive(0), Some(chain_id)).await?;
            Ok(EthereumWallet::from(signer))
        }
    }
}

// Hardware signers need the chain id up front.
async fn fetch_chain_id(rpc_url: &str) -> Result<u64> {
    let provider = ProviderBuilder::new().on_builtin(rpc_url).await?;
    Ok(provider.get_chain_id().await?)
}

#[async_trait]
impl<P> Chain for RpcChain<P>
where
    P: Provider + Send + Sync + 'static,
{
    async fn accounts(&self) -> Result<Vec<Address>> {
        let mut accounts = vec![self.sender];
        // Public endpoints usually reject eth_accounts; the signer alone is enough then.
        match self.provider.get_accounts().await {
            Ok(node_accounts) => {
                accounts.extend(node_accounts.into_iter().filter(|a| *a != self.sender));
            }
            Err(e) => debug!("eth_accounts unavailable: {}", e),
        }
        Ok(accounts)
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let request = TransactionRequest {
            to: Some(to.into()),
            input: TransactionInput::new(calldata),
            ..Default::default()
        };
        Ok(self.provider.call(&request).await?)
    }

    async fn send(&self, tx: Transaction) -> Result<Receipt> {
        let request = TransactionRequest {
            from: Some(self.sender),
            to: Some(tx.to),
            value: Some(tx.value),
            input: TransactionInput::new(tx.data),
            ..Default::default()
        };
        let pending = self.provider.send_transaction(request).await?;
        debug!("Sent transaction {}", pending.tx_hash());
        let receipt = pending.get_receipt().await?;
        Ok(Receipt {
            tx_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            success: receipt.status(),
        })
    }
}
