use crate::types::transaction::{Receipt, Transaction};
use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// The blockchain client as seen by the migrations.
///
/// Every method is one round trip; callers await each before issuing the next.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Accounts available to the run, the sending account first.
    async fn accounts(&self) -> Result<Vec<Address>>;
    async fn code_at(&self, address: Address) -> Result<Bytes>;
    /// Read-only call against the latest state.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;
    /// Sends a transaction and waits for its receipt. A reverted transaction
    /// is reported through `Receipt::success`, not as an error.
    async fn send(&self, tx: Transaction) -> Result<Receipt>;

    async fn is_deployed(&self, address: Address) -> Result<bool> {
        Ok(!self.code_at(address).await?.is_empty())
    }
}

pub type ChainRef = Arc<dyn Chain>;
