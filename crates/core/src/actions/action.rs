use crate::types::transaction::Transaction;
use alloy::primitives::{Bytes, TxKind, U256};
use serde_json::Value;

pub trait Action: Send + Sync {
    fn target(&self) -> TxKind;
    fn value(&self) -> U256 {
        U256::ZERO
    }
    fn data(&self) -> Bytes; // encode to tx data
    /// Registry name for the contract this action creates, if any.
    fn registers(&self) -> Option<&str> {
        None
    }
    fn describe(&self) -> Value;

    fn to_transaction(&self) -> Transaction {
        Transaction {
            to: self.target(),
            value: self.value(),
            data: self.data(),
        }
    }
}
