use alloy::primitives::{Bytes, TxKind, U256};
use serde_json::{Value, json};

use crate::actions::action::Action;

/// Plain CREATE of `creation_code` followed by ABI encoded constructor args.
pub struct DeployContract {
    name: String,
    creation_code: Bytes,
    constructor_args: Bytes,
    value: U256,
}

impl DeployContract {
    pub fn new(name: String, creation_code: Bytes, constructor_args: Bytes) -> Self {
        Self {
            name,
            creation_code,
            constructor_args,
            value: U256::ZERO,
        }
    }
}

impl Action for DeployContract {
    fn target(&self) -> TxKind {
        TxKind::Create
    }
    fn value(&self) -> U256 {
        self.value
    }
    fn data(&self) -> Bytes {
        let mut bytes_data =
            Vec::with_capacity(self.creation_code.len() + self.constructor_args.len());
        bytes_data.extend_from_slice(&self.creation_code);
        bytes_data.extend_from_slice(&self.constructor_args);
        Bytes::from(bytes_data)
    }
    fn registers(&self) -> Option<&str> {
        Some(&self.name)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "DeployContract",
            "name": self.name,
            "constructor_args": format!("0x{}", hex::encode(&self.constructor_args)),
        })
    }
}
