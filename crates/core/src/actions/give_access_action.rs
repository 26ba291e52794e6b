use alloy::primitives::{Address, B256, Bytes, TxKind};
use alloy::sol_types::SolCall;
use eyre::Result;
use serde_json::{Value, json};

use crate::utils::function_selector::label_to_bytes32;
use crate::{actions::action::Action, bindings::storage_manager::StorageManager};

/// `giveAccess` (enabled) or `blockAccess` (disabled) on the storage manager.
pub struct GiveAccessAction {
    storage_manager: Address,
    actor: Address,
    label: String,
    label_bytes: B256,
    enabled: bool,
}

impl GiveAccessAction {
    pub fn new(
        storage_manager: Address,
        actor: Address,
        label: &str,
        enabled: bool,
    ) -> Result<Self> {
        Ok(Self {
            storage_manager,
            actor,
            label: label.to_string(),
            label_bytes: label_to_bytes32(label)?,
            enabled,
        })
    }
}

impl Action for GiveAccessAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.storage_manager)
    }
    fn data(&self) -> Bytes {
        let bytes_data = if self.enabled {
            StorageManager::giveAccessCall::new((self.actor, self.label_bytes)).abi_encode()
        } else {
            StorageManager::blockAccessCall::new((self.actor, self.label_bytes)).abi_encode()
        };
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": if self.enabled { "GiveAccessAction" } else { "BlockAccessAction" },
            "storage_manager": self.storage_manager.to_string(),
            "actor": self.actor.to_string(),
            "label": self.label,
            "label_bytes": format!("0x{}", hex::encode(self.label_bytes)),
        })
    }
}
