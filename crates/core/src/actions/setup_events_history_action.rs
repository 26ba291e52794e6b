use alloy::primitives::{Address, Bytes, TxKind};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::roles2_library::Roles2Library};

/// `setupEventsHistory` on either the roles library or the adapter; both
/// expose the same function.
pub struct SetupEventsHistoryAction {
    contract: Address,
    events_history: Address,
}

impl SetupEventsHistoryAction {
    pub fn new(contract: Address, events_history: Address) -> Self {
        Self {
            contract,
            events_history,
        }
    }
}

impl Action for SetupEventsHistoryAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.contract)
    }
    fn data(&self) -> Bytes {
        let bytes_data =
            Roles2Library::setupEventsHistoryCall::new((self.events_history,)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "SetupEventsHistoryAction",
            "contract": self.contract.to_string(),
            "events_history": self.events_history.to_string(),
        })
    }
}
