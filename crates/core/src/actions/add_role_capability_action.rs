use alloy::primitives::{Address, Bytes, TxKind, aliases::B32};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::utils::function_selector::function_selector;
use crate::{actions::action::Action, bindings::roles2_library::Roles2Library};

pub struct AddRoleCapabilityAction {
    roles_library: Address,
    role: u8,
    target: Address,
    function_signature: String,
    function_selector: B32,
}

impl AddRoleCapabilityAction {
    pub fn new(
        roles_library: Address,
        role: u8,
        target: Address,
        function_signature: String,
    ) -> Self {
        let function_selector = function_selector(&function_signature);
        Self {
            roles_library,
            role,
            target,
            function_signature,
            function_selector,
        }
    }
}

impl Action for AddRoleCapabilityAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.roles_library)
    }
    fn data(&self) -> Bytes {
        let bytes_data = Roles2Library::addRoleCapabilityCall::new((
            self.role,
            self.target,
            self.function_selector,
        ))
        .abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "AddRoleCapabilityAction",
            "roles_library": self.roles_library.to_string(),
            "role": self.role.to_string(),
            "target": self.target.to_string(),
            "function_signature": self.function_signature,
            "function_selector": self.function_selector.to_string(),
        })
    }
}
