use alloy::primitives::{Address, Bytes, TxKind, aliases::B32};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::utils::function_selector::function_selector;
use crate::{actions::action::Action, bindings::roles2_library::Roles2Library};

pub struct SetPublicCapabilityAction {
    roles_library: Address,
    target: Address,
    function_signature: String,
    function_selector: B32,
    enabled: bool,
}

impl SetPublicCapabilityAction {
    pub fn new(
        roles_library: Address,
        target: Address,
        function_signature: String,
        enabled: bool,
    ) -> Self {
        let function_selector = function_selector(&function_signature);
        Self {
            roles_library,
            target,
            function_signature,
            function_selector,
            enabled,
        }
    }
}

impl Action for SetPublicCapabilityAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.roles_library)
    }
    fn data(&self) -> Bytes {
        let bytes_data = Roles2Library::setPublicCapabilityCall::new((
            self.target,
            self.function_selector,
            self.enabled,
        ))
        .abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "SetPublicCapabilityAction",
            "roles_library": self.roles_library.to_string(),
            "target": self.target.to_string(),
            "function_signature": self.function_signature,
            "function_selector": self.function_selector.to_string(),
            "enabled": self.enabled.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_encodes_selector_of_signature() {
        let library = address!("0x1111111111111111111111111111111111111111");
        let adapter = address!("0x2222222222222222222222222222222222222222");
        let action = SetPublicCapabilityAction::new(
            library,
            adapter,
            "setRoles2Library(address)".to_string(),
            true,
        );
        assert_eq!(action.target(), TxKind::Call(library));

        let call =
            Roles2Library::setPublicCapabilityCall::abi_decode(&action.data(), true).unwrap();
        assert_eq!(call._code, adapter);
        assert_eq!(call._sig, function_selector("setRoles2Library(address)"));
        assert!(call._enabled);
    }
}
