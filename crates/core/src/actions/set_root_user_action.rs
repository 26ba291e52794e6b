use alloy::primitives::{Address, Bytes, TxKind};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::roles2_library::Roles2Library};

pub struct SetRootUserAction {
    roles_library: Address,
    user: Address,
    enabled: bool,
}

impl SetRootUserAction {
    pub fn new(roles_library: Address, user: Address, enabled: bool) -> Self {
        Self {
            roles_library,
            user,
            enabled,
        }
    }
}

impl Action for SetRootUserAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.roles_library)
    }
    fn data(&self) -> Bytes {
        let bytes_data =
            Roles2Library::setRootUserCall::new((self.user, self.enabled)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "SetRootUserAction",
            "roles_library": self.roles_library.to_string(),
            "user": self.user.to_string(),
            "enabled": self.enabled.to_string(),
        })
    }
}
