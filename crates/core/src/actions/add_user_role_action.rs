use alloy::primitives::{Address, Bytes, TxKind};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::roles2_library::Roles2Library};

pub struct AddUserRoleAction {
    roles_library: Address,
    user: Address,
    role: u8,
}

impl AddUserRoleAction {
    pub fn new(roles_library: Address, user: Address, role: u8) -> Self {
        Self {
            roles_library,
            user,
            role,
        }
    }
}

impl Action for AddUserRoleAction {
    fn target(&self) -> TxKind {
        TxKind::Call(self.roles_library)
    }
    fn data(&self) -> Bytes {
        let bytes_data = Roles2Library::addUserRoleCall::new((self.user, self.role)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "AddUserRoleAction",
            "roles_library": self.roles_library.to_string(),
            "user": self.user.to_string(),
            "role": self.role.to_string(),
        })
    }
}
