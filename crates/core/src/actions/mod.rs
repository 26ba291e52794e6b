pub mod action;
pub mod add_role_capability_action;
pub mod add_user_role_action;
pub mod deploy_contract_action;
pub mod give_access_action;
pub mod set_public_capability_action;
pub mod set_root_user_action;
pub mod setup_events_history_action;
