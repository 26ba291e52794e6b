pub mod config_wrapper;
pub mod transaction;
pub mod wallet_type;
