pub mod actions;
pub mod bindings;
pub mod chain;
pub mod errors;
pub mod migration_manager;
pub mod types;
pub mod utils;

pub use chain::chain::{Chain, ChainRef};
pub use chain::rpc_chain::connect;
pub use errors::MigrationError;
pub use migration_manager::deployment_registry::DeploymentRegistry;
pub use migration_manager::migration_manager::{MigrationManager, RunOptions, StepReport};
pub use types::wallet_type::WalletType;
pub use utils::artifact_store::ArtifactStore;
