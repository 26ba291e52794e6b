pub mod deployment_registry;
pub mod migration_manager;
pub mod steps;
