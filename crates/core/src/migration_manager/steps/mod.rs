pub mod deploy_adapter_step;
pub mod deploy_roles_library_step;
pub mod init_roles_library_step;
pub mod migration_step;
pub mod migration_steps;
pub mod setup_roles_step;
pub mod step_utils;
