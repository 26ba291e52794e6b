use super::migration_step::{MigrationContext, MigrationStep};
use super::step_utils::{deploy_or_reuse, events_history_of, is_storage_access_allowed};
use crate::actions::{
    action::Action, give_access_action::GiveAccessAction,
    setup_events_history_action::SetupEventsHistoryAction,
};
use crate::bindings::roles2_library_adapter::Roles2LibraryAdapter;
use crate::utils::address_or_contract_name::AddressOrContractName;
use alloy::primitives::Bytes;
use alloy::sol_types::SolConstructor;
use async_trait::async_trait;
use eyre::Result;
use log::info;
use serde::Deserialize;

/// Storage write access for the adapter, granted or blocked.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageAccess {
    #[serde(default = "default_storage_manager")]
    pub storage_manager: AddressOrContractName,
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_storage_manager() -> AddressOrContractName {
    "StorageManager".into()
}

fn default_enabled() -> bool {
    true
}

/// Deploys a contract that delegates its permission checks to the roles
/// library.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployAdapterStep {
    pub id: u32,
    /// Artifact and registry name
    pub contract: String,
    pub roles_library: AddressOrContractName,
    pub events_history: Option<AddressOrContractName>,
    pub storage_access: Option<StorageAccess>,
}

impl Default for DeployAdapterStep {
    fn default() -> Self {
        Self {
            id: 3,
            contract: "Roles2LibraryAdapter".to_string(),
            roles_library: "Roles2Library".into(),
            events_history: None,
            storage_access: None,
        }
    }
}

#[async_trait]
impl MigrationStep for DeployAdapterStep {
    fn id(&self) -> u32 {
        self.id
    }

    fn status(&self) -> &str {
        "UserContract: #deployed #initialized"
    }

    fn dependencies(&self) -> Vec<AddressOrContractName> {
        let mut dependencies = vec![self.roles_library.clone()];
        dependencies.extend(self.events_history.clone());
        if let Some(access) = &self.storage_access {
            dependencies.push(access.storage_manager.clone());
        }
        dependencies
    }

    async fn migrate(&self, ctx: &mut MigrationContext<'_>) -> Result<()> {
        let roles_library = ctx.resolve(&self.roles_library)?;
        let constructor_args = Roles2LibraryAdapter::constructorCall {
            _roles2Library: roles_library,
        }
        .abi_encode();

        let adapter = deploy_or_reuse(ctx, &self.contract, Bytes::from(constructor_args)).await?;

        let mut actions: Vec<Box<dyn Action>> = Vec::new();

        if let Some(events_history) = &self.events_history {
            let events_history = ctx.resolve(events_history)?;
            if events_history_of(ctx, adapter).await? == events_history {
                info!(
                    "{} already reports to events history {}",
                    adapter, events_history
                );
            } else {
                actions.push(Box::new(SetupEventsHistoryAction::new(
                    adapter,
                    events_history,
                )));
            }
        }

        if let Some(access) = &self.storage_access {
            let storage_manager = ctx.resolve(&access.storage_manager)?;
            let allowed =
                is_storage_access_allowed(ctx, storage_manager, adapter, &access.label).await?;
            if allowed == access.enabled {
                info!(
                    "Storage access for {} as {} already {}",
                    adapter,
                    access.label,
                    if allowed { "granted" } else { "blocked" }
                );
            } else {
                actions.push(Box::new(GiveAccessAction::new(
                    storage_manager,
                    adapter,
                    &access.label,
                    access.enabled,
                )?));
            }
        }

        ctx.execute_all(actions).await
    }
}
