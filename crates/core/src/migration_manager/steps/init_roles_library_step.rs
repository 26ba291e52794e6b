use super::migration_step::{MigrationContext, MigrationStep};
use super::step_utils::{events_history_of, is_storage_access_allowed, is_user_root};
use crate::actions::{
    action::Action, give_access_action::GiveAccessAction,
    set_root_user_action::SetRootUserAction,
    setup_events_history_action::SetupEventsHistoryAction,
};
use crate::utils::address_or_contract_name::{AccountRef, AddressOrContractName};
use async_trait::async_trait;
use eyre::Result;
use log::info;
use serde::Deserialize;

/// Lets the roles library write to storage and appoints the root user.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitRolesLibraryStep {
    pub id: u32,
    pub storage_manager: AddressOrContractName,
    pub roles_library: AddressOrContractName,
    /// Label the storage manager files the access grant under
    pub access_label: String,
    pub root_user: AccountRef,
    pub events_history: Option<AddressOrContractName>,
}

impl Default for InitRolesLibraryStep {
    fn default() -> Self {
        Self {
            id: 2,
            storage_manager: "StorageManager".into(),
            roles_library: "Roles2Library".into(),
            access_label: "Roles2Library".to_string(),
            root_user: AccountRef::Index(0),
            events_history: None,
        }
    }
}

#[async_trait]
impl MigrationStep for InitRolesLibraryStep {
    fn id(&self) -> u32 {
        self.id
    }

    fn status(&self) -> &str {
        "Roles2Library: #initialized"
    }

    fn dependencies(&self) -> Vec<AddressOrContractName> {
        let mut dependencies = vec![self.storage_manager.clone(), self.roles_library.clone()];
        dependencies.extend(self.events_history.clone());
        dependencies
    }

    async fn migrate(&self, ctx: &mut MigrationContext<'_>) -> Result<()> {
        let storage_manager = ctx.resolve(&self.storage_manager)?;
        let roles_library = ctx.resolve(&self.roles_library)?;
        let root_user = self.root_user.resolve(ctx.accounts)?;
        let events_history = self
            .events_history
            .as_ref()
            .map(|e| ctx.resolve(e))
            .transpose()?;

        let mut actions: Vec<Box<dyn Action>> = Vec::new();

        if is_storage_access_allowed(ctx, storage_manager, roles_library, &self.access_label)
            .await?
        {
            info!(
                "{} already has storage access as {}",
                roles_library, self.access_label
            );
        } else {
            actions.push(Box::new(GiveAccessAction::new(
                storage_manager,
                roles_library,
                &self.access_label,
                true,
            )?));
        }

        if let Some(events_history) = events_history {
            if events_history_of(ctx, roles_library).await? == events_history {
                info!(
                    "{} already reports to events history {}",
                    roles_library, events_history
                );
            } else {
                actions.push(Box::new(SetupEventsHistoryAction::new(
                    roles_library,
                    events_history,
                )));
            }
        }

        if is_user_root(ctx, roles_library, root_user).await? {
            info!("{} is already a root user", root_user);
        } else {
            actions.push(Box::new(SetRootUserAction::new(
                roles_library,
                root_user,
                true,
            )));
        }

        ctx.execute_all(actions).await
    }
}
