use super::migration_step::{MigrationContext, MigrationStep};
use super::step_utils::deploy_or_reuse;
use crate::bindings::roles2_library::Roles2Library;
use crate::utils::address_or_contract_name::AddressOrContractName;
use crate::utils::function_selector::label_to_bytes32;
use alloy::primitives::Bytes;
use alloy::sol_types::SolConstructor;
use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;

/// Deploys the roles library on top of an existing `Storage`.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployRolesLibraryStep {
    pub id: u32,
    pub storage: AddressOrContractName,
    /// Artifact and registry name
    pub contract: String,
    /// Crate name handed to the constructor as `bytes32`
    pub name: String,
}

impl Default for DeployRolesLibraryStep {
    fn default() -> Self {
        Self {
            id: 1,
            storage: "Storage".into(),
            contract: "Roles2Library".to_string(),
            name: "Roles2Library".to_string(),
        }
    }
}

#[async_trait]
impl MigrationStep for DeployRolesLibraryStep {
    fn id(&self) -> u32 {
        self.id
    }

    fn status(&self) -> &str {
        "Roles Library: #deployed"
    }

    fn dependencies(&self) -> Vec<AddressOrContractName> {
        vec![self.storage.clone()]
    }

    async fn migrate(&self, ctx: &mut MigrationContext<'_>) -> Result<()> {
        let storage = ctx.resolve(&self.storage)?;
        let constructor_args = Roles2Library::constructorCall {
            _store: storage,
            _crate: label_to_bytes32(&self.name)?,
        }
        .abi_encode();

        deploy_or_reuse(ctx, &self.contract, Bytes::from(constructor_args)).await?;
        Ok(())
    }
}
