use super::migration_step::{MigrationContext, MigrationStep};
use super::step_utils::{grant_public_capabilities, grant_roles_capabilities, grant_users_roles};
use crate::actions::action::Action;
use crate::utils::address_or_contract_name::{AccountRef, AddressOrContractName, RoleRef};
use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Lets `role` call `function_signature` on the target.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleCapability {
    pub role: RoleRef,
    pub function_signature: String,
}

/// Puts `account` into `role`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRole {
    pub account: AccountRef,
    pub role: RoleRef,
}

// Signature of the adapter function that repoints it at another library.
const SET_ROLES2_LIBRARY: &str = "setRoles2Library(address)";

/// Seeds capabilities and role membership in the roles library.
///
/// Grants go out in a fixed order: public capabilities, role capabilities,
/// user roles. Each is its own transaction. A selector may be both public and
/// role restricted; which one wins is up to the library.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupRolesStep {
    pub id: u32,
    pub roles_library: AddressOrContractName,
    /// Contract whose functions the capabilities apply to
    pub target: AddressOrContractName,
    pub roles: BTreeMap<String, u8>,
    pub public_capabilities: Vec<String>,
    pub role_capabilities: Vec<RoleCapability>,
    pub user_roles: Vec<UserRole>,
}

impl Default for SetupRolesStep {
    fn default() -> Self {
        Self {
            id: 4,
            roles_library: "Roles2Library".into(),
            target: "Roles2LibraryAdapter".into(),
            roles: BTreeMap::from([
                ("ADMIN".to_string(), 2),
                ("MODERATOR".to_string(), 4),
                ("USER".to_string(), 11),
            ]),
            public_capabilities: vec![SET_ROLES2_LIBRARY.to_string()],
            role_capabilities: vec![
                RoleCapability {
                    role: "ADMIN".into(),
                    function_signature: SET_ROLES2_LIBRARY.to_string(),
                },
                RoleCapability {
                    role: "MODERATOR".into(),
                    function_signature: SET_ROLES2_LIBRARY.to_string(),
                },
            ],
            user_roles: vec![UserRole {
                account: AccountRef::Index(0),
                role: "USER".into(),
            }],
        }
    }
}

#[async_trait]
impl MigrationStep for SetupRolesStep {
    fn id(&self) -> u32 {
        self.id
    }

    fn status(&self) -> &str {
        "System roles: #setup"
    }

    fn dependencies(&self) -> Vec<AddressOrContractName> {
        vec![self.roles_library.clone(), self.target.clone()]
    }

    async fn migrate(&self, ctx: &mut MigrationContext<'_>) -> Result<()> {
        let roles_library = ctx.resolve(&self.roles_library)?;
        let target = ctx.resolve(&self.target)?;

        // Resolve every role and account before anything is sent.
        let capabilities = self
            .role_capabilities
            .iter()
            .map(|c| -> Result<_> {
                Ok((
                    c.role.resolve(&self.roles)?,
                    target,
                    c.function_signature.as_str(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        let user_roles = self
            .user_roles
            .iter()
            .map(|u| -> Result<_> {
                Ok((u.account.resolve(ctx.accounts)?, u.role.resolve(&self.roles)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut actions: Vec<Box<dyn Action>> = Vec::new();
        grant_public_capabilities(
            &mut actions,
            ctx,
            roles_library,
            target,
            &self.public_capabilities,
        )
        .await?;
        grant_roles_capabilities(&mut actions, ctx, roles_library, capabilities).await?;
        grant_users_roles(&mut actions, ctx, roles_library, user_roles).await?;

        ctx.execute_all(actions).await
    }
}
