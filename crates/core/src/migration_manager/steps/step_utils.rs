use super::migration_step::MigrationContext;
use crate::actions::{
    action::Action, add_role_capability_action::AddRoleCapabilityAction,
    add_user_role_action::AddUserRoleAction, deploy_contract_action::DeployContract,
    set_public_capability_action::SetPublicCapabilityAction,
};
use crate::bindings::{roles2_library::Roles2Library, storage_manager::StorageManager};
use crate::utils::function_selector::{function_selector, label_to_bytes32};
use alloy::primitives::{Address, Bytes, U256, aliases::B32};
use alloy::sol_types::SolCall;
use eyre::Result;
use log::{info, warn};

// Checks run one at a time, in order: every read sees the state left by the
// previous transaction.

/// Deploys `name` unless the registry already points at live code for it.
/// Returns the address of the instance to use.
pub async fn deploy_or_reuse(
    ctx: &mut MigrationContext<'_>,
    name: &str,
    constructor_args: Bytes,
) -> Result<Address> {
    if let Some(existing) = ctx.registry.get(name) {
        if ctx.chain.is_deployed(existing).await? {
            info!("{} already deployed at {}, reusing", name, existing);
            return Ok(existing);
        }
        warn!("{} registered at {} but has no code, redeploying", name, existing);
    }

    let creation_code = ctx.artifacts.bytecode(name)?;
    let action = DeployContract::new(name.to_string(), creation_code, constructor_args);
    ctx.execute(&action).await?;
    ctx.registry.require(name, &ctx.required_by())
}

pub async fn grant_public_capabilities(
    actions: &mut Vec<Box<dyn Action>>,
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    target: Address,
    function_signatures: &[String],
) -> Result<()> {
    for function_signature in function_signatures {
        let selector = function_selector(function_signature);
        if is_capability_public(ctx, roles_library, target, selector).await? {
            info!("{} on {} is already public", function_signature, target);
            continue;
        }
        actions.push(Box::new(SetPublicCapabilityAction::new(
            roles_library,
            target,
            function_signature.clone(),
            true,
        )));
    }
    Ok(())
}

pub async fn grant_roles_capabilities(
    actions: &mut Vec<Box<dyn Action>>,
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    capabilities: Vec<(u8, Address, &str)>,
) -> Result<()> {
    for (role, target, function_signature) in capabilities {
        let selector = function_selector(function_signature);
        // Only add action if the role doesn't already have the capability
        if does_role_have_capability(ctx, roles_library, role, target, selector).await? {
            info!(
                "Role {} already has {} on {}",
                role, function_signature, target
            );
            continue;
        }
        actions.push(Box::new(AddRoleCapabilityAction::new(
            roles_library,
            role,
            target,
            function_signature.to_string(),
        )));
    }
    Ok(())
}

pub async fn grant_users_roles(
    actions: &mut Vec<Box<dyn Action>>,
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    user_role: Vec<(Address, u8)>,
) -> Result<()> {
    for (user, role) in user_role {
        // Only add action if the user doesn't already have the role
        if does_user_have_role(ctx, roles_library, user, role).await? {
            info!("{} already has role {}", user, role);
            continue;
        }
        actions.push(Box::new(AddUserRoleAction::new(roles_library, user, role)));
    }
    Ok(())
}

async fn view<C: SolCall>(
    ctx: &MigrationContext<'_>,
    target: Address,
    call: C,
) -> Result<C::Return> {
    let result = ctx.chain.call(target, Bytes::from(call.abi_encode())).await?;
    Ok(C::abi_decode_returns(&result, true)?)
}

pub async fn is_user_root(
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    user: Address,
) -> Result<bool> {
    Ok(view(ctx, roles_library, Roles2Library::isUserRootCall::new((user,)))
        .await?
        ._0)
}

/// Events history the contract currently reports to. The roles library and
/// the adapter expose the same getter.
pub async fn events_history_of(ctx: &MigrationContext<'_>, contract: Address) -> Result<Address> {
    Ok(view(ctx, contract, Roles2Library::getEventsHistoryCall::new(()))
        .await?
        ._0)
}

pub async fn does_user_have_role(
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    user: Address,
    role: u8,
) -> Result<bool> {
    Ok(view(
        ctx,
        roles_library,
        Roles2Library::hasUserRoleCall::new((user, role)),
    )
    .await?
    ._0)
}

pub async fn is_capability_public(
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    target: Address,
    function_selector: B32,
) -> Result<bool> {
    Ok(view(
        ctx,
        roles_library,
        Roles2Library::isCapabilityPublicCall::new((target, function_selector)),
    )
    .await?
    ._0)
}

/// The library keeps a bitmask of roles per (target, selector); role `n` is
/// bit `n`.
pub async fn does_role_have_capability(
    ctx: &MigrationContext<'_>,
    roles_library: Address,
    role: u8,
    target: Address,
    function_selector: B32,
) -> Result<bool> {
    let mask = view(
        ctx,
        roles_library,
        Roles2Library::getCapabilityRolesCall::new((target, function_selector)),
    )
    .await?
    ._0;
    let mask = U256::from_be_bytes(mask.0);
    Ok(mask.bit(role as usize))
}

pub async fn is_storage_access_allowed(
    ctx: &MigrationContext<'_>,
    storage_manager: Address,
    actor: Address,
    label: &str,
) -> Result<bool> {
    let label = label_to_bytes32(label)?;
    Ok(view(
        ctx,
        storage_manager,
        StorageManager::isAllowedCall::new((actor, label)),
    )
    .await?
    ._0)
}
