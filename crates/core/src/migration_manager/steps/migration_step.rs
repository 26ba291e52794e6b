use crate::actions::action::Action;
use crate::chain::chain::Chain;
use crate::errors::MigrationError;
use crate::migration_manager::deployment_registry::DeploymentRegistry;
use crate::types::transaction::Receipt;
use crate::utils::address_or_contract_name::AddressOrContractName;
use crate::utils::artifact_store::ArtifactStore;
use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::Result;
use log::{debug, info, warn};

/// One numbered migration.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    fn id(&self) -> u32;
    /// Short status printed once the step completes.
    fn status(&self) -> &str;
    /// Contracts that must be registered and have code before the step runs.
    fn dependencies(&self) -> Vec<AddressOrContractName>;
    async fn migrate(&self, ctx: &mut MigrationContext<'_>) -> Result<()>;
}

/// Everything a step may touch during one run.
pub struct MigrationContext<'a> {
    pub step_id: u32,
    pub chain: &'a dyn Chain,
    pub registry: &'a mut DeploymentRegistry,
    pub artifacts: &'a ArtifactStore,
    pub accounts: &'a [Address],
    transactions: usize,
}

impl<'a> MigrationContext<'a> {
    pub fn new(
        step_id: u32,
        chain: &'a dyn Chain,
        registry: &'a mut DeploymentRegistry,
        artifacts: &'a ArtifactStore,
        accounts: &'a [Address],
    ) -> Self {
        Self {
            step_id,
            chain,
            registry,
            artifacts,
            accounts,
            transactions: 0,
        }
    }

    pub fn tag(&self) -> String {
        format!("migration_{}", self.step_id)
    }

    pub fn required_by(&self) -> String {
        format!("migration {}", self.step_id)
    }

    pub fn resolve(&self, contract: &AddressOrContractName) -> Result<Address> {
        contract.resolve(&*self.registry, &self.required_by())
    }

    /// Transactions sent so far by this step.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Sends one action and waits for it. Created contracts are registered
    /// under the action's registry name.
    pub async fn execute(&mut self, action: &dyn Action) -> Result<Receipt> {
        debug!("Executing {}", action.describe());
        let receipt = self.chain.send(action.to_transaction()).await?;
        self.transactions += 1;

        if !receipt.success {
            return Err(MigrationError::TransactionReverted {
                tx_hash: receipt.tx_hash,
                action: action.describe().to_string(),
            }
            .into());
        }

        if let Some(name) = action.registers() {
            let address = receipt
                .contract_address
                .ok_or_else(|| MigrationError::MissingContractAddress(name.to_string()))?;
            if let Some(previous) = self.registry.get(name) {
                warn!("Replacing {} at {} (no code) with {}", name, previous, address);
            }
            let tag = self.tag();
            self.registry.replace(name, address, &tag);
            info!("{} deployed at {}", name, address);
        }

        Ok(receipt)
    }

    /// Executes actions strictly in order, stopping at the first failure.
    pub async fn execute_all(&mut self, actions: Vec<Box<dyn Action>>) -> Result<()> {
        for action in actions {
            self.execute(action.as_ref()).await?;
        }
        Ok(())
    }
}
