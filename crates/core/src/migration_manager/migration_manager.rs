// Runs numbered migrations against a chain.
// Keeps track of what is deployed through the deployment registry
// Rejects manifests with repeated ids
// Checks every dependency on chain before a step runs

use super::deployment_registry::DeploymentRegistry;
use super::steps::migration_step::{MigrationContext, MigrationStep};
use super::steps::migration_steps::MigrationSteps;
use crate::chain::chain::{Chain, ChainRef};
use crate::errors::MigrationError;
use crate::utils::artifact_store::ArtifactStore;
use alloy::primitives::Address;
use eyre::{Result, WrapErr};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Bounds for a run. `from` and `to` are inclusive step ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub from: Option<u32>,
    pub to: Option<u32>,
    /// Run steps even if the registry marks them completed
    pub reset: bool,
}

impl RunOptions {
    fn includes(&self, id: u32) -> bool {
        self.from.is_none_or(|from| id >= from) && self.to.is_none_or(|to| id <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub id: u32,
    pub status: String,
    pub skipped: bool,
    pub transactions: usize,
}

pub struct MigrationManager {
    pub steps: Vec<Box<dyn MigrationStep>>,
    registry: DeploymentRegistry,
    chain: ChainRef,
    artifacts: ArtifactStore,
    accounts: Option<Vec<Address>>,
}

impl MigrationManager {
    pub fn new(chain: ChainRef, registry: DeploymentRegistry, artifacts: ArtifactStore) -> Self {
        Self {
            steps: vec![],
            registry,
            chain,
            artifacts,
            accounts: None,
        }
    }

    /// Manager loaded with the stock migrations 1 through 4.
    pub fn with_templates(
        chain: ChainRef,
        registry: DeploymentRegistry,
        artifacts: ArtifactStore,
    ) -> Self {
        let mut s = Self::new(chain, registry, artifacts);
        s.load_steps(MigrationSteps::templates());
        s
    }

    pub fn from_value(
        chain: ChainRef,
        registry: DeploymentRegistry,
        artifacts: ArtifactStore,
        value: Value,
    ) -> Result<Self> {
        let mut s = Self::new(chain, registry, artifacts);
        s.create_steps_from_json_value(value)?;
        Ok(s)
    }

    pub fn from_str(
        chain: ChainRef,
        registry: DeploymentRegistry,
        artifacts: ArtifactStore,
        json_str: &str,
    ) -> Result<Self> {
        let mut s = Self::new(chain, registry, artifacts);
        s.create_steps_from_json_str(json_str)?;
        Ok(s)
    }

    pub fn create_steps_from_json_value(&mut self, value: Value) -> Result<()> {
        let steps: Vec<MigrationSteps> = serde_json::from_value(value)?;
        self.load_steps(steps);
        Ok(())
    }

    pub fn create_steps_from_json_str(&mut self, json_str: &str) -> Result<()> {
        let steps: Vec<MigrationSteps> = serde_json::from_str(json_str)?;
        self.load_steps(steps);
        Ok(())
    }

    fn load_steps(&mut self, steps: Vec<MigrationSteps>) {
        self.steps = steps
            .into_iter()
            .map(|s| {
                debug!("Loaded {} migration", s.variant_name());
                s.into_trait_object()
            })
            .collect();
    }

    /// Uses `accounts` instead of asking the chain.
    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn registry(&self) -> &DeploymentRegistry {
        &self.registry
    }

    /// Sorts the steps by id. Fails if two steps share an id.
    pub fn order_steps(&mut self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for step in &self.steps {
            if !seen.insert(step.id()) {
                return Err(MigrationError::DuplicateStepId(step.id()).into());
            }
        }
        self.steps.sort_by_key(|s| s.id());
        Ok(())
    }

    pub async fn run(&mut self, options: RunOptions) -> Result<Vec<StepReport>> {
        self.order_steps()?;
        let accounts = self.load_accounts().await?;

        let run_id = Uuid::new_v4().to_string();
        info!(
            "Starting migration run {} on {}",
            run_id,
            self.registry.network()
        );
        self.registry.set_last_run(run_id);

        let mut reports = Vec::new();
        for step in &self.steps {
            let id = step.id();
            if !options.includes(id) {
                continue;
            }
            if self.registry.is_completed(id) && !options.reset {
                info!("[MIGRATION] [{}] skipped, already completed", id);
                reports.push(StepReport {
                    id,
                    status: step.status().to_string(),
                    skipped: true,
                    transactions: 0,
                });
                continue;
            }

            let result = run_one(
                step.as_ref(),
                self.chain.as_ref(),
                &mut self.registry,
                &self.artifacts,
                &accounts,
            )
            .await;
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    save_after_failure(&self.registry);
                    return Err(e);
                }
            }
        }

        self.registry.save()?;
        Ok(reports)
    }

    /// Runs one step, completed or not.
    pub async fn run_step(&mut self, id: u32) -> Result<StepReport> {
        let accounts = self.load_accounts().await?;
        let step = self
            .steps
            .iter()
            .find(|s| s.id() == id)
            .ok_or(MigrationError::UnknownStep(id))?;

        let result = run_one(
            step.as_ref(),
            self.chain.as_ref(),
            &mut self.registry,
            &self.artifacts,
            &accounts,
        )
        .await;
        if result.is_err() {
            save_after_failure(&self.registry);
        }
        result
    }

    async fn load_accounts(&self) -> Result<Vec<Address>> {
        match &self.accounts {
            Some(accounts) => Ok(accounts.clone()),
            None => self.chain.accounts().await,
        }
    }
}

async fn run_one(
    step: &dyn MigrationStep,
    chain: &dyn Chain,
    registry: &mut DeploymentRegistry,
    artifacts: &ArtifactStore,
    accounts: &[Address],
) -> Result<StepReport> {
    let id = step.id();
    check_dependencies(step, chain, registry)
        .await
        .wrap_err_with(|| format!("migration {} failed", id))?;

    let mut ctx = MigrationContext::new(id, chain, registry, artifacts, accounts);
    step.migrate(&mut ctx)
        .await
        .wrap_err_with(|| format!("migration {} failed", id))?;
    let transactions = ctx.transactions();

    registry.mark_completed(id);
    registry.save()?;
    info!(
        "[MIGRATION] [{}] {} ({} transactions)",
        id,
        step.status(),
        transactions
    );

    Ok(StepReport {
        id,
        status: step.status().to_string(),
        skipped: false,
        transactions,
    })
}

async fn check_dependencies(
    step: &dyn MigrationStep,
    chain: &dyn Chain,
    registry: &DeploymentRegistry,
) -> Result<()> {
    let required_by = format!("migration {}", step.id());
    for dependency in step.dependencies() {
        let address = dependency.resolve(registry, &required_by)?;
        if !chain.is_deployed(address).await? {
            return Err(MigrationError::DependencyNotDeployed {
                name: dependency.to_string(),
                address,
            }
            .into());
        }
    }
    Ok(())
}

// Keeps whatever the failed step deployed before it stopped.
fn save_after_failure(registry: &DeploymentRegistry) {
    if let Err(e) = registry.save() {
        warn!("Failed to save deployments after error: {}", e);
    }
}
