use crate::errors::MigrationError;
use alloy::primitives::Address;
use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

// Tag used for entries read from a deployments file.
const FILE_ORIGIN: &str = "deployments_file";

#[derive(Debug, Clone, PartialEq)]
struct RegistryEntry {
    address: Address,
    // Tag of whoever first set this value
    origin: String,
}

/// On-disk shape of the registry.
#[derive(Serialize, Deserialize, Default)]
struct DeploymentsFile {
    #[serde(default)]
    network: String,
    #[serde(default)]
    contracts: BTreeMap<String, String>,
    #[serde(default)]
    completed: Vec<u32>,
    #[serde(default)]
    last_run: Option<String>,
}

/// Name to address map for one migration run, plus the ids of the steps that
/// already completed. Optionally backed by a deployments file.
#[derive(Debug, Default)]
pub struct DeploymentRegistry {
    network: String,
    entries: BTreeMap<String, RegistryEntry>,
    completed: BTreeSet<u32>,
    path: Option<PathBuf>,
    last_run: Option<String>,
}

impl DeploymentRegistry {
    pub fn new(network: &str) -> Self {
        Self {
            network: network.to_string(),
            ..Default::default()
        }
    }

    /// Loads the registry from `path`. A missing file yields an empty
    /// registry that will be written to `path` on save.
    pub fn load(path: impl AsRef<Path>, network: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut registry = Self::new(network);
        registry.path = Some(path.to_path_buf());

        if !path.exists() {
            debug!("No deployments file at {}, starting empty", path.display());
            return Ok(registry);
        }

        let file: DeploymentsFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        if !file.network.is_empty() && file.network != network {
            return Err(eyre::eyre!(
                "deployments file {} belongs to network {}, not {}",
                path.display(),
                file.network,
                network
            ));
        }
        for (name, address) in file.contracts {
            let address = address.parse::<Address>().map_err(|e| {
                eyre::eyre!("invalid address for {} in deployments file: {}", name, e)
            })?;
            registry.set(&name, address, FILE_ORIGIN)?;
        }
        registry.completed = file.completed.into_iter().collect();
        registry.last_run = file.last_run;
        Ok(registry)
    }

    /// Writes the registry back to its file, if it has one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = DeploymentsFile {
            network: self.network.clone(),
            contracts: self
                .entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.address.to_string()))
                .collect(),
            completed: self.completed.iter().copied().collect(),
            last_run: self.last_run.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!("Saved deployments to {}", path.display());
        Ok(())
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.entries.get(name).map(|e| e.address)
    }

    /// Like `get`, but a missing entry is a `DependencyNotFound` error.
    pub fn require(&self, name: &str, required_by: &str) -> Result<Address> {
        self.get(name).ok_or_else(|| {
            MigrationError::DependencyNotFound {
                name: name.to_string(),
                required_by: required_by.to_string(),
            }
            .into()
        })
    }

    /// Records `name`. Setting the same address again is a no-op, a different
    /// address is a mismatch.
    pub fn set(&mut self, name: &str, address: Address, tag: &str) -> Result<()> {
        if let Some(existing) = self.entries.get(name) {
            if existing.address != address {
                return Err(MigrationError::RegistryMismatch {
                    name: name.to_string(),
                    existing: existing.address,
                    origin: existing.origin.clone(),
                    new: address,
                    tag: tag.to_string(),
                }
                .into());
            }
            return Ok(());
        }
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                address,
                origin: tag.to_string(),
            },
        );
        Ok(())
    }

    /// Overwrites `name`, for redeployments over an entry whose code is gone.
    pub fn replace(&mut self, name: &str, address: Address, tag: &str) {
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                address,
                origin: tag.to_string(),
            },
        );
    }

    pub fn is_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }

    pub fn mark_completed(&mut self, id: u32) {
        self.completed.insert(id);
    }

    pub fn completed(&self) -> impl Iterator<Item = u32> + '_ {
        self.completed.iter().copied()
    }

    pub fn set_last_run(&mut self, run_id: String) {
        self.last_run = Some(run_id);
    }

    pub fn last_run(&self) -> Option<&str> {
        self.last_run.as_deref()
    }

    pub fn contracts(&self) -> impl Iterator<Item = (&str, Address)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const STORAGE: Address = address!("0x1111111111111111111111111111111111111111");
    const OTHER: Address = address!("0x2222222222222222222222222222222222222222");

    #[test]
    fn test_set_same_value_is_noop() {
        let mut registry = DeploymentRegistry::new("development");
        registry.set("Storage", STORAGE, "seed").unwrap();
        registry.set("Storage", STORAGE, "again").unwrap();
        assert_eq!(registry.get("Storage"), Some(STORAGE));
    }

    #[test]
    fn test_set_mismatch() {
        let mut registry = DeploymentRegistry::new("development");
        registry.set("Storage", STORAGE, "seed").unwrap();
        let err = registry.set("Storage", OTHER, "step_1").unwrap_err();
        match err.downcast_ref::<MigrationError>() {
            Some(MigrationError::RegistryMismatch { origin, tag, .. }) => {
                assert_eq!(origin, "seed");
                assert_eq!(tag, "step_1");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_require_missing() {
        let registry = DeploymentRegistry::new("development");
        let err = registry.require("Storage", "step 1").unwrap_err();
        assert_eq!(
            err.downcast_ref::<MigrationError>(),
            Some(&MigrationError::DependencyNotFound {
                name: "Storage".to_string(),
                required_by: "step 1".to_string(),
            })
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments").join("development.json");

        let mut registry = DeploymentRegistry::load(&path, "development").unwrap();
        registry.set("Storage", STORAGE, "seed").unwrap();
        registry.mark_completed(1);
        registry.set_last_run("run".to_string());
        registry.save().unwrap();

        let loaded = DeploymentRegistry::load(&path, "development").unwrap();
        assert_eq!(loaded.get("Storage"), Some(STORAGE));
        assert!(loaded.is_completed(1));
        assert!(!loaded.is_completed(2));
        assert_eq!(loaded.last_run(), Some("run"));
    }

    #[test]
    fn test_load_rejects_other_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let mut registry = DeploymentRegistry::load(&path, "sepolia").unwrap();
        registry.set("Storage", STORAGE, "seed").unwrap();
        registry.save().unwrap();

        assert!(DeploymentRegistry::load(&path, "development").is_err());
    }

    #[test]
    fn test_load_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(
            &path,
            r#"{ "contracts": { "Storage": "0x1111111111111111111111111111111111111111" } }"#,
        )
        .unwrap();

        let registry = DeploymentRegistry::load(&path, "development").unwrap();
        assert_eq!(registry.get("Storage"), Some(STORAGE));
        assert_eq!(registry.completed().count(), 0);
    }
}
