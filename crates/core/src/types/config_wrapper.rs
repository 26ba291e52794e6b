use alloy::primitives::Address;
use eyre::{Result, eyre};
use std::{env, fs};
use toml::Value;

pub struct ConfigWrapper {
    raw_config: Value,
}

impl ConfigWrapper {
    pub fn new(raw_config: Value) -> Self {
        Self { raw_config }
    }

    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or("config.toml");
        let config_content =
            fs::read_to_string(path).map_err(|e| eyre!("Failed to read {}: {}", path, e))?;
        let raw_config: Value = config_content.parse::<Value>()?;

        Ok(Self { raw_config })
    }

    pub fn get_rpc_url(&self, network: &str) -> Result<String> {
        let url_str = self
            .raw_config
            .get("rpc_endpoints")
            .and_then(|e| e.get(network))
            .and_then(|u| u.as_str())
            .ok_or_else(|| eyre!("URL not found for network: {}", network))?;

        match url_str.strip_prefix("env:") {
            Some(env_var) => {
                env::var(env_var).map_err(|_| eyre!("Environment variable {} not set", env_var))
            }
            None => Ok(url_str.to_string()),
        }
    }

    fn get_network_value(&self, network: &str, key: &str) -> Option<&Value> {
        // Try network specific value first
        self.raw_config
            .get("network")
            .and_then(|n| n.get(network))
            .and_then(|n| n.get(key))
            .or_else(|| {
                // Fallback to default if network specific not found
                self.raw_config
                    .get("network")
                    .and_then(|n| n.get("default"))
                    .and_then(|n| n.get(key))
            })
    }

    pub fn get_network_config_value(&self, network: &str, key: &str) -> Result<String> {
        let value = self
            .get_network_value(network, key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| eyre!("{} not found for network: {}", key, network))?;

        Ok(value.to_string())
    }

    pub fn get_artifacts_dir(&self, network: &str) -> String {
        self.get_network_config_value(network, "artifacts_dir")
            .unwrap_or_else(|_| "build/contracts".to_string())
    }

    pub fn get_deployments_file(&self, network: &str) -> String {
        self.get_network_config_value(network, "deployments_file")
            .unwrap_or_else(|_| format!("deployments/{}.json", network))
    }

    /// Manifest path, if one is configured. Without one the stock migrations run.
    pub fn get_manifest(&self, network: &str) -> Option<String> {
        self.get_network_config_value(network, "manifest").ok()
    }

    /// Account list overriding what the node reports, if configured.
    pub fn get_accounts(&self, network: &str) -> Result<Option<Vec<Address>>> {
        let Some(accounts) = self.get_network_value(network, "accounts") else {
            return Ok(None);
        };
        let accounts = accounts
            .as_array()
            .ok_or_else(|| eyre!("accounts must be an array for network: {}", network))?;

        let result = accounts
            .iter()
            .map(|a| {
                a.as_str()
                    .ok_or_else(|| eyre!("Account must be a string"))?
                    .parse::<Address>()
                    .map_err(|e| eyre!("Invalid account address: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(result))
    }
}
