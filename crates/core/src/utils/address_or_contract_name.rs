use crate::errors::MigrationError;
use crate::migration_manager::deployment_registry::DeploymentRegistry;
use alloy::primitives::Address;
use eyre::Result;
use serde::{Deserialize, Deserializer, de::Error};
use std::collections::BTreeMap;
use std::fmt;

/// Either a literal address or the registry name of a deployed contract.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressOrContractName {
    Address(Address),
    ContractName(String),
}

impl<'de> Deserialize<'de> for AddressOrContractName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Try to parse as Address first
        if let Ok(addr) = s.parse::<Address>() {
            Ok(AddressOrContractName::Address(addr))
        } else if s.starts_with("0x") {
            Err(D::Error::custom(
                "Invalid address: string starts with '0x' but is not a valid address (possible typo or wrong length)",
            ))
        } else {
            Ok(AddressOrContractName::ContractName(s))
        }
    }
}

impl From<&str> for AddressOrContractName {
    fn from(name: &str) -> Self {
        AddressOrContractName::ContractName(name.to_string())
    }
}

impl fmt::Display for AddressOrContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressOrContractName::Address(addr) => write!(f, "{}", addr),
            AddressOrContractName::ContractName(name) => write!(f, "{}", name),
        }
    }
}

impl AddressOrContractName {
    pub fn resolve(&self, registry: &DeploymentRegistry, required_by: &str) -> Result<Address> {
        match self {
            AddressOrContractName::Address(addr) => Ok(*addr),
            AddressOrContractName::ContractName(name) => registry.require(name, required_by),
        }
    }
}

/// An account given by its position in the run's account list or by address.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountRef {
    Index(usize),
    Address(Address),
}

impl Default for AccountRef {
    fn default() -> Self {
        AccountRef::Index(0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for AccountRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawRef::deserialize(deserializer)? {
            RawRef::Number(n) => Ok(AccountRef::Index(n as usize)),
            RawRef::Text(s) => {
                if let Some(index) = s
                    .strip_prefix("accounts[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    let index = index
                        .parse::<usize>()
                        .map_err(|e| D::Error::custom(format!("invalid account index: {e}")))?;
                    return Ok(AccountRef::Index(index));
                }
                s.parse::<Address>()
                    .map(AccountRef::Address)
                    .map_err(|e| D::Error::custom(format!("invalid account {s}: {e}")))
            }
        }
    }
}

impl AccountRef {
    pub fn resolve(&self, accounts: &[Address]) -> Result<Address> {
        match self {
            AccountRef::Address(addr) => Ok(*addr),
            AccountRef::Index(index) => accounts.get(*index).copied().ok_or_else(|| {
                MigrationError::AccountIndexOutOfRange {
                    index: *index,
                    available: accounts.len(),
                }
                .into()
            }),
        }
    }
}

/// A role given by id or by a name from the step's role table.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleRef {
    Id(u8),
    Name(String),
}

impl<'de> Deserialize<'de> for RoleRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawRef::deserialize(deserializer)? {
            RawRef::Number(n) => u8::try_from(n)
                .map(RoleRef::Id)
                .map_err(|_| D::Error::custom("role id must be between 0 and 255")),
            RawRef::Text(s) => Ok(RoleRef::Name(s)),
        }
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl RoleRef {
    pub fn resolve(&self, roles: &BTreeMap<String, u8>) -> Result<u8> {
        match self {
            RoleRef::Id(id) => Ok(*id),
            RoleRef::Name(name) => roles
                .get(name)
                .copied()
                .ok_or_else(|| MigrationError::UnknownRole(name.clone()).into()),
        }
    }
}
