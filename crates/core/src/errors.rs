//! Errors that callers of the migration runner need to tell apart.
//!
//! Everything else travels as a plain `eyre::Report`; these are wrapped in a
//! report too and recovered with `downcast_ref::<MigrationError>()`.

use alloy::primitives::{Address, B256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// A dependency name is missing from the deployment registry
    #[error("dependency {name} not found in the deployment registry (required by {required_by})")]
    DependencyNotFound { name: String, required_by: String },
    /// A dependency is registered, but there is no code at its address
    #[error("dependency {name} is registered at {address} but has no code")]
    DependencyNotDeployed { name: String, address: Address },
    /// Two sources disagree on the address of a registry entry
    #[error("registry mismatch for {name}: existing={existing} (from {origin}), new={new} (from {tag})")]
    RegistryMismatch {
        name: String,
        existing: Address,
        origin: String,
        new: Address,
        tag: String,
    },
    #[error("duplicate migration id {0}")]
    DuplicateStepId(u32),
    #[error("no migration with id {0}")]
    UnknownStep(u32),
    #[error("unknown role {0}")]
    UnknownRole(String),
    #[error("account index {index} out of range ({available} accounts available)")]
    AccountIndexOutOfRange { index: usize, available: usize },
    #[error("transaction {tx_hash} reverted ({action})")]
    TransactionReverted { tx_hash: B256, action: String },
    #[error("deployment of {0} returned no contract address")]
    MissingContractAddress(String),
    #[error("artifact {name}: {reason}")]
    Artifact { name: String, reason: String },
    #[error("label {0:?} does not fit in bytes32")]
    LabelTooLong(String),
}
