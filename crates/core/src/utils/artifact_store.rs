use crate::errors::MigrationError;
use alloy::primitives::Bytes;
use eyre::Result;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Resolves a contract name to its creation bytecode.
///
/// Reads `<dir>/<Name>.json` compilation artifacts. The `bytecode` field is
/// either a hex string (Truffle, Hardhat) or an object with an `object` field
/// (Foundry). Bytecode can also be inserted directly.
#[derive(Debug, Default, Clone)]
pub struct ArtifactStore {
    dir: Option<PathBuf>,
    bytecode: HashMap<String, Bytes>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            bytecode: HashMap::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, bytecode: Bytes) {
        self.bytecode.insert(name.to_string(), bytecode);
    }

    pub fn with(mut self, name: &str, bytecode: Bytes) -> Self {
        self.insert(name, bytecode);
        self
    }

    pub fn bytecode(&self, name: &str) -> Result<Bytes> {
        if let Some(code) = self.bytecode.get(name) {
            return Ok(code.clone());
        }
        let Some(dir) = &self.dir else {
            return Err(artifact_error(name, "no artifact registered"));
        };

        let path = dir.join(format!("{name}.json"));
        debug!("Reading artifact {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| artifact_error(name, &format!("{}: {}", path.display(), e)))?;
        parse_bytecode(name, &content)
    }
}

fn parse_bytecode(name: &str, content: &str) -> Result<Bytes> {
    let artifact: Value =
        serde_json::from_str(content).map_err(|e| artifact_error(name, &e.to_string()))?;

    let raw = match &artifact["bytecode"] {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj
            .get("object")
            .and_then(|o| o.as_str())
            .ok_or_else(|| artifact_error(name, "bytecode.object is not a string"))?,
        _ => return Err(artifact_error(name, "missing bytecode")),
    };

    let code = raw
        .parse::<Bytes>()
        .map_err(|e| artifact_error(name, &format!("invalid bytecode hex: {e}")))?;
    if code.is_empty() {
        // Interfaces and abstract contracts compile to empty bytecode.
        return Err(artifact_error(name, "bytecode is empty"));
    }
    Ok(code)
}

fn artifact_error(name: &str, reason: &str) -> eyre::Report {
    MigrationError::Artifact {
        name: name.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::bytes;

    #[test]
    fn test_truffle_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Roles2Library.json"),
            r#"{ "contractName": "Roles2Library", "bytecode": "0x6080604052" }"#,
        )
        .unwrap();

        let store = ArtifactStore::new(dir.path());
        assert_eq!(
            store.bytecode("Roles2Library").unwrap(),
            bytes!("6080604052")
        );
    }

    #[test]
    fn test_foundry_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Roles2LibraryAdapter.json"),
            r#"{ "bytecode": { "object": "0x60806040" } }"#,
        )
        .unwrap();

        let store = ArtifactStore::new(dir.path());
        assert_eq!(
            store.bytecode("Roles2LibraryAdapter").unwrap(),
            bytes!("60806040")
        );
    }

    #[test]
    fn test_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Abstract.json"), r#"{ "bytecode": "0x" }"#).unwrap();
        let store = ArtifactStore::new(dir.path());

        for name in ["Abstract", "Missing"] {
            let err = store.bytecode(name).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<MigrationError>(),
                Some(MigrationError::Artifact { .. })
            ));
        }
    }

    #[test]
    fn test_in_memory() {
        let store = ArtifactStore::in_memory().with("Storage", bytes!("01"));
        assert_eq!(store.bytecode("Storage").unwrap(), bytes!("01"));
        assert!(store.bytecode("StorageManager").is_err());
    }
}
