//! Persistent record of deployed addresses, updated after every confirmed deployment.
//!
//! Layout: `{ "deployments": { "<network>": { "<Label>": "0x..." } } }`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level key of the deployments file.
pub const DEPLOYMENTS_KEY: &str = "deployments";

#[derive(Debug, Error)]
pub enum DeploymentsFileError {
    #[error("I/O error on deployments file `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed deployments file `{}`: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("deployments file `{}` does not follow the expected layout", .path.display())]
    UnexpectedLayout { path: PathBuf },
}

/// Read the deployments file. A missing file reads as an empty record.
pub fn read_deployments(path: &Path) -> Result<Value, DeploymentsFileError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let content = fs::read_to_string(path).map_err(|source| DeploymentsFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DeploymentsFileError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Store `address` under `network` / `label`, keeping every other entry.
pub fn write_deployed_address(
    path: &Path,
    network: &str,
    label: &str,
    address: Address,
) -> Result<(), DeploymentsFileError> {
    let empty = || Value::Object(Map::new());

    let mut deployments = read_deployments(path)?;
    deployments
        .as_object_mut()
        .and_then(|root| root.entry(DEPLOYMENTS_KEY).or_insert_with(empty).as_object_mut())
        .and_then(|networks| networks.entry(network).or_insert_with(empty).as_object_mut())
        .ok_or_else(|| DeploymentsFileError::UnexpectedLayout {
            path: path.to_path_buf(),
        })?
        .insert(label.to_string(), Value::String(address.to_string()));

    let serialized = serde_json::to_string_pretty(&deployments).map_err(|source| {
        DeploymentsFileError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, serialized).map_err(|source| DeploymentsFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
