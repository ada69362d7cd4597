use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alloy_primitives::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::compilation::{compile_with_solc, CompilationError};

/// The contracts of the suite, in the order they have to be deployed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum HangmanContract {
    GuessVerifier,
    InitVerifier,
    ZkHangmanFactory,
}

impl HangmanContract {
    /// Verifiers first, the factory last.
    pub const DEPLOYMENT_ORDER: [Self; 3] =
        [Self::GuessVerifier, Self::InitVerifier, Self::ZkHangmanFactory];

    /// Name of the contract in its Solidity source (and its compilation artifact).
    pub fn contract_name(self) -> &'static str {
        match self {
            Self::GuessVerifier => "GuessVerifier",
            Self::InitVerifier => "InitVerifier",
            Self::ZkHangmanFactory => "zkHangmanFactory",
        }
    }

    /// Source file declaring the contract, relative to the contracts directory. The factory
    /// imports `zkHangman.sol` but lives in a file of its own.
    pub fn source_file(self) -> &'static str {
        match self {
            Self::GuessVerifier => "GuessVerifier.sol",
            Self::InitVerifier => "InitVerifier.sol",
            Self::ZkHangmanFactory => "zkHangmanFactory.sol",
        }
    }

    /// Suffix of the constant under which the deployed address is reported.
    pub fn label(self) -> &'static str {
        match self {
            Self::GuessVerifier => "GuessVerifier",
            Self::InitVerifier => "InitVerifier",
            Self::ZkHangmanFactory => "ZkHangmanFactory",
        }
    }
}

/// Creation bytecode of a single contract, ready to be deployed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ContractArtifact {
    pub name: String,
    pub label: String,
    pub bytecode: Bytes,
}

/// Where creation bytecode comes from.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ArtifactSource {
    /// Hardhat compilation output (`<dir>/contracts/<Source>.sol/<Name>.json`).
    Hardhat { artifacts_dir: PathBuf },
    /// Compile `<sources_dir>/<Source>.sol` with the `solc` executable.
    Solc { sources_dir: PathBuf, solc: PathBuf },
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no artifact for `{name}` under `{}`", .dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("cannot parse artifact `{}`: {source}", .path.display())]
    Parsing {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Abstract contracts and interfaces compile to empty bytecode.
    #[error("artifact for `{0}` has no creation bytecode")]
    EmptyBytecode(String),

    #[error("cannot compile `{name}`: {source}")]
    Compilation {
        name: String,
        #[source]
        source: CompilationError,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    bytecode: Bytes,
}

impl ArtifactSource {
    pub fn load(&self, contract: HangmanContract) -> Result<ContractArtifact, ArtifactError> {
        let name = contract.contract_name();
        let bytecode = match self {
            ArtifactSource::Hardhat { artifacts_dir } => {
                load_hardhat(artifacts_dir, contract.source_file(), name)?
            }
            ArtifactSource::Solc { sources_dir, solc } => {
                compile(solc, sources_dir, contract.source_file(), name)?
            }
        };

        if bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode(name.to_string()));
        }

        Ok(ContractArtifact {
            name: name.to_string(),
            label: contract.label().to_string(),
            bytecode,
        })
    }
}

/// Load every contract of the suite, in deployment order.
pub fn deployment_plan(source: &ArtifactSource) -> Result<Vec<ContractArtifact>, ArtifactError> {
    HangmanContract::DEPLOYMENT_ORDER
        .into_iter()
        .map(|contract| source.load(contract))
        .collect()
}

fn load_hardhat(
    artifacts_dir: &Path,
    source_file: &str,
    name: &str,
) -> Result<Bytes, ArtifactError> {
    let path = find_artifact(artifacts_dir, source_file, name)
        .map_err(|source| ArtifactError::Io {
            path: artifacts_dir.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ArtifactError::NotFound {
            name: name.to_string(),
            dir: artifacts_dir.to_path_buf(),
        })?;

    let content = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    let artifact: HardhatArtifact =
        serde_json::from_str(&content).map_err(|source| ArtifactError::Parsing {
            path: path.clone(),
            source,
        })?;

    debug!(contract = %artifact.contract_name, path = %path.display(), "Loaded artifact");
    Ok(artifact.bytecode)
}

/// Hardhat keeps one directory per source file (`Foo.sol/`), holding one JSON file per contract.
fn find_artifact(dir: &Path, source_file: &str, name: &str) -> io::Result<Option<PathBuf>> {
    let file_name = format!("{name}.json");

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(found) = find_artifact(&path, source_file, name)? {
                return Ok(Some(found));
            }
        } else if path.file_name().is_some_and(|f| f == file_name.as_str())
            && path
                .parent()
                .and_then(Path::file_name)
                .is_some_and(|dir| dir == source_file)
        {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn compile(
    solc: &Path,
    sources_dir: &Path,
    source_file: &str,
    name: &str,
) -> Result<Bytes, ArtifactError> {
    let path = sources_dir.join(source_file);
    let source = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;

    compile_with_solc(solc, &source, name, sources_dir)
        .map(Bytes::from)
        .map_err(|source| ArtifactError::Compilation {
            name: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use assert2::{assert, let_assert};
    use tempfile::TempDir;

    use super::*;
    use crate::compilation::DEFAULT_SOLC;

    fn write_artifact(root: &Path, source: &str, name: &str, bytecode: &str) {
        let dir = root.join("contracts").join(format!("{source}.sol"));
        fs::create_dir_all(&dir).unwrap();
        let json = serde_json::json!({
            "_format": "hh-sol-artifact-1",
            "contractName": name,
            "sourceName": format!("contracts/{source}.sol"),
            "abi": [],
            "bytecode": bytecode,
            "deployedBytecode": bytecode,
        });
        fs::write(dir.join(format!("{name}.json")), json.to_string()).unwrap();
        fs::write(dir.join(format!("{name}.dbg.json")), "{}").unwrap();
    }

    fn hardhat_output() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "GuessVerifier", "GuessVerifier", "0x6001");
        write_artifact(root.path(), "InitVerifier", "InitVerifier", "0x6002");
        write_artifact(root.path(), "zkHangmanFactory", "zkHangmanFactory", "0x6003");
        write_artifact(root.path(), "zkHangman", "zkHangman", "0x6004");
        root
    }

    #[test]
    fn plan_follows_deployment_order() {
        let root = hardhat_output();
        let source = ArtifactSource::Hardhat {
            artifacts_dir: root.path().to_path_buf(),
        };

        let plan = deployment_plan(&source).unwrap();

        let names = plan.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        let labels = plan.iter().map(|a| a.label.as_str()).collect::<Vec<_>>();
        assert!(names == ["GuessVerifier", "InitVerifier", "zkHangmanFactory"]);
        assert!(labels == ["GuessVerifier", "InitVerifier", "ZkHangmanFactory"]);
        assert!(plan[2].bytecode == Bytes::from(vec![0x60, 0x03]));
    }

    #[test]
    fn missing_artifact_is_reported() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "GuessVerifier", "GuessVerifier", "0x6001");
        let source = ArtifactSource::Hardhat {
            artifacts_dir: root.path().to_path_buf(),
        };

        let_assert!(Err(ArtifactError::NotFound { name, .. }) = deployment_plan(&source));
        assert!(name == "InitVerifier");
    }

    #[test]
    fn empty_bytecode_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "GuessVerifier", "GuessVerifier", "0x");
        let source = ArtifactSource::Hardhat {
            artifacts_dir: root.path().to_path_buf(),
        };

        let_assert!(
            Err(ArtifactError::EmptyBytecode(name)) = source.load(HangmanContract::GuessVerifier)
        );
        assert!(name == "GuessVerifier");
    }

    #[test]
    fn malformed_artifact_is_a_parsing_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("contracts/InitVerifier.sol");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("InitVerifier.json"), "{\"contractName\": 1}").unwrap();
        let source = ArtifactSource::Hardhat {
            artifacts_dir: root.path().to_path_buf(),
        };

        let_assert!(
            Err(ArtifactError::Parsing { .. }) = source.load(HangmanContract::InitVerifier)
        );
    }

    #[test]
    fn artifact_is_taken_from_its_own_source_directory() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "Legacy", "GuessVerifier", "0x60ff");
        write_artifact(root.path(), "GuessVerifier", "GuessVerifier", "0x6001");
        let source = ArtifactSource::Hardhat {
            artifacts_dir: root.path().to_path_buf(),
        };

        let_assert!(Ok(artifact) = source.load(HangmanContract::GuessVerifier));
        assert!(artifact.bytecode == Bytes::from(vec![0x60, 0x01]));
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let source = ArtifactSource::Solc {
            sources_dir: root.path().to_path_buf(),
            solc: PathBuf::from(DEFAULT_SOLC),
        };

        let_assert!(
            Err(ArtifactError::Io { path, .. }) = source.load(HangmanContract::ZkHangmanFactory)
        );
        assert!(path == root.path().join("zkHangmanFactory.sol"));
    }

    #[test]
    fn missing_compiler_is_a_compilation_error() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join("InitVerifier.sol"),
            "pragma solidity ^0.8.0;\ncontract InitVerifier {}\n",
        )
        .unwrap();
        let source = ArtifactSource::Solc {
            sources_dir: root.path().to_path_buf(),
            solc: root.path().join("no-such-solc"),
        };

        let_assert!(
            Err(ArtifactError::Compilation {
                name,
                source: CompilationError::SolcNotFound(_),
            }) = source.load(HangmanContract::InitVerifier)
        );
        assert!(name == "InitVerifier");
    }
}
