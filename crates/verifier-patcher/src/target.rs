use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    rule::{patch_source, RewriteRule},
    PatchError, GUESS_VERIFIER_NAME, GUESS_VERIFIER_PATH, INIT_VERIFIER_NAME, INIT_VERIFIER_PATH,
};

/// A source file together with the rules that normalize it.
#[derive(Clone, Debug)]
pub struct PatchTarget {
    pub path: PathBuf,
    pub rules: Vec<RewriteRule>,
}

impl PatchTarget {
    /// Target for a generated verifier: bump the pragma, then rename the contract to `name`.
    pub fn verifier(path: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            path: path.into(),
            rules: vec![RewriteRule::pragma(), RewriteRule::contract_name(name)],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchOutcome {
    pub path: PathBuf,
    pub rewritten: usize,
    pub already_applied: usize,
    /// Whether the file on disk was overwritten.
    pub changed: bool,
}

/// The two generated verifiers, relative to the project `root`.
pub fn default_targets(root: &Path) -> [PatchTarget; 2] {
    [
        PatchTarget::verifier(root.join(INIT_VERIFIER_PATH), INIT_VERIFIER_NAME),
        PatchTarget::verifier(root.join(GUESS_VERIFIER_PATH), GUESS_VERIFIER_NAME),
    ]
}

/// Read `target.path`, apply its rules and write the result back to the same path.
///
/// The file is only written when patching actually changed its content.
pub fn patch_file(target: &PatchTarget) -> Result<PatchOutcome, PatchError> {
    let path = &target.path;
    let original = fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;

    let patched =
        patch_source(&original, &target.rules).map_err(|e| PatchError::mismatch(path, e))?;
    let changed = patched.text != original;

    if changed {
        fs::write(path, &patched.text).map_err(|e| PatchError::io(path, e))?;
        info!(path = %path.display(), rules = patched.rewritten, "Patched verifier source");
    } else {
        debug!(path = %path.display(), "Verifier source already normalized");
    }

    Ok(PatchOutcome {
        path: path.clone(),
        rewritten: patched.rewritten,
        already_applied: patched.already_applied,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use assert2::{assert, let_assert};
    use tempfile::TempDir;

    use super::*;
    use crate::patch_verifiers;

    fn generated(extra: &str) -> String {
        format!("pragma solidity ^0.6.11;\n{extra}\ncontract Verifier {{\n}}\n")
    }

    fn project() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("contracts")).unwrap();
        fs::write(root.path().join(INIT_VERIFIER_PATH), generated("// init")).unwrap();
        fs::write(root.path().join(GUESS_VERIFIER_PATH), generated("// guess")).unwrap();
        root
    }

    #[test]
    fn both_verifiers_get_distinct_names() {
        let root = project();

        let outcomes = patch_verifiers(root.path()).unwrap();
        assert!(outcomes.iter().all(|outcome| outcome.changed));

        let init = fs::read_to_string(root.path().join(INIT_VERIFIER_PATH)).unwrap();
        let guess = fs::read_to_string(root.path().join(GUESS_VERIFIER_PATH)).unwrap();
        assert!(init == "pragma solidity ^0.8.0;\n// init\ncontract InitVerifier {\n}\n");
        assert!(guess == "pragma solidity ^0.8.0;\n// guess\ncontract GuessVerifier {\n}\n");
    }

    #[test]
    fn second_run_is_a_noop() {
        let root = project();
        patch_verifiers(root.path()).unwrap();
        let first = fs::read(root.path().join(INIT_VERIFIER_PATH)).unwrap();

        let outcomes = patch_verifiers(root.path()).unwrap();

        assert!(outcomes.iter().all(|outcome| !outcome.changed));
        assert!(fs::read(root.path().join(INIT_VERIFIER_PATH)).unwrap() == first);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();

        let_assert!(Err(PatchError::Io { path, .. }) = patch_verifiers(root.path()));
        assert!(path == root.path().join(INIT_VERIFIER_PATH));
    }

    #[test]
    fn stale_format_is_reported_with_path() {
        let root = project();
        let guess_path = root.path().join(GUESS_VERIFIER_PATH);
        fs::write(&guess_path, "pragma solidity ^0.6.11;\ncontract PlonkVerifier {}\n").unwrap();

        let_assert!(
            Err(PatchError::PatchMismatch { path, pattern }) = patch_verifiers(root.path())
        );
        assert!(path == guess_path);
        assert!(pattern.contains("contract Verifier"));
        // The stale file is left as it was.
        assert!(fs::read_to_string(&guess_path).unwrap().contains("^0.6.11"));
    }
}
