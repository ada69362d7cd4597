//! Normalization of the Solidity verifiers generated for the zk-Hangman circuits.
//!
//! The circuit toolchain emits every verifier as `contract Verifier` pinned to whatever compiler
//! version it was built against. Both files have to be rewritten before compilation, so that they
//! target a single compiler version and carry distinct contract names.

use std::path::Path;

mod error;
mod rule;
mod target;

pub use error::{PatchError, RuleMismatch};
pub use rule::{patch_source, PatchedSource, RewriteRule, RuleResult};
pub use target::{default_targets, patch_file, PatchOutcome, PatchTarget};

/// The compiler version every verifier is pinned to after patching.
pub const TARGET_PRAGMA: &str = "pragma solidity ^0.8.0";

/// Repository-relative path of the verifier checking the initial game state.
pub const INIT_VERIFIER_PATH: &str = "contracts/InitVerifier.sol";
/// Contract name given to the initial game state verifier.
pub const INIT_VERIFIER_NAME: &str = "InitVerifier";

/// Repository-relative path of the verifier checking a single guess.
pub const GUESS_VERIFIER_PATH: &str = "contracts/GuessVerifier.sol";
/// Contract name given to the guess verifier.
pub const GUESS_VERIFIER_NAME: &str = "GuessVerifier";

/// Patch both generated verifiers found under `root`, in place.
///
/// Targets are processed one after another and the first failure aborts the run. A file that was
/// already patched is left untouched.
pub fn patch_verifiers(root: impl AsRef<Path>) -> Result<Vec<PatchOutcome>, PatchError> {
    default_targets(root.as_ref())
        .iter()
        .map(patch_file)
        .collect()
}
