use std::{io, path::PathBuf};

use thiserror::Error;

/// A rewrite rule whose pattern could not be found, while the text is not in the patched form
/// either.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("pattern `{pattern}` matches nothing")]
pub struct RuleMismatch {
    pub pattern: String,
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The upstream circuit compiler changed its output format and the rule is stale.
    #[error("pattern `{pattern}` not found in `{}` (has the generated verifier format changed?)", .path.display())]
    PatchMismatch { path: PathBuf, pattern: String },
}

impl PatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mismatch(path: impl Into<PathBuf>, mismatch: RuleMismatch) -> Self {
        Self::PatchMismatch {
            path: path.into(),
            pattern: mismatch.pattern,
        }
    }
}
