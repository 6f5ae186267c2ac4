//! Error types for the BLS pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlsError>;

/// Everything that can go wrong while setting up, signing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlsError {
    /// The caller supplied parameters the scheme cannot work with
    /// (non-prime `p`, wrong congruence class, singular curve, off-curve point).
    #[error("invalid parameters: {0}")]
    Validation(String),

    /// Division or inversion by a non-invertible element.
    ///
    /// The group law and the Miller loop route every zero denominator to a
    /// dedicated case, so reaching this means a logic defect.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A bounded search ran out of candidates.
    #[error("search exhausted: {search} (searched {range})")]
    SearchExhaustion { search: &'static str, range: String },

    /// An invariant that should hold for validated inputs did not.
    #[error("internal error: {0}")]
    Internal(String),

    /// The requested operation is not provided by this crate.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Coarse classification used by the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller mistake; fix the input.
    InvalidParameters,
    /// Operation not available.
    NotImplemented,
    /// Fault inside the engine.
    Internal,
}

impl BlsError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        BlsError::Validation(msg.into())
    }

    pub(crate) fn arithmetic(msg: impl Into<String>) -> Self {
        BlsError::Arithmetic(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        BlsError::Internal(msg.into())
    }

    pub(crate) fn exhausted(search: &'static str, range: impl Into<String>) -> Self {
        BlsError::SearchExhaustion {
            search,
            range: range.into(),
        }
    }

    /// Which side of the boundary is at fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlsError::Validation(_) => ErrorKind::InvalidParameters,
            BlsError::NotImplemented(_) => ErrorKind::NotImplemented,
            BlsError::Arithmetic(_) | BlsError::SearchExhaustion { .. } | BlsError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}
