//! Preference error types.

use thiserror::Error;

use super::{PreferenceType, PreferenceValue};

/// Preference assignment error.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("{0} is not a declared preference")]
    Unknown(String),
    #[error("preference {key} expects {expected}, got {value:?}")]
    TypeMismatch {
        key: String,
        expected: PreferenceType,
        value: PreferenceValue,
    },
}
