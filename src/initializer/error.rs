//! Apply error types.

use thiserror::Error;

use crate::preference::PreferenceError;
use crate::registry::RegistryError;
use crate::settings::SettingsError;
use crate::storage::StorageError;

/// Fatal error raised while applying a settings document.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("section {section}: {source}")]
    Preference {
        section: String,
        #[source]
        source: PreferenceError,
    },
    #[error("{class} is not valid: {}", .messages.join(", "))]
    Invalid { class: String, messages: Vec<String> },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApplyError {
    pub(crate) fn preference(section: &str) -> impl FnOnce(PreferenceError) -> Self + '_ {
        move |source| ApplyError::Preference {
            section: section.to_string(),
            source,
        }
    }

    /// True when the error is a missing table or relation in storage.
    pub fn is_missing_relation(&self) -> bool {
        matches!(self, ApplyError::Storage(err) if err.is_missing_relation())
    }
}
