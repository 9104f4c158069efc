//! Applies environment-scoped YAML settings to configuration objects and
//! payment gateway records.
//!
//! The entry point is [`PreferenceInitializer`]. It loads a settings file,
//! resolves each section's target through a registry or the gateway store,
//! and writes the section's keys as preferences. Non-fatal problems are
//! collected in [`Warnings`]; structural problems are returned as
//! [`ApplyError`].

pub mod config;
pub mod configuration;
pub mod gateway;
pub mod initializer;
pub mod preference;
pub mod registry;
pub mod reporter;
pub mod settings;
pub mod storage;
pub mod warnings;

pub use initializer::{
    ApplyError, ApplySummary, ConfigApplier, GatewayApplier, PreferenceInitializer,
};
pub use warnings::Warnings;
