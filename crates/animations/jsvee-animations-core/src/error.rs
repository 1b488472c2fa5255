//! Error types for registration and component construction.

use thiserror::Error;

/// Errors raised while populating the registry.
///
/// Lookups never fail: an unknown id is reported as `None`, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("animation id must not be empty")]
    EmptyAnimationId,

    /// The host namespace the registry installs into is missing, so nothing
    /// was registered.
    #[error("animation namespace is unavailable")]
    NamespaceUnavailable,

    #[error("animation bundle parse error: {0}")]
    InvalidBundle(String),

    #[error("animation module '{module}' failed: {reason}")]
    Module { module: String, reason: String },
}

/// A [`crate::BootstrapConfig`] that cannot drive a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Marker classes end up in a CSS selector list.
    #[error("marker '{0}' is not a valid CSS class name")]
    InvalidMarker(String),
}

/// Failure reported by a [`crate::ComponentFactory`] for a single host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ComponentError {
    #[error("failed to construct component for '{id}': {reason}")]
    Construct { id: String, reason: String },
}
