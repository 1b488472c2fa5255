//! JSVEE animation registry and page bootstrap (engine-agnostic).
//!
//! Animation modules register opaque definitions under string ids. When the
//! page signals readiness, the bootstrapper scans a document snapshot for host
//! elements and hands each `(id, element)` pair to a component factory, which
//! later resolves the definition through the registry.
//!
//! DOM access and JS interop live in adapter crates; this crate only sees the
//! [`HostDocument`] and [`ComponentFactory`] traits.

pub mod bootstrap;
pub mod bundle;
pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod module;
pub mod registry;
pub mod runtime;
pub mod scan;

// Re-exports for consumers (adapters)
pub use bootstrap::{BootstrapReport, BootstrapState, Bootstrapper, ComponentFactory};
pub use bundle::{parse_animation_bundle_json, AnimationBundle};
pub use config::{BootstrapConfig, RebindPolicy};
pub use document::{DocumentSnapshot, ElementHandle, HostDocument, HostElement};
pub use error::{ComponentError, ConfigError, RegistryError};
pub use ids::AnimationId;
pub use module::{load_modules, AnimationModule};
pub use registry::AnimationRegistry;
pub use runtime::AnimationRuntime;
pub use scan::{scan_hosts, HostScan, ScanPlan};
