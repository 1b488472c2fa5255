//! The single runtime instance a page owns: registry, bootstrapper and the
//! readiness subscription.
//!
//! This is the API for embedding the registry in Rust. The browser adapter
//! keeps registry and bootstrapper in separate cells instead, so JS components
//! can read the registry while a pass is running.

use crate::bootstrap::{BootstrapReport, BootstrapState, Bootstrapper, ComponentFactory};
use crate::config::BootstrapConfig;
use crate::document::HostDocument;
use crate::registry::AnimationRegistry;

#[derive(Debug)]
pub struct AnimationRuntime<D> {
    registry: AnimationRegistry<D>,
    bootstrapper: Bootstrapper,
    subscribed: bool,
}

impl<D> AnimationRuntime<D> {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            registry: AnimationRegistry::new(),
            bootstrapper: Bootstrapper::new(config),
            subscribed: false,
        }
    }

    #[inline]
    pub fn registry(&self) -> &AnimationRegistry<D> {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut AnimationRegistry<D> {
        &mut self.registry
    }

    #[inline]
    pub fn config(&self) -> &BootstrapConfig {
        self.bootstrapper.config()
    }

    #[inline]
    pub fn state(&self) -> BootstrapState {
        self.bootstrapper.state()
    }

    #[inline]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Install the readiness handler. Returns `false` if it was already
    /// installed; there is only ever one.
    pub fn subscribe(&mut self) -> bool {
        if self.subscribed {
            return false;
        }
        self.subscribed = true;
        log::debug!(
            "subscribed to '{}' for animation bootstrap",
            self.bootstrapper.config().ready_event
        );
        true
    }

    /// Deliver a page event. Runs a bootstrap pass when the handler is
    /// installed and `event` is the configured readiness event.
    pub fn dispatch<H, F>(&mut self, event: &str, doc: &mut H, factory: &mut F) -> Option<BootstrapReport>
    where
        H: HostDocument + ?Sized,
        F: ComponentFactory<D> + ?Sized,
    {
        if !self.subscribed || event != self.bootstrapper.config().ready_event {
            return None;
        }
        Some(self.bootstrap(doc, factory))
    }

    /// Run a pass immediately, regardless of subscription.
    pub fn bootstrap<H, F>(&mut self, doc: &mut H, factory: &mut F) -> BootstrapReport
    where
        H: HostDocument + ?Sized,
        F: ComponentFactory<D> + ?Sized,
    {
        self.bootstrapper.run(doc, &self.registry, factory)
    }
}

impl<D> Default for AnimationRuntime<D> {
    fn default() -> Self {
        Self::new(BootstrapConfig::default())
    }
}
