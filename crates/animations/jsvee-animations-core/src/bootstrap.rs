//! Readiness pass: scan the page, normalize markers, construct components.
//!
//! [`Bootstrapper::run`] is `scan_hosts` (pure) followed by
//! [`Bootstrapper::apply`] (side effects on the page and the factory).

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::document::{ElementHandle, HostDocument};
use crate::error::ComponentError;
use crate::ids::AnimationId;
use crate::registry::AnimationRegistry;
use crate::scan::{scan_hosts, HostScan, ScanPlan};

/// Builds the UI component for one host. The component resolves its
/// definition through `registry` itself.
pub trait ComponentFactory<D> {
    fn construct(
        &mut self,
        id: &AnimationId,
        element: ElementHandle,
        registry: &AnimationRegistry<D>,
    ) -> Result<(), ComponentError>;
}

impl<D, F> ComponentFactory<D> for F
where
    F: FnMut(&AnimationId, ElementHandle, &AnimationRegistry<D>) -> Result<(), ComponentError>,
{
    fn construct(
        &mut self,
        id: &AnimationId,
        element: ElementHandle,
        registry: &AnimationRegistry<D>,
    ) -> Result<(), ComponentError> {
        self(id, element, registry)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    #[default]
    Uninitialized,
    Initialized,
}

/// What one readiness pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// 1-based pass number.
    pub pass: u32,
    pub constructed: Vec<(ElementHandle, AnimationId)>,
    pub normalized: Vec<ElementHandle>,
    pub missing_id: Vec<ElementHandle>,
    pub already_bound: Vec<ElementHandle>,
    pub failures: Vec<(ElementHandle, String)>,
}

impl BootstrapReport {
    #[inline]
    pub fn constructed_count(&self) -> usize {
        self.constructed.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bootstrapper {
    config: BootstrapConfig,
    state: BootstrapState,
    passes: u32,
}

impl Bootstrapper {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            state: BootstrapState::Uninitialized,
            passes: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Scan `doc` without touching it.
    pub fn plan<D, H>(&self, doc: &H, registry: &AnimationRegistry<D>) -> ScanPlan
    where
        H: HostDocument + ?Sized,
    {
        scan_hosts(&doc.snapshot(), registry, &self.config)
    }

    /// Scan and apply in one go.
    pub fn run<D, H, F>(
        &mut self,
        doc: &mut H,
        registry: &AnimationRegistry<D>,
        factory: &mut F,
    ) -> BootstrapReport
    where
        H: HostDocument + ?Sized,
        F: ComponentFactory<D> + ?Sized,
    {
        let plan = self.plan(doc, registry);
        self.apply(&plan, doc, registry, factory)
    }

    /// Apply a plan: add the primary marker where missing, construct one
    /// component per binding and tag each bound element. A failing
    /// construction is recorded and the pass continues.
    pub fn apply<D, H, F>(
        &mut self,
        plan: &ScanPlan,
        doc: &mut H,
        registry: &AnimationRegistry<D>,
        factory: &mut F,
    ) -> BootstrapReport
    where
        H: HostDocument + ?Sized,
        F: ComponentFactory<D> + ?Sized,
    {
        self.passes = self.passes.saturating_add(1);
        self.state = BootstrapState::Initialized;

        let mut report = BootstrapReport {
            pass: self.passes,
            ..Default::default()
        };

        for &element in &plan.normalize {
            doc.add_class(element, &self.config.primary_marker);
            report.normalized.push(element);
        }

        for host in &plan.hosts {
            match host {
                HostScan::Bind {
                    element,
                    id,
                    registered,
                } => {
                    if !registered {
                        log::debug!("host {:?} references unregistered animation '{id}'", element);
                    }
                    match factory.construct(id, *element, registry) {
                        Ok(()) => {
                            doc.set_attribute(*element, &self.config.bound_attribute, id.as_str());
                            report.constructed.push((*element, id.clone()));
                        }
                        Err(err) => {
                            log::warn!("host {:?}: {err}", element);
                            report.failures.push((*element, err.to_string()));
                        }
                    }
                }
                HostScan::MissingId { element } => {
                    log::debug!("host {:?} has no animation id; skipped", element);
                    report.missing_id.push(*element);
                }
                HostScan::AlreadyBound { element, .. } => {
                    report.already_bound.push(*element);
                }
            }
        }

        log::debug!(
            "bootstrap pass {}: {} constructed, {} without id, {} already bound, {} failed",
            report.pass,
            report.constructed.len(),
            report.missing_id.len(),
            report.already_bound.len(),
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RebindPolicy;
    use crate::document::DocumentSnapshot;

    fn page() -> DocumentSnapshot {
        let mut doc = DocumentSnapshot::new();
        doc.push_with("div", |e| e.with_class("animation").with_attribute("data-id", "swap"));
        doc.push_with("div", |e| e.with_class("jsvee-animation"));
        doc
    }

    #[test]
    fn first_pass_initializes_and_tags() {
        let mut doc = page();
        let reg: AnimationRegistry<()> = AnimationRegistry::new();
        let mut boot = Bootstrapper::new(BootstrapConfig::default());
        assert_eq!(boot.state(), BootstrapState::Uninitialized);

        let mut seen = Vec::new();
        let mut factory = |id: &AnimationId, el: ElementHandle, _: &AnimationRegistry<()>| -> Result<(), ComponentError> {
            seen.push((el, id.to_string()));
            Ok(())
        };
        let report = boot.run(&mut doc, &reg, &mut factory);

        assert_eq!(boot.state(), BootstrapState::Initialized);
        assert_eq!(report.pass, 1);
        assert_eq!(seen, [(ElementHandle(0), "swap".to_string())]);
        assert_eq!(report.missing_id, [ElementHandle(1)]);

        let el = doc.get(ElementHandle(0)).unwrap();
        assert_eq!(el.classes, ["animation", "jsvee-animation"]);
        assert_eq!(el.attribute("data-jsvee-bound"), Some("swap"));
    }

    #[test]
    fn failed_construction_does_not_tag_or_stop() {
        let mut doc = DocumentSnapshot::new();
        doc.push_with("div", |e| e.with_class("animation").with_attribute("data-id", "bad"));
        doc.push_with("div", |e| e.with_class("animation").with_attribute("data-id", "good"));
        let reg: AnimationRegistry<()> = AnimationRegistry::new();
        let mut boot = Bootstrapper::new(BootstrapConfig::default());

        let mut factory = |id: &AnimationId, _: ElementHandle, _: &AnimationRegistry<()>| -> Result<(), ComponentError> {
            if id.as_str() == "bad" {
                Err(ComponentError::Construct {
                    id: id.to_string(),
                    reason: "boom".into(),
                })
            } else {
                Ok(())
            }
        };
        let report = boot.run(&mut doc, &reg, &mut factory);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.constructed_count(), 1);
        assert_eq!(doc.get(ElementHandle(0)).unwrap().attribute("data-jsvee-bound"), None);

        // The failed host is retried on the next pass; the bound one is skipped.
        let retry = boot.run(&mut doc, &reg, &mut factory);
        assert_eq!(retry.pass, 2);
        assert_eq!(retry.failures.len(), 1);
        assert_eq!(retry.already_bound, [ElementHandle(1)]);
    }

    #[test]
    fn reinitialize_policy_constructs_again() {
        let mut doc = page();
        let reg: AnimationRegistry<()> = AnimationRegistry::new();
        let mut boot = Bootstrapper::new(BootstrapConfig {
            rebind: RebindPolicy::Reinitialize,
            ..Default::default()
        });
        let mut count = 0;
        let mut factory = |_: &AnimationId, _: ElementHandle, _: &AnimationRegistry<()>| -> Result<(), ComponentError> {
            count += 1;
            Ok(())
        };
        boot.run(&mut doc, &reg, &mut factory);
        boot.run(&mut doc, &reg, &mut factory);
        assert_eq!(count, 2);
        assert_eq!(boot.passes(), 2);
    }
}
