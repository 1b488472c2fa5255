//! Host discovery as a pure function of (document snapshot, registry, config).
//!
//! Nothing here touches the page; [`crate::Bootstrapper`] applies the plan.

use serde::Serialize;

use crate::config::{BootstrapConfig, RebindPolicy};
use crate::document::{DocumentSnapshot, ElementHandle, HostElement};
use crate::ids::AnimationId;
use crate::registry::AnimationRegistry;

/// Classification of one element carrying a marker class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostScan {
    /// Construct a component for `id` on `element`. `registered` tells whether
    /// the registry already knows the id at scan time.
    Bind {
        element: ElementHandle,
        id: AnimationId,
        registered: bool,
    },
    /// Id attribute absent or empty; skipped.
    MissingId { element: ElementHandle },
    /// Bound by an earlier pass and the policy says to leave it.
    AlreadyBound {
        element: ElementHandle,
        bound_to: String,
    },
}

impl HostScan {
    pub fn element(&self) -> ElementHandle {
        match self {
            HostScan::Bind { element, .. }
            | HostScan::MissingId { element }
            | HostScan::AlreadyBound { element, .. } => *element,
        }
    }
}

/// Result of scanning a snapshot: every host in document order plus the hosts
/// that still need the primary marker class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanPlan {
    pub hosts: Vec<HostScan>,
    pub normalize: Vec<ElementHandle>,
}

impl ScanPlan {
    /// `(element, id)` pairs to construct, in document order.
    pub fn bindings(&self) -> impl Iterator<Item = (ElementHandle, &AnimationId)> {
        self.hosts.iter().filter_map(|h| match h {
            HostScan::Bind { element, id, .. } => Some((*element, id)),
            _ => None,
        })
    }

    pub fn bind_count(&self) -> usize {
        self.bindings().count()
    }

    /// Ids bound by this plan that the registry did not know at scan time.
    pub fn unregistered(&self) -> Vec<&AnimationId> {
        self.hosts
            .iter()
            .filter_map(|h| match h {
                HostScan::Bind {
                    id,
                    registered: false,
                    ..
                } => Some(id),
                _ => None,
            })
            .collect()
    }
}

fn is_host(el: &HostElement, config: &BootstrapConfig) -> bool {
    config.markers().iter().any(|m| el.has_class(m))
}

/// Find every element carrying the primary or a legacy marker and decide what
/// the readiness pass does with it.
pub fn scan_hosts<D>(
    snapshot: &DocumentSnapshot,
    registry: &AnimationRegistry<D>,
    config: &BootstrapConfig,
) -> ScanPlan {
    let mut plan = ScanPlan::default();

    for el in snapshot.elements.iter().filter(|e| is_host(e, config)) {
        if !config.primary_marker.is_empty() && !el.has_class(&config.primary_marker) {
            plan.normalize.push(el.handle);
        }

        let bound = el.attribute(&config.bound_attribute);
        let id = AnimationId::from_attribute(el.attribute(&config.id_attribute));

        let scan = match (bound, id, config.rebind) {
            (Some(bound_to), _, RebindPolicy::Skip) => HostScan::AlreadyBound {
                element: el.handle,
                bound_to: bound_to.to_string(),
            },
            (_, None, _) => HostScan::MissingId { element: el.handle },
            (_, Some(id), _) => HostScan::Bind {
                element: el.handle,
                registered: registry.contains(id.as_str()),
                id,
            },
        };
        plan.hosts.push(scan);
    }

    plan
}
