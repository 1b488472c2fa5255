//! Bootstrap configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a readiness pass does with a host that is already bound to a
/// component from an earlier pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebindPolicy {
    /// Leave the existing component alone.
    #[default]
    Skip,
    /// Construct a fresh component on the element again.
    Reinitialize,
}

/// Markup conventions and event name the bootstrapper works with.
///
/// Every field has a default, so hosts only pass the fields they change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Event fired on the document once content and translations are final.
    pub ready_event: String,
    /// Class every host ends up carrying.
    pub primary_marker: String,
    /// Older class names still recognised as hosts.
    pub legacy_markers: Vec<String>,
    /// Attribute holding the animation id.
    pub id_attribute: String,
    /// Attribute written on an element once a component is bound to it.
    pub bound_attribute: String,
    pub rebind: RebindPolicy,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            ready_event: "aplus:translation-ready".to_string(),
            primary_marker: "jsvee-animation".to_string(),
            legacy_markers: vec!["animation".to_string()],
            id_attribute: "data-id".to_string(),
            bound_attribute: "data-jsvee-bound".to_string(),
            rebind: RebindPolicy::Skip,
        }
    }
}

impl BootstrapConfig {
    /// Check the fields a pass depends on. Empty legacy markers are ignored
    /// rather than rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("ready_event", &self.ready_event),
            ("primary_marker", &self.primary_marker),
            ("id_attribute", &self.id_attribute),
            ("bound_attribute", &self.bound_attribute),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        match self.markers().into_iter().find(|m| !is_css_class_name(m)) {
            Some(bad) => Err(ConfigError::InvalidMarker(bad.to_string())),
            None => Ok(()),
        }
    }

    /// Primary marker first, then legacy markers, without repeats or empties.
    pub fn markers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(1 + self.legacy_markers.len());
        for m in std::iter::once(&self.primary_marker).chain(&self.legacy_markers) {
            if !m.is_empty() && !out.contains(&m.as_str()) {
                out.push(m.as_str());
            }
        }
        out
    }

    /// CSS selector list matching any marker, e.g. `.jsvee-animation, .animation`.
    pub fn host_selector(&self) -> String {
        self.markers()
            .iter()
            .map(|m| format!(".{m}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_marker(&self, class: &str) -> bool {
        self.markers().contains(&class)
    }
}

/// Unescaped CSS identifier: letters, digits, `-`, `_` or non-ASCII, not
/// starting with a digit or with `-` followed by a digit.
fn is_css_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    let body_ok = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
    if first.is_ascii_digit() || !body_ok(first) {
        return false;
    }
    if first == '-' {
        match chars.clone().next() {
            Some(c) if c.is_ascii_digit() => return false,
            None => return false,
            _ => {}
        }
    }
    chars.all(body_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selector() {
        let cfg = BootstrapConfig::default();
        assert_eq!(cfg.host_selector(), ".jsvee-animation, .animation");
        assert!(cfg.is_marker("animation"));
        assert!(!cfg.is_marker("jsvee"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: BootstrapConfig =
            serde_json::from_str(r#"{ "rebind": "reinitialize", "legacy_markers": [] }"#).unwrap();
        assert_eq!(cfg.rebind, RebindPolicy::Reinitialize);
        assert_eq!(cfg.ready_event, "aplus:translation-ready");
        assert_eq!(cfg.markers(), ["jsvee-animation"]);
    }

    #[test]
    fn duplicate_markers_collapse() {
        let cfg = BootstrapConfig {
            legacy_markers: vec!["jsvee-animation".into(), "animation".into(), "".into()],
            ..Default::default()
        };
        assert_eq!(cfg.markers(), ["jsvee-animation", "animation"]);
    }

    #[test]
    fn empty_primary_marker_is_rejected_and_not_selected() {
        let cfg = BootstrapConfig {
            primary_marker: String::new(),
            ..Default::default()
        };
        assert_eq!(cfg.host_selector(), ".animation");
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyField("primary_marker")));
    }

    #[test]
    fn markers_must_be_plain_class_names() {
        assert_eq!(BootstrapConfig::default().validate(), Ok(()));

        for bad in ["has space", "a.b", "1st", "-2", "x,y"] {
            let cfg = BootstrapConfig {
                legacy_markers: vec![bad.into()],
                ..Default::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidMarker(bad.into())), "{bad}");
        }

        let cfg = BootstrapConfig {
            primary_marker: "_jsvee-host2".into(),
            legacy_markers: vec!["-legacy".into(), "".into()],
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn empty_event_or_attributes_are_rejected() {
        let cfg = BootstrapConfig {
            id_attribute: String::new(),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyField("id_attribute")));
    }
}
