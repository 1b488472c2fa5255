//! Document model the bootstrapper scans.
//!
//! Adapters expose the live page through [`HostDocument`]; the core works on a
//! [`DocumentSnapshot`] (plain data, serde-friendly so pages can be described
//! as JSON fixtures) and writes back through handles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque reference to an element inside one document.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementHandle(pub u32);

/// One element as seen by the scanner: its class list and attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostElement {
    pub handle: ElementHandle,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl HostElement {
    pub fn new(handle: ElementHandle, tag: impl Into<String>) -> Self {
        Self {
            handle,
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_class(&class);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add `class` unless already present. Returns whether the list changed.
    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

/// Elements of a page in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub elements: Vec<HostElement>,
}

impl DocumentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element built by `f`, assigning it the next free handle.
    pub fn push_with(&mut self, tag: &str, f: impl FnOnce(HostElement) -> HostElement) -> ElementHandle {
        let next = self
            .elements
            .iter()
            .map(|e| e.handle.0 + 1)
            .max()
            .unwrap_or(0);
        let handle = ElementHandle(next);
        self.elements.push(f(HostElement::new(handle, tag)));
        handle
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&HostElement> {
        self.elements.iter().find(|e| e.handle == handle)
    }

    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut HostElement> {
        self.elements.iter_mut().find(|e| e.handle == handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Live page the bootstrapper reads from and writes markers back into.
pub trait HostDocument {
    /// Current state of the elements that could be hosts.
    fn snapshot(&self) -> DocumentSnapshot;

    /// Add a class to an element. Must be idempotent.
    fn add_class(&mut self, element: ElementHandle, class: &str);

    fn set_attribute(&mut self, element: ElementHandle, name: &str, value: &str);
}

impl HostDocument for DocumentSnapshot {
    fn snapshot(&self) -> DocumentSnapshot {
        self.clone()
    }

    fn add_class(&mut self, element: ElementHandle, class: &str) {
        if let Some(el) = self.get_mut(element) {
            el.add_class(class);
        }
    }

    fn set_attribute(&mut self, element: ElementHandle, name: &str, value: &str) {
        if let Some(el) = self.get_mut(element) {
            el.set_attribute(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_class_is_idempotent() {
        let mut el = HostElement::new(ElementHandle(0), "div").with_class("jsvee-animation");
        assert!(!el.add_class("jsvee-animation"));
        assert!(el.add_class("animation"));
        assert!(!el.add_class(""));
        assert_eq!(el.classes, ["jsvee-animation", "animation"]);
    }

    #[test]
    fn push_with_assigns_fresh_handles() {
        let mut doc = DocumentSnapshot::new();
        let a = doc.push_with("div", |e| e.with_class("animation"));
        let b = doc.push_with("p", |e| e);
        assert_eq!(a, ElementHandle(0));
        assert_eq!(b, ElementHandle(1));
        assert_eq!(doc.get(b).map(|e| e.tag.as_str()), Some("p"));
        assert!(doc.get(ElementHandle(7)).is_none());
    }

    #[test]
    fn writes_through_handles() {
        let mut doc = DocumentSnapshot::new();
        let h = doc.push_with("div", |e| e);
        HostDocument::add_class(&mut doc, h, "jsvee-animation");
        HostDocument::add_class(&mut doc, h, "jsvee-animation");
        HostDocument::set_attribute(&mut doc, h, "data-jsvee-bound", "swap");
        // Unknown handles are ignored.
        HostDocument::add_class(&mut doc, ElementHandle(9), "x");

        let el = doc.get(h).unwrap();
        assert_eq!(el.classes, ["jsvee-animation"]);
        assert_eq!(el.attribute("data-jsvee-bound"), Some("swap"));
    }

    #[test]
    fn deserializes_sparse_elements() {
        let doc: DocumentSnapshot = serde_json::from_str(
            r#"{ "elements": [ { "handle": 3, "classes": ["animation"], "attributes": { "data-id": "swap" } } ] }"#,
        )
        .unwrap();
        let el = doc.get(ElementHandle(3)).unwrap();
        assert_eq!(el.tag, "");
        assert_eq!(el.attribute("data-id"), Some("swap"));
    }
}
