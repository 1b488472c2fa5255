//! Live DOM behind the core's `HostDocument` trait.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use jsvee_animations_core::{
    AnimationId, AnimationRegistry, BootstrapConfig, ComponentError, ComponentFactory,
    DocumentSnapshot, ElementHandle, HostDocument, HostElement,
};

/// Host candidates found by one `querySelectorAll`, addressed by their index.
pub(crate) struct DomDocument {
    elements: Vec<Element>,
    id_attribute: String,
    bound_attribute: String,
}

impl DomDocument {
    pub(crate) fn query(document: &Document, config: &BootstrapConfig) -> Result<Self, JsValue> {
        let list = document.query_selector_all(&config.host_selector())?;
        let mut elements = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                elements.push(el);
            }
        }
        Ok(Self {
            elements,
            id_attribute: config.id_attribute.clone(),
            bound_attribute: config.bound_attribute.clone(),
        })
    }

    pub(crate) fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle.0 as usize)
    }
}

fn class_list(el: &Element) -> Vec<String> {
    let list = el.class_list();
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

impl HostDocument for DomDocument {
    fn snapshot(&self) -> DocumentSnapshot {
        let elements = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, el)| {
                let mut host = HostElement::new(ElementHandle(i as u32), el.tag_name().to_lowercase());
                host.classes = class_list(el);
                for name in [&self.id_attribute, &self.bound_attribute] {
                    if let Some(value) = el.get_attribute(name) {
                        host.set_attribute(name, &value);
                    }
                }
                host
            })
            .collect();
        DocumentSnapshot { elements }
    }

    fn add_class(&mut self, element: ElementHandle, class: &str) {
        if let Some(el) = self.element(element) {
            // classList.add ignores classes that are already present.
            if let Err(e) = el.class_list().add_1(class) {
                web_sys::console::warn_2(&JsValue::from_str("jsvee: classList.add failed"), &e);
            }
        }
    }

    fn set_attribute(&mut self, element: ElementHandle, name: &str, value: &str) {
        if let Some(el) = self.element(element) {
            if let Err(e) = el.set_attribute(name, value) {
                web_sys::console::warn_2(&JsValue::from_str("jsvee: setAttribute failed"), &e);
            }
        }
    }
}

/// Builds components with `new JSVEE.ui(id, element)`.
pub(crate) struct JsUiFactory {
    ctor: JsValue,
    elements: Vec<Element>,
}

impl JsUiFactory {
    pub(crate) fn new(ctor: JsValue, elements: Vec<Element>) -> Self {
        Self { ctor, elements }
    }
}

impl ComponentFactory<JsValue> for JsUiFactory {
    fn construct(
        &mut self,
        id: &AnimationId,
        element: ElementHandle,
        _registry: &AnimationRegistry<JsValue>,
    ) -> Result<(), ComponentError> {
        let fail = |reason: String| ComponentError::Construct {
            id: id.to_string(),
            reason,
        };
        let ctor: &Function = self
            .ctor
            .dyn_ref()
            .ok_or_else(|| fail("JSVEE.ui is not a constructor".to_string()))?;
        let el = self
            .elements
            .get(element.0 as usize)
            .ok_or_else(|| fail(format!("no element for handle {}", element.0)))?;
        let args = Array::of2(&JsValue::from_str(id.as_str()), el);
        Reflect::construct(ctor, &args)
            .map(|_| ())
            .map_err(|e| fail(describe_js_error(&e)))
    }
}

fn describe_js_error(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{e:?}")
}
