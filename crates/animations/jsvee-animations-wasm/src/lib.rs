//! Browser bindings for the JSVEE animation registry.
//!
//! [`install`] puts a [`JsveeAnimations`] handle at `window.JSVEE.animations`
//! and subscribes the bootstrapper to the readiness event. Animation modules
//! add definitions with `JSVEE.animations.register(id, data)` or
//! `registerBundle(...)`. Plain property assignment such as
//! `JSVEE.animations['swap'] = data` only sets a JS property on the handle and
//! is never seen by `getAnimation`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use jsvee_animations_core::{
    AnimationBundle, AnimationId, AnimationModule, AnimationRegistry, BootstrapConfig,
    BootstrapReport, BootstrapState, Bootstrapper, RegistryError,
};

mod dom;

use dom::{DomDocument, JsUiFactory};

/// Registry and bootstrapper live in separate cells: a component built during
/// a pass calls back into `getAnimation` while the pass holds the bootstrapper.
struct Shared {
    registry: RefCell<AnimationRegistry<JsValue>>,
    bootstrapper: RefCell<Bootstrapper>,
}

impl Shared {
    fn new(config: BootstrapConfig) -> Rc<Self> {
        Rc::new(Self {
            registry: RefCell::new(AnimationRegistry::new()),
            bootstrapper: RefCell::new(Bootstrapper::new(config)),
        })
    }
}

/// The page-wide install: shared state plus the namespace object it was
/// published on.
struct Installed {
    shared: Rc<Shared>,
    namespace: JsValue,
}

thread_local! {
    static INSTALLED: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_config(config: JsValue) -> Result<BootstrapConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(BootstrapConfig::default())
    } else {
        let config: BootstrapConfig =
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?;
        config
            .validate()
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(config)
    }
}

/// A parsed bundle whose definitions become JS values on registration.
struct JsBundle(AnimationBundle);

impl AnimationModule<JsValue> for JsBundle {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn register_into(&self, registry: &mut AnimationRegistry<JsValue>) -> Result<usize, RegistryError> {
        // Convert everything first so a bad entry registers nothing.
        let mut entries = Vec::with_capacity(self.0.len());
        for (id, data) in self.0.entries() {
            let value = JSON::parse(&data.to_string())
                .map_err(|e| RegistryError::InvalidBundle(format!("'{id}': {e:?}")))?;
            entries.push((id.clone(), value));
        }
        let count = entries.len();
        registry.extend(entries);
        Ok(count)
    }
}

/// `window.jQuery`, when the page ships it.
fn jquery(window: &web_sys::Window) -> Option<Function> {
    Reflect::get(window, &JsValue::from_str("jQuery"))
        .ok()
        .and_then(|jq| jq.dyn_into::<Function>().ok())
}

/// `window.JSVEE`, if the widget library has been loaded.
fn jsvee_namespace(window: &web_sys::Window) -> Option<JsValue> {
    Reflect::get(window, &JsValue::from_str("JSVEE"))
        .ok()
        .filter(|ns| !jsvalue_is_undefined_or_null(ns))
}

fn run_pass(shared: &Shared) -> Result<BootstrapReport, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("bootstrap: no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("bootstrap: no document"))?;
    let ctor = jsvee_namespace(&window)
        .and_then(|ns| Reflect::get(&ns, &JsValue::from_str("ui")).ok())
        .unwrap_or(JsValue::UNDEFINED);

    let mut boot = shared
        .bootstrapper
        .try_borrow_mut()
        .map_err(|_| JsError::new("bootstrap: a pass is already running"))?;
    let registry = shared
        .registry
        .try_borrow()
        .map_err(|_| JsError::new("bootstrap: registry is busy"))?;

    let mut doc = DomDocument::query(&document, boot.config())
        .map_err(|e| JsError::new(&format!("bootstrap: query failed: {e:?}")))?;
    let mut factory = JsUiFactory::new(ctor, doc.elements().to_vec());
    Ok(boot.run(&mut doc, &*registry, &mut factory))
}

/// Attach the readiness handler to `document`. With jQuery on the page the
/// handler goes through `jQuery(document).on(...)`, which sees both
/// `.trigger()`ed and natively dispatched events; otherwise a native listener.
fn subscribe(
    shared: &Rc<Shared>,
    window: &web_sys::Window,
    document: &web_sys::Document,
) -> Result<(), JsError> {
    let event = shared.bootstrapper.borrow().config().ready_event.clone();
    let handler_shared = Rc::clone(shared);
    // jQuery passes its own event wrapper, so the argument stays untyped.
    let handler = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
        if let Err(e) = run_pass(&handler_shared) {
            web_sys::console::error_2(
                &JsValue::from_str("jsvee: bootstrap failed"),
                &JsValue::from(e),
            );
        }
    });
    let callback: &Function = handler.as_ref().unchecked_ref();

    match jquery(window) {
        Some(jq) => {
            let wrapped = jq
                .call1(&JsValue::UNDEFINED, document)
                .map_err(|e| JsError::new(&format!("subscribe error: jQuery(document): {e:?}")))?;
            let on: Function = Reflect::get(&wrapped, &JsValue::from_str("on"))
                .ok()
                .and_then(|f| f.dyn_into().ok())
                .ok_or_else(|| JsError::new("subscribe error: jQuery object has no .on"))?;
            on.call2(&wrapped, &JsValue::from_str(&event), callback)
                .map_err(|e| JsError::new(&format!("subscribe error: {e:?}")))?;
        }
        None => document
            .add_event_listener_with_callback(&event, callback)
            .map_err(|e| JsError::new(&format!("subscribe error: {e:?}")))?,
    }
    // Lives as long as the page.
    handler.forget();
    Ok(())
}

/// JS handle over the animation registry. Installed as `JSVEE.animations`.
#[wasm_bindgen]
pub struct JsveeAnimations {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl JsveeAnimations {
    /// Create a standalone registry that is not installed into `window.JSVEE`
    /// and not subscribed to the readiness event.
    /// Example:
    ///   new JsveeAnimations({ legacy_markers: [] })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsveeAnimations, JsError> {
        set_panic_hook();
        Ok(JsveeAnimations {
            shared: Shared::new(parse_config(config)?),
        })
    }

    /// Insert or overwrite the definition for `id`.
    pub fn register(&self, id: String, definition: JsValue) -> Result<(), JsError> {
        let id = AnimationId::new(id).map_err(|e| JsError::new(&format!("register: {e}")))?;
        let mut registry = self
            .shared
            .registry
            .try_borrow_mut()
            .map_err(|_| JsError::new("register: registry is busy"))?;
        registry.register(id, definition);
        Ok(())
    }

    /// Register every definition of a bundle: a JSON string, an object keyed
    /// by id, or an array of `{ name, data }`. Returns the number registered.
    #[wasm_bindgen(js_name = registerBundle)]
    pub fn register_bundle(&self, bundle: JsValue) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&bundle) {
            return Err(JsError::new("registerBundle: bundle is null/undefined"));
        }
        let text = match bundle.as_string() {
            Some(s) => s,
            None => JSON::stringify(&bundle)
                .map_err(|e| JsError::new(&format!("registerBundle stringify error: {e:?}")))?
                .as_string()
                .ok_or_else(|| JsError::new("registerBundle: stringify produced non-string"))?,
        };
        let bundle = AnimationBundle::from_json("bundle", &text)
            .map(JsBundle)
            .map_err(|e| JsError::new(&format!("registerBundle: {e}")))?;

        let mut registry = self
            .shared
            .registry
            .try_borrow_mut()
            .map_err(|_| JsError::new("registerBundle: registry is busy"))?;
        let count = bundle
            .register_into(&mut registry)
            .map_err(|e| JsError::new(&format!("registerBundle: {e}")))?;
        Ok(count as u32)
    }

    /// Definition registered under `id`, or `null`.
    #[wasm_bindgen(js_name = getAnimation)]
    pub fn get_animation(&self, id: &str) -> JsValue {
        self.shared
            .registry
            .try_borrow()
            .ok()
            .and_then(|r| r.get_animation(id).cloned())
            .unwrap_or(JsValue::NULL)
    }

    pub fn has(&self, id: &str) -> bool {
        self.shared
            .registry
            .try_borrow()
            .map(|r| r.contains(id))
            .unwrap_or(false)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Array {
        let out = Array::new();
        if let Ok(r) = self.shared.registry.try_borrow() {
            for id in r.ids() {
                out.push(&JsValue::from_str(id.as_str()));
            }
        }
        out
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> u32 {
        self.shared
            .registry
            .try_borrow()
            .map(|r| r.len() as u32)
            .unwrap_or(0)
    }

    /// "uninitialized" until the first pass has run, then "initialized".
    pub fn state(&self) -> String {
        let state = self
            .shared
            .bootstrapper
            .try_borrow()
            .map(|b| b.state())
            .unwrap_or(BootstrapState::Initialized);
        match state {
            BootstrapState::Uninitialized => "uninitialized".to_string(),
            BootstrapState::Initialized => "initialized".to_string(),
        }
    }

    /// Run one bootstrap pass over `window.document` now. Returns the pass
    /// report as a plain object.
    pub fn bootstrap(&self) -> Result<JsValue, JsError> {
        let report = run_pass(&self.shared)?;
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }
}

/// Install the registry as `window.JSVEE.animations` and subscribe the
/// bootstrapper to the readiness event.
///
/// Returns `undefined` and installs nothing when `window.JSVEE` is missing.
/// Installing again returns the existing registry and keeps the first
/// config; the readiness handler is only ever subscribed once. If
/// `window.JSVEE` has been replaced since, the registry is published on the
/// new namespace too.
#[wasm_bindgen]
pub fn install(config: JsValue) -> Result<Option<JsveeAnimations>, JsError> {
    set_panic_hook();

    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Some(namespace) = jsvee_namespace(&window) else {
        return Ok(None);
    };

    if let Some(shared) = reinstall(&namespace, config.clone())? {
        return Ok(Some(JsveeAnimations { shared }));
    }

    let document = window
        .document()
        .ok_or_else(|| JsError::new("install: no document"))?;
    let shared = Shared::new(parse_config(config)?);

    publish(&namespace, &shared)?;
    subscribe(&shared, &window, &document)?;

    INSTALLED.with(|slot| {
        *slot.borrow_mut() = Some(Installed {
            shared: Rc::clone(&shared),
            namespace,
        })
    });
    Ok(Some(JsveeAnimations { shared }))
}

/// Set `namespace.animations` to a handle over `shared`.
fn publish(namespace: &JsValue, shared: &Rc<Shared>) -> Result<(), JsError> {
    let exported = JsveeAnimations {
        shared: Rc::clone(shared),
    };
    Reflect::set(namespace, &JsValue::from_str("animations"), &JsValue::from(exported))
        .map_err(|e| JsError::new(&format!("install: cannot set JSVEE.animations: {e:?}")))?;
    Ok(())
}

/// Existing install, if any, refreshed against the current namespace.
fn reinstall(namespace: &JsValue, config: JsValue) -> Result<Option<Rc<Shared>>, JsError> {
    let Some((shared, previous)) = INSTALLED.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|i| (Rc::clone(&i.shared), i.namespace.clone()))
    }) else {
        return Ok(None);
    };

    if !jsvalue_is_undefined_or_null(&config) {
        let requested = parse_config(config)?;
        let differs = shared
            .bootstrapper
            .try_borrow()
            .map(|b| *b.config() != requested)
            .unwrap_or(true);
        if differs {
            web_sys::console::warn_1(&JsValue::from_str(
                "jsvee: already installed; the new config is ignored",
            ));
        }
    }

    if !Object::is(&previous, namespace) {
        publish(namespace, &shared)?;
        INSTALLED.with(|slot| {
            if let Some(installed) = slot.borrow_mut().as_mut() {
                installed.namespace = namespace.clone();
            }
        });
    }
    Ok(Some(shared))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
