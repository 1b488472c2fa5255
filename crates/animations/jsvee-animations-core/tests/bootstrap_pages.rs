use jsvee_animations_core::{
    load_modules, AnimationBundle, AnimationId, AnimationRegistry, AnimationRuntime,
    BootstrapConfig, BootstrapState, ComponentError, DocumentSnapshot, ElementHandle,
    RebindPolicy,
};
use serde_json::Value as JsonValue;

const READY: &str = "aplus:translation-ready";

/// Stand-in for the UI component: remembers what it was built with and what
/// the registry returned for its id at construction time.
#[derive(Default)]
struct Recorder {
    built: Vec<(ElementHandle, String, Option<JsonValue>)>,
}

impl jsvee_animations_core::ComponentFactory<JsonValue> for Recorder {
    fn construct(
        &mut self,
        id: &AnimationId,
        element: ElementHandle,
        registry: &AnimationRegistry<JsonValue>,
    ) -> Result<(), ComponentError> {
        let definition = registry.get_animation(id.as_str()).cloned();
        self.built.push((element, id.to_string(), definition));
        Ok(())
    }
}

fn runtime_with(config: BootstrapConfig) -> AnimationRuntime<JsonValue> {
    let json = jsvee_test_fixtures::animations::json("sorting-bundle").expect("sorting bundle");
    let bundle = AnimationBundle::from_json("sorting", &json).expect("parse sorting bundle");
    let mut rt = AnimationRuntime::new(config);
    load_modules(Some(&mut rt), &[&bundle]).expect("load sorting bundle");
    rt.subscribe();
    rt
}

fn page(name: &str) -> DocumentSnapshot {
    jsvee_test_fixtures::documents::load(name).expect("load document fixture")
}

#[test]
fn swap_scenario_constructs_one_component_with_its_definition() {
    let mut rt = runtime_with(BootstrapConfig::default());
    let mut doc = page("swap-single");
    let mut ui = Recorder::default();

    let report = rt.dispatch(READY, &mut doc, &mut ui).expect("ready handler runs");

    assert_eq!(report.constructed_count(), 1);
    assert_eq!(ui.built.len(), 1);
    let (element, id, definition) = &ui.built[0];
    assert_eq!(*element, ElementHandle(1));
    assert_eq!(id, "swap");
    let definition = definition.as_ref().expect("swap is registered");
    assert_eq!(definition["title"], "Swapping two variables");

    let host = doc.get(ElementHandle(1)).unwrap();
    assert!(host.has_class("jsvee-animation"));
    assert!(host.has_class("animation"));
}

#[test]
fn only_hosts_with_an_id_are_constructed() {
    let mut rt = runtime_with(BootstrapConfig::default());
    let mut doc = page("mixed-hosts");
    let mut ui = Recorder::default();

    let report = rt.dispatch(READY, &mut doc, &mut ui).unwrap();

    let pairs: Vec<(u32, &str)> = ui
        .built
        .iter()
        .map(|(el, id, _)| (el.0, id.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [(0, "swap"), (1, "bubble_sort"), (5, "swap"), (6, "not_loaded_yet")]
    );
    assert_eq!(report.missing_id, [ElementHandle(2), ElementHandle(3)]);
    assert_eq!(report.normalized, [ElementHandle(1), ElementHandle(3), ElementHandle(6)]);

    // Registered late or never: the component sees an absent definition.
    assert!(ui.built[3].2.is_none());

    // Non-host element is untouched.
    let other = doc.get(ElementHandle(4)).unwrap();
    assert_eq!(other.classes, ["content"]);
    assert_eq!(other.attribute("data-jsvee-bound"), None);
}

#[test]
fn marking_is_idempotent_across_passes() {
    let mut rt = runtime_with(BootstrapConfig::default());
    let mut doc = page("mixed-hosts");
    let mut ui = Recorder::default();

    rt.dispatch(READY, &mut doc, &mut ui).unwrap();
    let second = rt.dispatch(READY, &mut doc, &mut ui).unwrap();

    for el in &doc.elements {
        let primary = el.classes.iter().filter(|c| *c == "jsvee-animation").count();
        assert!(primary <= 1, "duplicate marker on {:?}", el.handle);
    }
    // Still discovered as hosts on the rescan.
    assert_eq!(second.already_bound.len(), 4);
    assert_eq!(second.missing_id.len(), 2);
    assert!(second.normalized.is_empty());
}

#[test]
fn second_ready_event_skips_bound_hosts_by_default() {
    let mut rt = runtime_with(BootstrapConfig::default());
    let mut doc = page("mixed-hosts");
    let mut ui = Recorder::default();

    let first = rt.dispatch(READY, &mut doc, &mut ui).unwrap();
    let second = rt.dispatch(READY, &mut doc, &mut ui).unwrap();

    assert_eq!(first.pass, 1);
    assert_eq!(second.pass, 2);
    assert_eq!(second.constructed_count(), 0);
    assert!(second.failures.is_empty());
    assert_eq!(ui.built.len(), 4);
    assert_eq!(rt.state(), BootstrapState::Initialized);
}

#[test]
fn reinitialize_policy_rebuilds_components() {
    let mut rt = runtime_with(BootstrapConfig {
        rebind: RebindPolicy::Reinitialize,
        ..Default::default()
    });
    let mut doc = page("mixed-hosts");
    let mut ui = Recorder::default();

    rt.dispatch(READY, &mut doc, &mut ui).unwrap();
    let second = rt.dispatch(READY, &mut doc, &mut ui).unwrap();

    assert_eq!(second.constructed_count(), 4);
    assert_eq!(ui.built.len(), 8);
}

#[test]
fn newly_added_hosts_are_picked_up_later() {
    let mut rt = runtime_with(BootstrapConfig::default());
    let mut doc = page("bound-page");
    let mut ui = Recorder::default();

    let report = rt.dispatch(READY, &mut doc, &mut ui).unwrap();
    assert_eq!(report.already_bound, [ElementHandle(0)]);
    assert_eq!(report.constructed, [(ElementHandle(1), AnimationId::new("queue").unwrap())]);

    doc.push_with("div", |e| e.with_class("animation").with_attribute("data-id", "bubble_sort"));
    let later = rt.dispatch(READY, &mut doc, &mut ui).unwrap();
    assert_eq!(later.constructed_count(), 1);
    assert_eq!(ui.built.last().map(|b| b.1.as_str()), Some("bubble_sort"));
}

#[test]
fn scan_plan_matches_what_the_pass_constructs() {
    let rt = runtime_with(BootstrapConfig::default());
    let doc = page("mixed-hosts");

    let plan = jsvee_animations_core::scan_hosts(&doc, rt.registry(), rt.config());
    let unregistered: Vec<&str> = plan.unregistered().into_iter().map(AnimationId::as_str).collect();
    assert_eq!(plan.bind_count(), 4);
    assert_eq!(unregistered, ["not_loaded_yet"]);
}
