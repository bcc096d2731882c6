//! Scenario tests for Select and Combobox
//!
//! Each test drives a component through the event sequence a host would
//! produce and checks what comes out: callbacks, rendered tree, effects.
//! Set `RUST_LOG=dropkit_core=trace` to see state transitions.

use std::sync::{Arc, Mutex};

use crate::prelude::*;
use dropkit_core::{ManualClock, PropChange, Side};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Changes = Arc<Mutex<Vec<SelectionValue>>>;

fn changes() -> (Changes, impl Fn(&SelectionValue) + Send + Sync + 'static) {
    let log: Changes = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    (log, move |v: &SelectionValue| sink.lock().unwrap().push(v.clone()))
}

fn one(v: &str) -> SelectionValue {
    SelectionValue::One(v.to_string())
}

#[test]
fn select_keyboard_commit() {
    init_tracing();
    let (log, on_change) = changes();
    let mut select = cn::select()
        .option("a", "Alpha")
        .option("b", "Beta")
        .option("c", "Gamma")
        .default_value("b")
        .on_change(on_change)
        .build();

    select.dispatch(DropdownEvent::FocusIn);
    select.dispatch(DropdownEvent::Tick(0));
    assert_eq!(select.dropdown().active_value(), Some("b"));

    select.dispatch(DropdownEvent::KeyDown(Key::Down, Modifiers::NONE));
    select.dispatch(DropdownEvent::KeyDown(Key::Enter, Modifiers::NONE));

    assert_eq!(*log.lock().unwrap(), vec![one("c")]);
    assert!(!select.is_open());
    assert_eq!(select.render().root.children[0].text.as_deref(), Some("Gamma"));
}

#[test]
fn combobox_filter_and_commit() {
    init_tracing();
    let (log, on_change) = changes();
    let mut combobox = cn::combobox()
        .option("a", "Alpha")
        .option("b", "Beta")
        .value("b")
        .query("")
        .on_change(on_change)
        .build();

    combobox.dispatch(DropdownEvent::Input("al".to_string()));
    assert_eq!(combobox.dropdown().visible_values(), vec!["a"]);
    assert_eq!(combobox.dropdown().active_value(), Some("a"));

    combobox.dispatch(DropdownEvent::KeyDown(Key::Enter, Modifiers::NONE));
    assert_eq!(*log.lock().unwrap(), vec![one("a")]);
    assert_eq!(combobox.query(), "");
    assert!(!combobox.is_open());

    // Host accepts both commits on its next render
    assert_eq!(combobox.dropdown_mut().set_value_prop("a"), PropChange::Echo);
    assert_eq!(combobox.dropdown_mut().set_query_prop(""), PropChange::Echo);
    assert_eq!(combobox.value(), one("a"));
}

#[test]
fn combobox_keeps_query_without_clear_on_select() {
    init_tracing();
    let mut combobox = cn::combobox()
        .option("a", "Alpha")
        .option("b", "Beta")
        .default_value("b")
        .clear_on_select(false)
        .build();

    combobox.dispatch(DropdownEvent::Input("al".to_string()));
    combobox.dispatch(DropdownEvent::KeyDown(Key::Enter, Modifiers::NONE));

    assert_eq!(combobox.value(), one("a"));
    assert_eq!(combobox.query(), "al");
}

#[test]
fn pointer_click_survives_blur() {
    init_tracing();
    let (log, on_change) = changes();
    let mut combobox = cn::combobox()
        .option("a", "Alpha")
        .option("b", "Beta")
        .on_change(on_change)
        .build();

    combobox.dispatch(DropdownEvent::Input("be".to_string()));

    // Platform order: pointer-down, blur, click, pointer-up
    let response = combobox.dispatch(DropdownEvent::OptionPointerDown("b".to_string()));
    assert!(response.is_handled());
    combobox.dispatch(DropdownEvent::Blur(FocusTarget::Outside));
    combobox.dispatch(DropdownEvent::OptionClick("b".to_string()));
    combobox.dispatch(DropdownEvent::PointerUp);

    assert_eq!(*log.lock().unwrap(), vec![one("b")]);
    assert_eq!(combobox.value(), one("b"));

    // The programmatic refocus after commit does not reopen
    assert!(combobox.take_effects().contains(&HostEffect::FocusTrigger));
    combobox.dispatch(DropdownEvent::FocusIn);
    assert!(!combobox.is_open());
}

#[test]
fn controlled_select_reverts_when_host_declines() {
    init_tracing();
    let (log, on_change) = changes();
    let mut select = cn::select()
        .option("a", "Alpha")
        .option("b", "Beta")
        .value("a")
        .on_change(on_change)
        .build();

    select.dispatch(DropdownEvent::FocusIn);
    select.dispatch(DropdownEvent::Tick(0));
    select.dispatch(DropdownEvent::OptionClick("b".to_string()));

    // Optimistic for one render
    assert_eq!(select.render().root.children[0].text.as_deref(), Some("Beta"));

    select.dispatch(DropdownEvent::ValueProp(one("a")));
    assert_eq!(select.render().root.children[0].text.as_deref(), Some("Alpha"));
    assert_eq!(log.lock().unwrap().len(), 1);

    // A host-driven change is silent
    select.dispatch(DropdownEvent::ValueProp(one("b")));
    assert_eq!(select.value(), one("b"));
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn multiple_select_form_mirror() {
    init_tracing();
    let mut tags = cn::select()
        .name("tags")
        .multiple(true)
        .option("news", "News")
        .option("events", "Events")
        .option("jobs", "Jobs")
        .default_value("news")
        .build();

    tags.dispatch(DropdownEvent::FocusIn);
    tags.dispatch(DropdownEvent::OptionClick("jobs".to_string()));
    assert!(tags.is_open());

    let rendered = tags.render();
    let hidden: Vec<&str> = rendered
        .root
        .children
        .iter()
        .filter(|n| n.get_attr("type") == Some("hidden"))
        .filter_map(|n| n.get_attr("value"))
        .collect();
    assert_eq!(hidden, vec!["news", "jobs"]);

    let overlay = rendered.overlay.expect("multiple select stays open");
    let listbox = overlay.find_by_role("listbox")[0];
    assert_eq!(listbox.get_attr("aria-multiselectable"), Some("true"));
    let selected: Vec<&str> = overlay
        .find_by_role("option")
        .into_iter()
        .filter(|n| n.get_attr("aria-selected") == Some("true"))
        .filter_map(|n| n.text.as_deref())
        .collect();
    assert_eq!(selected, vec!["News", "Jobs"]);
    assert_eq!(rendered.root.children[0].text.as_deref(), Some("News, Jobs"));
}

#[test]
fn panel_flips_above_near_viewport_bottom() {
    init_tracing();
    let mut select = cn::select()
        .option("a", "Alpha")
        .option("b", "Beta")
        .build();

    select.dispatch(DropdownEvent::Resize(Size::new(800.0, 600.0)));
    select.dispatch(DropdownEvent::AnchorBounds(Rect::new(100.0, 520.0, 200.0, 32.0)));
    select.dispatch(DropdownEvent::PanelHeight(200.0));
    select.dispatch(DropdownEvent::FocusIn);

    let placement = select.dropdown().placement().expect("placed on open");
    assert_eq!(placement.side, Side::Above);

    let overlay = select.render().overlay.expect("open");
    assert_eq!(overlay.get_style("bottom"), Some("84px"));
    assert_eq!(overlay.get_style("left"), Some("100px"));
    assert_eq!(overlay.get_style("width"), Some("200px"));

    // Scrolling leaves the panel where it is
    select.dispatch(DropdownEvent::AnchorBounds(Rect::new(100.0, 40.0, 200.0, 32.0)));
    assert_eq!(select.dispatch(DropdownEvent::Scroll), EventResponse::Ignored);
    assert_eq!(select.dropdown().placement(), Some(placement));
}

#[test]
fn outside_pointer_and_escape_dismiss() {
    init_tracing();
    let escapes = Arc::new(Mutex::new(0));
    let counter = escapes.clone();
    let mut select = cn::select()
        .option("a", "Alpha")
        .on_escape(move || *counter.lock().unwrap() += 1)
        .build();

    select.dispatch(DropdownEvent::FocusIn);
    assert_eq!(
        select.take_effects().as_slice(),
        &[HostEffect::AttachDocumentListeners]
    );
    select.dispatch(DropdownEvent::DocumentPointerDown(FocusTarget::Outside));
    assert!(!select.is_open());
    assert!(select
        .take_effects()
        .contains(&HostEffect::DetachDocumentListeners));

    select.dispatch(DropdownEvent::KeyDown(Key::Down, Modifiers::NONE));
    select.dispatch(DropdownEvent::DocumentKeyDown(Key::Escape));
    assert!(!select.is_open());
    assert_eq!(*escapes.lock().unwrap(), 1);
    assert!(select.take_effects().contains(&HostEffect::FocusTrigger));
}

#[test]
fn select_typeahead() {
    init_tracing();
    let mut select = cn::select()
        .option("ap", "Apple")
        .option("ab", "Apricot")
        .option("bn", "Banana")
        .clock(ManualClock::new())
        .build();

    select.dispatch(DropdownEvent::FocusIn);
    for c in ['a', 'p', 'r'] {
        select.dispatch(DropdownEvent::KeyDown(Key::Char(c), Modifiers::NONE));
    }
    assert_eq!(select.dropdown().active_value(), Some("ab"));

    select.dispatch(DropdownEvent::Tick(1_000));
    select.dispatch(DropdownEvent::KeyDown(Key::Char('b'), Modifiers::NONE));
    assert_eq!(select.dropdown().active_value(), Some("bn"));
}

#[test]
fn stale_query_cleared_after_blur() {
    init_tracing();
    let mut combobox = cn::combobox()
        .option("a", "Alpha")
        .option("b", "Beta")
        .clock(ManualClock::new())
        .build();

    combobox.dispatch(DropdownEvent::Input("alp".to_string()));
    combobox.dispatch(DropdownEvent::Blur(FocusTarget::Outside));
    assert_eq!(combobox.render().root.children[0].get_attr("value"), Some("alp"));

    combobox.dispatch(DropdownEvent::Tick(150));
    assert_eq!(combobox.query(), "");
    assert_eq!(combobox.render().root.children[0].get_attr("value"), Some(""));
}

#[test]
fn idle_host_keeps_typeahead_and_blur_windows() {
    init_tracing();
    let clock = ManualClock::new();
    let mut select = cn::select()
        .option("ap", "Apple")
        .option("ab", "Apricot")
        .clock(clock.clone())
        .build();

    select.dispatch(DropdownEvent::Tick(0));
    select.dispatch(DropdownEvent::FocusIn);
    select.dispatch(DropdownEvent::Tick(0));

    // Nothing ticks for ten seconds, then typing resumes
    clock.set(10_000);
    select.dispatch(DropdownEvent::KeyDown(Key::Char('a'), Modifiers::NONE));
    select.dispatch(DropdownEvent::Tick(10_016));
    select.dispatch(DropdownEvent::KeyDown(Key::Char('p'), Modifiers::NONE));
    select.dispatch(DropdownEvent::KeyDown(Key::Char('r'), Modifiers::NONE));
    assert_eq!(select.dropdown().active_value(), Some("ab"));

    let clock = ManualClock::new();
    let mut combobox = cn::combobox()
        .option("a", "Alpha")
        .clock(clock.clone())
        .build();
    combobox.dispatch(DropdownEvent::Tick(0));
    clock.set(5_000);
    combobox.dispatch(DropdownEvent::Input("al".to_string()));
    combobox.dispatch(DropdownEvent::Blur(FocusTarget::Outside));
    combobox.dispatch(DropdownEvent::Tick(5_016));
    assert_eq!(combobox.query(), "al");
    combobox.dispatch(DropdownEvent::Tick(5_150));
    assert_eq!(combobox.query(), "");
}

#[test]
fn config_file_drives_component() {
    init_tracing();
    let config = DropdownConfig::from_toml_str(
        r#"
        name = "country"
        placeholder = "Search countries..."

        [timing]
        blur_clear_delay_ms = 500
        "#,
    )
    .expect("valid config");

    let mut combobox = ComboboxBuilder::with_key("country")
        .config(config)
        .option("fr", "France")
        .clock(ManualClock::new())
        .build();

    let rendered = combobox.render();
    assert_eq!(
        rendered.root.children[0].get_attr("placeholder"),
        Some("Search countries...")
    );

    combobox.dispatch(DropdownEvent::Input("fr".to_string()));
    combobox.dispatch(DropdownEvent::Blur(FocusTarget::Outside));
    combobox.dispatch(DropdownEvent::Tick(150));
    assert_eq!(combobox.query(), "fr");
    combobox.dispatch(DropdownEvent::Tick(500));
    assert_eq!(combobox.query(), "");
}
