//! End-to-end scenarios across the consolidation engine and the widget
//! shells.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_fieldset::prelude::*;

fn utc_registry() -> TransformerRegistry {
    TransformerRegistry::new(TransformConfig {
        zone: TimeZoneSpec::Utc,
        ..TransformConfig::default()
    })
}

/// The validity invariant must hold in every reachable model state.
fn assert_state_invariants(state: &ModelState) {
    assert_eq!(state.invalid, state.any_rule_failed());
    assert_eq!(state.valid, !state.invalid);
    assert_eq!(state.pristine, !state.dirty);
    assert_eq!(state.untouched, !state.touched);
}

#[test]
fn validity_invariant_holds_through_an_editing_session() {
    let mut input = TextInput::with_registry(utc_registry());
    input.set_props(Props {
        kind: Some(FieldKind::Integer),
        minimum: Some(10.0),
        maximum: Some(99.0),
        required: Some(true),
        ..Props::default()
    });

    assert_state_invariants(&input.sync().unwrap().state);
    assert_state_invariants(&input.handle_focus().unwrap().state);
    assert_state_invariants(&input.handle_input("4").unwrap().state);
    assert_state_invariants(&input.handle_input("42").unwrap().state);
    assert_state_invariants(&input.handle_input("423").unwrap().state);
    assert_state_invariants(&input.handle_blur().unwrap().state);
    assert_state_invariants(&input.sync().unwrap().state);
}

#[test]
fn number_field_lifecycle() {
    let mut input = TextInput::with_registry(utc_registry());
    input.set_props(Props {
        name: Some("amount".to_string()),
        kind: Some(FieldKind::Integer),
        minimum: Some(0.0),
        ..Props::default()
    });

    // Stray minus key is recovered, not rejected.
    input.handle_focus().unwrap();
    let properties = input.handle_input("-12").unwrap();
    assert_eq!(properties.value, Value::Int(12));

    // Blur formats the final representation.
    input.handle_input("1234").unwrap();
    let properties = input.handle_blur().unwrap();
    assert_eq!(properties.representation, "1,234");
    assert!(properties.state.visited);
    assert!(properties.state.dirty);
}

#[test]
fn date_field_accepts_wall_clock_and_round_trips() {
    let mut input = TextInput::with_registry(utc_registry());
    input.set_props(Props::new().with_kind(FieldKind::DateTime));

    let properties = input.handle_input("1970-01-02T00:00").unwrap();
    assert_eq!(properties.value, Value::Float(86_400.0));

    let properties = input.handle_blur().unwrap();
    assert_eq!(properties.representation, "1970-01-02T00:00:00");
}

#[test]
fn controlled_widget_follows_host_state_round_trip() {
    // A host that actually round-trips state: the reported value is fed
    // back as the next configuration.
    let reported: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    let mut input = TextInput::with_registry(utc_registry());
    let reported_clone = reported.clone();
    input.value_changed.connect(move |(value, _)| {
        *reported_clone.lock() = Some(value.clone());
    });
    input.set_props(Props::new().with_value("initial"));
    input.sync().unwrap();
    assert!(input.control_mode().controlled);

    input.handle_input("edited").unwrap();
    let adopted = reported.lock().clone().expect("change must be reported");
    assert_eq!(adopted, Value::from("edited"));

    // The host adopts the reported value.
    input.set_props(Props::new().with_value(adopted));
    let properties = input.sync().unwrap();
    assert_eq!(properties.value, Value::from("edited"));
}

#[test]
fn suggestion_results_resolve_values_and_respect_cancellation() {
    let issued: Arc<Mutex<Vec<CancellationToken>>> = Arc::new(Mutex::new(Vec::new()));
    let issued_clone = issued.clone();

    let mut input = TextInput::with_registry(utc_registry());
    let mut props = Props::new();
    props.search_selection = true;
    props.suggestion_creator = Some(Arc::new(move |query: SuggestionQuery<'_>| {
        issued_clone.lock().push(query.token.clone());
        Suggestions::Pending
    }));
    input.set_props(props);
    input.sync().unwrap();

    input.handle_input("ber").unwrap();
    assert!(input.is_suggestion_pending());

    let token = issued.lock()[0].clone();
    let committed = input
        .commit_suggestions(
            &token,
            SelectionSpec::Pairs(vec![
                (Value::from("DE-BE"), "Berlin".to_string()),
                (Value::from("CH-BE"), "Bern".to_string()),
            ]),
        )
        .unwrap()
        .expect("delivery for the live token must commit");

    // Free text does not resolve against a search selection.
    assert_eq!(committed.value, Value::Null);

    // Choosing a suggestion commits its value.
    let properties = input.select_suggestion(0).unwrap().unwrap();
    assert_eq!(properties.value, Value::from("DE-BE"));
    assert_eq!(properties.representation, "Berlin");
}

#[test]
fn interval_aggregates_and_clamps() {
    let shared = Props::new().with_kind(FieldKind::Number).with_name("window");
    let mut interval = Interval::with_props(shared, Props::default(), Props::default());
    interval.sync().unwrap();

    interval.start_mut().handle_input("10").unwrap();
    interval.sync().unwrap();
    interval.end_mut().handle_input("5").unwrap();
    let properties = interval.sync().unwrap();

    assert_eq!(properties.value.start, Value::Int(5));
    assert_eq!(properties.value.end, Value::Int(5));
    assert!(properties.state.dirty);
    assert_eq!(properties.name, "window");
}

#[test]
fn input_list_settles_before_reporting() {
    let mut list: InputList = InputList::new(ListProps {
        name: Some("tags".to_string()),
        minimum_number: 1,
        maximum_number: 3,
        item_defaults: Props::new().with_kind(FieldKind::String),
        ..ListProps::default()
    })
    .unwrap();

    let reports = Arc::new(Mutex::new(Vec::new()));
    let reports_clone = reports.clone();
    list.changed.connect(move |properties| {
        reports_clone.lock().push(properties.items.len());
    });

    let properties = list.sync().unwrap();
    assert!(properties.state.invalid_minimum_number);
    assert!(reports.lock().is_empty());

    list.add_item();
    list.sync().unwrap();
    assert!(reports.lock().is_empty());
    let properties = list.sync().unwrap();

    // The aggregate change fires only once the new item consolidated.
    assert_eq!(reports.lock().as_slice(), &[1]);
    assert!(!properties.state.invalid_minimum_number);
    assert!(properties.state.state.valid);
}

#[test]
fn checkbox_required_scenario() {
    let mut checkbox = Checkbox::new();
    checkbox.set_props(Props::new().with_required());

    let properties = checkbox.sync().unwrap();
    assert!(properties.state.invalid_required);
    assert!(!properties.state.valid);

    let properties = checkbox.handle_click().unwrap();
    assert!(properties.state.touched);
    let properties = checkbox.sync().unwrap();
    assert!(properties.state.valid);
    assert_eq!(properties.value, Value::Bool(true));
}

#[test]
fn invalid_message_renders_against_properties() {
    let mut input = TextInput::with_registry(utc_registry());
    input.set_props(Props {
        kind: Some(FieldKind::Integer),
        minimum: Some(18.0),
        ..Props::default()
    });
    input.handle_input("7").unwrap();
    let properties = input.sync().unwrap();

    assert!(properties.state.invalid_minimum);
    assert_eq!(
        properties.invalid_message().as_deref(),
        Some("Your number has to be at least 18.")
    );
}
