//! Validation engine: pure rules deriving the `invalid_*` flags.
//!
//! Validation never raises — every outcome is a boolean flag written into the
//! model state for display purposes. [`determine_validation_state`] runs the
//! built-in required rule plus any caller-supplied rules in a stable order,
//! re-derives the aggregate `invalid`/`valid` pair and reports whether any
//! flag changed so callers can skip redundant downstream notifications.

use unicode_segmentation::UnicodeSegmentation;

use crate::consolidate::DefaultProperties;
use crate::model::{FieldKind, ModelState, Value};

/// The individual validity flags a rule can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFlag {
    Required,
    Minimum,
    Maximum,
    MinimumLength,
    MaximumLength,
    Pattern,
    InvertedPattern,
}

impl RuleFlag {
    fn read(&self, state: &ModelState) -> bool {
        match self {
            RuleFlag::Required => state.invalid_required,
            RuleFlag::Minimum => state.invalid_minimum,
            RuleFlag::Maximum => state.invalid_maximum,
            RuleFlag::MinimumLength => state.invalid_minimum_length,
            RuleFlag::MaximumLength => state.invalid_maximum_length,
            RuleFlag::Pattern => state.invalid_pattern,
            RuleFlag::InvertedPattern => state.invalid_inverted_pattern,
        }
    }

    fn write(&self, state: &mut ModelState, value: bool) {
        match self {
            RuleFlag::Required => state.invalid_required = value,
            RuleFlag::Minimum => state.invalid_minimum = value,
            RuleFlag::Maximum => state.invalid_maximum = value,
            RuleFlag::MinimumLength => state.invalid_minimum_length = value,
            RuleFlag::MaximumLength => state.invalid_maximum_length = value,
            RuleFlag::Pattern => state.invalid_pattern = value,
            RuleFlag::InvertedPattern => state.invalid_inverted_pattern = value,
        }
    }
}

/// A validation rule: reads the consolidated configuration, reports failure.
pub type Rule = fn(&DefaultProperties) -> bool;

/// Derive the validation flags for the given consolidated configuration.
///
/// The built-in required rule always runs first; `extra` rules follow in
/// slice order (an extra `Required` rule replaces the built-in). Flags are
/// written into `properties.model.state`; when any evaluated flag differs
/// from `previous`, `invalid` and `valid` are re-derived from all rule flags
/// and `true` is returned.
pub fn determine_validation_state(
    properties: &mut DefaultProperties,
    previous: &ModelState,
    extra: &[(RuleFlag, Rule)],
) -> bool {
    let mut rules: Vec<(RuleFlag, Rule)> = Vec::with_capacity(extra.len() + 1);
    if !extra.iter().any(|(flag, _)| *flag == RuleFlag::Required) {
        rules.push((RuleFlag::Required, invalid_required));
    }
    rules.extend_from_slice(extra);

    let mut changed = false;
    for (flag, rule) in &rules {
        let failed = rule(properties);
        changed = changed || flag.read(previous) != failed;
        flag.write(&mut properties.model.state, failed);
    }

    if changed {
        properties.model.state.refresh_aggregate();
    }

    changed
}

/// The built-in required rule.
///
/// A non-nullable field is invalid while empty: for non-boolean kinds that
/// means a falsy value other than the number zero, for booleans anything but
/// an actual boolean or the strings `"true"`/`"false"`.
pub fn invalid_required(properties: &DefaultProperties) -> bool {
    let model = &properties.model;
    if model.nullable {
        return false;
    }

    let value = model.value.as_ref();
    if model.kind == FieldKind::Boolean {
        let present = match value {
            Some(Value::Bool(_)) => true,
            Some(Value::Str(text)) => text == "true" || text == "false",
            _ => false,
        };
        return !present;
    }

    match value {
        None => true,
        Some(value) => {
            !value.truthy()
                && !matches!(value, Value::Int(0))
                && !matches!(value, Value::Float(number) if *number == 0.0)
        }
    }
}

/// The standard rule set for single-value inputs.
pub fn input_rules() -> &'static [(RuleFlag, Rule)] {
    &[
        (RuleFlag::Minimum, invalid_minimum),
        (RuleFlag::Maximum, invalid_maximum),
        (RuleFlag::MinimumLength, invalid_minimum_length),
        (RuleFlag::MaximumLength, invalid_maximum_length),
        (RuleFlag::Pattern, invalid_pattern),
        (RuleFlag::InvertedPattern, invalid_inverted_pattern),
    ]
}

fn numeric_value(properties: &DefaultProperties) -> Option<f64> {
    properties
        .model
        .value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|number| !number.is_nan())
}

fn string_value(properties: &DefaultProperties) -> Option<&str> {
    properties.model.value.as_ref().and_then(Value::as_str)
}

fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

fn invalid_minimum(properties: &DefaultProperties) -> bool {
    match numeric_value(properties) {
        Some(number) => number < properties.model.minimum,
        None => false,
    }
}

fn invalid_maximum(properties: &DefaultProperties) -> bool {
    if properties.model.maximum < 0.0 {
        // Negative maxima are treated as unset.
        return false;
    }
    match numeric_value(properties) {
        Some(number) => properties.model.maximum < number,
        None => false,
    }
}

fn invalid_minimum_length(properties: &DefaultProperties) -> bool {
    match string_value(properties) {
        Some(text) => grapheme_count(text) < properties.model.minimum_length,
        None => false,
    }
}

fn invalid_maximum_length(properties: &DefaultProperties) -> bool {
    match (string_value(properties), properties.model.maximum_length) {
        (Some(text), Some(maximum)) => grapheme_count(text) > maximum,
        _ => false,
    }
}

fn invalid_pattern(properties: &DefaultProperties) -> bool {
    match string_value(properties) {
        Some(text) => properties
            .model
            .pattern
            .iter()
            .any(|pattern| !pattern.is_match(text)),
        None => false,
    }
}

fn invalid_inverted_pattern(properties: &DefaultProperties) -> bool {
    match string_value(properties) {
        Some(text) => properties
            .model
            .inverted_pattern
            .iter()
            .any(|pattern| pattern.is_match(text)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Pattern};

    fn properties_with(model: Model) -> DefaultProperties {
        DefaultProperties {
            model,
            ..DefaultProperties::default()
        }
    }

    #[test]
    fn test_required_boolean_scenario() {
        let mut model = Model::of_kind(FieldKind::Boolean);
        model.nullable = false;
        model.value = None;
        let mut properties = properties_with(model);

        let previous = properties.model.state;
        let changed = determine_validation_state(&mut properties, &previous, &[]);

        assert!(changed);
        assert!(properties.model.state.invalid_required);
        assert!(properties.model.state.invalid);
        assert!(!properties.model.state.valid);
    }

    #[test]
    fn test_required_accepts_boolean_strings() {
        let mut model = Model::of_kind(FieldKind::Boolean);
        model.nullable = false;
        model.value = Some(Value::from("false"));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), &[]);
        assert!(!properties.model.state.invalid_required);
    }

    #[test]
    fn test_required_zero_is_present() {
        let mut model = Model::of_kind(FieldKind::Integer);
        model.nullable = false;
        model.value = Some(Value::Int(0));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(!properties.model.state.invalid_required);
        assert!(properties.model.state.valid);
    }

    #[test]
    fn test_minimum_and_maximum() {
        let mut model = Model::of_kind(FieldKind::Integer);
        model.minimum = 10.0;
        model.maximum = 20.0;
        model.value = Some(Value::Int(5));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(properties.model.state.invalid_minimum);
        assert!(!properties.model.state.invalid_maximum);

        properties.model.value = Some(Value::Int(25));
        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(!properties.model.state.invalid_minimum);
        assert!(properties.model.state.invalid_maximum);
    }

    #[test]
    fn test_length_rules_count_graphemes() {
        let mut model = Model::of_kind(FieldKind::String);
        model.minimum_length = 3;
        model.maximum_length = Some(4);
        // Four user-perceived characters even though more code points.
        model.value = Some(Value::from("a\u{0301}bcd"));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(!properties.model.state.invalid_minimum_length);
        assert!(!properties.model.state.invalid_maximum_length);

        properties.model.value = Some(Value::from("ab"));
        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(properties.model.state.invalid_minimum_length);
    }

    #[test]
    fn test_pattern_rules() {
        let mut model = Model::of_kind(FieldKind::String);
        model.pattern = vec![Pattern::new(r"^\d+$").unwrap()];
        model.inverted_pattern = vec![Pattern::new("forbidden").unwrap()];
        model.value = Some(Value::from("123"));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(!properties.model.state.invalid_pattern);
        assert!(!properties.model.state.invalid_inverted_pattern);

        properties.model.value = Some(Value::from("forbidden"));
        determine_validation_state(&mut properties, &ModelState::default(), input_rules());
        assert!(properties.model.state.invalid_pattern);
        assert!(properties.model.state.invalid_inverted_pattern);
    }

    #[test]
    fn test_invalid_is_or_of_all_flags() {
        let mut model = Model::of_kind(FieldKind::String);
        model.nullable = false;
        model.minimum_length = 5;
        model.value = Some(Value::from("abc"));
        let mut properties = properties_with(model);

        determine_validation_state(&mut properties, &ModelState::default(), input_rules());

        let state = properties.model.state;
        assert_eq!(state.invalid, state.any_rule_failed());
        assert_eq!(state.valid, !state.invalid);
        assert!(state.invalid_minimum_length);
        assert!(!state.invalid_required);
    }

    #[test]
    fn test_change_detection() {
        let mut model = Model::of_kind(FieldKind::Integer);
        model.minimum = 10.0;
        model.value = Some(Value::Int(5));
        let mut properties = properties_with(model);

        let previous = properties.model.state;
        assert!(determine_validation_state(
            &mut properties,
            &previous,
            input_rules()
        ));

        // A second run against the already-derived state reports no change.
        let previous = properties.model.state;
        assert!(!determine_validation_state(
            &mut properties,
            &previous,
            input_rules()
        ));
    }

    #[test]
    fn test_extra_required_rule_replaces_builtin() {
        fn always_missing(_: &DefaultProperties) -> bool {
            true
        }

        let model = Model::of_kind(FieldKind::String);
        let mut properties = properties_with(model);

        determine_validation_state(
            &mut properties,
            &ModelState::default(),
            &[(RuleFlag::Required, always_missing)],
        );
        assert!(properties.model.state.invalid_required);
    }
}
