//! Controlled/uncontrolled reconciliation.
//!
//! Per synchronization pass a widget decides whether the host or the widget
//! itself owns the authoritative value state:
//!
//! - **Uncontrolled** — the widget keeps a [`ValueState`] between passes and
//!   rewrites it whenever the freshly consolidated value, representation or
//!   model state differs.
//! - **Controlled** — the host is the source of truth for value and
//!   representation; those are intentionally *not* mirrored into internal
//!   state. Model-state changes still propagate so dependent display (error
//!   messages) updates.
//!
//! Control-mode detection follows the observed contract exactly: a widget is
//! controlled iff a value was explicitly supplied (flat or nested) *and* at
//! least one change callback is connected *and* uncontrolled mode is not
//! forced. Note the foot-gun this preserves: a host supplying a static value
//! plus a callback without ever round-tripping state leaves the widget inert
//! — user edits are reported but never adopted.

use crate::consolidate::Props;
use crate::model::{ModelState, StateOverrides, Value};

/// The minimal state an uncontrolled widget keeps between passes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueState {
    /// The typed value.
    pub value: Value,
    /// The editable string shown to the user; `None` until first derived.
    pub representation: Option<String>,
    /// Interaction/validity flags.
    pub model_state: ModelState,
}

/// The per-pass control decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlMode {
    /// The host owns the value.
    pub controlled: bool,
    /// The host additionally owns the representation string.
    pub representation_controlled: bool,
}

/// Decide the control mode for this pass.
///
/// `change_slot_connected` reports whether any change callback is connected
/// (supplying a callback means connecting a slot).
pub fn determine_control_mode(props: &Props, change_slot_connected: bool) -> ControlMode {
    let controlled =
        !props.enforce_uncontrolled && props.value_supplied() && change_slot_connected;
    ControlMode {
        controlled,
        representation_controlled: controlled && props.representation.is_some(),
    }
}

/// Back-fill configuration gaps from internal state before consolidation.
///
/// Every property the caller did not explicitly supply is taken from the
/// previous pass: the value, the representation and the interaction flags.
/// One exception keeps representations honest: when the caller supplied a
/// *new* value (differing from internal state) the representation is left
/// unset on purpose, so consolidation recomputes it from the new value
/// instead of reusing a stale string.
pub fn derive_missing_properties_from_state(
    props: &mut Props,
    state: &ValueState,
    representation_controlled: bool,
) {
    // Project a nested model value to the flat field so the later logic has
    // one place to look.
    if props.value.is_none() {
        if let Some(value) = props.model.as_ref().and_then(|model| model.value.clone()) {
            props.value = Some(value);
        }
    }

    let supplied_value = props.value.clone();

    if props.representation.is_none() {
        props.representation = state.representation.clone();
    }

    if props.value.is_none() {
        props.value = Some(state.value.clone());
    }

    // Interaction flags persist across passes unless explicitly overridden.
    props.state = props.state.merged_over(&overrides_from_state(&state.model_state));

    if let Some(value) = supplied_value {
        if !representation_controlled && value != state.value {
            // A fresh external value invalidates the remembered string.
            props.representation = None;
        }
    }
}

fn overrides_from_state(state: &ModelState) -> StateOverrides {
    StateOverrides {
        dirty: Some(state.dirty),
        pristine: Some(state.pristine),
        touched: Some(state.touched),
        untouched: Some(state.untouched),
        focused: Some(state.focused),
        visited: Some(state.visited),
        invalid: Some(state.invalid),
        valid: Some(state.valid),
        invalid_required: Some(state.invalid_required),
    }
}

/// Whether the freshly consolidated state warrants a state write.
///
/// Uncontrolled widgets commit on any difference. Controlled widgets commit
/// only when the model state differs — host-driven value/representation
/// changes are not mirrored, validity changes are.
pub fn should_commit(mode: ControlMode, current: &ValueState, next: &ValueState) -> bool {
    if mode.controlled {
        return next.model_state != current.model_state;
    }
    next.value != current.value
        || next.representation != current.representation
        || next.model_state != current.model_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::ModelProps;

    #[test]
    fn test_control_mode_requires_value_and_callback() {
        let props = Props::new().with_value("given");

        // Value alone is not enough.
        assert!(!determine_control_mode(&props, false).controlled);
        // Value plus connected callback is.
        assert!(determine_control_mode(&props, true).controlled);
        // Callback alone is not.
        assert!(!determine_control_mode(&Props::default(), true).controlled);
    }

    #[test]
    fn test_nested_model_value_counts_as_supplied() {
        let props = Props {
            model: Some(ModelProps {
                value: Some(Value::from("nested")),
                ..ModelProps::default()
            }),
            ..Props::default()
        };
        assert!(determine_control_mode(&props, true).controlled);
    }

    #[test]
    fn test_enforce_uncontrolled_wins() {
        let mut props = Props::new().with_value("given");
        props.enforce_uncontrolled = true;
        assert!(!determine_control_mode(&props, true).controlled);
    }

    #[test]
    fn test_representation_control_needs_explicit_representation() {
        let mut props = Props::new().with_value("given");
        assert!(!determine_control_mode(&props, true).representation_controlled);

        props.representation = Some("shown".to_string());
        assert!(determine_control_mode(&props, true).representation_controlled);
    }

    #[test]
    fn test_backfill_from_state() {
        let mut props = Props::default();
        let mut state = ValueState::default();
        state.value = Value::from("remembered");
        state.representation = Some("remembered".to_string());
        state.model_state.touched = true;
        state.model_state.untouched = false;

        derive_missing_properties_from_state(&mut props, &state, false);

        assert_eq!(props.value, Some(Value::from("remembered")));
        assert_eq!(props.representation, Some("remembered".to_string()));
        assert_eq!(props.state.touched, Some(true));
    }

    #[test]
    fn test_fresh_value_resets_representation() {
        let mut props = Props::new().with_value("new");
        let mut state = ValueState::default();
        state.value = Value::from("old");
        state.representation = Some("old".to_string());

        derive_missing_properties_from_state(&mut props, &state, false);

        // The stale string must not survive a new external value.
        assert_eq!(props.representation, None);
    }

    #[test]
    fn test_same_value_keeps_representation() {
        let mut props = Props::new().with_value("same");
        let mut state = ValueState::default();
        state.value = Value::from("same");
        state.representation = Some("same ".to_string());

        derive_missing_properties_from_state(&mut props, &state, false);

        assert_eq!(props.representation, Some("same ".to_string()));
    }

    #[test]
    fn test_controlled_representation_survives_fresh_value() {
        let mut props = Props::new().with_value("new");
        props.representation = Some("host owned".to_string());
        let mut state = ValueState::default();
        state.value = Value::from("old");

        derive_missing_properties_from_state(&mut props, &state, true);

        assert_eq!(props.representation, Some("host owned".to_string()));
    }

    #[test]
    fn test_commit_rules() {
        let current = ValueState {
            value: Value::from("a"),
            representation: Some("a".to_string()),
            model_state: ModelState::default(),
        };

        let mut value_changed = current.clone();
        value_changed.value = Value::from("b");

        let mut state_changed = current.clone();
        state_changed.model_state.dirty = true;

        let uncontrolled = ControlMode::default();
        let controlled = ControlMode {
            controlled: true,
            representation_controlled: false,
        };

        assert!(should_commit(uncontrolled, &current, &value_changed));
        assert!(should_commit(uncontrolled, &current, &state_changed));
        assert!(!should_commit(uncontrolled, &current, &current.clone()));

        // Controlled: value changes are not mirrored, state changes are.
        assert!(!should_commit(controlled, &current, &value_changed));
        assert!(should_commit(controlled, &current, &state_changed));
    }
}
