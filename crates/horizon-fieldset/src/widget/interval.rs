//! The paired range input widget.
//!
//! `Interval` composes two number-kind [`TextInput`]s — a start and an end —
//! into one field. Shared configuration is forwarded to both sides, the
//! bounds are cross-linked (the start must not exceed the end and vice
//! versa) and the two model states aggregate into one: failure and
//! interaction flags combine with OR, their complements with AND.

use horizon_fieldset_core::Signal;

use crate::consolidate::{Properties, Props};
use crate::error::Result;
use crate::model::{FieldKind, ModelState, Value};

use super::TextInput;

/// The paired value of an interval.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntervalValue {
    pub start: Value,
    pub end: Value,
}

/// The consolidated external view of an interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalProperties {
    /// Field name of the composite.
    pub name: String,
    /// Fully consolidated start side.
    pub start: Properties,
    /// Fully consolidated end side.
    pub end: Properties,
    /// Aggregated model state of both sides.
    pub state: ModelState,
    /// The paired typed value.
    pub value: IntervalValue,
}

/// A headless paired range input.
///
/// # Signals
///
/// - `changed(IntervalProperties)`: either side changed
/// - `value_changed((IntervalValue, IntervalProperties))`: the pair changed
/// - `state_changed((ModelState, IntervalProperties))`: the aggregate state changed
pub struct Interval {
    shared: Props,
    start: TextInput,
    end: TextInput,
    last_value: IntervalValue,
    last_state: ModelState,
    synced_once: bool,

    /// Emitted whenever either side's consolidated properties changed.
    pub changed: Signal<IntervalProperties>,
    /// Emitted when the paired value changed.
    pub value_changed: Signal<(IntervalValue, IntervalProperties)>,
    /// Emitted when the aggregated model state changed.
    pub state_changed: Signal<(ModelState, IntervalProperties)>,
}

impl Default for Interval {
    fn default() -> Self {
        Self::new()
    }
}

impl Interval {
    /// Create an interval with default configuration.
    pub fn new() -> Self {
        Self::with_props(Props::default(), Props::default(), Props::default())
    }

    /// Create an interval from shared and per-side configuration.
    ///
    /// `shared` is forwarded to both sides (without its name and value);
    /// `start`/`end` carry side-specific overrides.
    pub fn with_props(shared: Props, start: Props, end: Props) -> Self {
        let mut interval = Self {
            shared: Props::default(),
            start: TextInput::new(),
            end: TextInput::new(),
            last_value: IntervalValue::default(),
            last_state: ModelState::default(),
            synced_once: false,

            changed: Signal::new(),
            value_changed: Signal::new(),
            state_changed: Signal::new(),
        };
        interval.set_props(shared, start, end);
        interval
    }

    /// Supply new shared and per-side configuration.
    pub fn set_props(&mut self, shared: Props, start: Props, end: Props) {
        self.start.set_props(merge_forwarded(&shared, start, "start"));
        self.end.set_props(merge_forwarded(&shared, end, "end"));
        self.shared = shared;
    }

    /// The start side.
    pub fn start(&self) -> &TextInput {
        &self.start
    }

    /// The start side, for event dispatch.
    pub fn start_mut(&mut self) -> &mut TextInput {
        &mut self.start
    }

    /// The end side.
    pub fn end(&self) -> &TextInput {
        &self.end
    }

    /// The end side, for event dispatch.
    pub fn end_mut(&mut self) -> &mut TextInput {
        &mut self.end
    }

    /// Run one synchronization pass over both sides.
    ///
    /// Cross-links the bounds, clamps the side the user did not just edit
    /// and aggregates both model states. Emits `changed`/`value_changed`/
    /// `state_changed` when the composite view moved since the last pass.
    pub fn sync(&mut self) -> Result<IntervalProperties> {
        let start_properties = self.start.sync()?;
        let end_properties = self.end.sync()?;

        let value = IntervalValue {
            start: start_properties.value.clone(),
            end: end_properties.value.clone(),
        };

        // Clamp the opposite side when one side crossed the other.
        let (start_number, end_number) = (value.start.as_f64(), value.end.as_f64());
        if let (Some(start_number), Some(end_number)) = (start_number, end_number) {
            if start_number > end_number {
                if value.start != self.last_value.start {
                    // The start moved past the end: drag the end along.
                    self.end.handle_change_value(value.start.clone())?;
                } else {
                    // The end moved below the start: pull the start down.
                    self.start.handle_change_value(value.end.clone())?;
                }
            }
        }

        // Re-link the bounds so each side's own validation reflects the
        // other side's current value.
        let mut start_props = self.start.props().clone();
        let mut end_props = self.end.props().clone();
        let configured_start_maximum = self.shared.maximum.unwrap_or(f64::INFINITY);
        let configured_end_minimum = self.shared.minimum.unwrap_or(f64::NEG_INFINITY);
        if let Some(end_number) = self.end.properties().and_then(|p| p.value.as_f64()) {
            start_props.maximum = Some(configured_start_maximum.min(end_number));
        }
        if let Some(start_number) = self.start.properties().and_then(|p| p.value.as_f64()) {
            end_props.minimum = Some(configured_end_minimum.max(start_number));
        }
        self.start.set_props(start_props);
        self.end.set_props(end_props);

        let start_properties = self.start.sync()?;
        let end_properties = self.end.sync()?;
        let value = IntervalValue {
            start: start_properties.value.clone(),
            end: end_properties.value.clone(),
        };
        let state = ModelState::aggregate([&start_properties.state, &end_properties.state]);

        let properties = IntervalProperties {
            name: self
                .shared
                .name
                .clone()
                .unwrap_or_else(|| "NO_NAME_DEFINED".to_string()),
            start: start_properties,
            end: end_properties,
            state,
            value: value.clone(),
        };

        let value_moved = self.synced_once && value != self.last_value;
        let state_moved = self.synced_once && state != self.last_state;
        if value_moved || state_moved {
            self.changed.emit(properties.clone());
        }
        if value_moved {
            self.value_changed.emit((value.clone(), properties.clone()));
        }
        if state_moved {
            self.state_changed.emit((state, properties.clone()));
        }

        self.synced_once = true;
        self.last_value = value;
        self.last_state = state;
        Ok(properties)
    }

    /// Release resources when the host removes the widget.
    pub fn unmount(&mut self) {
        self.start.unmount();
        self.end.unmount();
        self.changed.disconnect_all();
        self.value_changed.disconnect_all();
        self.state_changed.disconnect_all();
    }
}

/// Forward shared configuration to one side, keeping side-specific
/// overrides and excluding the composite-level fields.
fn merge_forwarded(shared: &Props, mut side: Props, suffix: &str) -> Props {
    if side.kind.is_none() {
        side.kind = Some(shared.kind.unwrap_or(FieldKind::Number));
    }
    if side.name.is_none() {
        let base = shared.name.as_deref().unwrap_or("interval");
        side.name = Some(format!("{base}-{suffix}"));
    }
    if side.minimum.is_none() {
        side.minimum = shared.minimum;
    }
    if side.maximum.is_none() {
        side.maximum = shared.maximum;
    }
    if side.step.is_none() {
        side.step = shared.step;
    }
    if side.required.is_none() {
        side.required = shared.required;
    }
    if side.disabled.is_none() {
        side.disabled = shared.disabled;
    }
    if side.declaration.is_none() {
        side.declaration = shared.declaration.clone();
    }
    if side.description.is_none() {
        side.description = shared.description.clone();
    }
    side.enforce_uncontrolled = side.enforce_uncontrolled || shared.enforce_uncontrolled;
    side.trigger_initial_properties_consolidation = side
        .trigger_initial_properties_consolidation
        || shared.trigger_initial_properties_consolidation;
    side
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interval")
            .field("last_value", &self.last_value)
            .field("last_state", &self.last_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKind;

    fn number_interval() -> Interval {
        let shared = Props::new().with_kind(FieldKind::Number).with_name("range");
        Interval::with_props(shared, Props::default(), Props::default())
    }

    #[test]
    fn test_sides_receive_forwarded_configuration() {
        let mut interval = number_interval();
        let properties = interval.sync().unwrap();
        assert_eq!(properties.start.name, "range-start");
        assert_eq!(properties.end.name, "range-end");
        assert_eq!(properties.start.kind, FieldKind::Number);
    }

    #[test]
    fn test_state_aggregation() {
        let mut interval = number_interval();
        interval.sync().unwrap();

        interval.start_mut().handle_focus().unwrap();
        let properties = interval.sync().unwrap();

        // One focused side focuses the aggregate, but only both pristine
        // sides keep it pristine.
        assert!(properties.state.focused);
        assert!(properties.state.touched);
        assert!(properties.state.pristine);

        interval.start_mut().handle_input("3").unwrap();
        let properties = interval.sync().unwrap();
        assert!(properties.state.dirty);
        assert!(!properties.state.pristine);
    }

    #[test]
    fn test_cross_clamping_end_below_start() {
        let mut interval = number_interval();
        interval.sync().unwrap();

        interval.start_mut().handle_input("5").unwrap();
        interval.sync().unwrap();
        interval.end_mut().handle_input("3").unwrap();
        let properties = interval.sync().unwrap();

        // Editing the end below the start pulls the start down.
        assert_eq!(properties.start.value, Value::Int(3));
        assert_eq!(properties.end.value, Value::Int(3));
    }

    #[test]
    fn test_cross_clamping_start_above_end() {
        let mut interval = number_interval();
        interval.sync().unwrap();

        interval.end_mut().handle_input("4").unwrap();
        interval.sync().unwrap();
        interval.start_mut().handle_input("9").unwrap();
        let properties = interval.sync().unwrap();

        // Editing the start past the end drags the end along.
        assert_eq!(properties.start.value, Value::Int(9));
        assert_eq!(properties.end.value, Value::Int(9));
    }

    #[test]
    fn test_bounds_are_cross_linked() {
        let mut interval = number_interval();
        interval.sync().unwrap();

        interval.end_mut().handle_input("10").unwrap();
        interval.sync().unwrap();

        // The start side's effective maximum now follows the end value.
        let start_properties = interval.start().properties().unwrap();
        assert_eq!(start_properties.maximum, 10.0);
    }

    #[test]
    fn test_value_changed_fires_on_edit() {
        let mut interval = number_interval();
        interval.sync().unwrap();

        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        interval.value_changed.connect(move |(value, _)| {
            seen_clone.lock().push(value.clone());
        });

        interval.start_mut().handle_input("2").unwrap();
        interval.sync().unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].start, Value::Int(2));
    }
}
