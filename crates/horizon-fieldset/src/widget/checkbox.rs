//! The requireable boolean checkbox widget.
//!
//! A reduced shell around the same consolidation engine as
//! [`TextInput`](super::TextInput): no representation editing and no
//! suggestions, but the full model/state merge, the boolean required rule
//! and controlled/uncontrolled reconciliation. A non-nullable checkbox is
//! invalid until the user actually decides — indeterminate is not a value.

use horizon_fieldset_core::Signal;

use crate::consolidate::{
    determine_initial_value, get_consolidated_properties, map_properties_into_model, Properties,
    Props,
};
use crate::error::Result;
use crate::model::{FieldKind, Model, ModelState, Value};
use crate::reconcile::{
    derive_missing_properties_from_state, determine_control_mode, should_commit, ControlMode,
    ValueState,
};
use crate::transform::TransformerRegistry;
use crate::validate::determine_validation_state;

use super::FieldWidget;

/// A headless boolean checkbox.
///
/// # Signals
///
/// - `changed(Properties)`: any consolidated property changed
/// - `value_changed((Value, Properties))`: the checked state changed
/// - `state_changed((ModelState, Properties))`: interaction/validity flags changed
/// - `focus_received` / `focus_lost` / `clicked` / `touch`: interaction events
pub struct Checkbox {
    props: Props,
    registry: TransformerRegistry,
    value_state: ValueState,
    initialized: bool,
    initial_consolidation_fired: bool,
    last_properties: Option<Properties>,

    /// Emitted whenever the consolidated properties changed.
    pub changed: Signal<Properties>,
    /// Emitted when the checked state changed.
    pub value_changed: Signal<(Value, Properties)>,
    /// Emitted when the model state changed.
    pub state_changed: Signal<(ModelState, Properties)>,
    /// Emitted when the widget gains focus.
    pub focus_received: Signal<Properties>,
    /// Emitted when the widget loses focus.
    pub focus_lost: Signal<Properties>,
    /// Emitted on click interactions.
    pub clicked: Signal<Properties>,
    /// Emitted on the first (and every further) interaction.
    pub touch: Signal<Properties>,
}

impl Default for Checkbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkbox {
    /// Create a checkbox with default configuration.
    pub fn new() -> Self {
        Self {
            props: Props::default(),
            registry: TransformerRegistry::default(),
            value_state: ValueState::default(),
            initialized: false,
            initial_consolidation_fired: false,
            last_properties: None,

            changed: Signal::new(),
            value_changed: Signal::new(),
            state_changed: Signal::new(),
            focus_received: Signal::new(),
            focus_lost: Signal::new(),
            clicked: Signal::new(),
            touch: Signal::new(),
        }
    }

    /// Create a checkbox from external configuration.
    pub fn with_props(props: Props) -> Self {
        let mut widget = Self::new();
        widget.set_props(props);
        widget
    }

    /// Supply new external configuration.
    pub fn set_props(&mut self, props: Props) {
        self.props = props;
        self.last_properties = None;
    }

    /// The current external configuration.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// The last consolidated properties, if a pass ran already.
    pub fn properties(&self) -> Option<&Properties> {
        self.last_properties.as_ref()
    }

    /// The per-pass control decision.
    pub fn control_mode(&self) -> ControlMode {
        let change_slot_connected =
            self.changed.has_connections() || self.value_changed.has_connections();
        determine_control_mode(&self.props, change_slot_connected)
    }

    /// Whether the checkbox is currently checked.
    pub fn is_checked(&self) -> bool {
        self.value_state.value.as_bool().unwrap_or(false)
    }

    /// Run one synchronization pass and return the consolidated properties.
    pub fn sync(&mut self) -> Result<Properties> {
        self.ensure_initialized();
        let mode = self.control_mode();

        let mut working = self.props.clone();
        derive_missing_properties_from_state(
            &mut working,
            &self.value_state,
            mode.representation_controlled,
        );

        let properties = self.consolidate(&working)?;

        let next = ValueState {
            value: properties.value.clone(),
            representation: Some(properties.representation.clone()),
            model_state: properties.state,
        };
        if should_commit(mode, &self.value_state, &next) {
            self.value_state = next;
        }

        if self.props.trigger_initial_properties_consolidation && !self.initial_consolidation_fired
        {
            self.initial_consolidation_fired = true;
            self.changed.emit(properties.clone());
        }

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    /// Release resources when the host removes the widget.
    pub fn unmount(&mut self) {
        self.changed.disconnect_all();
        self.value_changed.disconnect_all();
        self.state_changed.disconnect_all();
        self.focus_received.disconnect_all();
        self.focus_lost.disconnect_all();
        self.clicked.disconnect_all();
        self.touch.disconnect_all();
    }

    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.value_state = ValueState {
            value: determine_initial_value(&self.props, None, None),
            representation: None,
            model_state: ModelState::default(),
        };
    }

    fn consolidate(&self, working: &Props) -> Result<Properties> {
        let mut properties =
            map_properties_into_model(working, &Model::of_kind(FieldKind::Boolean))?;

        if let Some(raw) = properties.model.value.take() {
            let parsed = {
                let model = &properties.model;
                self.registry.parse_value(model, raw, model.trim)
            };
            properties.model.value = Some(parsed);
        }

        // Only the required rule applies to booleans.
        determine_validation_state(&mut properties, &self.value_state.model_state, &[]);

        Ok(get_consolidated_properties(&properties, &self.registry))
    }

    fn working_properties(&mut self) -> Result<Properties> {
        match &self.last_properties {
            Some(properties) => Ok(properties.clone()),
            None => self.sync(),
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Dispatch a checked-state change.
    pub fn handle_change(&mut self, checked: bool) -> Result<Properties> {
        let mode = self.control_mode();
        let old = self.value_state.clone();
        let mut properties = self.working_properties()?;
        properties.value = Value::Bool(checked);

        if !mode.controlled && old.value == properties.value {
            self.last_properties = Some(properties.clone());
            return Ok(properties);
        }

        let mut state_changed = false;
        if old.model_state.pristine {
            properties.state.dirty = true;
            properties.state.pristine = false;
            state_changed = true;
        }

        let mut validation = properties.to_default_properties();
        validation.model.kind = FieldKind::Boolean;
        if determine_validation_state(&mut validation, &old.model_state, &[]) {
            state_changed = true;
        }
        let mut state = validation.model.state;
        state.dirty = properties.state.dirty;
        state.pristine = properties.state.pristine;
        properties.state = state;

        self.changed.emit(properties.clone());
        self.value_changed
            .emit((properties.value.clone(), properties.clone()));
        if state_changed {
            self.state_changed
                .emit((properties.state, properties.clone()));
        }

        let mut next = old.clone();
        next.value = properties.value.clone();
        next.model_state = properties.state;
        if should_commit(mode, &old, &next) {
            self.value_state = next;
        }

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    /// Toggle the checked state.
    pub fn toggle(&mut self) -> Result<Properties> {
        let checked = self.is_checked();
        self.handle_change(!checked)
    }

    /// Dispatch a click interaction (toggles and reports touch).
    pub fn handle_click(&mut self) -> Result<Properties> {
        let properties = self.toggle()?;
        self.clicked.emit(properties.clone());
        self.apply_touch()
    }

    /// Dispatch focus gain.
    pub fn handle_focus(&mut self) -> Result<Properties> {
        let properties = self.working_properties()?;
        self.focus_received.emit(properties);
        self.apply_touch()
    }

    /// Dispatch focus loss.
    pub fn handle_blur(&mut self) -> Result<Properties> {
        let mode = self.control_mode();
        let old = self.value_state.clone();
        let mut properties = self.working_properties()?;

        let mut state_changed = false;
        if old.model_state.focused {
            properties.state.focused = false;
            state_changed = true;
        }
        if !old.model_state.visited {
            properties.state.visited = true;
            state_changed = true;
        }

        if state_changed {
            self.changed.emit(properties.clone());
            self.state_changed
                .emit((properties.state, properties.clone()));
            let mut next = old.clone();
            next.model_state = properties.state;
            if should_commit(mode, &old, &next) {
                self.value_state = next;
            }
        }
        self.focus_lost.emit(properties.clone());

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    fn apply_touch(&mut self) -> Result<Properties> {
        let mode = self.control_mode();
        let old = self.value_state.clone();
        let mut properties = self.working_properties()?;
        let mut changed_state = false;

        if !old.model_state.focused {
            properties.state.focused = true;
            changed_state = true;
        }
        if old.model_state.untouched {
            properties.state.touched = true;
            properties.state.untouched = false;
            changed_state = true;
        }

        if changed_state {
            self.changed.emit(properties.clone());
            self.state_changed
                .emit((properties.state, properties.clone()));
            let mut next = old.clone();
            next.model_state = properties.state;
            if should_commit(mode, &old, &next) {
                self.value_state = next;
            }
        }

        self.touch.emit(properties.clone());
        self.last_properties = Some(properties.clone());
        Ok(properties)
    }
}

impl FieldWidget for Checkbox {
    fn create(props: Props) -> Self {
        Self::with_props(props)
    }

    fn set_props(&mut self, props: Props) {
        Checkbox::set_props(self, props);
    }

    fn sync(&mut self) -> Result<Properties> {
        Checkbox::sync(self)
    }

    fn properties(&self) -> Option<&Properties> {
        Checkbox::properties(self)
    }

    fn model_state(&self) -> ModelState {
        self.value_state.model_state
    }

    fn unmount(&mut self) {
        Checkbox::unmount(self);
    }
}

impl std::fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkbox")
            .field("checked", &self.is_checked())
            .field("value_state", &self.value_state)
            .finish_non_exhaustive()
    }
}
