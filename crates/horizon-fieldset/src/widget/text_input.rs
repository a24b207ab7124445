//! The single-value input widget.
//!
//! `TextInput` is the full engine wiring: external configuration in, one
//! fully consolidated [`Properties`] record out per synchronization pass,
//! user events dispatched by the host in between. It handles every field
//! kind of the closed vocabulary — free text, numbers, currency, booleans,
//! dates and times — plus enumerated selections and asynchronous
//! suggestions.
//!
//! Rendering is the host's business: call [`TextInput::sync`] once per pass
//! and feed the returned record to whatever native control layer is in use.
//!
//! # Example
//!
//! ```
//! use horizon_fieldset::consolidate::Props;
//! use horizon_fieldset::model::{FieldKind, Value};
//! use horizon_fieldset::widget::TextInput;
//!
//! let mut input = TextInput::new();
//! input.set_props(Props::new().with_kind(FieldKind::Integer).with_name("age"));
//!
//! input.value_changed.connect(|(value, _properties)| {
//!     println!("Value changed to: {:?}", value);
//! });
//!
//! input.handle_input("42").unwrap();
//! let properties = input.sync().unwrap();
//! assert_eq!(properties.value, Value::Int(42));
//! ```

use std::sync::Arc;

use horizon_fieldset_core::{CancellationToken, Signal};

use crate::consolidate::{
    determine_initial_representation, determine_initial_value, get_consolidated_properties,
    map_properties_into_model, DefaultProperties, Properties, Props,
};
use crate::error::Result;
use crate::model::{
    normalize_selection, value_from_selection, CursorState, Model, ModelState, SelectOption,
    SelectionSpec, Value,
};
use crate::reconcile::{
    derive_missing_properties_from_state, determine_control_mode, should_commit, ControlMode,
    ValueState,
};
use crate::suggestion::{
    suggestion_matches, SelectionSlot, SuggestionQuery, Suggestions,
};
use crate::transform::TransformerRegistry;
use crate::validate::{determine_validation_state, input_rules};

use super::FieldWidget;

/// A headless single-value input widget.
///
/// # Signals
///
/// - `changed(Properties)`: any consolidated property changed
/// - `value_changed((Value, Properties))`: the typed value changed
/// - `state_changed((ModelState, Properties))`: interaction/validity flags changed
/// - `focus_received` / `focus_lost` / `clicked` / `touch`: interaction events
/// - `key_down` / `key_up((String, Properties))`: raw key events
/// - `selection_changed((CursorState, Properties))`: caret/selection moved
/// - `selected(Properties)`: a value was chosen from the selection
/// - `show_declaration_changed` / `editor_is_active_changed((bool, Properties))`
pub struct TextInput {
    props: Props,
    base_registry: TransformerRegistry,
    registry: TransformerRegistry,

    value_state: ValueState,
    cursor: CursorState,
    show_declaration: Option<bool>,
    hidden: Option<bool>,
    editor_is_active: Option<bool>,

    selection_slot: SelectionSlot,
    suggestion_generation: u64,
    pending_generation: u64,
    suggestion_open: bool,
    active_suggestion: Option<usize>,

    initialized: bool,
    initial_consolidation_fired: bool,
    last_properties: Option<Properties>,

    /// Emitted whenever the consolidated properties changed.
    pub changed: Signal<Properties>,
    /// Emitted when the typed value changed.
    pub value_changed: Signal<(Value, Properties)>,
    /// Emitted when the model state changed.
    pub state_changed: Signal<(ModelState, Properties)>,
    /// Emitted when the declaration visibility was toggled.
    pub show_declaration_changed: Signal<(bool, Properties)>,
    /// Emitted when the alternate editor was toggled.
    pub editor_is_active_changed: Signal<(bool, Properties)>,
    /// Emitted when the widget gains focus.
    pub focus_received: Signal<Properties>,
    /// Emitted when the widget loses focus.
    pub focus_lost: Signal<Properties>,
    /// Emitted on click interactions.
    pub clicked: Signal<Properties>,
    /// Emitted on key press.
    pub key_down: Signal<(String, Properties)>,
    /// Emitted on key release.
    pub key_up: Signal<(String, Properties)>,
    /// Emitted when the caret or selection range moved.
    pub selection_changed: Signal<(CursorState, Properties)>,
    /// Emitted on the first (and every further) interaction.
    pub touch: Signal<Properties>,
    /// Emitted when a value was chosen from the selection.
    pub selected: Signal<Properties>,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    /// Create a widget with default configuration and transformers.
    pub fn new() -> Self {
        Self::with_registry(TransformerRegistry::default())
    }

    /// Create a widget with an explicitly injected transformer registry.
    pub fn with_registry(registry: TransformerRegistry) -> Self {
        Self {
            props: Props::default(),
            base_registry: registry.clone(),
            registry,

            value_state: ValueState::default(),
            cursor: CursorState::default(),
            show_declaration: None,
            hidden: None,
            editor_is_active: None,

            selection_slot: SelectionSlot::Empty,
            suggestion_generation: 0,
            pending_generation: 0,
            suggestion_open: false,
            active_suggestion: None,

            initialized: false,
            initial_consolidation_fired: false,
            last_properties: None,

            changed: Signal::new(),
            value_changed: Signal::new(),
            state_changed: Signal::new(),
            show_declaration_changed: Signal::new(),
            editor_is_active_changed: Signal::new(),
            focus_received: Signal::new(),
            focus_lost: Signal::new(),
            clicked: Signal::new(),
            key_down: Signal::new(),
            key_up: Signal::new(),
            selection_changed: Signal::new(),
            touch: Signal::new(),
            selected: Signal::new(),
        }
    }

    /// Create a widget from external configuration.
    pub fn with_props(props: Props) -> Self {
        let mut widget = Self::new();
        widget.set_props(props);
        widget
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Supply new external configuration.
    ///
    /// The configuration takes effect on the next synchronization pass.
    pub fn set_props(&mut self, props: Props) {
        self.registry = match &props.transformer {
            Some(transformer) => {
                let kind = props
                    .kind
                    .or_else(|| props.model.as_ref().and_then(|model| model.kind))
                    .unwrap_or_default();
                self.base_registry
                    .clone()
                    .with_override(kind, transformer.clone())
            }
            None => self.base_registry.clone(),
        };
        self.props = props;
        // Event handlers must not work against a record consolidated from
        // the previous configuration.
        self.last_properties = None;
    }

    /// The current external configuration.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// The transformer registry in effect (base plus configured override).
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
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

    /// Whether a suggestion popup should currently be open.
    pub fn is_suggestion_open(&self) -> bool {
        self.suggestion_open
    }

    /// Whether a suggestion request is in flight.
    pub fn is_suggestion_pending(&self) -> bool {
        self.selection_slot.is_pending()
    }

    /// The keyboard-highlighted suggestion index, if any.
    pub fn active_suggestion(&self) -> Option<usize> {
        self.active_suggestion
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Run one synchronization pass and return the consolidated properties.
    ///
    /// Merges configuration, defaults and internal state, parses the value,
    /// derives the validation state and reconciles internal state according
    /// to the control mode. Safe to call any number of times per host cycle;
    /// the record is rebuilt fresh each call.
    pub fn sync(&mut self) -> Result<Properties> {
        self.ensure_initialized();
        let mode = self.control_mode();

        let mut working = self.props.clone();
        self.backfill_widget_state(&mut working);
        derive_missing_properties_from_state(
            &mut working,
            &self.value_state,
            mode.representation_controlled,
        );

        let properties = self.consolidate(&working)?;

        // Secondary state follows the consolidated record.
        self.cursor = properties.cursor;
        self.show_declaration = Some(properties.show_declaration);
        self.hidden = Some(properties.hidden);
        self.editor_is_active = Some(properties.editor_is_active);

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
    ///
    /// Cancels any in-flight suggestion request and drops all signal
    /// connections; nothing outlives the widget.
    pub fn unmount(&mut self) {
        self.selection_slot.cancel_pending();
        self.changed.disconnect_all();
        self.value_changed.disconnect_all();
        self.state_changed.disconnect_all();
        self.show_declaration_changed.disconnect_all();
        self.editor_is_active_changed.disconnect_all();
        self.focus_received.disconnect_all();
        self.focus_lost.disconnect_all();
        self.clicked.disconnect_all();
        self.key_down.disconnect_all();
        self.key_up.disconnect_all();
        self.selection_changed.disconnect_all();
        self.touch.disconnect_all();
        self.selected.disconnect_all();
    }

    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let defaults = DefaultProperties::default();
        let selection = normalize_selection(
            self.props
                .selection
                .as_ref()
                .or_else(|| self.props.model.as_ref().and_then(|model| model.selection.as_ref())),
            self.props
                .labels
                .as_ref()
                .or_else(|| self.props.model.as_ref().and_then(|model| model.labels.as_ref())),
        );
        let value = determine_initial_value(&self.props, None, None);
        let representation = determine_initial_representation(
            &self.props,
            &defaults,
            &value,
            &self.registry,
            selection.as_deref(),
        );
        self.value_state = ValueState {
            value,
            representation: Some(representation),
            model_state: ModelState::default(),
        };
    }

    fn backfill_widget_state(&self, working: &mut Props) {
        if working.cursor.is_none() {
            working.cursor = Some(self.cursor);
        }
        if working.editor_is_active.is_none() {
            working.editor_is_active = self.editor_is_active;
        }
        if working.hidden.is_none() {
            working.hidden = self.hidden;
        }
        if working.show_declaration.is_none() {
            working.show_declaration = self.show_declaration;
        }
    }

    fn consolidate(&self, working: &Props) -> Result<Properties> {
        let mut properties = map_properties_into_model(working, &Model::default())?;

        if let Some(raw) = properties.model.value.take() {
            let parsed = {
                let model = &properties.model;
                self.registry.parse_value(model, raw, model.trim)
            };
            properties.model.value = Some(parsed);
        }

        determine_validation_state(&mut properties, &self.value_state.model_state, input_rules());

        Ok(get_consolidated_properties(&properties, &self.registry))
    }

    /// A consolidated record for event handling, reusing the last pass when
    /// available.
    fn working_properties(&mut self) -> Result<Properties> {
        match &self.last_properties {
            Some(properties) => Ok(properties.clone()),
            None => self.sync(),
        }
    }

    // =========================================================================
    // Value changes
    // =========================================================================

    /// Dispatch raw text typed into the native control.
    pub fn handle_input(&mut self, text: &str) -> Result<Properties> {
        self.handle_change_value(Value::from(text))
    }

    /// Dispatch a value change, typed or raw.
    pub fn handle_change_value(&mut self, value: Value) -> Result<Properties> {
        self.suggestion_open = true;
        let mode = self.control_mode();
        let mut properties = self.working_properties()?;
        properties.value = value;

        properties.representation = match &properties.value {
            Value::Str(text) => text.clone(),
            other => {
                let model = properties.to_default_properties().model;
                self.registry.format_value(&model, other, true)
            }
        };

        if !self.uses_suggestions() {
            let model = properties.to_default_properties().model;
            let trim = model.trim;
            properties.value = self
                .registry
                .parse_value(&model, properties.value.clone(), trim);
            return Ok(self.commit_input(properties, mode, false));
        }

        if let Some(creator) = self.props.suggestion_creator.clone() {
            return self.request_suggestions(creator, properties, mode);
        }

        // Static selection doubles as the suggestion source.
        self.resolve_value_from_selection(&mut properties);
        Ok(self.commit_input(properties, mode, false))
    }

    /// Dispatch the choice of a suggestion by index.
    pub fn select_suggestion(&mut self, index: usize) -> Result<Option<Properties>> {
        let mode = self.control_mode();
        let mut properties = self.working_properties()?;

        let options = self.visible_suggestions(&properties);
        let Some(option) = options.get(index) else {
            return Ok(None);
        };

        properties.representation = option.label.clone();
        properties.value = option.value.clone();
        self.suggestion_open = false;
        self.active_suggestion = None;

        Ok(Some(self.commit_input(properties, mode, true)))
    }

    /// The suggestions currently eligible for display.
    ///
    /// With a creator these are the last delivered results; with a static
    /// selection the options are filtered by the typed query.
    pub fn visible_suggestions(&self, properties: &Properties) -> Vec<SelectOption> {
        if let Some(options) = self.selection_slot.options() {
            return options.to_vec();
        }
        let Some(selection) = &properties.selection else {
            return Vec::new();
        };
        if self.props.suggestion_creator.is_some() {
            return Vec::new();
        }
        selection
            .iter()
            .filter(|option| suggestion_matches(&option.label, &properties.representation))
            .cloned()
            .collect()
    }

    fn uses_suggestions(&self) -> bool {
        self.props.suggestion_creator.is_some()
            || self.props.suggest_selection
            || self.props.search_selection
    }

    fn resolve_value_from_selection(&self, properties: &mut Properties) {
        let options = self
            .selection_slot
            .options()
            .map(<[SelectOption]>::to_vec)
            .or_else(|| properties.selection.clone());
        match value_from_selection(&properties.representation, options.as_deref()) {
            Some(candidate) => properties.value = candidate,
            None => {
                if self.props.search_selection {
                    // Search fields only accept selection members.
                    properties.value = Value::Null;
                } else {
                    let model = properties.to_default_properties().model;
                    let trim = model.trim;
                    properties.value =
                        self.registry
                            .parse_value(&model, properties.value.clone(), trim);
                }
            }
        }
    }

    /// Consolidate a value/representation change into state and signals.
    fn commit_input(
        &mut self,
        mut properties: Properties,
        mode: ControlMode,
        selected: bool,
    ) -> Properties {
        let old = self.value_state.clone();

        if !mode.representation_controlled
            && old.representation.as_deref() == Some(properties.representation.as_str())
            && self.props.suggestion_creator.is_none()
            && !selected
        {
            // No representation update and nothing pending: nothing to do.
            self.last_properties = Some(properties.clone());
            return properties;
        }

        let mut next = old.clone();
        next.representation = Some(properties.representation.clone());

        if !mode.controlled && old.value == properties.value {
            // Representation-only update.
            if should_commit(mode, &old, &next) {
                self.value_state = next;
            }
            self.last_properties = Some(properties.clone());
            return properties;
        }

        next.value = properties.value.clone();

        let mut state_changed = false;
        if old.model_state.pristine {
            properties.state.dirty = true;
            properties.state.pristine = false;
            state_changed = true;
        }

        let mut validation = properties.to_default_properties();
        if determine_validation_state(&mut validation, &old.model_state, input_rules()) {
            state_changed = true;
        }
        // Interaction flags set above survive the validation pass.
        let mut state = validation.model.state;
        state.dirty = properties.state.dirty;
        state.pristine = properties.state.pristine;
        properties.state = state;

        self.changed.emit(properties.clone());
        self.value_changed
            .emit((properties.value.clone(), properties.clone()));

        if state_changed {
            next.model_state = properties.state;
            self.state_changed
                .emit((properties.state, properties.clone()));
        }

        if selected || properties.selection.is_some() {
            self.selected.emit(properties.clone());
        }

        if should_commit(mode, &old, &next) {
            self.value_state = next;
        }

        self.last_properties = Some(properties.clone());
        properties
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    fn request_suggestions(
        &mut self,
        creator: Arc<dyn crate::suggestion::SuggestionCreator>,
        properties: Properties,
        mode: ControlMode,
    ) -> Result<Properties> {
        // A newer request supersedes the pending one; cancel without
        // awaiting it.
        self.selection_slot.cancel_pending();
        self.suggestion_generation += 1;
        let token = CancellationToken::new();

        let outcome = creator.create(SuggestionQuery {
            query: &properties.representation,
            properties: &properties,
            token: token.clone(),
        });

        match outcome {
            Suggestions::Ready(results) => {
                let options = normalize_selection(Some(&results), None).unwrap_or_default();
                self.selection_slot = SelectionSlot::Resolved(options);
                let mut properties = properties;
                self.resolve_value_from_selection(&mut properties);
                Ok(self.commit_input(properties, mode, false))
            }
            Suggestions::Pending => {
                self.pending_generation = self.suggestion_generation;
                self.selection_slot = SelectionSlot::Fetching(token);
                // Sync the representation immediately so the caret does not
                // jump while results are pending.
                let mut next = self.value_state.clone();
                next.representation = Some(properties.representation.clone());
                if should_commit(mode, &self.value_state, &next) {
                    self.value_state = next;
                }
                self.last_properties = Some(properties.clone());
                Ok(properties)
            }
        }
    }

    /// Deliver asynchronously retrieved suggestion results.
    ///
    /// Committed only when `token` still belongs to the newest request and
    /// was not cancelled; stale or cancelled deliveries are silently
    /// dropped. Returns the consolidated properties when the delivery was
    /// committed.
    pub fn commit_suggestions(
        &mut self,
        token: &CancellationToken,
        results: SelectionSpec,
    ) -> Result<Option<Properties>> {
        if token.is_cancelled() {
            return Ok(None);
        }
        match &self.selection_slot {
            SelectionSlot::Fetching(current) if current.same_token(token) => {}
            _ => return Ok(None),
        }
        if self.pending_generation != self.suggestion_generation {
            // A newer request was issued since; this delivery is stale.
            return Ok(None);
        }

        let mode = self.control_mode();
        let options = normalize_selection(Some(&results), None).unwrap_or_default();
        self.selection_slot = SelectionSlot::Resolved(options);

        let mut properties = self.working_properties()?;
        properties.representation = self
            .value_state
            .representation
            .clone()
            .unwrap_or_default();
        self.resolve_value_from_selection(&mut properties);

        Ok(Some(self.commit_input(properties, mode, false)))
    }

    // =========================================================================
    // Interaction events
    // =========================================================================

    /// Dispatch focus gain.
    pub fn handle_focus(&mut self) -> Result<Properties> {
        self.suggestion_open = true;
        let mode = self.control_mode();
        let properties = self.working_properties()?;
        self.focus_received.emit(properties.clone());
        Ok(self.apply_touch(properties, mode))
    }

    /// Dispatch a click interaction at the given caret position.
    pub fn handle_click(&mut self, cursor: CursorState) -> Result<Properties> {
        let mode = self.control_mode();
        let properties = self.handle_selection_change(cursor)?;
        self.clicked.emit(properties.clone());
        Ok(self.apply_touch(properties, mode))
    }

    /// Dispatch focus loss.
    ///
    /// Finishes editing: resolves the representation through the selection
    /// or a final parse/format round, marks the widget visited and reports
    /// every difference that accumulated while editing.
    pub fn handle_blur(&mut self) -> Result<Properties> {
        self.suggestion_open = false;
        self.active_suggestion = None;
        let mode = self.control_mode();
        let old = self.value_state.clone();
        let mut properties = self.working_properties()?;

        let mut changed = false;
        let mut state_changed = false;

        if old.model_state.focused {
            properties.state.focused = false;
            changed = true;
            state_changed = true;
        }
        if !old.model_state.visited {
            properties.state.visited = true;
            changed = true;
            state_changed = true;
        }

        if !self.uses_suggestions() || self.props.suggest_selection {
            let options = self
                .selection_slot
                .options()
                .map(<[SelectOption]>::to_vec)
                .or_else(|| properties.selection.clone());
            match value_from_selection(&properties.representation, options.as_deref()) {
                Some(candidate) => properties.value = candidate,
                None => {
                    let model = properties.to_default_properties().model;
                    let trim = model.trim;
                    properties.value =
                        self.registry
                            .parse_value(&model, properties.value.clone(), trim);
                    properties.representation =
                        self.registry.format_value(&model, &properties.value, true);
                }
            }
        }

        if old.value != properties.value
            || old.representation.as_deref() != Some(properties.representation.as_str())
        {
            changed = true;
        }

        if changed {
            self.changed.emit(properties.clone());
        }
        if old.value != properties.value {
            self.value_changed
                .emit((properties.value.clone(), properties.clone()));
        }
        if state_changed {
            self.state_changed
                .emit((properties.state, properties.clone()));
        }
        self.focus_lost.emit(properties.clone());

        if changed || state_changed {
            let next = ValueState {
                value: properties.value.clone(),
                representation: Some(properties.representation.clone()),
                model_state: properties.state,
            };
            if should_commit(mode, &old, &next) {
                self.value_state = next;
            }
        }

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    /// Dispatch a key press.
    ///
    /// Arrow keys navigate an open suggestion popup; Enter commits the
    /// highlighted suggestion.
    pub fn handle_key_down(&mut self, key: &str) -> Result<Properties> {
        let properties = self.working_properties()?;

        if self.suggestion_open && !properties.disabled {
            let count = self.visible_suggestions(&properties).len();
            if count > 0 {
                match key {
                    "ArrowDown" => {
                        let next = match self.active_suggestion {
                            Some(index) if index + 1 < count => index + 1,
                            Some(_) => 0,
                            None => 0,
                        };
                        self.active_suggestion = Some(next);
                    }
                    "ArrowUp" => {
                        let next = match self.active_suggestion {
                            Some(0) | None => count - 1,
                            Some(index) => index - 1,
                        };
                        self.active_suggestion = Some(next);
                    }
                    "Enter" => {
                        if let Some(index) = self.active_suggestion {
                            self.key_down.emit((key.to_string(), properties.clone()));
                            return Ok(self
                                .select_suggestion(index)?
                                .unwrap_or(properties));
                        }
                    }
                    "Escape" => {
                        self.suggestion_open = false;
                        self.active_suggestion = None;
                    }
                    _ => {}
                }
            }
        }

        self.key_down.emit((key.to_string(), properties.clone()));
        Ok(properties)
    }

    /// Dispatch a key release at the given caret position.
    pub fn handle_key_up(&mut self, key: &str, cursor: CursorState) -> Result<Properties> {
        let properties = self.handle_selection_change(cursor)?;
        self.key_up.emit((key.to_string(), properties.clone()));
        Ok(properties)
    }

    /// Dispatch a caret/selection movement.
    pub fn handle_selection_change(&mut self, cursor: CursorState) -> Result<Properties> {
        self.cursor = cursor;
        let mut properties = self.working_properties()?;
        properties.cursor = cursor;
        self.last_properties = Some(properties.clone());
        self.selection_changed.emit((cursor, properties.clone()));
        Ok(properties)
    }

    /// Toggle the declaration (help text) visibility.
    pub fn toggle_show_declaration(&mut self) -> Result<Properties> {
        let mut properties = self.working_properties()?;
        properties.show_declaration = !properties.show_declaration;
        self.show_declaration = Some(properties.show_declaration);

        self.changed.emit(properties.clone());
        self.show_declaration_changed
            .emit((properties.show_declaration, properties.clone()));

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    /// Toggle the alternate editor.
    pub fn toggle_editor_is_active(&mut self) -> Result<Properties> {
        let mut properties = self.working_properties()?;
        properties.editor_is_active = !properties.editor_is_active;
        self.editor_is_active = Some(properties.editor_is_active);

        self.changed.emit(properties.clone());
        self.editor_is_active_changed
            .emit((properties.editor_is_active, properties.clone()));

        self.last_properties = Some(properties.clone());
        Ok(properties)
    }

    fn apply_touch(&mut self, mut properties: Properties, mode: ControlMode) -> Properties {
        let old = self.value_state.clone();
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
            let mut next = old.clone();
            next.model_state = properties.state;
            self.state_changed
                .emit((properties.state, properties.clone()));
            if should_commit(mode, &old, &next) {
                self.value_state = next;
            }
        }

        self.touch.emit(properties.clone());
        self.last_properties = Some(properties.clone());
        properties
    }
}

impl FieldWidget for TextInput {
    fn create(props: Props) -> Self {
        Self::with_props(props)
    }

    fn set_props(&mut self, props: Props) {
        TextInput::set_props(self, props);
    }

    fn sync(&mut self) -> Result<Properties> {
        TextInput::sync(self)
    }

    fn properties(&self) -> Option<&Properties> {
        TextInput::properties(self)
    }

    fn model_state(&self) -> ModelState {
        self.value_state.model_state
    }

    fn unmount(&mut self) {
        TextInput::unmount(self);
    }
}

impl std::fmt::Debug for TextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInput")
            .field("props", &self.props)
            .field("value_state", &self.value_state)
            .field("suggestion_open", &self.suggestion_open)
            .field("suggestion_pending", &self.selection_slot.is_pending())
            .finish_non_exhaustive()
    }
}
