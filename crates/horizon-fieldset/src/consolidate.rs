//! Property/model/state consolidation.
//!
//! External configuration arrives in two interchangeable shapes: flat
//! properties ([`Props`]) and/or a nested model description
//! ([`ModelProps`]). Every synchronization pass merges both with the default
//! model and the widget's internal state into one default-complete record
//! ([`DefaultProperties`]), then projects that back out into the flat
//! external view ([`Properties`]) handed to rendering layers and callbacks.
//!
//! Both operations are total pure functions over value types: each pass
//! produces a new record, nothing is patched in place across passes.
//! Aliasing (`disabled` ↔ `mutable`/`writable`, `required` ↔ `nullable`,
//! bare patterns into the model) happens as explicit mapping steps.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    normalize_selection, representation_from_selection, CursorState, FieldKind, LabelsSpec, Model,
    ModelState, Pattern, SelectOption, SelectionSpec, StateOverrides, Value,
};
use crate::suggestion::SuggestionCreator;
use crate::transform::{TransformerOverride, TransformerRegistry};

// ============================================================================
// External configuration
// ============================================================================

/// A partial, nested model description supplied by the host.
///
/// Unset fields fall back to the widget's default model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelProps {
    pub name: Option<String>,
    pub declaration: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub value: Option<Value>,
    pub kind: Option<FieldKind>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum_length: Option<usize>,
    pub minimum_length: Option<usize>,
    pub pattern: Option<Vec<String>>,
    pub inverted_pattern: Option<Vec<String>>,
    pub selection: Option<SelectionSpec>,
    pub labels: Option<LabelsSpec>,
    pub mutable: Option<bool>,
    pub writable: Option<bool>,
    pub nullable: Option<bool>,
    pub empty_equals_null: Option<bool>,
    pub trim: Option<bool>,
    pub step: Option<u32>,
    pub state: StateOverrides,
}

/// The flat external configuration of a single-value widget.
///
/// Everything is optional; flat fields win over the nested [`ModelProps`],
/// which wins over the built-in defaults. The aliases `disabled` and
/// `required` rewrite into the model-level `mutable`/`nullable` during
/// consolidation.
#[derive(Clone, Default)]
pub struct Props {
    /// Nested canonical description.
    pub model: Option<ModelProps>,

    // First-level model-shaped fields.
    pub name: Option<String>,
    pub declaration: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub default: Option<Value>,
    pub initial_value: Option<Value>,
    pub kind: Option<FieldKind>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum_length: Option<usize>,
    pub maximum_length: Option<usize>,
    pub pattern: Option<Vec<String>>,
    pub inverted_pattern: Option<Vec<String>>,
    pub selection: Option<SelectionSpec>,
    pub labels: Option<LabelsSpec>,
    pub mutable: Option<bool>,
    pub writable: Option<bool>,
    pub nullable: Option<bool>,
    pub empty_equals_null: Option<bool>,
    pub trim: Option<bool>,
    pub step: Option<u32>,
    /// Flat model-state flags (seeding interaction state).
    pub state: StateOverrides,

    // Aliases.
    /// Externally visible inverse of `mutable && writable`.
    pub disabled: Option<bool>,
    /// Externally visible inverse of `nullable`.
    pub required: Option<bool>,

    // Widget-level fields.
    pub representation: Option<String>,
    pub cursor: Option<CursorState>,
    pub show_declaration: Option<bool>,
    pub hidden: Option<bool>,
    pub editor_is_active: Option<bool>,
    pub enforce_uncontrolled: bool,
    pub show_validation_state: Option<bool>,
    pub show_initial_validation_state: Option<bool>,
    pub trigger_initial_properties_consolidation: bool,
    pub search_selection: bool,
    pub suggest_selection: bool,

    // Message templates.
    pub required_text: Option<String>,
    pub minimum_text: Option<String>,
    pub maximum_text: Option<String>,
    pub minimum_length_text: Option<String>,
    pub maximum_length_text: Option<String>,
    pub pattern_text: Option<String>,
    pub inverted_pattern_text: Option<String>,

    /// Partial transformer override merged over the built-in registry.
    pub transformer: Option<TransformerOverride>,
    /// Asynchronous suggestion provider.
    pub suggestion_creator: Option<Arc<dyn SuggestionCreator>>,
}

impl std::fmt::Debug for Props {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Props")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("model", &self.model)
            .field("representation", &self.representation)
            .field("enforce_uncontrolled", &self.enforce_uncontrolled)
            .field("has_transformer", &self.transformer.is_some())
            .field("has_suggestion_creator", &self.suggestion_creator.is_some())
            .finish_non_exhaustive()
    }
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the field kind (builder style).
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Supply an external value (builder style).
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark the field required (builder style).
    pub fn with_required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Whether a value was explicitly supplied, flat or nested.
    pub fn value_supplied(&self) -> bool {
        self.value.is_some()
            || self
                .model
                .as_ref()
                .is_some_and(|model| model.value.is_some())
    }
}

// ============================================================================
// Default-complete record
// ============================================================================

/// The default-complete consolidation result: a fully populated model plus
/// widget-level fields, every gap filled from the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultProperties {
    pub model: Model,

    pub representation: Option<String>,
    pub cursor: CursorState,
    pub show_declaration: Option<bool>,
    pub hidden: Option<bool>,
    pub editor_is_active: bool,
    pub enforce_uncontrolled: bool,
    pub show_validation_state: bool,
    pub show_initial_validation_state: bool,
    pub trigger_initial_properties_consolidation: bool,
    pub search_selection: bool,
    pub suggest_selection: bool,

    pub required_text: String,
    pub minimum_text: String,
    pub maximum_text: String,
    pub minimum_length_text: String,
    pub maximum_length_text: String,
    pub pattern_text: String,
    pub inverted_pattern_text: String,
}

impl Default for DefaultProperties {
    fn default() -> Self {
        Self {
            model: Model::default(),

            representation: None,
            cursor: CursorState::default(),
            show_declaration: None,
            hidden: None,
            editor_is_active: false,
            enforce_uncontrolled: false,
            show_validation_state: true,
            show_initial_validation_state: false,
            trigger_initial_properties_consolidation: false,
            search_selection: false,
            suggest_selection: false,

            required_text: "Please fill this field.".to_string(),
            minimum_text: "Your number has to be at least ${minimum}.".to_string(),
            maximum_text: "Your number should be at most ${maximum}.".to_string(),
            minimum_length_text: "Please type at least ${minimumLength} symbols.".to_string(),
            maximum_length_text: "Please type at most ${maximumLength} symbols.".to_string(),
            pattern_text: "Your string has to match the regular expression: \"${pattern}\"."
                .to_string(),
            inverted_pattern_text:
                "Your string should not match the regular expression: \"${invertedPattern}\"."
                    .to_string(),
        }
    }
}

/// Merge defaults, the nested model and the flat properties into one
/// default-complete record.
///
/// Merge precedence (lowest to highest): `default_model`, nested
/// [`ModelProps`], flat fields. Aliases rewrite afterwards: `disabled`
/// clears `mutable`, `required` clears `nullable`, bare pattern fields move
/// into the model (compiling them — a broken pattern is a configuration
/// error). When no value was supplied at all the model value is computed
/// from the default by copy.
pub fn map_properties_into_model(
    props: &Props,
    default_model: &Model,
) -> Result<DefaultProperties> {
    let mut model = default_model.clone();

    // Nested model description first.
    if let Some(nested) = &props.model {
        if let Some(name) = &nested.name {
            model.name = name.clone();
        }
        if let Some(declaration) = &nested.declaration {
            model.declaration = declaration.clone();
        }
        if let Some(description) = &nested.description {
            model.description = description.clone();
        }
        if let Some(default) = &nested.default {
            model.default = Some(default.clone());
        }
        if let Some(value) = &nested.value {
            model.value = Some(value.clone());
        }
        if let Some(kind) = nested.kind {
            model.kind = kind;
        }
        if let Some(maximum) = nested.maximum {
            model.maximum = maximum;
        }
        if let Some(minimum) = nested.minimum {
            model.minimum = minimum;
        }
        if let Some(maximum_length) = nested.maximum_length {
            model.maximum_length = Some(maximum_length);
        }
        if let Some(minimum_length) = nested.minimum_length {
            model.minimum_length = minimum_length;
        }
        if let Some(pattern) = &nested.pattern {
            model.pattern = Pattern::compile_all(pattern)?;
        }
        if let Some(pattern) = &nested.inverted_pattern {
            model.inverted_pattern = Pattern::compile_all(pattern)?;
        }
        if let Some(selection) = &nested.selection {
            model.selection = Some(selection.clone());
        }
        if let Some(labels) = &nested.labels {
            model.labels = Some(labels.clone());
        }
        if let Some(mutable) = nested.mutable {
            model.mutable = mutable;
        }
        if let Some(writable) = nested.writable {
            model.writable = writable;
        }
        if let Some(nullable) = nested.nullable {
            model.nullable = nullable;
        }
        if let Some(empty_equals_null) = nested.empty_equals_null {
            model.empty_equals_null = empty_equals_null;
        }
        if let Some(trim) = nested.trim {
            model.trim = trim;
        }
        if let Some(step) = nested.step {
            model.step = Some(step);
        }
        nested.state.apply_to(&mut model.state);
    }

    // Aliases rewrite before the flat fields are copied, so an explicit
    // flat switch still wins over its alias.
    if props.disabled == Some(true) {
        model.mutable = false;
    }
    if props.required == Some(true) {
        model.nullable = false;
    }
    if let Some(pattern) = &props.pattern {
        model.pattern = Pattern::compile_all(pattern)?;
    }
    if let Some(pattern) = &props.inverted_pattern {
        model.inverted_pattern = Pattern::compile_all(pattern)?;
    }

    // Flat first-level model-shaped fields win over the nested description.
    if let Some(name) = &props.name {
        model.name = name.clone();
    }
    if let Some(declaration) = &props.declaration {
        model.declaration = declaration.clone();
    }
    if let Some(description) = &props.description {
        model.description = description.clone();
    }
    if let Some(default) = &props.default {
        model.default = Some(default.clone());
    }
    if let Some(value) = &props.value {
        model.value = Some(value.clone());
    }
    if let Some(kind) = props.kind {
        model.kind = kind;
    }
    if let Some(minimum) = props.minimum {
        model.minimum = minimum;
    }
    if let Some(maximum) = props.maximum {
        model.maximum = maximum;
    }
    if let Some(minimum_length) = props.minimum_length {
        model.minimum_length = minimum_length;
    }
    if let Some(maximum_length) = props.maximum_length {
        model.maximum_length = Some(maximum_length);
    }
    if let Some(selection) = &props.selection {
        model.selection = Some(selection.clone());
    }
    if let Some(labels) = &props.labels {
        model.labels = Some(labels.clone());
    }
    if let Some(mutable) = props.mutable {
        model.mutable = mutable;
    }
    if let Some(writable) = props.writable {
        model.writable = writable;
    }
    if let Some(nullable) = props.nullable {
        model.nullable = nullable;
    }
    if let Some(empty_equals_null) = props.empty_equals_null {
        model.empty_equals_null = empty_equals_null;
    }
    if let Some(trim) = props.trim {
        model.trim = trim;
    }
    if let Some(step) = props.step {
        model.step = Some(step);
    }
    props.state.apply_to(&mut model.state);

    // No value supplied anywhere: adopt the default by copy.
    if model.value.is_none() {
        model.value = model.default.clone();
    }
    // else: the host controls the value through the model.

    let defaults = DefaultProperties::default();
    Ok(DefaultProperties {
        model,

        representation: props.representation.clone(),
        cursor: props.cursor.unwrap_or(defaults.cursor),
        show_declaration: props.show_declaration,
        hidden: props.hidden,
        editor_is_active: props.editor_is_active.unwrap_or(defaults.editor_is_active),
        enforce_uncontrolled: props.enforce_uncontrolled,
        show_validation_state: props
            .show_validation_state
            .unwrap_or(defaults.show_validation_state),
        show_initial_validation_state: props
            .show_initial_validation_state
            .unwrap_or(defaults.show_initial_validation_state),
        trigger_initial_properties_consolidation: props.trigger_initial_properties_consolidation,
        search_selection: props.search_selection,
        suggest_selection: props.suggest_selection,

        required_text: props.required_text.clone().unwrap_or(defaults.required_text),
        minimum_text: props.minimum_text.clone().unwrap_or(defaults.minimum_text),
        maximum_text: props.maximum_text.clone().unwrap_or(defaults.maximum_text),
        minimum_length_text: props
            .minimum_length_text
            .clone()
            .unwrap_or(defaults.minimum_length_text),
        maximum_length_text: props
            .maximum_length_text
            .clone()
            .unwrap_or(defaults.maximum_length_text),
        pattern_text: props.pattern_text.clone().unwrap_or(defaults.pattern_text),
        inverted_pattern_text: props
            .inverted_pattern_text
            .clone()
            .unwrap_or(defaults.inverted_pattern_text),
    })
}

// ============================================================================
// External view
// ============================================================================

/// The flat, fully consolidated external view of a widget.
///
/// All model fields are spread onto this record; the raw
/// `mutable`/`writable`/`nullable` switches are replaced by their external
/// aliases `disabled` and `required`, and the interaction/validity flags
/// travel as one embedded [`ModelState`] value.
#[derive(Debug, Clone, PartialEq)]
pub struct Properties {
    pub name: String,
    pub declaration: String,
    pub description: String,

    pub kind: FieldKind,
    pub value: Value,
    pub default: Value,
    /// The string currently shown for editing; may lag behind `value` while
    /// the user is typing.
    pub representation: String,
    pub cursor: CursorState,

    /// Inverse of `mutable && writable`.
    pub disabled: bool,
    /// Inverse of `nullable`.
    pub required: bool,

    pub minimum: f64,
    pub maximum: f64,
    pub minimum_length: usize,
    pub maximum_length: Option<usize>,
    pub pattern: Vec<Pattern>,
    pub inverted_pattern: Vec<Pattern>,
    /// Normalized, ordered selection.
    pub selection: Option<Vec<SelectOption>>,

    pub empty_equals_null: bool,
    pub trim: bool,
    pub step: Option<u32>,

    pub state: ModelState,

    pub show_declaration: bool,
    pub hidden: bool,
    pub editor_is_active: bool,
    pub show_validation_state: bool,
    pub show_initial_validation_state: bool,
    pub search_selection: bool,
    pub suggest_selection: bool,

    pub required_text: String,
    pub minimum_text: String,
    pub maximum_text: String,
    pub minimum_length_text: String,
    pub maximum_length_text: String,
    pub pattern_text: String,
    pub inverted_pattern_text: String,
}

impl Properties {
    /// Whether a validity problem should currently be displayed.
    pub fn show_as_invalid(&self) -> bool {
        self.state.invalid
            && self.show_validation_state
            && (self.show_initial_validation_state || self.state.visited)
    }

    /// Rebuild the model-shaped view of this record.
    ///
    /// Event handlers use this to parse or validate against the consolidated
    /// constraints without re-running the full merge. The raw
    /// `mutable`/`writable` split and the selection sources are not
    /// recoverable from the flat view and are approximated; transformation
    /// and validation read neither.
    pub fn to_default_properties(&self) -> DefaultProperties {
        DefaultProperties {
            model: Model {
                name: self.name.clone(),
                declaration: self.declaration.clone(),
                description: self.description.clone(),
                default: match &self.default {
                    Value::Null => None,
                    other => Some(other.clone()),
                },
                value: Some(self.value.clone()),
                kind: self.kind,
                maximum: self.maximum,
                minimum: self.minimum,
                maximum_length: self.maximum_length,
                minimum_length: self.minimum_length,
                pattern: self.pattern.clone(),
                inverted_pattern: self.inverted_pattern.clone(),
                selection: None,
                labels: None,
                mutable: !self.disabled,
                writable: true,
                nullable: !self.required,
                empty_equals_null: self.empty_equals_null,
                trim: self.trim,
                step: self.step,
                state: self.state,
            },
            representation: Some(self.representation.clone()),
            cursor: self.cursor,
            show_declaration: Some(self.show_declaration),
            hidden: Some(self.hidden),
            editor_is_active: self.editor_is_active,
            enforce_uncontrolled: false,
            show_validation_state: self.show_validation_state,
            show_initial_validation_state: self.show_initial_validation_state,
            trigger_initial_properties_consolidation: false,
            search_selection: self.search_selection,
            suggest_selection: self.suggest_selection,
            required_text: self.required_text.clone(),
            minimum_text: self.minimum_text.clone(),
            maximum_text: self.maximum_text.clone(),
            minimum_length_text: self.minimum_length_text.clone(),
            maximum_length_text: self.maximum_length_text.clone(),
            pattern_text: self.pattern_text.clone(),
            inverted_pattern_text: self.inverted_pattern_text.clone(),
        }
    }

    /// The message describing the first failing rule, rendered against this
    /// record, or `None` while valid.
    pub fn invalid_message(&self) -> Option<String> {
        let template = if self.state.invalid_required {
            &self.required_text
        } else if self.state.invalid_minimum {
            &self.minimum_text
        } else if self.state.invalid_maximum {
            &self.maximum_text
        } else if self.state.invalid_minimum_length {
            &self.minimum_length_text
        } else if self.state.invalid_maximum_length {
            &self.maximum_length_text
        } else if self.state.invalid_pattern {
            &self.pattern_text
        } else if self.state.invalid_inverted_pattern {
            &self.inverted_pattern_text
        } else {
            return None;
        };
        Some(render_message(template, self))
    }
}

/// Project a default-complete record into the flat external view.
///
/// The inverse of [`map_properties_into_model`]: model fields are spread
/// flat, `disabled`/`required` are re-derived and the raw switches dropped.
/// The representation is made concrete here — when none was supplied it is
/// computed from the value with the final formatting stage unless the widget
/// currently has focus.
pub fn get_consolidated_properties(
    properties: &DefaultProperties,
    registry: &TransformerRegistry,
) -> Properties {
    let model = &properties.model;

    let mut selection = normalize_selection(model.selection.as_ref(), model.labels.as_ref());
    if selection.is_none() && model.kind == FieldKind::Boolean {
        selection = Some(vec![
            SelectOption::new("No", Value::Bool(false)),
            SelectOption::new("Yes", Value::Bool(true)),
        ]);
    }

    let value = model.value_or_null();
    let representation = match &properties.representation {
        Some(representation) => representation.clone(),
        None => representation_from_selection(&value, selection.as_deref()).unwrap_or_else(|| {
            registry.format_value(model, &value, !model.state.focused)
        }),
    };

    Properties {
        name: model.name.clone(),
        declaration: model.declaration.clone(),
        description: model.description.clone(),

        kind: model.kind,
        value,
        default: model.default.clone().unwrap_or(Value::Null),
        representation,
        cursor: properties.cursor,

        disabled: !(model.mutable && model.writable),
        required: !model.nullable,

        minimum: model.minimum,
        maximum: model.maximum,
        minimum_length: model.minimum_length,
        maximum_length: model.maximum_length,
        pattern: model.pattern.clone(),
        inverted_pattern: model.inverted_pattern.clone(),
        selection,

        empty_equals_null: model.empty_equals_null,
        trim: model.trim,
        step: model.step,

        state: model.state,

        show_declaration: properties.show_declaration.unwrap_or(false),
        hidden: properties
            .hidden
            .unwrap_or_else(|| model.name.starts_with("password")),
        editor_is_active: properties.editor_is_active,
        show_validation_state: properties.show_validation_state,
        show_initial_validation_state: properties.show_initial_validation_state,
        search_selection: properties.search_selection,
        suggest_selection: properties.suggest_selection,

        required_text: properties.required_text.clone(),
        minimum_text: properties.minimum_text.clone(),
        maximum_text: properties.maximum_text.clone(),
        minimum_length_text: properties.minimum_length_text.clone(),
        maximum_length_text: properties.maximum_length_text.clone(),
        pattern_text: properties.pattern_text.clone(),
        inverted_pattern_text: properties.inverted_pattern_text.clone(),
    }
}

// ============================================================================
// Initial value and representation
// ============================================================================

/// Determine the initial value from external configuration.
///
/// Precedence: alternate value, supplied value (flat, then nested), initial
/// value, defaults (flat, nested, then the widget fallback), finally null.
pub fn determine_initial_value(
    props: &Props,
    default_value: Option<&Value>,
    alternate_value: Option<&Value>,
) -> Value {
    if let Some(value) = alternate_value {
        return value.clone();
    }
    if let Some(value) = &props.value {
        return value.clone();
    }
    if let Some(value) = props.model.as_ref().and_then(|model| model.value.as_ref()) {
        return value.clone();
    }
    if let Some(value) = &props.initial_value {
        return value.clone();
    }
    if let Some(value) = &props.default {
        return value.clone();
    }
    if let Some(value) = props.model.as_ref().and_then(|model| model.default.as_ref()) {
        return value.clone();
    }
    if let Some(value) = default_value {
        return value.clone();
    }
    Value::Null
}

/// Determine the initial string representation for a value.
pub fn determine_initial_representation(
    props: &Props,
    default_properties: &DefaultProperties,
    value: &Value,
    registry: &TransformerRegistry,
    selection: Option<&[SelectOption]>,
) -> String {
    if let Some(representation) = &props.representation {
        return representation.clone();
    }

    if !value.is_null() {
        if let Some(candidate) = representation_from_selection(value, selection) {
            return candidate;
        }

        let mut model = default_properties.model.clone();
        model.kind = props
            .kind
            .or_else(|| props.model.as_ref().and_then(|model| model.kind))
            .unwrap_or(default_properties.model.kind);
        return registry.format_value(&model, value, true);
    }

    String::new()
}

// ============================================================================
// Message templates
// ============================================================================

/// Render a `${placeholder}` message template against consolidated
/// properties.
///
/// Template evaluation failures must never break rendering: an unknown
/// placeholder logs a warning and degrades the whole message to an empty
/// string.
pub fn render_message(template: &str, properties: &Properties) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            tracing::warn!(
                target: "horizon_fieldset::consolidate",
                template,
                "Unterminated placeholder in message template"
            );
            return String::new();
        };
        let placeholder = &after[..end];
        match evaluate_placeholder(placeholder, properties) {
            Some(replacement) => result.push_str(&replacement),
            None => {
                tracing::warn!(
                    target: "horizon_fieldset::consolidate",
                    placeholder,
                    "Message template could not be processed"
                );
                return String::new();
            }
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    result
}

fn evaluate_placeholder(placeholder: &str, properties: &Properties) -> Option<String> {
    let format_number = |number: f64| {
        if number.fract() == 0.0 && number.is_finite() {
            format!("{}", number as i64)
        } else {
            format!("{number}")
        }
    };
    let join_patterns = |patterns: &[Pattern]| {
        patterns
            .iter()
            .map(Pattern::source)
            .collect::<Vec<_>>()
            .join("\", \"")
    };

    match placeholder {
        "name" => Some(properties.name.clone()),
        "description" => Some(properties.description.clone()),
        "declaration" => Some(properties.declaration.clone()),
        "representation" => Some(properties.representation.clone()),
        "value" => Some(properties.value.to_string()),
        "minimum" => Some(format_number(properties.minimum)),
        "maximum" => Some(format_number(properties.maximum)),
        "minimumLength" => Some(properties.minimum_length.to_string()),
        "maximumLength" => properties.maximum_length.map(|length| length.to_string()),
        "pattern" => Some(join_patterns(&properties.pattern)),
        "invertedPattern" => Some(join_patterns(&properties.inverted_pattern)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{TransformConfig, TimeZoneSpec};

    fn registry() -> TransformerRegistry {
        TransformerRegistry::new(TransformConfig {
            zone: TimeZoneSpec::Utc,
            ..TransformConfig::default()
        })
    }

    #[test]
    fn test_defaults_fill_gaps() {
        let properties = map_properties_into_model(&Props::default(), &Model::default()).unwrap();
        assert_eq!(properties.model.name, "NO_NAME_DEFINED");
        assert!(properties.model.nullable);
        assert!(properties.show_validation_state);
        assert_eq!(properties.model.minimum, f64::NEG_INFINITY);
    }

    #[test]
    fn test_flat_wins_over_nested_model() {
        let props = Props {
            name: Some("flat".to_string()),
            model: Some(ModelProps {
                name: Some("nested".to_string()),
                minimum: Some(3.0),
                ..ModelProps::default()
            }),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert_eq!(properties.model.name, "flat");
        assert_eq!(properties.model.minimum, 3.0);
    }

    #[test]
    fn test_disabled_and_required_aliases() {
        let props = Props {
            disabled: Some(true),
            required: Some(true),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert!(!properties.model.mutable);
        assert!(!properties.model.nullable);

        let flat = get_consolidated_properties(&properties, &registry());
        assert!(flat.disabled);
        assert!(flat.required);
    }

    #[test]
    fn test_disabled_false_keeps_model_switches() {
        let props = Props {
            disabled: Some(false),
            model: Some(ModelProps {
                mutable: Some(false),
                ..ModelProps::default()
            }),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        // Only a truthy alias rewrites the model switch.
        assert!(!properties.model.mutable);
    }

    #[test]
    fn test_bare_pattern_moves_into_model() {
        let props = Props {
            pattern: Some(vec![r"^\d+$".to_string()]),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert_eq!(properties.model.pattern.len(), 1);
        assert!(properties.model.pattern[0].is_match("42"));
    }

    #[test]
    fn test_broken_pattern_is_configuration_error() {
        let props = Props {
            pattern: Some(vec!["(unclosed".to_string()]),
            ..Props::default()
        };
        assert!(map_properties_into_model(&props, &Model::default()).is_err());
    }

    #[test]
    fn test_value_computed_from_default_by_copy() {
        let props = Props {
            default: Some(Value::from("fallback")),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert_eq!(properties.model.value, Some(Value::from("fallback")));
        // Supplied values are never shadowed by the default.
        let props = Props {
            default: Some(Value::from("fallback")),
            value: Some(Value::from("given")),
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert_eq!(properties.model.value, Some(Value::from("given")));
    }

    #[test]
    fn test_consolidated_view_strips_raw_switches() {
        let properties = map_properties_into_model(&Props::default(), &Model::default()).unwrap();
        let flat = get_consolidated_properties(&properties, &registry());
        assert!(!flat.disabled);
        assert!(!flat.required);
        assert_eq!(flat.value, Value::Null);
        assert_eq!(flat.representation, "");
    }

    #[test]
    fn test_representation_derived_from_value() {
        let props = Props::new()
            .with_kind(FieldKind::Integer)
            .with_value(Value::Int(1234567));
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        let flat = get_consolidated_properties(&properties, &registry());
        assert_eq!(flat.representation, "1,234,567");
    }

    #[test]
    fn test_supplied_representation_wins() {
        let mut props = Props::new().with_value(Value::from("typed"));
        props.representation = Some("in-progress ".to_string());
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        let flat = get_consolidated_properties(&properties, &registry());
        assert_eq!(flat.representation, "in-progress ");
    }

    #[test]
    fn test_boolean_gets_default_selection() {
        let props = Props::new().with_kind(FieldKind::Boolean);
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        let flat = get_consolidated_properties(&properties, &registry());
        let selection = flat.selection.unwrap();
        assert_eq!(selection[0].label, "No");
        assert_eq!(selection[1].label, "Yes");
    }

    #[test]
    fn test_password_name_hides_by_default() {
        let props = Props::new().with_name("passwordRepeat");
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        let flat = get_consolidated_properties(&properties, &registry());
        assert!(flat.hidden);
    }

    #[test]
    fn test_determine_initial_value_precedence() {
        let props = Props {
            value: Some(Value::Int(1)),
            initial_value: Some(Value::Int(2)),
            default: Some(Value::Int(3)),
            ..Props::default()
        };
        assert_eq!(determine_initial_value(&props, None, None), Value::Int(1));

        let props = Props {
            initial_value: Some(Value::Int(2)),
            default: Some(Value::Int(3)),
            ..Props::default()
        };
        assert_eq!(determine_initial_value(&props, None, None), Value::Int(2));

        assert_eq!(
            determine_initial_value(&Props::default(), Some(&Value::Int(9)), None),
            Value::Int(9)
        );
        assert_eq!(determine_initial_value(&Props::default(), None, None), Value::Null);
    }

    #[test]
    fn test_render_message() {
        let properties = {
            let consolidated =
                map_properties_into_model(&Props::new().with_name("age"), &Model::default())
                    .unwrap();
            let mut flat = get_consolidated_properties(&consolidated, &registry());
            flat.minimum = 18.0;
            flat
        };

        assert_eq!(
            render_message("Your number has to be at least ${minimum}.", &properties),
            "Your number has to be at least 18."
        );
        assert_eq!(render_message("No placeholder here.", &properties), "No placeholder here.");
        // Unknown placeholders degrade the whole message.
        assert_eq!(render_message("Broken ${nonsense} template.", &properties), "");
        assert_eq!(render_message("Unterminated ${name", &properties), "");
    }

    #[test]
    fn test_state_overrides_reach_model_state() {
        let props = Props {
            state: StateOverrides {
                touched: Some(true),
                untouched: Some(false),
                ..StateOverrides::default()
            },
            ..Props::default()
        };
        let properties = map_properties_into_model(&props, &Model::default()).unwrap();
        assert!(properties.model.state.touched);
        assert!(!properties.model.state.untouched);
    }
}
