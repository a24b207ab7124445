//! Canonical field description: values, kinds, constraints and derived state.
//!
//! A [`Model`] is the caller-authored description of a field — its type, its
//! constraints, its default and current value. [`ModelState`] is the derived
//! interaction/validity state; it is never authored directly. Both are plain
//! value types rebuilt fresh by the consolidation pass on every
//! synchronization cycle (see [`crate::consolidate`]).

use std::fmt;

use crate::error::{Error, Result};

// ============================================================================
// Value
// ============================================================================

/// A typed field value.
///
/// Date-family fields store seconds since the Unix epoch as [`Value::Float`];
/// the IEEE sentinels (`INFINITY`, `NEG_INFINITY`, `NAN`) are legal edge
/// values there and receive fixed literal formatting.
///
/// "Not supplied" is expressed as `Option<Value>::None` and is distinct from
/// [`Value::Null`]: a caller can explicitly supply null (clearing a field)
/// or supply nothing at all (leaving the widget self-managing).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The explicit null value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Int(i64),
    /// A floating point value (also used for epoch timestamps).
    Float(f64),
    /// A string value.
    Str(String),
}

impl Value {
    /// Whether this is the explicit null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// String view of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Boolean view of the value, if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Loose truthiness in the host-configuration sense: null, `false`,
    /// empty strings, zero and NaN are falsy, everything else truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0 && !value.is_nan(),
            Value::Str(value) => !value.is_empty(),
        }
    }

    /// Loose equality used for selection lookups: integers and floats
    /// representing the same number compare equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        if self == other {
            return true;
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// The plain string rendition used when no transformer applies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

// ============================================================================
// Field Kind
// ============================================================================

/// The closed vocabulary of supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// Free-form text.
    #[default]
    String,
    /// A generic number (parsed as integer, kept as given otherwise).
    Number,
    /// An integer with locale-aware parsing.
    Integer,
    /// A floating point number with locale-aware parsing.
    Float,
    /// A monetary amount.
    Currency,
    /// A boolean.
    Boolean,
    /// A calendar date, interpreted in UTC.
    Date,
    /// A calendar date, interpreted in the configured viewer zone.
    DateLocal,
    /// A combined date and time, interpreted in UTC.
    DateTime,
    /// A combined date and time, interpreted in the configured viewer zone.
    DateTimeLocal,
    /// A time of day on the epoch day, interpreted in UTC.
    Time,
    /// A time of day on the epoch day, interpreted in the configured
    /// viewer zone.
    TimeLocal,
}

impl FieldKind {
    /// Parse a field kind from its configuration name.
    ///
    /// `"text"` is accepted as an alias for `"string"`. Unknown names are a
    /// configuration error.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "string" | "text" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "currency" => Ok(Self::Currency),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "date-local" => Ok(Self::DateLocal),
            "datetime" => Ok(Self::DateTime),
            "datetime-local" => Ok(Self::DateTimeLocal),
            "time" => Ok(Self::Time),
            "time-local" => Ok(Self::TimeLocal),
            _ => Err(Error::unsupported_type(name)),
        }
    }

    /// The configuration name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Currency => "currency",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateLocal => "date-local",
            Self::DateTime => "datetime",
            Self::DateTimeLocal => "datetime-local",
            Self::Time => "time",
            Self::TimeLocal => "time-local",
        }
    }

    /// The native control type a rendering layer should use for this kind.
    pub fn native_type(&self) -> &'static str {
        match self {
            Self::String | Self::Boolean | Self::Number | Self::Integer | Self::Float
            | Self::Currency => "text",
            Self::Date | Self::DateLocal => "date",
            Self::DateTime | Self::DateTimeLocal => "datetime-local",
            Self::Time | Self::TimeLocal => "time",
        }
    }

    /// Whether values of this kind are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number | Self::Integer | Self::Float | Self::Currency
        )
    }

    /// Whether this kind belongs to the date/time family.
    pub fn is_date_family(&self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::DateLocal
                | Self::DateTime
                | Self::DateTimeLocal
                | Self::Time
                | Self::TimeLocal
        )
    }

    /// Whether this kind applies the configured viewer-zone shift.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::DateLocal | Self::DateTimeLocal | Self::TimeLocal)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Model State
// ============================================================================

/// Derived interaction and validity flags.
///
/// Invariants maintained by the validation engine:
///
/// - `valid == !invalid`
/// - `invalid` is the logical OR of every `invalid_*` flag
/// - `pristine == !dirty`, `untouched == !touched`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelState {
    /// The value has been changed since mounting.
    pub dirty: bool,
    /// The value is still the initial one.
    pub pristine: bool,

    /// The user has interacted with the widget.
    pub touched: bool,
    /// The user has not interacted with the widget yet.
    pub untouched: bool,

    /// The widget currently has focus.
    pub focused: bool,
    /// The widget has lost focus at least once.
    pub visited: bool,

    /// At least one validity rule failed.
    pub invalid: bool,
    /// No validity rule failed.
    pub valid: bool,

    /// A non-nullable field holds no value.
    pub invalid_required: bool,
    /// The value lies below the configured minimum.
    pub invalid_minimum: bool,
    /// The value lies above the configured maximum.
    pub invalid_maximum: bool,
    /// The value is shorter than the configured minimum length.
    pub invalid_minimum_length: bool,
    /// The value is longer than the configured maximum length.
    pub invalid_maximum_length: bool,
    /// The value fails to match a configured pattern.
    pub invalid_pattern: bool,
    /// The value matches a configured inverted pattern.
    pub invalid_inverted_pattern: bool,
}

impl Default for ModelState {
    fn default() -> Self {
        Self {
            dirty: false,
            pristine: true,

            touched: false,
            untouched: true,

            focused: false,
            visited: false,

            invalid: false,
            valid: true,

            invalid_required: false,
            invalid_minimum: false,
            invalid_maximum: false,
            invalid_minimum_length: false,
            invalid_maximum_length: false,
            invalid_pattern: false,
            invalid_inverted_pattern: false,
        }
    }
}

impl ModelState {
    /// The logical OR of every individual `invalid_*` flag.
    pub fn any_rule_failed(&self) -> bool {
        self.invalid_required
            || self.invalid_minimum
            || self.invalid_maximum
            || self.invalid_minimum_length
            || self.invalid_maximum_length
            || self.invalid_pattern
            || self.invalid_inverted_pattern
    }

    /// Re-derive `invalid`/`valid` from the individual rule flags.
    pub fn refresh_aggregate(&mut self) {
        self.invalid = self.any_rule_failed();
        self.valid = !self.invalid;
    }

    /// Aggregate many child states into one, combining interaction and
    /// failure flags with OR and their complements with AND.
    ///
    /// An empty iterator yields the default (pristine, valid) state.
    pub fn aggregate<'a>(states: impl IntoIterator<Item = &'a ModelState>) -> ModelState {
        let mut result = ModelState::default();
        for state in states {
            result.dirty |= state.dirty;
            result.pristine &= state.pristine;
            result.touched |= state.touched;
            result.untouched &= state.untouched;
            result.focused |= state.focused;
            result.visited |= state.visited;
            result.invalid |= state.invalid;
            result.valid &= state.valid;
            result.invalid_required |= state.invalid_required;
            result.invalid_minimum |= state.invalid_minimum;
            result.invalid_maximum |= state.invalid_maximum;
            result.invalid_minimum_length |= state.invalid_minimum_length;
            result.invalid_maximum_length |= state.invalid_maximum_length;
            result.invalid_pattern |= state.invalid_pattern;
            result.invalid_inverted_pattern |= state.invalid_inverted_pattern;
        }
        result
    }
}

/// Partial model-state overrides supplied through external configuration.
///
/// Hosts occasionally seed interaction flags (marking a restored form section
/// as already touched, for example); unset fields leave the derived state
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateOverrides {
    pub dirty: Option<bool>,
    pub pristine: Option<bool>,
    pub touched: Option<bool>,
    pub untouched: Option<bool>,
    pub focused: Option<bool>,
    pub visited: Option<bool>,
    pub invalid: Option<bool>,
    pub valid: Option<bool>,
    pub invalid_required: Option<bool>,
}

impl StateOverrides {
    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every set override onto `state`.
    pub fn apply_to(&self, state: &mut ModelState) {
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    state.$field = value;
                })*
            };
        }
        apply!(
            dirty, pristine, touched, untouched, focused, visited, invalid, valid,
            invalid_required
        );
    }

    /// Merge another override set over this one (the other wins).
    pub fn merged_over(&self, base: &StateOverrides) -> StateOverrides {
        macro_rules! pick {
            ($field:ident) => {
                self.$field.or(base.$field)
            };
        }
        StateOverrides {
            dirty: pick!(dirty),
            pristine: pick!(pristine),
            touched: pick!(touched),
            untouched: pick!(untouched),
            focused: pick!(focused),
            visited: pick!(visited),
            invalid: pick!(invalid),
            valid: pick!(valid),
            invalid_required: pick!(invalid_required),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// A compiled validation pattern that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: regex::Regex,
}

impl Pattern {
    /// Compile a pattern. Failure is a configuration error.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        match regex::Regex::new(&source) {
            Ok(regex) => Ok(Self { source, regex }),
            Err(error) => Err(Error::invalid_pattern(source, error.to_string())),
        }
    }

    /// The pattern source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Test an input against the pattern.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Compile a list of pattern sources.
    pub fn compile_all(sources: &[String]) -> Result<Vec<Pattern>> {
        sources.iter().map(Pattern::new).collect()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

// ============================================================================
// Selection
// ============================================================================

/// A normalized, labeled selection entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// The label shown to the user.
    pub label: String,
    /// The value committed when this option is chosen.
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The external forms a selection configuration may take.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSpec {
    /// Raw allowed values; labels are derived from the values.
    Values(Vec<Value>),
    /// `(value, label)` pairs in a fixed order.
    Pairs(Vec<(Value, String)>),
    /// Fully labeled options in a fixed order.
    Options(Vec<SelectOption>),
    /// A value-name → label mapping (unordered; normalization sorts it).
    Mapping(Vec<(String, String)>),
}

/// A separate label source for selection entries.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelsSpec {
    /// Positional labels applied by index.
    List(Vec<String>),
    /// `(value-name, label)` pairs; their order also orders the selection.
    Pairs(Vec<(String, String)>),
    /// A value-name → label mapping. The keys `"true"`/`"false"` label
    /// boolean values.
    Mapping(Vec<(String, String)>),
}

impl LabelsSpec {
    fn label_for(&self, value: &Value, index: usize) -> Option<String> {
        match self {
            LabelsSpec::List(labels) => labels.get(index).cloned(),
            LabelsSpec::Pairs(pairs) => {
                let name = value.to_string();
                pairs
                    .iter()
                    .find(|(candidate, _)| *candidate == name)
                    .map(|(_, label)| label.clone())
            }
            LabelsSpec::Mapping(mapping) => {
                let name = match value {
                    Value::Bool(true) => "true".to_string(),
                    Value::Bool(false) => "false".to_string(),
                    other => other.to_string(),
                };
                mapping
                    .iter()
                    .find(|(candidate, _)| *candidate == name)
                    .map(|(_, label)| label.clone())
            }
        }
    }

    fn as_selection(&self) -> SelectionSpec {
        match self {
            LabelsSpec::List(labels) => {
                SelectionSpec::Values(labels.iter().map(|label| Value::from(label.as_str())).collect())
            }
            LabelsSpec::Pairs(pairs) | LabelsSpec::Mapping(pairs) => SelectionSpec::Pairs(
                pairs
                    .iter()
                    .map(|(value, label)| (Value::from(value.as_str()), label.clone()))
                    .collect(),
            ),
        }
    }
}

/// Normalize a selection configuration into an ordered, labeled list.
///
/// Ordering is deterministic: label pairs dictate the order when given,
/// ordered input forms keep their order, and mappings are sorted
/// alphabetically by label. When no selection is given the labels source (if
/// any) doubles as the selection, mirroring the configuration shorthand.
pub fn normalize_selection(
    selection: Option<&SelectionSpec>,
    labels: Option<&LabelsSpec>,
) -> Option<Vec<SelectOption>> {
    let (selection_spec, labels): (SelectionSpec, Option<&LabelsSpec>) = match (selection, labels) {
        (Some(selection), labels) => (selection.clone(), labels),
        (None, Some(labels)) => (labels.as_selection(), None),
        (None, None) => return None,
    };

    let label_for = |value: &Value, fallback: Option<&str>, index: usize| -> String {
        labels
            .and_then(|labels| labels.label_for(value, index))
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| value.to_string())
    };

    let mut ordered = true;
    let mut result: Vec<SelectOption> = match &selection_spec {
        SelectionSpec::Values(values) => values
            .iter()
            .enumerate()
            .map(|(index, value)| SelectOption::new(label_for(value, None, index), value.clone()))
            .collect(),
        SelectionSpec::Pairs(pairs) => pairs
            .iter()
            .enumerate()
            .map(|(index, (value, label))| {
                SelectOption::new(label_for(value, Some(label), index), value.clone())
            })
            .collect(),
        SelectionSpec::Options(options) => options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                SelectOption::new(
                    label_for(&option.value, Some(&option.label), index),
                    option.value.clone(),
                )
            })
            .collect(),
        SelectionSpec::Mapping(mapping) => {
            ordered = false;
            mapping
                .iter()
                .enumerate()
                .map(|(index, (value, label))| {
                    let value = Value::from(value.as_str());
                    SelectOption::new(label_for(&value, Some(label), index), value)
                })
                .collect()
        }
    };

    if let Some(LabelsSpec::Pairs(pairs)) = labels {
        // Label pairs dictate ordering.
        let position = |value: &Value| -> usize {
            let name = value.to_string();
            pairs
                .iter()
                .position(|(candidate, _)| *candidate == name)
                .unwrap_or(0)
        };
        result.sort_by_key(|option| position(&option.value));
    } else if !ordered {
        result.sort_by(|a, b| a.label.cmp(&b.label));
    }

    Some(result)
}

/// Find the label representing `value` within a normalized selection.
pub fn representation_from_selection(
    value: &Value,
    selection: Option<&[SelectOption]>,
) -> Option<String> {
    selection?
        .iter()
        .find(|option| option.value.loosely_equals(value))
        .map(|option| {
            if option.label.is_empty() {
                value.to_string()
            } else {
                option.label.clone()
            }
        })
}

/// Find the value behind a user-facing label (or a stringified value).
pub fn value_from_selection(label: &str, selection: Option<&[SelectOption]>) -> Option<Value> {
    let selection = selection?;

    for option in selection {
        if option.label == label {
            return Some(option.value.clone());
        }
        if matches!(option.value, Value::Int(_) | Value::Float(_) | Value::Str(_))
            && option.value.to_string() == label
        {
            return Some(option.value.clone());
        }
    }

    None
}

// ============================================================================
// Cursor
// ============================================================================

/// A cursor/selection range inside the editable representation, preserved
/// across representation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Selection start (character offset).
    pub start: usize,
    /// Selection end (character offset).
    pub end: usize,
}

impl CursorState {
    pub fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

// ============================================================================
// Model
// ============================================================================

/// The canonical description of a field's constraints and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Technical field name.
    pub name: String,
    /// Extended help text, shown on demand.
    pub declaration: String,
    /// Human readable label.
    pub description: String,

    /// Default value adopted when no value is supplied.
    pub default: Option<Value>,
    /// Current value; `None` while nothing is supplied or derived yet.
    pub value: Option<Value>,

    /// The field type.
    pub kind: FieldKind,

    /// Upper bound for numeric and date-like values.
    pub maximum: f64,
    /// Lower bound for numeric and date-like values.
    pub minimum: f64,

    /// Upper bound for string length (user-perceived characters);
    /// `None` is unbounded.
    pub maximum_length: Option<usize>,
    /// Lower bound for string length.
    pub minimum_length: usize,

    /// Patterns the value must match (all of them).
    pub pattern: Vec<Pattern>,
    /// Patterns the value must not match (none of them).
    pub inverted_pattern: Vec<Pattern>,

    /// Enumerable allowed values.
    pub selection: Option<SelectionSpec>,
    /// Separate label source for the selection.
    pub labels: Option<LabelsSpec>,

    /// Whether the value may be changed at all.
    pub mutable: bool,
    /// Whether changes may be written back.
    pub writable: bool,
    /// Whether the empty value is acceptable.
    pub nullable: bool,

    /// Treat an empty string as null when parsing.
    pub empty_equals_null: bool,
    /// Trim surrounding whitespace when parsing.
    pub trim: bool,

    /// Editing granularity in seconds for time-like kinds; whole-minute
    /// steps drop the seconds suffix from representations.
    pub step: Option<u32>,

    /// Derived interaction/validity state.
    pub state: ModelState,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: "NO_NAME_DEFINED".to_string(),
            declaration: String::new(),
            description: String::new(),

            default: None,
            value: None,

            kind: FieldKind::String,

            maximum: f64::INFINITY,
            minimum: f64::NEG_INFINITY,

            maximum_length: None,
            minimum_length: 0,

            pattern: Vec::new(),
            inverted_pattern: Vec::new(),

            selection: None,
            labels: None,

            mutable: true,
            writable: true,
            nullable: true,

            empty_equals_null: true,
            trim: true,

            step: None,

            state: ModelState::default(),
        }
    }
}

impl Model {
    /// A model of the given kind with everything else defaulted.
    pub fn of_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// The current value, or null when none is set.
    pub fn value_or_null(&self) -> Value {
        self.value.clone().unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_truthiness() {
        assert!(!Value::Null.truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::Float(0.0).truthy());
        assert!(!Value::Float(f64::NAN).truthy());
        assert!(!Value::Str(String::new()).truthy());

        assert!(Value::Bool(true).truthy());
        assert!(Value::Int(-3).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(Value::Str("x".into()).truthy());
    }

    #[test]
    fn test_value_loose_equality() {
        assert!(Value::Int(5).loosely_equals(&Value::Float(5.0)));
        assert!(!Value::Int(5).loosely_equals(&Value::Str("5".into())));
        assert!(Value::Str("a".into()).loosely_equals(&Value::Str("a".into())));
    }

    #[test]
    fn test_field_kind_parse_and_alias() {
        assert_eq!(FieldKind::parse("string").unwrap(), FieldKind::String);
        assert_eq!(FieldKind::parse("text").unwrap(), FieldKind::String);
        assert_eq!(
            FieldKind::parse("datetime-local").unwrap(),
            FieldKind::DateTimeLocal
        );
        assert!(FieldKind::parse("color").is_err());
    }

    #[test]
    fn test_model_state_default_invariants() {
        let state = ModelState::default();
        assert!(state.valid && !state.invalid);
        assert!(state.pristine && !state.dirty);
        assert!(state.untouched && !state.touched);
        assert!(!state.any_rule_failed());
    }

    #[test]
    fn test_model_state_refresh_aggregate() {
        let mut state = ModelState::default();
        state.invalid_pattern = true;
        state.refresh_aggregate();
        assert!(state.invalid);
        assert!(!state.valid);

        state.invalid_pattern = false;
        state.refresh_aggregate();
        assert!(state.valid);
    }

    #[test]
    fn test_model_state_aggregation() {
        let mut touched = ModelState::default();
        touched.touched = true;
        touched.untouched = false;

        let mut invalid = ModelState::default();
        invalid.invalid_required = true;
        invalid.refresh_aggregate();

        let aggregate = ModelState::aggregate([&touched, &invalid]);
        assert!(aggregate.touched);
        assert!(!aggregate.untouched);
        assert!(aggregate.invalid);
        assert!(!aggregate.valid);
        assert!(aggregate.invalid_required);
        assert!(aggregate.pristine);
    }

    #[test]
    fn test_pattern_compilation() {
        let pattern = Pattern::new(r"^\d{3}$").unwrap();
        assert!(pattern.is_match("123"));
        assert!(!pattern.is_match("12"));

        assert!(Pattern::new(r"(unclosed").is_err());
    }

    #[test]
    fn test_normalize_selection_values() {
        let selection = SelectionSpec::Values(vec!["b".into(), "a".into()]);
        let normalized = normalize_selection(Some(&selection), None).unwrap();

        // Ordered input forms keep their order.
        assert_eq!(normalized[0], SelectOption::new("b", "b"));
        assert_eq!(normalized[1], SelectOption::new("a", "a"));
    }

    #[test]
    fn test_normalize_selection_mapping_sorts_by_label() {
        let selection = SelectionSpec::Mapping(vec![
            ("z".to_string(), "Zulu".to_string()),
            ("a".to_string(), "Alpha".to_string()),
        ]);
        let normalized = normalize_selection(Some(&selection), None).unwrap();
        assert_eq!(normalized[0].label, "Alpha");
        assert_eq!(normalized[1].label, "Zulu");
    }

    #[test]
    fn test_normalize_selection_label_pairs_dictate_order() {
        let selection = SelectionSpec::Values(vec!["a".into(), "b".into()]);
        let labels = LabelsSpec::Pairs(vec![
            ("b".to_string(), "Second".to_string()),
            ("a".to_string(), "First".to_string()),
        ]);
        let normalized = normalize_selection(Some(&selection), Some(&labels)).unwrap();
        assert_eq!(normalized[0], SelectOption::new("Second", "b"));
        assert_eq!(normalized[1], SelectOption::new("First", "a"));
    }

    #[test]
    fn test_labels_double_as_selection() {
        let labels = LabelsSpec::Mapping(vec![("a".to_string(), "Alpha".to_string())]);
        let normalized = normalize_selection(None, Some(&labels)).unwrap();
        assert_eq!(normalized, vec![SelectOption::new("Alpha", "a")]);
    }

    #[test]
    fn test_boolean_label_mapping() {
        let labels = LabelsSpec::Mapping(vec![
            ("true".to_string(), "Yes".to_string()),
            ("false".to_string(), "No".to_string()),
        ]);
        let selection = SelectionSpec::Values(vec![Value::Bool(true), Value::Bool(false)]);
        let normalized = normalize_selection(Some(&selection), Some(&labels)).unwrap();
        assert_eq!(normalized[0].label, "Yes");
        assert_eq!(normalized[1].label, "No");
    }

    #[test]
    fn test_selection_lookup_both_ways() {
        let selection = vec![
            SelectOption::new("One", Value::Int(1)),
            SelectOption::new("Two", Value::Int(2)),
        ];

        assert_eq!(
            representation_from_selection(&Value::Int(2), Some(&selection)),
            Some("Two".to_string())
        );
        assert_eq!(
            representation_from_selection(&Value::Float(1.0), Some(&selection)),
            Some("One".to_string())
        );
        assert_eq!(
            representation_from_selection(&Value::Int(3), Some(&selection)),
            None
        );

        assert_eq!(
            value_from_selection("Two", Some(&selection)),
            Some(Value::Int(2))
        );
        // Stringified values resolve as well.
        assert_eq!(
            value_from_selection("1", Some(&selection)),
            Some(Value::Int(1))
        );
        assert_eq!(value_from_selection("Three", Some(&selection)), None);
    }

    #[test]
    fn test_state_overrides_apply() {
        let mut overrides = StateOverrides::default();
        assert!(overrides.is_empty());

        overrides.touched = Some(true);
        overrides.untouched = Some(false);

        let mut state = ModelState::default();
        overrides.apply_to(&mut state);
        assert!(state.touched);
        assert!(!state.untouched);
        assert!(state.pristine);
    }
}
