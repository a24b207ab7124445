//! Per-type value transformation between typed values and editable strings.
//!
//! Every field kind owns a `parse` (string → typed) and `format` (typed →
//! string) behavior. Parsing is total: malformed input degrades to
//! [`Value::Null`] after best-effort recovery (locale decimal substitution,
//! clock-component extraction), it never fails. Formatting renders the IEEE
//! sentinels as fixed literals instead of handing them to locale formatting.
//!
//! The registry is constructed from an immutable [`TransformConfig`] — the
//! locale list, currency code and viewer timezone are injected here, not read
//! from ambient global state. Per-widget overrides are merged over the
//! built-ins with [`TransformerRegistry::with_override`].
//!
//! # Example
//!
//! ```
//! use horizon_fieldset::model::{FieldKind, Model, Value};
//! use horizon_fieldset::transform::{TransformConfig, TransformerRegistry};
//!
//! let registry = TransformerRegistry::new(TransformConfig::default());
//! let model = Model::of_kind(FieldKind::Integer);
//!
//! assert_eq!(
//!     registry.parse_value(&model, Value::from("42"), true),
//!     Value::Int(42)
//! );
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::model::{FieldKind, Model, Value};

// ============================================================================
// Configuration
// ============================================================================

/// The timezone applied by the `*-local` field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeZoneSpec {
    /// No shift; local and non-local kinds behave identically.
    Utc,
    /// A fixed offset east of UTC.
    Fixed(FixedOffset),
    /// An IANA zone; offsets follow its daylight-saving rules.
    Named(Tz),
    /// The process-local zone of the running system.
    #[default]
    System,
}

impl TimeZoneSpec {
    /// Seconds east of UTC at the given instant.
    ///
    /// Out-of-range instants (the infinity sentinels in particular) fall back
    /// to the offset at the epoch.
    pub fn offset_east_seconds(&self, epoch_seconds: f64) -> i64 {
        let instant = if epoch_seconds.is_finite() {
            epoch_seconds
        } else {
            0.0
        };
        let naive = DateTime::from_timestamp_millis((instant * 1000.0).round() as i64)
            .unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap())
            .naive_utc();

        match self {
            TimeZoneSpec::Utc => 0,
            TimeZoneSpec::Fixed(offset) => i64::from(offset.local_minus_utc()),
            TimeZoneSpec::Named(zone) => {
                i64::from(zone.offset_from_utc_datetime(&naive).fix().local_minus_utc())
            }
            TimeZoneSpec::System => i64::from(
                chrono::Local
                    .offset_from_utc_datetime(&naive)
                    .local_minus_utc(),
            ),
        }
    }
}

/// Immutable transformation configuration, injected at registry construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    /// Locale priority list; the first entry decides numeric separators.
    pub locales: Vec<String>,
    /// ISO 4217 code used by the currency kind.
    pub currency: String,
    /// Viewer timezone applied by the `*-local` kinds.
    pub zone: TimeZoneSpec,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en-US".to_string()],
            currency: "USD".to_string(),
            zone: TimeZoneSpec::default(),
        }
    }
}

impl TransformConfig {
    /// Whether the primary locale writes decimals with a comma.
    fn decimal_comma(&self) -> bool {
        self.locales.first().map(String::as_str) == Some("de-DE")
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// A parse behavior: raw value in, typed value out.
pub type ParseFn = dyn Fn(&Value, &Model, &TransformConfig) -> Value + Send + Sync;
/// A format behavior: typed value in, representation out.
pub type FormatFn = dyn Fn(&Value, &Model, &TransformConfig) -> String + Send + Sync;

/// A partial transformer for one field kind, merged over the built-in
/// behavior. Unset entries keep the built-in.
#[derive(Clone, Default)]
pub struct TransformerOverride {
    /// Replacement parse behavior.
    pub parse: Option<Arc<ParseFn>>,
    /// Replacement final-stage format behavior.
    pub format_final: Option<Arc<FormatFn>>,
    /// Replacement intermediate-stage format behavior, used while the widget
    /// has focus so formatting does not fight in-progress keystrokes.
    pub format_intermediate: Option<Arc<FormatFn>>,
}

impl TransformerOverride {
    /// An override replacing only the parse behavior.
    pub fn parse_with(
        parse: impl Fn(&Value, &Model, &TransformConfig) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            parse: Some(Arc::new(parse)),
            ..Self::default()
        }
    }

    /// An override replacing only the final format behavior.
    pub fn format_with(
        format: impl Fn(&Value, &Model, &TransformConfig) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            format_final: Some(Arc::new(format)),
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for TransformerOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerOverride")
            .field("parse", &self.parse.is_some())
            .field("format_final", &self.format_final.is_some())
            .field("format_intermediate", &self.format_intermediate.is_some())
            .finish()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The per-kind transformer registry.
///
/// Cheap to clone; widgets hold one and rebuild it when their external
/// configuration supplies an override.
#[derive(Debug, Clone, Default)]
pub struct TransformerRegistry {
    config: TransformConfig,
    overrides: HashMap<FieldKind, TransformerOverride>,
}

impl TransformerRegistry {
    /// Create a registry with the given configuration and built-in behaviors.
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            overrides: HashMap::new(),
        }
    }

    /// The injected configuration.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Replace the configuration, keeping any overrides.
    ///
    /// This is the documented way to change locale, currency or timezone:
    /// build a new registry value and hand it to the widget. Existing
    /// registries are never mutated behind a widget's back.
    pub fn with_config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Merge a partial override for one kind over the built-in behavior.
    pub fn with_override(mut self, kind: FieldKind, transformer: TransformerOverride) -> Self {
        let entry = self.overrides.entry(kind).or_default();
        if let Some(parse) = transformer.parse {
            entry.parse = Some(parse);
        }
        if let Some(format) = transformer.format_final {
            entry.format_final = Some(format);
        }
        if let Some(format) = transformer.format_intermediate {
            entry.format_intermediate = Some(format);
        }
        self
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Apply the configured value transformation for `model.kind`.
    ///
    /// Handles trimming and the empty-equals-null rule before dispatching,
    /// and degrades NaN results to [`Value::Null`] afterwards. Idempotent on
    /// already-typed input.
    pub fn parse_value(&self, model: &Model, raw: Value, trim: bool) -> Value {
        let raw = match raw {
            Value::Str(text) if trim => Value::Str(trim_text(&text)),
            other => other,
        };

        if model.empty_equals_null && raw.as_str() == Some("") {
            return Value::Null;
        }
        if raw.is_null() {
            return Value::Null;
        }

        let parsed = if let Some(parse) = self
            .overrides
            .get(&model.kind)
            .and_then(|entry| entry.parse.as_ref())
        {
            parse(&raw, model, &self.config)
        } else {
            self.parse_builtin(model, &raw)
        };

        match parsed {
            Value::Float(value) if value.is_nan() => Value::Null,
            other => other,
        }
    }

    fn parse_builtin(&self, model: &Model, raw: &Value) -> Value {
        match model.kind {
            FieldKind::String => raw.clone(),
            FieldKind::Boolean => parse_boolean(raw),
            FieldKind::Number => parse_number(raw),
            FieldKind::Integer => parse_integer(raw, model, &self.config),
            FieldKind::Float => parse_float(raw, model, &self.config),
            FieldKind::Currency => parse_currency(raw, model, &self.config),
            FieldKind::Date | FieldKind::DateTime => parse_datetime(raw),
            FieldKind::DateLocal => parse_date_local(raw, &self.config.zone),
            FieldKind::DateTimeLocal => parse_datetime_local(raw, &self.config.zone),
            FieldKind::Time => parse_time(raw),
            FieldKind::TimeLocal => parse_time_local(raw, &self.config.zone),
        }
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Render `value` as its editable string representation.
    ///
    /// `final_stage` is false while the widget has focus; an intermediate
    /// override (when configured) then takes precedence so formatting does
    /// not fight the user's in-progress input. Null renders as the empty
    /// string.
    pub fn format_value(&self, model: &Model, value: &Value, final_stage: bool) -> String {
        if value.is_null() {
            return String::new();
        }

        if let Some(entry) = self.overrides.get(&model.kind) {
            let format = if final_stage {
                entry.format_final.as_ref()
            } else {
                entry.format_intermediate.as_ref().or(entry.format_final.as_ref())
            };
            if let Some(format) = format {
                return format(value, model, &self.config);
            }
        }

        self.format_builtin(model, value)
    }

    fn format_builtin(&self, model: &Model, value: &Value) -> String {
        match model.kind {
            // No dedicated format behavior: plain string rendition.
            FieldKind::String | FieldKind::Boolean | FieldKind::Number => {
                match value.as_f64() {
                    Some(number) if number.is_nan() => String::new(),
                    _ => value.to_string(),
                }
            }
            FieldKind::Integer => format_integer(value, &self.config),
            FieldKind::Float => format_float(value, &self.config),
            FieldKind::Currency => format_currency(value, &self.config),
            FieldKind::DateTime => format_datetime(value, &self.config.zone, false),
            FieldKind::DateTimeLocal => format_datetime(value, &self.config.zone, true),
            FieldKind::Date => format_date(value, &self.config.zone, false),
            FieldKind::DateLocal => format_date(value, &self.config.zone, true),
            FieldKind::Time => format_time(value, model.step, &self.config.zone, false),
            FieldKind::TimeLocal => format_time(value, model.step, &self.config.zone, true),
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn trim_text(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.contains('\n') {
        return trimmed.to_string();
    }
    // Multi-line input: drop trailing spaces per line as well.
    let lines: Vec<&str> = trimmed.split('\n').map(str::trim_end).collect();
    lines.join("\n")
}

fn leading_f64(text: &str) -> Option<f64> {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").unwrap()
    });
    pattern
        .find(text.trim_start())
        .and_then(|found| found.as_str().parse::<f64>().ok())
}

fn leading_i64(text: &str) -> Option<i64> {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| regex::Regex::new(r"^[+-]?\d+").unwrap());
    pattern
        .find(text.trim_start())
        .and_then(|found| found.as_str().parse::<i64>().ok())
}

/// Flip the sign when it contradicts the configured bounds: a stray minus in
/// front of a non-negative field (or a missing one on a non-positive field)
/// is recovered instead of rejected.
fn correct_sign(value: Value, model: &Model) -> Value {
    let flip = |number: f64| {
        (model.minimum >= 0.0 && number < 0.0) || (model.maximum <= 0.0 && number > 0.0)
    };
    match value {
        Value::Int(number) if flip(number as f64) => Value::Int(-number),
        Value::Float(number) if flip(number) => Value::Float(-number),
        other => other,
    }
}

fn strip_grouping(text: &str, config: &TransformConfig) -> String {
    if config.decimal_comma() {
        // Decimal-comma locales: '.' groups, ',' separates decimals.
        text.replace('.', "").replace(',', ".")
    } else {
        text.replace(',', "")
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - offset) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

// ============================================================================
// Boolean and plain numbers
// ============================================================================

fn parse_boolean(raw: &Value) -> Value {
    let parsed = match raw {
        Value::Bool(value) => *value,
        Value::Str(text) if text == "false" => false,
        Value::Str(text) if text == "true" => true,
        Value::Int(0) => false,
        Value::Int(1) => true,
        Value::Float(number) if *number == 0.0 => false,
        Value::Float(number) if *number == 1.0 => true,
        // Unrecognized non-null input degrades to true.
        _ => true,
    };
    Value::Bool(parsed)
}

fn parse_number(raw: &Value) -> Value {
    match raw {
        Value::Int(_) | Value::Float(_) => raw.clone(),
        Value::Str(text) => match leading_i64(text) {
            Some(number) => Value::Int(number),
            None => Value::Null,
        },
        _ => raw.clone(),
    }
}

fn parse_integer(raw: &Value, model: &Model, config: &TransformConfig) -> Value {
    let value = match raw {
        Value::Str(text) => {
            let cleaned = if config.decimal_comma() {
                text.replace(['.', ','], "")
            } else {
                text.replace(',', "")
            };
            match leading_i64(&cleaned) {
                Some(number) => Value::Int(number),
                None => return Value::Null,
            }
        }
        other => other.clone(),
    };
    correct_sign(value, model)
}

fn parse_float(raw: &Value, model: &Model, config: &TransformConfig) -> Value {
    let value = match raw {
        Value::Str(text) => {
            let cleaned = strip_grouping(text, config);
            match leading_f64(&cleaned) {
                Some(number) => Value::Float(number),
                None => return Value::Null,
            }
        }
        other => other.clone(),
    };
    correct_sign(value, model)
}

fn parse_currency(raw: &Value, model: &Model, config: &TransformConfig) -> Value {
    let raw = match raw {
        Value::Str(text) => {
            let stripped: String = text
                .chars()
                .filter(|ch| !matches!(ch, '$' | '€' | '£' | '¥'))
                .collect();
            let stripped = stripped.replace(config.currency.as_str(), "");
            Value::Str(stripped.trim().to_string())
        }
        other => other.clone(),
    };
    parse_float(&raw, model, config)
}

fn format_integer(value: &Value, config: &TransformConfig) -> String {
    let number = match value.as_f64() {
        Some(number) => number,
        None => return value.to_string(),
    };
    if number.is_nan() {
        return String::new();
    }
    if number == f64::INFINITY {
        return "Infinity".to_string();
    }
    if number == f64::NEG_INFINITY {
        return "- Infinity".to_string();
    }

    let rounded = number.round() as i64;
    let separator = if config.decimal_comma() { '.' } else { ',' };
    let digits = rounded.unsigned_abs().to_string();
    let grouped = group_digits(&digits, separator);
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_float(value: &Value, config: &TransformConfig) -> String {
    let number = match value.as_f64() {
        Some(number) => number,
        None => return value.to_string(),
    };
    if number.is_nan() {
        return String::new();
    }
    if number == f64::INFINITY {
        return "Infinity".to_string();
    }
    if number == f64::NEG_INFINITY {
        return "- Infinity".to_string();
    }

    // No grouping: the rendition must survive a parse round-trip.
    let plain = format!("{number}");
    if config.decimal_comma() {
        plain.replace('.', ",")
    } else {
        plain
    }
}

fn format_currency(value: &Value, config: &TransformConfig) -> String {
    let number = match value.as_f64() {
        Some(number) => number,
        None => return value.to_string(),
    };
    if number == f64::INFINITY {
        return format!("Infinity {}", config.currency);
    }
    if number == f64::NEG_INFINITY {
        return format!("- Infinity {}", config.currency);
    }
    if number.is_nan() {
        return "unknown".to_string();
    }

    let symbol = match config.currency.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => return format!("{other} {}", format_decimal_grouped(number, config)),
    };
    let amount = format_decimal_grouped(number.abs(), config);
    if number < 0.0 {
        format!("-{symbol}{amount}")
    } else {
        format!("{symbol}{amount}")
    }
}

fn format_decimal_grouped(number: f64, config: &TransformConfig) -> String {
    let (group_separator, decimal_separator) = if config.decimal_comma() {
        ('.', ',')
    } else {
        (',', '.')
    };
    let fixed = format!("{:.2}", number.abs());
    let (integer_part, fraction_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_digits(integer_part, group_separator);
    let sign = if number < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}{decimal_separator}{fraction_part}")
}

// ============================================================================
// Date and time
// ============================================================================

/// Fixed literals for the date-family edge values.
fn date_edge_literal(seconds: f64) -> Option<String> {
    if seconds == f64::INFINITY {
        return Some("Infinitely far in the future".to_string());
    }
    if seconds == f64::NEG_INFINITY {
        return Some("Infinitely early in the past".to_string());
    }
    if seconds.is_nan() {
        return Some(String::new());
    }
    None
}

fn utc_datetime(seconds: f64) -> NaiveDateTime {
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
        .unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap())
        .naive_utc()
}

/// Result of a string → timestamp attempt, distinguishing inputs that
/// carried no zone information (bare wall-clock forms) from complete ones.
struct ParsedTimestamp {
    seconds: f64,
    wall_clock: bool,
}

fn parse_datetime_text(text: &str) -> Option<ParsedTimestamp> {
    // Bare wall-clock forms, seconds omitted or included.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&format!("{text}:00.000Z")) {
        return Some(ParsedTimestamp {
            seconds: parsed.timestamp_millis() as f64 / 1000.0,
            wall_clock: true,
        });
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&format!("{text}.000Z")) {
        return Some(ParsedTimestamp {
            seconds: parsed.timestamp_millis() as f64 / 1000.0,
            wall_clock: true,
        });
    }

    // Complete forms with zone information.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedTimestamp {
            seconds: parsed.timestamp_millis() as f64 / 1000.0,
            wall_clock: false,
        });
    }

    // Space-separated and date-only forms are treated as UTC.
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ParsedTimestamp {
                seconds: parsed.and_utc().timestamp_millis() as f64 / 1000.0,
                wall_clock: false,
            });
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(ParsedTimestamp {
            seconds: parsed.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64,
            wall_clock: false,
        });
    }

    // Plain numbers given as text.
    leading_f64(text).map(|seconds| ParsedTimestamp {
        seconds,
        wall_clock: false,
    })
}

fn parse_datetime(raw: &Value) -> Value {
    match raw {
        Value::Int(_) | Value::Float(_) => raw.clone(),
        Value::Str(text) => match parse_datetime_text(text) {
            Some(parsed) => Value::Float(parsed.seconds),
            None => Value::Float(0.0),
        },
        _ => Value::Float(0.0),
    }
}

fn parse_datetime_local(raw: &Value, zone: &TimeZoneSpec) -> Value {
    match raw {
        Value::Int(_) | Value::Float(_) => raw.clone(),
        Value::Str(text) => match parse_datetime_text(text) {
            Some(parsed) => {
                let mut seconds = parsed.seconds;
                if parsed.wall_clock {
                    // The bare clock reading names a viewer-zone instant.
                    seconds -= zone.offset_east_seconds(parsed.seconds) as f64;
                }
                Value::Float(seconds)
            }
            None => Value::Float(0.0),
        },
        _ => Value::Float(0.0),
    }
}

fn parse_date_local(raw: &Value, zone: &TimeZoneSpec) -> Value {
    let parsed = parse_datetime(raw);
    match parsed {
        Value::Float(seconds) if seconds.is_finite() && seconds % 86_400.0 == 0.0 => {
            // A value rounded to a UTC day names the viewer-zone midnight.
            Value::Float(seconds - zone.offset_east_seconds(seconds) as f64)
        }
        other => other,
    }
}

fn clock_components(text: &str) -> Option<f64> {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        regex::Regex::new(r"^([0-9]{2}):([0-9]{2})(:([0-9]{2}(\.[0-9]+)?))?$").unwrap()
    });
    let captures = pattern.captures(text)?;
    let hours: f64 = captures[1].parse().ok()?;
    let minutes: f64 = captures[2].parse().ok()?;
    let seconds: f64 = captures
        .get(4)
        .and_then(|found| found.as_str().parse().ok())
        .unwrap_or(0.0);
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_time(raw: &Value) -> Value {
    match raw {
        Value::Int(_) | Value::Float(_) => raw.clone(),
        Value::Str(text) => {
            if let Some(clock) = clock_components(text) {
                return Value::Float(clock);
            }
            match parse_datetime_text(text) {
                Some(parsed) => Value::Float(parsed.seconds),
                None => Value::Float(0.0),
            }
        }
        _ => Value::Float(0.0),
    }
}

fn parse_time_local(raw: &Value, zone: &TimeZoneSpec) -> Value {
    match raw {
        Value::Int(_) | Value::Float(_) => raw.clone(),
        Value::Str(text) => {
            if let Some(clock) = clock_components(text) {
                // A clock reading on the epoch day, read in the viewer zone.
                // Daylight saving cannot interfere on 1970-01-01.
                return Value::Float(clock - zone.offset_east_seconds(0.0) as f64);
            }
            match parse_datetime_text(text) {
                Some(parsed) => Value::Float(parsed.seconds),
                None => Value::Float(0.0),
            }
        }
        _ => Value::Float(0.0),
    }
}

/// Resolve a date-family value to seconds, parsing strings on the fly so
/// formatting accepts both typed and raw input.
fn date_value_seconds(value: &Value, zone: &TimeZoneSpec, local: bool) -> f64 {
    let parsed = if local {
        parse_datetime_local(value, zone)
    } else {
        parse_datetime(value)
    };
    parsed.as_f64().unwrap_or(0.0)
}

fn format_datetime(value: &Value, zone: &TimeZoneSpec, local: bool) -> String {
    let seconds = date_value_seconds(value, zone, local);
    if let Some(literal) = date_edge_literal(seconds) {
        return literal;
    }
    let shifted = if local {
        seconds + zone.offset_east_seconds(seconds) as f64
    } else {
        seconds
    };
    utc_datetime(shifted).format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn format_date(value: &Value, zone: &TimeZoneSpec, local: bool) -> String {
    let seconds = date_value_seconds(value, zone, local);
    if let Some(literal) = date_edge_literal(seconds) {
        return literal;
    }
    let shifted = if local {
        seconds + zone.offset_east_seconds(seconds) as f64
    } else {
        seconds
    };
    utc_datetime(shifted).format("%Y-%m-%d").to_string()
}

fn whole_minute_step(step: Option<u32>) -> bool {
    matches!(step, Some(step) if step >= 60 && step % 60 == 0)
}

fn format_time(value: &Value, step: Option<u32>, zone: &TimeZoneSpec, local: bool) -> String {
    let seconds = match value {
        Value::Str(_) => {
            let parsed = if local {
                parse_time_local(value, zone)
            } else {
                parse_time(value)
            };
            parsed.as_f64().unwrap_or(0.0)
        }
        other => other.as_f64().unwrap_or(0.0),
    };
    if let Some(literal) = date_edge_literal(seconds) {
        return literal;
    }

    let shifted = if local {
        seconds + zone.offset_east_seconds(seconds) as f64
    } else {
        seconds
    };
    let day_seconds = shifted.rem_euclid(86_400.0);
    let hours = (day_seconds / 3600.0).floor() as u32;
    let minutes = ((day_seconds % 3600.0) / 60.0).floor() as u32;

    if whole_minute_step(step) {
        return format!("{hours:02}:{minutes:02}");
    }
    let clock_seconds = (day_seconds % 60.0).floor() as u32;
    format!("{hours:02}:{minutes:02}:{clock_seconds:02}")
}
