//! Prelude module for Horizon Fieldset.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use horizon_fieldset::prelude::*;
//! ```
//!
//! This provides access to:
//! - The widget shells (`TextInput`, `Interval`, `Checkbox`, `InputList`)
//! - External configuration (`Props`, `ModelProps`, `Properties`)
//! - The data model (`Value`, `FieldKind`, `Model`, `ModelState`)
//! - Transformation (`TransformerRegistry`, `TransformConfig`)
//! - The signal system (`Signal`, `ConnectionId`)

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{
    Checkbox, FieldWidget, InputList, Interval, IntervalProperties, IntervalValue, ListModelState,
    ListProperties, ListProps, TextInput,
};

// ============================================================================
// Configuration and Consolidation
// ============================================================================

pub use crate::consolidate::{DefaultProperties, ModelProps, Properties, Props};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::model::{
    CursorState, FieldKind, LabelsSpec, Model, ModelState, Pattern, SelectOption, SelectionSpec,
    Value,
};

// ============================================================================
// Transformation and Validation
// ============================================================================

pub use crate::transform::{TimeZoneSpec, TransformConfig, TransformerOverride, TransformerRegistry};
pub use crate::validate::{determine_validation_state, RuleFlag};

// ============================================================================
// Reconciliation and Suggestions
// ============================================================================

pub use crate::reconcile::{ControlMode, ValueState};
pub use crate::suggestion::{
    SelectionSlot, SuggestionCreator, SuggestionQuery, Suggestions,
};

// ============================================================================
// Core Systems
// ============================================================================

pub use horizon_fieldset_core::{CancellationToken, ConnectionId, Signal};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{Error, Result};
