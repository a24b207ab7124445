//! Logging facilities for Horizon Fieldset.
//!
//! Horizon Fieldset uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_fieldset_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_fieldset_core::signal";
    /// Property consolidation target.
    pub const CONSOLIDATE: &str = "horizon_fieldset::consolidate";
    /// Validation engine target.
    pub const VALIDATE: &str = "horizon_fieldset::validate";
    /// Value transformer target.
    pub const TRANSFORM: &str = "horizon_fieldset::transform";
    /// Controlled/uncontrolled reconciler target.
    pub const RECONCILE: &str = "horizon_fieldset::reconcile";
    /// Suggestion retrieval target.
    pub const SUGGESTION: &str = "horizon_fieldset::suggestion";
    /// Widget shell target.
    pub const WIDGET: &str = "horizon_fieldset::widget";
}
