//! Horizon Fieldset - headless form-input widgets for Rust hosts.
//!
//! A reusable set of field widgets — single-value text/number/date/selection
//! input, paired range input, requireable checkbox, repeatable-item list —
//! built around one shared engine:
//!
//! - **Property consolidation** ([`consolidate`]): flat properties and a
//!   nested model description merge with defaults and internal state into
//!   one default-complete record per synchronization pass.
//! - **Validation** ([`validate`]): pure rules deriving the `invalid_*`
//!   flags, with `invalid == OR of all flags` and `valid == !invalid` held
//!   invariant.
//! - **Value transformation** ([`transform`]): per-kind parse/format pairs
//!   with locale-aware numeric recovery, sign correction against bounds and
//!   timezone-aware date/time handling.
//! - **Controlled/uncontrolled reconciliation** ([`reconcile`]): per pass
//!   the widget decides whether the host or the widget owns value state,
//!   and internal state is only rewritten when that mode says so.
//!
//! The widgets are headless: rendering, menus and editors stay with the
//! host, which drives each widget by dispatching events and calling
//! `sync()` once per cycle.
//!
//! # Example
//!
//! ```
//! use horizon_fieldset::prelude::*;
//!
//! let mut input = TextInput::new();
//! input.set_props(
//!     Props::new()
//!         .with_name("amount")
//!         .with_kind(FieldKind::Currency)
//!         .with_required(),
//! );
//!
//! input.handle_input("12.5").unwrap();
//! let properties = input.sync().unwrap();
//! assert_eq!(properties.value, Value::Float(12.5));
//! assert!(properties.state.valid);
//! ```

pub mod consolidate;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod suggestion;
pub mod transform;
pub mod validate;
pub mod widget;

pub mod prelude;

pub use error::{Error, Result};

pub use horizon_fieldset_core::{CancellationToken, ConnectionGuard, ConnectionId, Signal};
