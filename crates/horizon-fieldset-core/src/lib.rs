//! Core systems for Horizon Fieldset.
//!
//! This crate provides the foundational components shared by every Horizon
//! Fieldset widget:
//!
//! - **Signal/Slot System**: Type-safe change notification between widgets
//!   and their host
//! - **Cancellation Tokens**: Cooperative cancellation for in-flight
//!   suggestion requests
//! - **Error Types**: Core error taxonomy
//! - **Logging Targets**: `tracing` target constants for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_fieldset_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i64>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Scheduling Model
//!
//! Horizon Fieldset widgets run inside a host's synchronization loop:
//! everything is single-threaded and cooperative. Signals therefore invoke
//! slots directly by default; emissions that should not interleave with the
//! current interaction can be parked on a per-signal deferred queue and
//! flushed by the host at a safe point (see [`Signal::emit_deferred`] and
//! [`Signal::flush_deferred`]).

pub mod cancellation;
pub mod error;
pub mod logging;
pub mod signal;

pub use cancellation::CancellationToken;
pub use error::{CoreError, Result, SignalError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
