//! Widget shells: the headless field widgets wiring consolidation,
//! transformation, validation and reconciliation into host-driven
//! synchronization passes.
//!
//! Each widget owns its reactive state, accepts host-dispatched events and
//! exposes change signals; rendering stays with the host. Composite widgets
//! ([`Interval`], [`InputList`]) embed other widgets and aggregate their
//! model state.

mod checkbox;
mod input_list;
mod interval;
mod text_input;

pub use checkbox::Checkbox;
pub use input_list::{InputList, ListModelState, ListProperties, ListProps};
pub use interval::{Interval, IntervalProperties, IntervalValue};
pub use text_input::TextInput;

use crate::consolidate::{Properties, Props};
use crate::error::Result;
use crate::model::ModelState;

/// The seam composite widgets build on: anything that accepts external
/// configuration, synchronizes into consolidated properties and reports a
/// model state.
pub trait FieldWidget {
    /// Construct a widget from external configuration.
    fn create(props: Props) -> Self
    where
        Self: Sized;

    /// Supply new external configuration.
    fn set_props(&mut self, props: Props);

    /// Run one synchronization pass.
    fn sync(&mut self) -> Result<Properties>;

    /// The last consolidated properties, if a pass ran already.
    fn properties(&self) -> Option<&Properties>;

    /// The current interaction/validity state.
    fn model_state(&self) -> ModelState;

    /// Release resources when the host removes the widget.
    fn unmount(&mut self);
}
