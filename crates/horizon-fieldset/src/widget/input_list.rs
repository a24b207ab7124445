//! The repeatable-item list widget.
//!
//! `InputList` manages an ordered list of child widgets behind the
//! [`FieldWidget`] seam. Items are appended from factory callbacks (the
//! permanently visible "add" placeholder uses the prototype factory, actual
//! entries the item factory, seeded with the previous item's value), list
//! length is constrained by `minimum_number`/`maximum_number`, and the
//! children's model states aggregate into one list-level state.
//!
//! A newly appended item's consolidation is not available until the list has
//! synchronized with the item mounted, so the list settles over three
//! phases (`Added → Rendered → Stabilized`) and fires its aggregate change
//! only on the second pass — reporting an item's defaults as if they were
//! consolidated would hand hosts half-built data.

use horizon_fieldset_core::Signal;

use crate::consolidate::{Properties, Props};
use crate::error::Result;
use crate::model::{ModelState, Value};

use super::{FieldWidget, TextInput};

/// Factory producing an item's configuration from its index and the seeded
/// prototype configuration.
pub type ItemFactory = Box<dyn Fn(usize, Props) -> Props + Send + Sync>;

/// List-level model state: the aggregate of every child plus the length
/// constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListModelState {
    /// Child states combined (OR for failure/interaction flags, AND for
    /// their complements), with the length constraints folded into
    /// `invalid`/`valid`.
    pub state: ModelState,
    /// Fewer items than `minimum_number`.
    pub invalid_minimum_number: bool,
    /// More items than `maximum_number`.
    pub invalid_maximum_number: bool,
}

/// External configuration of the repeatable list.
#[derive(Debug, Clone)]
pub struct ListProps {
    /// Technical field name.
    pub name: Option<String>,
    /// Least number of items considered valid.
    pub minimum_number: usize,
    /// Greatest number of items considered valid (and addable).
    pub maximum_number: usize,
    /// Base configuration applied to every item.
    pub item_defaults: Props,
    /// Initial item configurations.
    pub default_items: Vec<Props>,
    /// Collapse an empty list to a null aggregate value.
    pub empty_equals_null: bool,
    /// Force uncontrolled behavior on every item.
    pub enforce_uncontrolled: bool,
    /// Fire one synthetic aggregate change once initially settled.
    pub trigger_initial_properties_consolidation: bool,
}

impl Default for ListProps {
    fn default() -> Self {
        Self {
            name: None,
            minimum_number: 0,
            maximum_number: usize::MAX,
            item_defaults: Props::default(),
            default_items: Vec::new(),
            empty_equals_null: true,
            enforce_uncontrolled: false,
            trigger_initial_properties_consolidation: false,
        }
    }
}

/// The consolidated external view of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListProperties {
    /// Field name of the composite.
    pub name: String,
    /// Fully consolidated child records in order.
    pub items: Vec<Properties>,
    /// Aggregated list-level state.
    pub state: ListModelState,
    /// The children's typed values; `None` when empty and
    /// `empty_equals_null` is set.
    pub value: Option<Vec<Value>>,
    /// Whether another item may be appended.
    pub can_add: bool,
    /// Whether items may be removed without violating the minimum.
    pub can_remove: bool,
}

/// The two-pass settling protocol for freshly appended items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SettlePhase {
    #[default]
    Stabilized,
    Added,
    Rendered,
}

/// A headless repeatable-item list.
///
/// # Signals
///
/// - `changed(ListProperties)`: the settled aggregate view changed
/// - `value_changed((Option<Vec<Value>>, ListProperties))`: the aggregate value changed
pub struct InputList<W: FieldWidget = TextInput> {
    props: ListProps,
    items: Vec<W>,
    create_item: Option<ItemFactory>,
    create_prototype: Option<ItemFactory>,
    phase: SettlePhase,
    synced_once: bool,
    initial_consolidation_fired: bool,
    last_value: Option<Vec<Value>>,
    last_state: ListModelState,

    /// Emitted when the settled aggregate view changed.
    pub changed: Signal<ListProperties>,
    /// Emitted when the aggregate value changed.
    pub value_changed: Signal<(Option<Vec<Value>>, ListProperties)>,
}

impl<W: FieldWidget> InputList<W> {
    /// Create a list from external configuration.
    ///
    /// Impossible length bounds are a configuration error.
    pub fn new(props: ListProps) -> Result<Self> {
        if props.minimum_number > props.maximum_number {
            return Err(crate::error::Error::InvalidItemBounds {
                minimum: props.minimum_number,
                maximum: props.maximum_number,
            });
        }
        let mut list = Self {
            props,
            items: Vec::new(),
            create_item: None,
            create_prototype: None,
            phase: SettlePhase::Stabilized,
            synced_once: false,
            initial_consolidation_fired: false,
            last_value: None,
            last_state: ListModelState::default(),

            changed: Signal::new(),
            value_changed: Signal::new(),
        };
        for (index, item_props) in list.props.default_items.clone().into_iter().enumerate() {
            let seeded = list.seed_item_props(index, item_props);
            list.items.push(W::create(seeded));
        }
        Ok(list)
    }

    /// Replace the item factory used for appended entries.
    pub fn with_create_item(mut self, factory: ItemFactory) -> Self {
        self.create_item = Some(factory);
        self
    }

    /// Replace the prototype factory used for the "add" placeholder.
    pub fn with_create_prototype(mut self, factory: ItemFactory) -> Self {
        self.create_prototype = Some(factory);
        self
    }

    /// The current child widgets.
    pub fn items(&self) -> &[W] {
        &self.items
    }

    /// A child widget, for event dispatch.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut W> {
        self.items.get_mut(index)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configuration the permanently visible "add" placeholder renders
    /// with: the item defaults seeded with the last item's value.
    pub fn prototype_props(&self) -> Props {
        let seeded = self.seed_item_props(self.items.len(), self.props.item_defaults.clone());
        match &self.create_prototype {
            Some(factory) => factory(self.items.len(), seeded),
            None => seeded,
        }
    }

    fn seed_item_props(&self, index: usize, mut item_props: Props) -> Props {
        let defaults = &self.props.item_defaults;
        if item_props.kind.is_none() {
            item_props.kind = defaults.kind;
        }
        if item_props.name.is_none() {
            let base = self.props.name.as_deref().unwrap_or("inputs");
            item_props.name = Some(format!("{base}-{index}"));
        }
        if item_props.default.is_none() {
            // Context for new entries: the previous item's last value.
            item_props.default = self
                .items
                .last()
                .and_then(|item| item.properties())
                .map(|properties| properties.value.clone())
                .filter(|value| !value.is_null());
        }
        item_props.enforce_uncontrolled =
            item_props.enforce_uncontrolled || self.props.enforce_uncontrolled;
        item_props
    }

    /// Append a new item, unless the maximum is reached.
    ///
    /// Returns the new item's index. The aggregate change for the appended
    /// item fires after the second synchronization pass, once its own
    /// consolidation is available.
    pub fn add_item(&mut self) -> Option<usize> {
        if self.items.len() >= self.props.maximum_number {
            return None;
        }
        let index = self.items.len();
        let seeded = self.seed_item_props(index, self.props.item_defaults.clone());
        let item_props = match &self.create_item {
            Some(factory) => factory(index, seeded),
            None => seeded,
        };
        self.items.push(W::create(item_props));
        self.phase = SettlePhase::Added;
        Some(index)
    }

    /// Remove the item at `index`.
    ///
    /// Removal below the minimum is allowed; the aggregate state flags the
    /// violation instead.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let mut item = self.items.remove(index);
        item.unmount();
        self.phase = SettlePhase::Added;
        true
    }

    /// Run one synchronization pass over every child and settle the list.
    pub fn sync(&mut self) -> Result<ListProperties> {
        let mut item_properties = Vec::with_capacity(self.items.len());
        for item in &mut self.items {
            item_properties.push(item.sync()?);
        }

        let state = self.aggregate_state(&item_properties);
        let value = self.aggregate_value(&item_properties);

        let properties = ListProperties {
            name: self
                .props
                .name
                .clone()
                .unwrap_or_else(|| "NO_NAME_DEFINED".to_string()),
            can_add: item_properties.len() < self.props.maximum_number,
            can_remove: item_properties.len() > self.props.minimum_number,
            items: item_properties,
            state,
            value: value.clone(),
        };

        // Two-pass settling: a freshly added item reports through the
        // aggregate only after its own consolidation ran.
        let mut force_emit = false;
        match self.phase {
            SettlePhase::Added => self.phase = SettlePhase::Rendered,
            SettlePhase::Rendered => {
                self.phase = SettlePhase::Stabilized;
                force_emit = true;
            }
            SettlePhase::Stabilized => {}
        }

        let settled = self.phase == SettlePhase::Stabilized;
        let value_moved = self.synced_once && settled && value != self.last_value;
        let state_moved = self.synced_once && settled && state != self.last_state;

        if force_emit || value_moved || state_moved {
            self.changed.emit(properties.clone());
        }
        if force_emit || value_moved {
            self.value_changed.emit((value.clone(), properties.clone()));
        }

        if settled
            && self.props.trigger_initial_properties_consolidation
            && !self.initial_consolidation_fired
        {
            self.initial_consolidation_fired = true;
            self.changed.emit(properties.clone());
        }

        if settled {
            self.synced_once = true;
            self.last_value = value;
            self.last_state = state;
        }
        Ok(properties)
    }

    /// Release every child and all connections.
    pub fn unmount(&mut self) {
        for item in &mut self.items {
            item.unmount();
        }
        self.items.clear();
        self.changed.disconnect_all();
        self.value_changed.disconnect_all();
    }

    fn aggregate_state(&self, items: &[Properties]) -> ListModelState {
        let mut state = ModelState::aggregate(items.iter().map(|properties| &properties.state));

        let invalid_minimum_number = self.items.len() < self.props.minimum_number;
        let invalid_maximum_number = self.items.len() > self.props.maximum_number;
        if invalid_minimum_number || invalid_maximum_number {
            state.invalid = true;
            state.valid = false;
        }

        ListModelState {
            state,
            invalid_minimum_number,
            invalid_maximum_number,
        }
    }

    fn aggregate_value(&self, items: &[Properties]) -> Option<Vec<Value>> {
        if items.is_empty() && self.props.empty_equals_null {
            return None;
        }
        Some(items.iter().map(|properties| properties.value.clone()).collect())
    }
}

impl<W: FieldWidget> std::fmt::Debug for InputList<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputList")
            .field("items", &self.items.len())
            .field("phase", &self.phase)
            .field("last_value", &self.last_value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::model::FieldKind;

    fn integer_list(minimum: usize, maximum: usize) -> InputList {
        InputList::new(ListProps {
            name: Some("amounts".to_string()),
            minimum_number: minimum,
            maximum_number: maximum,
            item_defaults: Props::new().with_kind(FieldKind::Integer),
            ..ListProps::default()
        })
        .unwrap()
    }

    #[test]
    fn test_impossible_bounds_are_rejected() {
        let result: crate::error::Result<InputList> = InputList::new(ListProps {
            minimum_number: 3,
            maximum_number: 1,
            ..ListProps::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_length_bounds_scenario() {
        let mut list = integer_list(2, 2);
        list.add_item();
        list.sync().unwrap();
        let properties = list.sync().unwrap();

        // One item of a mandatory two: invalid below the minimum, add still
        // possible.
        assert!(properties.state.invalid_minimum_number);
        assert!(!properties.state.invalid_maximum_number);
        assert!(properties.state.state.invalid);
        assert!(properties.can_add);

        list.add_item();
        list.sync().unwrap();
        let properties = list.sync().unwrap();
        assert!(!properties.state.invalid_minimum_number);
        assert!(properties.state.state.valid);
        // The add affordance disappears once the maximum is reached.
        assert!(!properties.can_add);
        assert!(list.add_item().is_none());
    }

    #[test]
    fn test_two_pass_settling() {
        let mut list = integer_list(0, 10);
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        list.changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        list.sync().unwrap();

        list.add_item();
        // First pass after the add: the new item just rendered, no report.
        list.sync().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        // Second pass: consolidated child data is available, report fires.
        list.sync().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        // Settled passes stay silent.
        list.sync().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_list_collapses_to_null() {
        let mut list = integer_list(0, 10);
        let properties = list.sync().unwrap();
        assert_eq!(properties.value, None);

        list.add_item();
        list.sync().unwrap();
        let properties = list.sync().unwrap();
        assert_eq!(properties.value, Some(vec![Value::Null]));
    }

    #[test]
    fn test_new_item_inherits_previous_value() {
        let mut list = integer_list(0, 10);
        list.add_item();
        list.sync().unwrap();
        list.sync().unwrap();

        list.item_mut(0).unwrap().handle_input("7").unwrap();
        list.sync().unwrap();

        list.add_item();
        list.sync().unwrap();
        let properties = list.sync().unwrap();

        // The appended entry adopted the previous item's value as default.
        assert_eq!(properties.items[1].value, Value::Int(7));
    }

    #[test]
    fn test_remove_item() {
        let mut list = integer_list(0, 10);
        list.add_item();
        list.add_item();
        list.sync().unwrap();
        list.sync().unwrap();
        assert_eq!(list.len(), 2);

        assert!(list.remove_item(0));
        assert!(!list.remove_item(5));
        list.sync().unwrap();
        let properties = list.sync().unwrap();
        assert_eq!(properties.items.len(), 1);
    }

    #[test]
    fn test_aggregate_state_from_children() {
        let mut list = integer_list(0, 10);
        list.add_item();
        list.sync().unwrap();
        list.sync().unwrap();

        list.item_mut(0).unwrap().handle_focus().unwrap();
        let properties = list.sync().unwrap();
        assert!(properties.state.state.focused);
        assert!(properties.state.state.touched);

        list.item_mut(0).unwrap().handle_input("3").unwrap();
        let properties = list.sync().unwrap();
        assert!(properties.state.state.dirty);
        assert!(!properties.state.state.pristine);
    }

    #[test]
    fn test_prototype_seeded_with_last_value() {
        let mut list = integer_list(0, 10).with_create_prototype(Box::new(|_, mut seeded| {
            seeded.show_validation_state = Some(false);
            seeded
        }));
        list.add_item();
        list.sync().unwrap();
        list.sync().unwrap();
        list.item_mut(0).unwrap().handle_input("42").unwrap();
        list.sync().unwrap();

        let prototype = list.prototype_props();
        assert_eq!(prototype.default, Some(Value::Int(42)));
        assert_eq!(prototype.show_validation_state, Some(false));
    }

    #[test]
    fn test_item_factory_receives_seeded_prototype() {
        let mut list = integer_list(0, 10).with_create_item(Box::new(|index, mut seeded| {
            seeded.description = Some(format!("entry #{index}"));
            seeded
        }));

        list.add_item();
        list.sync().unwrap();
        let properties = list.sync().unwrap();
        assert_eq!(properties.items[0].description, "entry #0");
        assert_eq!(properties.items[0].name, "amounts-0");
    }
}
