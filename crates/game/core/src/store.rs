//! Named value stores that conditions resolve against.
//!
//! Game state is exposed to data-driven logic as a flat map of named integer
//! values ("conditions"). Consumers only need the [`ConditionGetter`] contract;
//! [`ConditionsStore`] is the in-memory implementation used by the game and
//! the tests. A store is shared through `Rc` and hands out `Rc` slots
//! ([`ConditionEntry`]) that [`Condition`](crate::Condition) caches weakly.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;

use crate::cast::Arithmetic;

/// Value type stored by [`ConditionsStore`].
pub type StoreValue = i64;

/// Computes a slot value on demand instead of reading a stored scalar.
pub type Provider = Rc<dyn Fn() -> StoreValue>;

/// Lookup contract shared by every scope that can answer "what is `name`?".
pub trait ConditionGetter {
    type Value: Arithmetic;

    /// Returns the value of `name`, or `None` if the scope does not know it.
    fn has_get(&self, name: &str) -> Option<Self::Value>;
}

impl<G: ConditionGetter + ?Sized> ConditionGetter for &G {
    type Value = G::Value;

    fn has_get(&self, name: &str) -> Option<Self::Value> {
        (**self).has_get(name)
    }
}

impl<G: ConditionGetter + ?Sized> ConditionGetter for Rc<G> {
    type Value = G::Value;

    fn has_get(&self, name: &str) -> Option<Self::Value> {
        (**self).has_get(name)
    }
}

impl<N: Arithmetic, S: BuildHasher> ConditionGetter for HashMap<String, N, S> {
    type Value = N;

    fn has_get(&self, name: &str) -> Option<N> {
        self.get(name).copied()
    }
}

impl<N: Arithmetic> ConditionGetter for BTreeMap<String, N> {
    type Value = N;

    fn has_get(&self, name: &str) -> Option<N> {
        self.get(name).copied()
    }
}

/// One named slot in a [`ConditionsStore`].
#[derive(Default)]
pub struct ConditionEntry {
    value: Cell<StoreValue>,
    provider: RefCell<Option<Provider>>,
}

impl ConditionEntry {
    /// Current value: the provider's result if one is attached, otherwise the stored scalar.
    pub fn value(&self) -> StoreValue {
        // Clone the provider out so it may touch this slot while running.
        let provider = self.provider.borrow().clone();
        match provider {
            Some(provider) => provider(),
            None => self.value.get(),
        }
    }

    /// Overwrites the stored scalar. Provider-backed slots keep reporting the provider's value.
    pub fn set(&self, value: StoreValue) {
        self.value.set(value);
    }

    pub fn has_provider(&self) -> bool {
        self.provider.borrow().is_some()
    }
}

impl fmt::Debug for ConditionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionEntry")
            .field("value", &self.value.get())
            .field("provider", &self.has_provider())
            .finish()
    }
}

/// In-memory condition store.
///
/// All methods take `&self`: the store is shared between every condition
/// bound to it, and single-threaded interior mutability keeps that sharing
/// cheap. Erasing a name drops its slot, so weak references held by bound
/// conditions go stale and are re-resolved on their next read.
#[derive(Debug, Default)]
pub struct ConditionsStore {
    entries: RefCell<BTreeMap<String, Rc<ConditionEntry>>>,
}

impl ConditionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, or 0 when the store has no such slot.
    pub fn get(&self, name: &str) -> StoreValue {
        self.get_entry(name).map_or(0, |entry| entry.value())
    }

    /// Sets the stored scalar for `name`, creating the slot if needed.
    pub fn set(&self, name: &str, value: StoreValue) {
        tracing::trace!(name, value, "condition set");
        self.ensure_entry(name).set(value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Existing slot for `name`, if any. Never creates one.
    pub fn get_entry(&self, name: &str) -> Option<Rc<ConditionEntry>> {
        self.entries.borrow().get(name).cloned()
    }

    /// Slot for `name`, created with value 0 if absent.
    pub fn ensure_entry(&self, name: &str) -> Rc<ConditionEntry> {
        self.entries
            .borrow_mut()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// Attaches a provider to `name`; reads of the slot call it instead of the stored scalar.
    pub fn set_provider(&self, name: &str, provider: impl Fn() -> StoreValue + 'static) {
        let entry = self.ensure_entry(name);
        *entry.provider.borrow_mut() = Some(Rc::new(provider));
    }

    /// Removes the slot for `name`. Returns whether it existed.
    pub fn erase(&self, name: &str) -> bool {
        let removed = self.entries.borrow_mut().remove(name).is_some();
        if removed {
            tracing::debug!(name, "condition erased");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Names of all slots, in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl ConditionGetter for ConditionsStore {
    type Value = StoreValue;

    fn has_get(&self, name: &str) -> Option<StoreValue> {
        self.get_entry(name).map(|entry| entry.value())
    }
}

impl<K: Into<String>> FromIterator<(K, StoreValue)> for ConditionsStore {
    fn from_iter<I: IntoIterator<Item = (K, StoreValue)>>(iter: I) -> Self {
        let store = Self::new();
        for (name, value) in iter {
            let name: String = name.into();
            store.set(&name, value);
        }
        store
    }
}
