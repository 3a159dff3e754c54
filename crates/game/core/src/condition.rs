//! Values that are either literals or live references into a condition store.
//!
//! Data files write `"weight" 5` as often as `"weight" "pirate reputation"`.
//! [`Condition`] covers both: a literal keeps its value, while a named
//! condition bound to a [`ConditionsStore`] reads through to the store on
//! every [`Condition::value`] call.
//!
//! # Slot caching
//!
//! A bound condition keeps a weak reference to the store's slot for its name
//! so repeated reads skip the name lookup. The store may drop slots at any
//! time, so the weak reference is upgraded on every read and the slot is
//! looked up again by name whenever the upgrade fails.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::cast::Arithmetic;
use crate::store::{ConditionEntry, ConditionGetter, ConditionsStore, StoreValue};

/// Decides whether a value read from a getter may be used.
///
/// Validators see the raw store value in the store's own type and the
/// current memo in the condition's type, so they are generic over
/// [`Arithmetic`]. Any `Fn(f64) -> bool` closure is a validator as well.
pub trait ValueValidator {
    fn is_valid<N: Arithmetic>(&self, value: N) -> bool;
}

impl<F: Fn(f64) -> bool> ValueValidator for F {
    fn is_valid<N: Arithmetic>(&self, value: N) -> bool {
        self(value.cast())
    }
}

/// A literal value, or a named value resolved from a condition store.
///
/// A condition is *bound* when it has a non-empty name and a store handle.
/// Bound conditions treat the store as authoritative; the local value is
/// only a memo of the last value observed.
pub struct Condition<V> {
    value: Cell<V>,
    name: String,
    store: Option<Rc<ConditionsStore>>,
    element: RefCell<Weak<ConditionEntry>>,
}

impl<V: Arithmetic> Condition<V> {
    /// A literal condition.
    pub fn new(value: V) -> Self {
        Self {
            value: Cell::new(value),
            name: String::new(),
            store: None,
            element: RefCell::new(Weak::new()),
        }
    }

    /// A named condition with an initial value. Not bound until [`Condition::bind`].
    pub fn named(value: V, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(value)
        }
    }

    /// A named condition bound to `store`.
    pub fn bound(name: impl Into<String>, store: &Rc<ConditionsStore>) -> Self {
        let mut condition = Self::named(V::ZERO, name);
        condition.bind(store);
        condition
    }

    /// Binds a named condition to `store` and reads its current value.
    ///
    /// Literals have nothing to bind and are left untouched.
    pub fn bind(&mut self, store: &Rc<ConditionsStore>) {
        if self.name.is_empty() {
            return;
        }
        self.store = Some(Rc::clone(store));
        *self.element.get_mut() = Weak::new();
        self.value();
    }

    /// Current value. Bound conditions resolve through the store; a missing
    /// slot reads as zero.
    pub fn value(&self) -> V {
        if !self.has_conditions() {
            return self.value.get();
        }
        let resolved = self
            .entry_from_store()
            .map_or(V::ZERO, |entry| entry.value().cast());
        self.value.set(resolved);
        resolved
    }

    /// Last value observed or assigned, without consulting the store.
    pub fn cached(&self) -> V {
        self.value.get()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Does this condition read from a store?
    pub fn has_conditions(&self) -> bool {
        self.store.is_some() && !self.name.is_empty()
    }

    /// Does this condition come from the same place as `other`?
    ///
    /// Bound conditions compare names (values don't matter), literals compare
    /// values, and a bound condition never matches a literal.
    pub fn same_origin(&self, other: &Self) -> bool {
        if self.has_conditions() {
            other.has_conditions() && self.name == other.name
        } else if other.has_conditions() {
            false
        } else {
            self.value() == other.value()
        }
    }

    /// Refreshes the memo from `getter`. Literals are left unchanged.
    pub fn update_conditions<G>(&mut self, getter: &G) -> V
    where
        G: ConditionGetter + ?Sized,
    {
        if self.has_conditions() {
            if let Some(raw) = getter.has_get(&self.name) {
                self.value.set(raw.cast());
            }
        }
        self.value.get()
    }

    /// Refreshes the memo from `getter`, accepting only values `validator` allows.
    ///
    /// A fresh valid value wins; otherwise a currently valid value is kept;
    /// otherwise the value resets to zero.
    pub fn update_conditions_validated<G, F>(&mut self, getter: &G, validator: F) -> V
    where
        G: ConditionGetter + ?Sized,
        F: ValueValidator,
    {
        if self.has_conditions() {
            match getter.has_get(&self.name) {
                Some(raw) if validator.is_valid(raw) => {
                    let value = raw.cast();
                    self.value.set(value);
                    return value;
                }
                _ => {}
            }
        }
        if !validator.is_valid(self.value.get()) {
            self.value.set(V::ZERO);
        }
        self.value.get()
    }

    /// Writes `value`. Bound conditions store it under their name (creating
    /// the slot if needed) and return the value as the store holds it;
    /// literals simply take the new value.
    pub fn set(&mut self, value: V) -> V {
        let Some(entry) = self.ensure_entry_in_store() else {
            self.value.set(value);
            return value;
        };
        let stored: StoreValue = value.cast();
        entry.set(stored);
        let echoed = stored.cast();
        self.value.set(echoed);
        echoed
    }

    /// True unless the resolved value is within half its type's precision of zero.
    pub fn is_truthy(&self) -> bool {
        self.value().not_near_zero()
    }

    /// Converts from a condition of another value type, keeping name and binding.
    pub fn assign_from<V2: Arithmetic>(&mut self, other: &Condition<V2>) {
        *self = Self::from(other);
    }

    /// Overwrites the memo without touching the store.
    pub(crate) fn set_cached(&self, value: V) {
        self.value.set(value);
    }

    fn entry_from_store(&self) -> Option<Rc<ConditionEntry>> {
        if let Some(entry) = self.element.borrow().upgrade() {
            return Some(entry);
        }
        let entry = self.store.as_ref()?.get_entry(&self.name)?;
        tracing::trace!(name = %self.name, "resolved condition slot");
        *self.element.borrow_mut() = Rc::downgrade(&entry);
        Some(entry)
    }

    fn ensure_entry_in_store(&self) -> Option<Rc<ConditionEntry>> {
        if !self.has_conditions() {
            return None;
        }
        if let Some(entry) = self.element.borrow().upgrade() {
            return Some(entry);
        }
        let entry = self.store.as_ref()?.ensure_entry(&self.name);
        *self.element.borrow_mut() = Rc::downgrade(&entry);
        Some(entry)
    }
}

impl<V: Arithmetic> Default for Condition<V> {
    fn default() -> Self {
        Self::new(V::ZERO)
    }
}

impl<V: Arithmetic> Clone for Condition<V> {
    fn clone(&self) -> Self {
        Self {
            value: Cell::new(self.value.get()),
            name: self.name.clone(),
            store: self.store.clone(),
            element: RefCell::new(self.element.borrow().clone()),
        }
    }
}

impl<V: Arithmetic> From<V> for Condition<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V: Arithmetic, V2: Arithmetic> From<&Condition<V2>> for Condition<V> {
    fn from(other: &Condition<V2>) -> Self {
        Self {
            value: Cell::new(other.value().cast()),
            name: other.name.clone(),
            store: other.store.clone(),
            element: RefCell::new(Weak::new()),
        }
    }
}

impl<V: Arithmetic> fmt::Debug for Condition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("value", &self.value.get())
            .field("name", &self.name)
            .field("bound", &self.has_conditions())
            .finish()
    }
}

impl<V: Arithmetic> fmt::Display for Condition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.value.get())
        } else {
            f.write_str(&self.name)
        }
    }
}
