//! Weighted random selection.
//!
//! A [`WeightedList`] pairs each choice with an integer weight; drawing from
//! it returns a choice with probability `weight / total`. Weights may be
//! plain numbers or [`Condition`]s bound to a store, in which case
//! [`WeightedList::update_conditions`] pulls fresh values from a getter.
//!
//! # Invariants
//!
//! - `choices`, `weights` and `amounts` always have the same length and are
//!   index-aligned
//! - every stored weight is valid (at least one and finite) or zero, checked
//!   in the weight's own type
//! - the cached total equals the sum of `amounts` after every mutation
//!
//! `amounts` is a snapshot taken when a weight is pushed or refreshed.
//! Reading a [`Condition`] weight through `&self` may update its memo, but
//! never changes what the list draws against.

use std::ops::Range;

use crate::cast::Arithmetic;
use crate::condition::{Condition, ValueValidator};
use crate::error::{ErrorSeverity, GameError};
use crate::rng::RandomSource;
use crate::store::ConditionGetter;

/// Weights must be at least one, and must be finite.
///
/// "Finite" is checked as `w + 1 > w`, which fails for infinities, NaN and
/// integer maxima alike.
pub fn is_a_valid_weight<N: Arithmetic>(weight: N) -> bool {
    weight >= N::ONE && weight.increment_exceeds()
}

/// Validator form of [`is_a_valid_weight`], for
/// [`Condition::update_conditions_validated`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidWeight;

impl ValueValidator for ValidWeight {
    fn is_valid<N: Arithmetic>(&self, value: N) -> bool {
        is_a_valid_weight(value)
    }
}

/// A weight stored in a [`WeightedList`].
pub trait Weight {
    /// Contribution to the list's total weight.
    fn amount(&self) -> u64;

    /// Store key this weight is read from, if it is bound to one.
    fn key(&self) -> Option<&str> {
        None
    }

    fn is_valid(&self) -> bool;

    /// Replaces the weight's value with `raw`, coerced.
    fn assign<R: Arithmetic>(&mut self, raw: R);

    /// Sets the weight to zero, keeping any binding.
    fn clear(&mut self);
}

impl<N: Arithmetic> Weight for N {
    fn amount(&self) -> u64 {
        self.cast()
    }

    fn is_valid(&self) -> bool {
        is_a_valid_weight(*self)
    }

    fn assign<R: Arithmetic>(&mut self, raw: R) {
        *self = raw.cast();
    }

    fn clear(&mut self) {
        *self = N::ZERO;
    }
}

/// Condition weights are weighed by their memo when admitted to a list;
/// [`WeightedList::update_conditions`] refreshes them.
impl<V: Arithmetic> Weight for Condition<V> {
    fn amount(&self) -> u64 {
        self.cached().cast()
    }

    fn key(&self) -> Option<&str> {
        self.has_conditions().then(|| self.name())
    }

    fn is_valid(&self) -> bool {
        is_a_valid_weight(self.cached())
    }

    fn assign<R: Arithmetic>(&mut self, raw: R) {
        self.set_cached(raw.cast());
    }

    fn clear(&mut self) {
        self.set_cached(V::ZERO);
    }
}

/// Errors returned by [`WeightedList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WeightedListError {
    /// A draw was requested from a list with no entries.
    #[error("attempted to draw from an empty weighted list")]
    Empty,
}

impl GameError for WeightedListError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Empty => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "WEIGHTED_LIST_EMPTY",
        }
    }
}

/// A list of choices, each weighted by an integer, for random selection.
#[derive(Clone, Debug)]
pub struct WeightedList<T, W = u32> {
    choices: Vec<T>,
    weights: Vec<W>,
    amounts: Vec<u64>,
    total: u64,
}

impl<T, W> Default for WeightedList<T, W> {
    fn default() -> Self {
        Self {
            choices: Vec::new(),
            weights: Vec::new(),
            amounts: Vec::new(),
            total: 0,
        }
    }
}

impl<T, W: Weight> WeightedList<T, W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            choices: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            amounts: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    /// Draws a random choice, weighted by the current weights.
    ///
    /// When every weight is zero, the first choice is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WeightedListError::Empty`] if the list has no entries.
    pub fn get<R>(&self, rng: &mut R) -> Result<&T, WeightedListError>
    where
        R: RandomSource + ?Sized,
    {
        if self.choices.is_empty() {
            return Err(WeightedListError::Empty);
        }
        if self.total == 0 {
            return Ok(&self.choices[0]);
        }

        let mut choice = rng.int(self.total);
        let index = self
            .amounts
            .iter()
            .position(|&amount| {
                if choice < amount {
                    return true;
                }
                choice -= amount;
                false
            })
            .unwrap_or(self.choices.len() - 1);
        Ok(&self.choices[index])
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Weighted mean of `projection` over all choices; zero when the total weight is zero.
    pub fn average<N, F>(&self, mut projection: F) -> N
    where
        N: Arithmetic,
        F: FnMut(&T) -> N,
    {
        if self.total == 0 {
            return N::ZERO;
        }
        let sum: f64 = self
            .choices
            .iter()
            .zip(&self.amounts)
            .map(|(choice, &amount)| projection(choice).cast::<f64>() * amount.cast::<f64>())
            .sum();
        (sum / self.total.cast::<f64>()).cast()
    }

    /// Refreshes every store-bound weight from `getter`.
    ///
    /// Found values that are not valid weights become zero; names the getter
    /// does not know leave their weight unchanged.
    pub fn update_conditions<G>(&mut self, getter: &G)
    where
        G: ConditionGetter + ?Sized,
    {
        for (weight, amount) in self.weights.iter_mut().zip(&mut self.amounts) {
            let Some(raw) = weight.key().and_then(|key| getter.has_get(key)) else {
                continue;
            };
            if ValidWeight.is_valid(raw) {
                weight.assign(raw);
            } else {
                weight.clear();
            }
            *amount = admit(weight);
        }
        self.recalculate_weight();
        tracing::trace!(total = self.total, "weights updated");
    }

    /// True if `predicate(weight, choice)` holds for some choice.
    ///
    /// Scanning stops at the first zero-weight entry: choices from there on
    /// cannot be drawn while it precedes them with no weight.
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&W, &T) -> bool,
    {
        self.weights
            .iter()
            .zip(&self.choices)
            .zip(&self.amounts)
            .take_while(|(_, amount)| **amount != 0)
            .any(|((weight, choice), _)| predicate(weight, choice))
    }

    /// True if `predicate(weight, choice)` holds for every choice.
    pub fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&W, &T) -> bool,
    {
        self.weights
            .iter()
            .zip(&self.choices)
            .all(|(weight, choice)| predicate(weight, choice))
    }

    /// Appends `value` with `weight`. Invalid weights are stored as zero.
    pub fn push(&mut self, mut weight: W, value: T) -> &mut T {
        let amount = admit(&mut weight);
        self.total = self.total.saturating_add(amount);
        self.amounts.push(amount);
        self.weights.push(weight);
        self.choices.push(value);
        let last = self.choices.len() - 1;
        &mut self.choices[last]
    }

    /// Removes and returns the choice at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn erase_at(&mut self, index: usize) -> T {
        self.weights.remove(index);
        let amount = self.amounts.remove(index);
        self.total = self.total.saturating_sub(amount);
        self.choices.remove(index)
    }

    /// Removes the choices in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn erase(&mut self, range: Range<usize>) {
        self.weights.drain(range.clone());
        self.amounts.drain(range.clone());
        self.choices.drain(range);
        self.recalculate_weight();
    }

    /// Removes every choice matching `predicate`, keeping the others in
    /// order. Returns the number removed.
    pub fn erase_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.choices.len();
        let mut kept = 0;
        for index in 0..len {
            if predicate(&self.choices[index]) {
                continue;
            }
            if kept != index {
                self.choices.swap(kept, index);
                self.weights.swap(kept, index);
                self.amounts.swap(kept, index);
            }
            kept += 1;
        }
        self.choices.truncate(kept);
        self.weights.truncate(kept);
        self.amounts.truncate(kept);
        self.recalculate_weight();
        len - kept
    }

    /// Removes every choice equal to `item`. Returns the number removed.
    pub fn erase_item(&mut self, item: &T) -> usize
    where
        T: PartialEq,
    {
        self.erase_if(|choice| choice == item)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn clear(&mut self) {
        self.choices.clear();
        self.weights.clear();
        self.amounts.clear();
        self.total = 0;
    }

    pub fn reserve(&mut self, additional: usize) {
        self.choices.reserve(additional);
        self.weights.reserve(additional);
        self.amounts.reserve(additional);
    }

    pub fn last(&self) -> Option<&T> {
        self.choices.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.choices.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.choices.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.choices.iter_mut()
    }

    /// `(weight, choice)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&W, &T)> {
        self.weights.iter().zip(&self.choices)
    }

    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Weights as the list draws against them, one per choice.
    pub fn amounts(&self) -> &[u64] {
        &self.amounts
    }

    pub fn as_slice(&self) -> &[T] {
        &self.choices
    }

    fn recalculate_weight(&mut self) {
        self.total = self
            .amounts
            .iter()
            .fold(0u64, |total, &amount| total.saturating_add(amount));
    }
}

/// Zeroes `weight` unless it is valid in its own type, then returns its amount.
fn admit<W: Weight>(weight: &mut W) -> u64 {
    if !weight.is_valid() {
        weight.clear();
    }
    weight.amount()
}

impl<'a, T, W> IntoIterator for &'a WeightedList<T, W> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}

impl<T, W: Weight> Extend<(W, T)> for WeightedList<T, W> {
    fn extend<I: IntoIterator<Item = (W, T)>>(&mut self, iter: I) {
        for (weight, value) in iter {
            self.push(weight, value);
        }
    }
}

impl<T, W: Weight> FromIterator<(W, T)> for WeightedList<T, W> {
    fn from_iter<I: IntoIterator<Item = (W, T)>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
