//! Numeric and condition primitives shared by the game's data-driven systems.
//!
//! `sky-core` holds the small building blocks that loaded game data is made
//! of: total conversions between primitive numbers ([`cast`]), values that
//! may be literals or live references into a condition store
//! ([`Condition`]), and weighted random selection ([`WeightedList`]).
//! Everything here is single-threaded and free of I/O; parsing lives in
//! `sky-data`.
pub mod cast;
pub mod condition;
pub mod error;
pub mod rng;
pub mod store;
pub mod weighted;

pub use cast::{Arithmetic, CastFrom, NumericKind, arithmetic_cast, not_near_zero};
pub use condition::{Condition, ValueValidator};
pub use error::{ErrorSeverity, GameError};
pub use rng::{PcgRng, RandomSource};
pub use store::{ConditionEntry, ConditionGetter, ConditionsStore, Provider, StoreValue};
pub use weighted::{ValidWeight, Weight, WeightedList, WeightedListError, is_a_valid_weight};
