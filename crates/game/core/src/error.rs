//! Common error infrastructure for sky-core.
//!
//! Most of this crate is infallible: numeric casts saturate and missing
//! condition entries read as zero. The errors that remain are usage errors,
//! and every one of them implements [`GameError`] so callers can classify
//! them uniformly.

/// Severity level of an error, used for categorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ErrorSeverity {
    /// A caller broke a documented precondition.
    ///
    /// Examples: drawing from an empty weighted list.
    /// These indicate bugs and should be investigated.
    Internal,
}

/// Common trait for all sky-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Report a stable, upper-case `error_code` per variant
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
