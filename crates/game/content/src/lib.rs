//! Indentation-based data files and their loaders.
//!
//! Game content is written as plain text: one node per line, children
//! indented below their parent, tokens split on whitespace with `"` or `` ` ``
//! quoting. This crate parses that text into a [`DataFile`] and offers the
//! token helpers ([`DataNode::value`], [`DataNode::expect_number`], ...)
//! that content loaders build literal values and named
//! [`Condition`](sky_core::Condition)s from.
//!
//! Malformed input never aborts a load. Each problem is reported with the
//! node's ancestry to a [`DiagnosticSink`] and parsing continues.

mod parser;

pub mod node;
pub mod trace;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use node::{DataFile, DataNode};
pub use trace::{CountingSink, DiagnosticSink, TracingSink};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, DataLoader, LoadResult, LoadedFile, LoaderConfig};
