//! Rate lookup logic.
//!
//! Storage only answers "which windows cover this date"; choosing among
//! overlapping windows happens here.

pub mod rate_resolver;

pub use rate_resolver::{ResolveError, applicable_rate, resolve_rate};
