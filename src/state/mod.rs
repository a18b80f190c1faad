//! Block property combinatorics.
//!
//! A block type declares an ordered list of [`Property`]s; the
//! [`StateGraph`] enumerates every combination and links states that differ
//! in exactly one property.

pub mod graph;
pub mod property;

pub use graph::{PropertyId, State, StateGraph, StateId};
pub use property::Property;
