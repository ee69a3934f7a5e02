//! Contains common, primitive types shared across the crate.
//!
//! This module defines the slot key used by the task registry and the
//! ordering selector used when enumerating laps.

use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Uniquely and safely identifies a chronometer stored in a `TaskRegistry`.
    ///
    /// Keys are handed out on registration and are never reused, since the
    /// registry never removes entries.
    pub struct TaskId;
}

/// The order in which laps are enumerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Insertion order, oldest lap first.
    #[default]
    Ascending,
    /// Reverse insertion order, most recent lap first.
    Descending,
}
