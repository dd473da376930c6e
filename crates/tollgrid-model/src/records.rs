//! Grouped aggregate result records.

use serde::Serialize;

use crate::key::Key;

/// Number of rows holding one distinct category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: Key,
    pub count: usize,
}

/// Week coverage verdict for one `(id, id_2)` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCoverage {
    pub id: Key,
    pub id_2: Key,
    /// True when the group spans every weekday from 00:00:00 through 23:59:59.
    pub complete: bool,
}
