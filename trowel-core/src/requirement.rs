use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceId;

/// One abstract resource unit consumed by performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub resource: ResourceId,
    pub count: u32,
}

impl Requirement {
    pub fn new(resource: ResourceId, count: u32) -> Self {
        Requirement { resource, count }
    }

    /// A requirement for exactly one unit of `resource`.
    pub fn single(resource: ResourceId) -> Self {
        Requirement::new(resource, 1)
    }
}

/// Concatenates two requirement lists.
///
/// Order is preserved and equal entries are kept as separate entries; callers
/// that need totals should use [`summarize`].
pub fn merge(mut a: Vec<Requirement>, b: Vec<Requirement>) -> Vec<Requirement> {
    a.extend(b);
    a
}

/// Totals counts per resource, keyed in first-seen order.
pub fn summarize(requirements: &[Requirement]) -> IndexMap<ResourceId, u64> {
    let mut totals = IndexMap::new();
    for requirement in requirements {
        *totals.entry(requirement.resource.clone()).or_insert(0) += u64::from(requirement.count);
    }
    totals
}
