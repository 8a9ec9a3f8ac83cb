use indexmap::IndexMap;

use crate::requirement::{Requirement, summarize};
use crate::resource::ResourceId;

/// Decides whether an action's requirements can be met right now.
pub trait RequirementSink {
    /// Returns true if the action may be performed. Must not deduct anything.
    fn admit(&mut self, requirements: &[Requirement]) -> bool;

    /// Called after an admitted action was performed successfully.
    fn consume(&mut self, _requirements: &[Requirement]) {}
}

/// Admits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RequirementSink for Unlimited {
    fn admit(&mut self, _requirements: &[Requirement]) -> bool {
        true
    }
}

/// A finite stock of resources, drawn down as actions complete.
#[derive(Debug, Clone, Default)]
pub struct Stockpile {
    stock: IndexMap<ResourceId, u64>,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: ResourceId, count: u64) -> Self {
        self.add(resource, count);
        self
    }

    pub fn add(&mut self, resource: ResourceId, count: u64) {
        *self.stock.entry(resource).or_insert(0) += count;
    }

    pub fn available(&self, resource: &ResourceId) -> u64 {
        self.stock.get(resource).copied().unwrap_or(0)
    }
}

impl RequirementSink for Stockpile {
    fn admit(&mut self, requirements: &[Requirement]) -> bool {
        summarize(requirements)
            .iter()
            .all(|(resource, needed)| self.available(resource) >= *needed)
    }

    fn consume(&mut self, requirements: &[Requirement]) {
        for (resource, needed) in summarize(requirements) {
            if let Some(have) = self.stock.get_mut(&resource) {
                *have = have.saturating_sub(needed);
            }
        }
    }
}
