// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGION: AtomicU64 = AtomicU64::new(1);

/// Opaque handle for an on-screen area. Handles are unique per process so a
/// target reported to one component never aliases another component's area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u64);

impl RegionId {
    pub fn allocate() -> Self {
        Self(NEXT_REGION.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Set of regions a component treats as its own boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: BTreeSet<RegionId>,
}

impl RegionRegistry {
    pub fn register(&mut self) -> RegionId {
        let region = RegionId::allocate();
        self.regions.insert(region);
        region
    }

    pub fn unregister(&mut self, region: RegionId) -> bool {
        self.regions.remove(&region)
    }

    pub fn contains(&self, region: RegionId) -> bool {
        self.regions.contains(&region)
    }

    /// `None` means the pointer landed on nothing the front end tracks.
    pub fn is_inside(&self, target: Option<RegionId>) -> bool {
        target.is_some_and(|region| self.contains(region))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
