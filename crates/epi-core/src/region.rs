// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EpiError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Region identifier (FIPS-style code or synthetic key).
pub type RegionId = String;

/// Granularity of a geographic entity, ordered from coarsest to finest.
///
/// Metric support checks are ceiling checks against this ordering: a metric
/// supported at `State` is supported at `Nation` and `Coalition` too.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionLevel {
    Nation,
    Coalition,
    State,
    County,
}

/// One geographic entity in the region hierarchy.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub short_name: Option<String>,
    pub population: u64,
    pub level: RegionLevel,
    pub parent: Option<RegionId>,
    pub subregions: Vec<RegionId>,
}

impl Region {
    pub fn new(
        id: impl Into<RegionId>,
        name: impl Into<String>,
        population: u64,
        level: RegionLevel,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_name: None,
            population,
            level,
            parent: None,
            subregions: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<RegionId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn with_subregions(mut self, subregions: Vec<RegionId>) -> Self {
        self.subregions = subregions;
        self
    }
}

/// Registry of regions with alias resolution and hierarchy lookups.
///
/// Aliases map alternate ids (postal abbreviations, legacy codes) onto
/// canonical region ids. Resolution follows alias chains transitively and
/// is bounded, so a mis-registered alias cycle resolves to nothing instead
/// of looping.
#[derive(Clone, Debug, Default)]
pub struct RegionCatalog {
    regions: BTreeMap<RegionId, Arc<Region>>,
    aliases: BTreeMap<RegionId, RegionId>,
    aliases_by_target: BTreeMap<RegionId, Vec<RegionId>>,
}

impl RegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a region, returning the shared handle stored in the
    /// catalog. Re-registering an id replaces the previous entry.
    pub fn register(&mut self, region: Region) -> Arc<Region> {
        let handle = Arc::new(region);
        self.register_handle(Arc::clone(&handle));
        handle
    }

    /// Registers an already-shared region handle.
    pub fn register_handle(&mut self, region: Arc<Region>) {
        self.regions.insert(region.id.clone(), region);
    }

    /// Registers `alias` as an alternate id for `target`.
    pub fn register_alias(
        &mut self,
        alias: impl Into<RegionId>,
        target: impl Into<RegionId>,
    ) -> Result<(), EpiError> {
        let alias = alias.into();
        let target = target.into();
        if alias == target {
            return Err(EpiError::invalid_input(format!(
                "alias must differ from its target: {alias}"
            )));
        }

        self.aliases.insert(alias.clone(), target.clone());
        self.aliases_by_target.entry(target).or_default().push(alias);
        Ok(())
    }

    /// Looks a region up by id, following alias chains transitively.
    pub fn region_with_id(&self, id: &str) -> Option<Arc<Region>> {
        let mut current = id;
        // One hop per registered alias bounds any chain, cyclic or not.
        for _ in 0..=self.aliases.len() {
            if let Some(region) = self.regions.get(current) {
                return Some(Arc::clone(region));
            }
            match self.aliases.get(current) {
                Some(next) => current = next.as_str(),
                None => return None,
            }
        }
        log::warn!("alias chain for region id {id:?} did not resolve");
        None
    }

    pub fn contains(&self, id: &str) -> bool {
        self.region_with_id(id).is_some()
    }

    /// Alternate ids registered for the given canonical id.
    pub fn aliases_for(&self, id: &str) -> &[RegionId] {
        self.aliases_by_target
            .get(id)
            .map_or(&[], |aliases| aliases.as_slice())
    }

    /// Merges another catalog's regions into this one; entries from
    /// `other` win on id collisions.
    pub fn absorb(&mut self, other: &RegionCatalog) {
        for (id, region) in &other.regions {
            self.regions.insert(id.clone(), Arc::clone(region));
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Region>> {
        self.regions.values()
    }
}
