pub mod loader;

use crate::core_types::{ItemId, Location, SlotPos};
use crate::error::{SlotPlanError, SpResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub from: Location,
    pub to: Location,
    pub distance: u32,
}

impl DistanceEntry {
    pub fn new(from: &str, to: &str, distance: u32) -> Self {
        Self {
            from: Location::new(from),
            to: Location::new(to),
            distance,
        }
    }
}

/// Declarative description of a topology. Serialized form of a domain file.
#[derive(TypedBuilder, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainParams {
    /// Locations that exist even without any distance entry.
    #[builder(default)]
    pub locations: Vec<Location>,
    #[builder(default)]
    pub distances: Vec<DistanceEntry>,
    #[builder(default)]
    pub heights: BTreeMap<SlotPos, u32>,
    #[builder(default)]
    pub weights: BTreeMap<ItemId, u32>,
}

/// Immutable cost tables shared by the evaluator, executor and renderer.
///
/// Distances are stored symmetrically: inserting `a -> b` also defines
/// `b -> a`. A pair that was never defined is looked up as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainModel {
    locations: BTreeSet<Location>,
    distances: BTreeMap<Location, BTreeMap<Location, u32>>,
    heights: BTreeMap<SlotPos, u32>,
    weights: BTreeMap<ItemId, u32>,
}

impl DomainParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlotPlanError::Config(format!(
                "Failed to read domain file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn build_model(self) -> SpResult<DomainModel> {
        let mut locations: BTreeSet<Location> = self.locations.into_iter().collect();
        let mut distances: BTreeMap<Location, BTreeMap<Location, u32>> = BTreeMap::new();

        for entry in self.distances {
            locations.insert(entry.from.clone());
            locations.insert(entry.to.clone());

            for (a, b) in [(&entry.from, &entry.to), (&entry.to, &entry.from)] {
                let row = distances.entry(a.clone()).or_default();
                match row.get(b) {
                    Some(&existing) if existing != entry.distance => {
                        return Err(SlotPlanError::Validation(format!(
                            "Asymmetric distance {}-{}: {} vs {}",
                            a, b, existing, entry.distance
                        )));
                    }
                    _ => {
                        row.insert(b.clone(), entry.distance);
                    }
                }
            }
        }

        debug!(
            "Domain: {} locations, {} slot heights, {} item weights",
            locations.len(),
            self.heights.len(),
            self.weights.len()
        );

        Ok(DomainModel {
            locations,
            distances,
            heights: self.heights,
            weights: self.weights,
        })
    }
}

impl DomainModel {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpResult<Self> {
        DomainParams::load_from_file(path)?.build_model()
    }

    /// The stock three-location warehouse the bundled scenarios are written for.
    pub fn standard() -> Self {
        let mut distances: BTreeMap<Location, BTreeMap<Location, u32>> = BTreeMap::new();
        for (a, b, d) in [("a", "b", 2), ("a", "c", 3), ("b", "c", 1)] {
            for (x, y) in [(a, b), (b, a)] {
                distances
                    .entry(Location::new(x))
                    .or_default()
                    .insert(Location::new(y), d);
            }
        }

        DomainModel {
            locations: ["a", "b", "c"].into_iter().map(Location::new).collect(),
            distances,
            heights: BTreeMap::from([(SlotPos(1), 1), (SlotPos(2), 3), (SlotPos(3), 5)]),
            weights: BTreeMap::from([
                (ItemId::new("a"), 1),
                (ItemId::new("b"), 2),
                (ItemId::new("c"), 3),
            ]),
        }
    }

    /// Horizontal distance between two locations.
    ///
    /// Pairs absent from the table (including `a -> a` unless declared)
    /// cost `0`. Use [`DomainModel::distance_entry`] to tell the two apart.
    pub fn distance(&self, a: &Location, b: &Location) -> u32 {
        self.distance_entry(a, b).unwrap_or(0)
    }

    pub fn distance_entry(&self, a: &Location, b: &Location) -> Option<u32> {
        self.distances.get(a).and_then(|row| row.get(b)).copied()
    }

    pub fn height(&self, slot: SlotPos) -> SpResult<u32> {
        self.heights
            .get(&slot)
            .copied()
            .ok_or_else(|| SlotPlanError::unknown_key("slot position", slot))
    }

    pub fn weight(&self, item: &ItemId) -> SpResult<u32> {
        self.weights
            .get(item)
            .copied()
            .ok_or_else(|| SlotPlanError::unknown_key("item", item))
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotPos> + '_ {
        self.heights.keys().copied()
    }

    pub fn heights(&self) -> &BTreeMap<SlotPos, u32> {
        &self.heights
    }

    pub fn weights(&self) -> &BTreeMap<ItemId, u32> {
        &self.weights
    }

    /// Every defined `(from, to, distance)` triple, both directions included.
    pub fn distance_pairs(&self) -> impl Iterator<Item = (&Location, &Location, u32)> {
        self.distances
            .iter()
            .flat_map(|(a, row)| row.iter().map(move |(b, &d)| (a, b, d)))
    }

    pub fn has_location(&self, loc: &Location) -> bool {
        self.locations.contains(loc)
    }
}
