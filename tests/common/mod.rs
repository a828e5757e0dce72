#![allow(dead_code)]

use slotplan::core_types::{ItemId, Location, SlotPos};
use slotplan::domain::{DistanceEntry, DomainModel, DomainParams};
use slotplan::scenario::ScenarioCatalog;
use slotplan::state::ScenarioState;
use std::collections::BTreeMap;

/// Builder for small ad-hoc topologies.
pub struct DomainBuilder {
    locations: Vec<Location>,
    distances: Vec<DistanceEntry>,
    heights: BTreeMap<SlotPos, u32>,
    weights: BTreeMap<ItemId, u32>,
}

impl DomainBuilder {
    pub fn new() -> Self {
        Self {
            locations: vec![],
            distances: vec![],
            heights: BTreeMap::new(),
            weights: BTreeMap::new(),
        }
    }

    pub fn location(mut self, name: &str) -> Self {
        self.locations.push(Location::new(name));
        self
    }

    pub fn distance(mut self, a: &str, b: &str, d: u32) -> Self {
        self.distances.push(DistanceEntry::new(a, b, d));
        self
    }

    pub fn height(mut self, slot: u32, h: u32) -> Self {
        self.heights.insert(SlotPos(slot), h);
        self
    }

    pub fn weight(mut self, item: &str, w: u32) -> Self {
        self.weights.insert(ItemId::new(item), w);
        self
    }

    pub fn build(self) -> DomainModel {
        DomainParams::builder()
            .locations(self.locations)
            .distances(self.distances)
            .heights(self.heights)
            .weights(self.weights)
            .build()
            .build_model()
            .expect("test domain must be valid")
    }
}

/// `n` locations named l0.. spaced 1 apart, `m` slots of height = index,
/// items x, y, z of weight 1, 2, 3.
pub fn grid_domain(n: usize, m: u32) -> DomainModel {
    let mut builder = DomainBuilder::new();
    for i in 0..n {
        builder = builder.location(&format!("l{}", i));
    }
    for i in 1..n {
        builder = builder.distance(&format!("l{}", i - 1), &format!("l{}", i), 1);
    }
    for s in 1..=m {
        builder = builder.height(s, s);
    }
    builder.weight("x", 1).weight("y", 2).weight("z", 3).build()
}

pub fn standard_state(id: &str) -> (DomainModel, ScenarioState) {
    let domain = DomainModel::standard();
    let state = ScenarioCatalog::standard()
        .get(id)
        .expect("standard scenario")
        .initial_state(&domain)
        .expect("standard layout fits the standard domain");
    (domain, state)
}

/// Planner response for an ok plan. Moves are `[src, sslot, dst, dslot, item]`.
pub fn ok_response(moves: &[(&str, u32, &str, u32, &str)], cost: i64, budget: u64) -> String {
    let plan: Vec<serde_json::Value> = moves
        .iter()
        .map(|(sl, sp, dl, dp, it)| serde_json::json!(["move", sl, sp, dl, dp, it]))
        .collect();
    serde_json::json!({
        "ok": true,
        "plan": plan,
        "cost": cost,
        "budget": budget,
        "goal": {},
    })
    .to_string()
}

pub fn failed_response(budget: u64) -> String {
    serde_json::json!({ "ok": false, "budget": budget }).to_string()
}

/// The two-move s1 plan: b to c:2 then a to c:1.
pub const S1_PLAN: [(&str, u32, &str, u32, &str); 2] =
    [("a", 2, "c", 2, "b"), ("a", 1, "c", 1, "a")];

/// 2 * (3 + 0) + 1 * (3 + 0)
pub const S1_PLAN_COST: i64 = 9;
