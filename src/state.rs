use crate::core_types::{Cell, ItemId, Location, SlotPos};
use crate::domain::DomainModel;
use crate::error::{SlotPlanError, SpResult};
use std::collections::BTreeMap;
use std::fmt;

/// Literal used for an unoccupied slot in goal maps and state dumps.
pub const EMPTY_MARKER: &str = "empty";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(ItemId),
}

impl Slot {
    pub fn occupied(item: impl Into<ItemId>) -> Self {
        Slot::Occupied(item.into())
    }

    /// Goal/response form: an item label or the empty marker.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == EMPTY_MARKER {
            Slot::Empty
        } else {
            Slot::Occupied(ItemId::new(value))
        }
    }

    pub fn item(&self) -> Option<&ItemId> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(item) => Some(item),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str(EMPTY_MARKER),
            Slot::Occupied(item) => write!(f, "{}", item),
        }
    }
}

/// The grid: location → slot position → contents.
///
/// A plain container. Move preconditions are enforced by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenarioState {
    cells: BTreeMap<Location, BTreeMap<SlotPos, Slot>>,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every location × slot of the topology, all empty.
    pub fn empty(domain: &DomainModel) -> Self {
        let mut state = Self::new();
        for loc in domain.locations() {
            for slot in domain.slots() {
                state.set(loc.clone(), slot, Slot::Empty);
            }
        }
        state
    }

    /// `None` only for cells outside the grid.
    pub fn get(&self, location: &Location, slot: SlotPos) -> Option<&Slot> {
        self.cells.get(location).and_then(|col| col.get(&slot))
    }

    pub fn get_cell(&self, cell: &Cell) -> Option<&Slot> {
        self.get(&cell.location, cell.slot)
    }

    pub fn set(&mut self, location: Location, slot: SlotPos, value: Slot) {
        self.cells.entry(location).or_default().insert(slot, value);
    }

    pub fn set_cell(&mut self, cell: &Cell, value: Slot) {
        self.set(cell.location.clone(), cell.slot, value);
    }

    /// Locations in lexical order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.cells.keys()
    }

    /// Union of slot positions over all locations, ascending.
    pub fn slots(&self) -> Vec<SlotPos> {
        let mut slots: Vec<SlotPos> = self
            .cells
            .values()
            .flat_map(|col| col.keys().copied())
            .collect();
        slots.sort();
        slots.dedup();
        slots
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, &Slot)> {
        self.cells.iter().flat_map(|(loc, col)| {
            col.iter()
                .map(move |(&slot, value)| (Cell::new(loc.clone(), slot), value))
        })
    }

    /// Multiset of items currently stored.
    pub fn items(&self) -> BTreeMap<ItemId, usize> {
        let mut counts = BTreeMap::new();
        for (_, value) in self.cells() {
            if let Slot::Occupied(item) = value {
                *counts.entry(item.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn satisfies(&self, goal: &Goal) -> bool {
        goal.iter()
            .all(|(cell, wanted)| self.get_cell(cell) == Some(wanted))
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (cell, value) in self.cells() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", cell, value)?;
        }
        Ok(())
    }
}

/// Partial target layout: only the listed cells are constrained.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Goal {
    cells: BTreeMap<Cell, Slot>,
}

impl Goal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> SpResult<Self> {
        let cell = Cell::parse(key)
            .ok_or_else(|| SlotPlanError::Validation(format!("Bad goal key '{}'", key)))?;
        Ok(self.insert(cell, Slot::parse(value)))
    }

    pub fn insert(mut self, cell: Cell, value: Slot) -> Self {
        self.cells.insert(cell, value);
        self
    }

    /// Builds a goal from `"loc:slot" -> item|empty` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> SpResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(Goal::new(), |goal, (k, v)| goal.with(k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &Slot)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .cells
            .iter()
            .map(|(cell, value)| format!("{}={}", cell, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_independent_of_insertion_order() {
        let mut s1 = ScenarioState::new();
        s1.set(Location::new("b"), SlotPos(2), Slot::Empty);
        s1.set(Location::new("a"), SlotPos(1), Slot::occupied("x"));

        let mut s2 = ScenarioState::new();
        s2.set(Location::new("a"), SlotPos(1), Slot::occupied("x"));
        s2.set(Location::new("b"), SlotPos(2), Slot::Empty);

        assert_eq!(s1, s2);
        assert_eq!(s1.to_string(), "a:1=x, b:2=empty");
        assert_eq!(s1.to_string(), s2.to_string());
    }

    #[test]
    fn goal_keys_sort_numerically_by_slot() {
        let goal = Goal::from_pairs([("a:10", "x"), ("a:2", "empty")]).unwrap();
        assert_eq!(goal.to_string(), "a:2=empty, a:10=x");
    }

    #[test]
    fn goal_rejects_bad_key() {
        assert!(Goal::new().with("nocolon", "x").is_err());
        assert!(Goal::new().with("a:x", "x").is_err());
    }
}
