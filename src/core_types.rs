use serde::{Deserialize, Serialize};
use std::fmt;

/// A storage site in the topology (a column of slots).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub String);

/// Ordinal vertical position inside a location. Position 1 is the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotPos(pub u32);

/// A relocatable item, identified by its label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Location(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ItemId {
    pub fn new(name: impl Into<String>) -> Self {
        ItemId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Location::new(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::new(s)
    }
}

impl From<String> for Location {
    fn from(s: String) -> Self {
        Location(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl From<u32> for SlotPos {
    fn from(p: u32) -> Self {
        SlotPos(p)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SlotPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single cell address: `location:slot`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub location: Location,
    pub slot: SlotPos,
}

impl Cell {
    pub fn new(location: impl Into<Location>, slot: impl Into<SlotPos>) -> Self {
        Self {
            location: location.into(),
            slot: slot.into(),
        }
    }

    /// Parses the `"a:1"` key format used by goal maps.
    pub fn parse(key: &str) -> Option<Self> {
        let (loc, slot) = key.split_once(':')?;
        let loc = loc.trim();
        if loc.is_empty() {
            return None;
        }
        let slot: u32 = slot.trim().parse().ok()?;
        Some(Cell::new(loc, slot))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location, self.slot)
    }
}

/// Relocation of one item from a source cell to a destination cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
    pub item: ItemId,
}

impl Move {
    pub fn new(
        src_loc: impl Into<Location>,
        src_slot: u32,
        dst_loc: impl Into<Location>,
        dst_slot: u32,
        item: impl Into<ItemId>,
    ) -> Self {
        Self {
            from: Cell::new(src_loc, src_slot),
            to: Cell::new(dst_loc, dst_slot),
            item: item.into(),
        }
    }

    /// The move that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            item: self.item.clone(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} (item={})", self.from, self.to, self.item)
    }
}
