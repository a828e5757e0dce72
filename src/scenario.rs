use crate::core_types::{Cell, ItemId};
use crate::domain::DomainModel;
use crate::error::{SlotPlanError, SpResult};
use crate::state::{Goal, ScenarioState, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: String,
    /// Occupied cells at the start; every other cell of the grid is empty.
    pub initial: BTreeMap<Cell, ItemId>,
    pub goal: Goal,
    pub default_budget: u64,
}

impl Scenario {
    /// Fresh grid for one run. Cells outside the domain's topology are
    /// rejected rather than silently added.
    pub fn initial_state(&self, domain: &DomainModel) -> SpResult<ScenarioState> {
        let mut state = ScenarioState::empty(domain);
        for (cell, item) in &self.initial {
            if state.get_cell(cell).is_none() {
                return Err(SlotPlanError::unknown_key("cell", cell));
            }
            state.set_cell(cell, Slot::Occupied(item.clone()));
        }
        Ok(state)
    }
}

/// On-disk form of a scenario (`"loc:slot"` keyed maps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDef {
    pub id: String,
    pub budget: u64,
    #[serde(default)]
    pub initial: BTreeMap<String, String>,
    #[serde(default)]
    pub goal: BTreeMap<String, String>,
}

impl TryFrom<ScenarioDef> for Scenario {
    type Error = SlotPlanError;

    fn try_from(def: ScenarioDef) -> SpResult<Self> {
        let mut initial = BTreeMap::new();
        for (key, value) in &def.initial {
            let cell = Cell::parse(key).ok_or_else(|| {
                SlotPlanError::Validation(format!("Scenario {}: bad cell '{}'", def.id, key))
            })?;
            if let Slot::Occupied(item) = Slot::parse(value) {
                initial.insert(cell, item);
            }
        }

        let goal = Goal::from_pairs(def.goal.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

        Ok(Scenario {
            id: def.id,
            initial,
            goal,
            default_budget: def.budget,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub scenarios: Vec<ScenarioDef>,
}

/// The closed set of scenarios a run may be requested for.
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<Scenario>) -> SpResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for s in &scenarios {
            if !seen.insert(s.id.as_str()) {
                return Err(SlotPlanError::Validation(format!(
                    "Duplicate scenario id '{}'",
                    s.id
                )));
            }
        }
        Ok(Self { scenarios })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlotPlanError::Config(format!(
                "Failed to read scenario file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        let scenarios = file
            .scenarios
            .into_iter()
            .map(Scenario::try_from)
            .collect::<SpResult<Vec<_>>>()?;
        Self::new(scenarios)
    }

    /// Scenarios s1..s4 for the standard three-location domain.
    pub fn standard() -> Self {
        let defs = [
            (
                "s1",
                40,
                vec![("a:1", "a"), ("a:2", "b"), ("b:1", "c")],
                vec![("a:1", "empty"), ("c:1", "a"), ("c:2", "b")],
            ),
            (
                "s2",
                60,
                vec![("a:1", "c"), ("a:2", "b"), ("b:1", "a")],
                vec![("a:1", "a"), ("b:1", "c")],
            ),
            (
                "s3",
                80,
                vec![("a:1", "a"), ("a:2", "b"), ("a:3", "c")],
                vec![("c:1", "a"), ("c:2", "b"), ("c:3", "c")],
            ),
            (
                "s4",
                20,
                vec![("a:1", "a"), ("a:2", "b"), ("a:3", "c")],
                vec![("c:1", "c"), ("c:2", "b"), ("c:3", "a")],
            ),
        ];

        let scenarios = defs
            .into_iter()
            .map(|(id, budget, initial, goal)| Scenario {
                id: id.to_string(),
                initial: initial
                    .into_iter()
                    .filter_map(|(k, v)| Cell::parse(k).map(|c| (c, ItemId::new(v))))
                    .collect(),
                goal: goal
                    .into_iter()
                    .filter_map(|(k, v)| Cell::parse(k).map(|c| (c, Slot::parse(v))))
                    .fold(Goal::new(), |g, (c, v)| g.insert(c, v)),
                default_budget: budget,
            })
            .collect();

        Self { scenarios }
    }

    pub fn get(&self, id: &str) -> SpResult<&Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SlotPlanError::UnknownScenario(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }
}
