use super::{parse_response, SolverGateway, SolverResult};
use crate::error::{SlotPlanError, SpResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serves canned planner responses keyed by scenario id.
///
/// Responses go through the same parser as live ones, so a fixture file
/// doubles as a recorded planner session that can be replayed offline.
#[derive(Debug, Clone, Default)]
pub struct FixtureGateway {
    responses: BTreeMap<String, String>,
}

impl FixtureGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, scenario_id: &str, raw: impl Into<String>) -> Self {
        self.responses.insert(scenario_id.to_string(), raw.into());
        self
    }

    /// Loads `{ "<scenario id>": <response object>, ... }`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlotPlanError::Config(format!(
                "Failed to read fixture file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let doc: BTreeMap<String, Value> = serde_json::from_str(&content)?;

        let mut gateway = Self::new();
        for (id, response) in doc {
            gateway = gateway.with_response(&id, serde_json::to_string(&response)?);
        }
        debug!("Loaded {} canned responses", gateway.responses.len());
        Ok(gateway)
    }
}

impl SolverGateway for FixtureGateway {
    fn request_plan(&self, scenario_id: &str, budget: Option<u64>) -> SpResult<SolverResult> {
        if let Some(b) = budget {
            debug!("fixture for {} ignores budget override {}", scenario_id, b);
        }
        let raw = self.responses.get(scenario_id).ok_or_else(|| {
            SlotPlanError::malformed(
                format!("no canned response for scenario '{}'", scenario_id),
                "",
            )
        })?;
        parse_response(raw)
    }
}
