pub mod fixture;
pub mod process;
mod wire;

pub use self::fixture::FixtureGateway;
pub use self::process::ProcessGateway;
pub use self::wire::{parse_move_str, parse_response};

use crate::core_types::Move;
use crate::error::SpResult;
use crate::state::Goal;

/// A plan as reported by the external planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub moves: Vec<Move>,
    /// The planner's own total. Signed so bogus reports can still be
    /// compared against the recomputation instead of failing to parse.
    pub reported_cost: i64,
    pub budget: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverResult {
    /// `None` when the planner answered `ok=false`.
    pub plan: Option<Plan>,
    pub goal: Goal,
    /// Budget echoed by the planner, if any.
    pub budget: Option<u64>,
    /// Response text exactly as received.
    pub raw: String,
}

impl SolverResult {
    pub fn is_ok(&self) -> bool {
        self.plan.is_some()
    }
}

/// Access to the external planner.
///
/// Implementations fail with `MalformedSolverResponse` when no well-formed
/// answer can be obtained; a well-formed `ok=false` is returned as a
/// [`SolverResult`] without a plan.
pub trait SolverGateway: Send + Sync {
    fn request_plan(&self, scenario_id: &str, budget: Option<u64>) -> SpResult<SolverResult>;
}
