use crate::core_types::Move;
use crate::cost::{CostBreakdown, CostEvaluator};
use crate::domain::DomainModel;
use crate::error::{SlotPlanError, SpResult, ViolationKind};
use crate::state::{ScenarioState, Slot};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    NotStarted,
    /// Number of moves applied so far.
    Applied(usize),
    Completed,
    Failed { step: usize, reason: String },
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::Failed { .. }
        )
    }
}

/// Outcome of one successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// 1-based position in the plan.
    pub index: usize,
    pub mv: Move,
    pub cost: u64,
    pub breakdown: CostBreakdown,
    /// Textual snapshot of the grid after the move.
    pub state_after: String,
}

/// Replays a plan move by move against an owned [`ScenarioState`].
///
/// A failing move leaves the state exactly as it was after the previous
/// move and puts the executor into a terminal `Failed` status.
pub struct PlanExecutor<'a> {
    evaluator: CostEvaluator<'a>,
    state: ScenarioState,
    status: ExecutionStatus,
    total_cost: u64,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(domain: &'a DomainModel, state: ScenarioState) -> Self {
        Self {
            evaluator: CostEvaluator::new(domain),
            state,
            status: ExecutionStatus::NotStarted,
            total_cost: 0,
        }
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    pub fn into_state(self) -> ScenarioState {
        self.state
    }

    pub fn status(&self) -> &ExecutionStatus {
        &self.status
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn applied(&self) -> usize {
        match self.status {
            ExecutionStatus::Applied(n) => n,
            ExecutionStatus::Failed { step, .. } => step - 1,
            _ => 0,
        }
    }

    pub fn apply(&mut self, mv: &Move) -> SpResult<StepRecord> {
        if self.status.is_terminal() {
            return Err(SlotPlanError::Execution(format!(
                "cannot apply {} after {:?}",
                mv, self.status
            )));
        }
        let step = self.applied() + 1;

        match self.try_apply(step, mv) {
            Ok(record) => {
                self.status = ExecutionStatus::Applied(step);
                Ok(record)
            }
            Err(e) => {
                self.status = ExecutionStatus::Failed {
                    step,
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    fn try_apply(&mut self, step: usize, mv: &Move) -> SpResult<StepRecord> {
        let (cost, breakdown) = self.evaluator.evaluate(mv)?;

        let source = self
            .state
            .get_cell(&mv.from)
            .ok_or_else(|| SlotPlanError::unknown_key("cell", &mv.from))?;
        if source.item() != Some(&mv.item) {
            return Err(SlotPlanError::PreconditionViolation {
                step,
                kind: ViolationKind::SourceMismatch,
                detail: format!("expected {} at {}, found {}", mv.item, mv.from, source),
            });
        }

        let dest = self
            .state
            .get_cell(&mv.to)
            .ok_or_else(|| SlotPlanError::unknown_key("cell", &mv.to))?;
        if !dest.is_empty() {
            return Err(SlotPlanError::PreconditionViolation {
                step,
                kind: ViolationKind::DestinationOccupied,
                detail: format!("destination {} holds {}", mv.to, dest),
            });
        }

        self.state.set_cell(&mv.from, Slot::Empty);
        self.state.set_cell(&mv.to, Slot::Occupied(mv.item.clone()));
        self.total_cost += cost;

        debug!(
            "step {}: {} cost={} running={}",
            step, mv, cost, self.total_cost
        );

        Ok(StepRecord {
            index: step,
            mv: mv.clone(),
            cost,
            breakdown,
            state_after: self.state.to_string(),
        })
    }

    /// Marks the plan as fully replayed and returns the recomputed total.
    pub fn finish(&mut self) -> SpResult<u64> {
        if let ExecutionStatus::Failed { step, reason } = &self.status {
            return Err(SlotPlanError::Execution(format!(
                "plan failed at step {}: {}",
                step, reason
            )));
        }
        self.status = ExecutionStatus::Completed;
        Ok(self.total_cost)
    }

    /// Applies every move in order, stopping at the first failure.
    pub fn run(&mut self, moves: &[Move]) -> SpResult<Vec<StepRecord>> {
        let records = moves
            .iter()
            .map(|mv| self.apply(mv))
            .collect::<SpResult<Vec<_>>>()?;
        self.finish()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioCatalog;

    fn s1(domain: &DomainModel) -> ScenarioState {
        ScenarioCatalog::standard()
            .get("s1")
            .unwrap()
            .initial_state(domain)
            .unwrap()
    }

    #[test]
    fn status_walks_through_states() {
        let domain = DomainModel::standard();
        let mut exec = PlanExecutor::new(&domain, s1(&domain));
        assert_eq!(exec.status(), &ExecutionStatus::NotStarted);

        exec.apply(&Move::new("a", 2, "c", 2, "b")).unwrap();
        assert_eq!(exec.status(), &ExecutionStatus::Applied(1));

        exec.apply(&Move::new("a", 1, "c", 1, "a")).unwrap();
        assert_eq!(exec.status(), &ExecutionStatus::Applied(2));

        assert_eq!(exec.finish().unwrap(), 2 * (3 + 0) + (3 + 0));
        assert_eq!(exec.status(), &ExecutionStatus::Completed);
    }

    #[test]
    fn failed_is_terminal() {
        let domain = DomainModel::standard();
        let mut exec = PlanExecutor::new(&domain, s1(&domain));
        assert!(exec.apply(&Move::new("c", 1, "c", 2, "a")).is_err());
        assert!(matches!(
            exec.status(),
            ExecutionStatus::Failed { step: 1, .. }
        ));
        assert!(matches!(
            exec.apply(&Move::new("a", 1, "c", 1, "a")),
            Err(SlotPlanError::Execution(_))
        ));
        assert!(exec.finish().is_err());
    }

    #[test]
    fn unknown_item_fails_before_preconditions() {
        let domain = DomainModel::standard();
        let mut exec = PlanExecutor::new(&domain, s1(&domain));
        let err = exec.apply(&Move::new("a", 1, "c", 1, "z")).unwrap_err();
        assert!(matches!(err, SlotPlanError::UnknownKey { kind: "item", .. }));
    }
}
