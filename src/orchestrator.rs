use crate::domain::DomainModel;
use crate::error::{SlotPlanError, SpResult};
use crate::executor::{PlanExecutor, StepRecord};
use crate::render::{FrameRenderer, RenderTarget};
use crate::scenario::ScenarioCatalog;
use crate::solver::SolverGateway;
use crate::state::Goal;
use std::path::PathBuf;
use strum_macros::Display;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    pub scenario_id: String,
    /// `None` leaves the budget to the planner.
    pub budget: Option<u64>,
}

impl ScenarioRequest {
    pub fn new(scenario_id: impl Into<String>, budget: Option<u64>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            budget,
        }
    }

    /// The requested budget, when the planner answered with a different one.
    ///
    /// Catalog budgets are only defaults, so a request without an override
    /// never reports a mismatch.
    pub fn unmet_budget(&self, used: u64) -> Option<u64> {
        self.budget.filter(|&b| b != used)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Consistency {
    #[strum(serialize = "equal")]
    Consistent,
    #[strum(serialize = "MISMATCH")]
    Mismatch,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scenario_id: String,
    pub budget: u64,
    pub plan_len: usize,
    pub steps: Vec<StepRecord>,
    pub reported_cost: i64,
    /// Sum of the costs of the steps that were applied.
    pub recomputed_cost: u64,
    /// `None` when replay stopped early and nothing was compared.
    pub consistency: Option<Consistency>,
    pub goal: Goal,
    pub goal_reached: bool,
    pub initial_state: String,
    pub final_state: String,
    pub frames: Vec<String>,
    pub output: Option<PathBuf>,
}

impl RunSummary {
    /// Turns a flagged mismatch into a `CostMismatch` error.
    pub fn ensure_consistent(&self) -> SpResult<()> {
        match self.consistency {
            Some(Consistency::Mismatch) => Err(SlotPlanError::CostMismatch {
                reported: self.reported_cost,
                recomputed: self.recomputed_cost,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The planner answered `ok=false`. Nothing was rendered.
    NoPlanFound {
        scenario_id: String,
        goal: Goal,
        raw: String,
    },
    Completed(RunSummary),
    /// A move failed its precondition. Frames up to the previous step exist.
    Aborted {
        summary: RunSummary,
        violation: SlotPlanError,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::NoPlanFound { .. } => None,
            RunOutcome::Completed(s) | RunOutcome::Aborted { summary: s, .. } => Some(s),
        }
    }

    pub fn scenario_id(&self) -> &str {
        match self {
            RunOutcome::NoPlanFound { scenario_id, .. } => scenario_id,
            RunOutcome::Completed(s) | RunOutcome::Aborted { summary: s, .. } => &s.scenario_id,
        }
    }
}

/// Drives one scenario: fetch plan, replay it, render every step.
pub struct Orchestrator<'a> {
    domain: &'a DomainModel,
    catalog: &'a ScenarioCatalog,
    gateway: &'a dyn SolverGateway,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        domain: &'a DomainModel,
        catalog: &'a ScenarioCatalog,
        gateway: &'a dyn SolverGateway,
    ) -> Self {
        Self {
            domain,
            catalog,
            gateway,
        }
    }

    pub fn run(
        &self,
        request: &ScenarioRequest,
        target: &mut dyn RenderTarget,
    ) -> SpResult<RunOutcome> {
        let scenario = self.catalog.get(&request.scenario_id)?;
        let result = self.gateway.request_plan(&scenario.id, request.budget)?;

        // The planner's goal wins when it sends one.
        let goal = if result.goal.is_empty() {
            scenario.goal.clone()
        } else {
            result.goal.clone()
        };

        let Some(plan) = result.plan else {
            info!("[{}] No plan found", scenario.id);
            return Ok(RunOutcome::NoPlanFound {
                scenario_id: scenario.id.clone(),
                goal,
                raw: result.raw,
            });
        };

        if let Some(expected) = request.unmet_budget(plan.budget) {
            warn!(
                "[{}] Planner used budget {}, expected {}",
                scenario.id, plan.budget, expected
            );
        }

        info!(
            "[{}] Plan: {} steps, reported cost {}, budget {}",
            scenario.id,
            plan.moves.len(),
            plan.reported_cost,
            plan.budget
        );

        let title = format!(
            "{} (cost={}, budget={})",
            scenario.id, plan.reported_cost, plan.budget
        );
        let renderer = FrameRenderer::new(self.domain).for_plan(plan.moves.len());
        let state = scenario.initial_state(self.domain)?;
        let initial_state = state.to_string();

        let mut frames = vec![renderer.render(&state, 0, &title, None, target)?.key];
        let mut executor = PlanExecutor::new(self.domain, state);
        let mut steps = Vec::with_capacity(plan.moves.len());

        let output = target.destination().map(|p| p.to_path_buf());
        let summary = |executor: &PlanExecutor<'_>,
                       steps: Vec<StepRecord>,
                       frames: Vec<String>,
                       consistency: Option<Consistency>| RunSummary {
            scenario_id: scenario.id.clone(),
            budget: plan.budget,
            plan_len: plan.moves.len(),
            steps,
            reported_cost: plan.reported_cost,
            recomputed_cost: executor.total_cost(),
            consistency,
            goal: goal.clone(),
            goal_reached: executor.state().satisfies(&goal),
            initial_state: initial_state.clone(),
            final_state: executor.state().to_string(),
            frames,
            output: output.clone(),
        };

        for mv in &plan.moves {
            match executor.apply(mv) {
                Ok(record) => {
                    let frame =
                        renderer.render(executor.state(), record.index, &title, Some(mv), target)?;
                    frames.push(frame.key);
                    steps.push(record);
                }
                Err(violation @ SlotPlanError::PreconditionViolation { .. }) => {
                    warn!("[{}] {}", scenario.id, violation);
                    return Ok(RunOutcome::Aborted {
                        summary: summary(&executor, steps, frames, None),
                        violation,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let recomputed = executor.finish()?;
        let consistency = if i64::try_from(recomputed).is_ok_and(|r| r == plan.reported_cost) {
            Consistency::Consistent
        } else {
            warn!(
                "[{}] Cost mismatch: planner reported {}, recomputed {}",
                scenario.id, plan.reported_cost, recomputed
            );
            Consistency::Mismatch
        };

        info!(
            "[{}] Replayed {} steps, recomputed cost {} ({})",
            scenario.id,
            steps.len(),
            recomputed,
            consistency
        );

        Ok(RunOutcome::Completed(summary(
            &executor,
            steps,
            frames,
            Some(consistency),
        )))
    }
}
