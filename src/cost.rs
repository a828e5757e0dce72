use crate::core_types::Move;
use crate::domain::DomainModel;
use crate::error::SpResult;
use serde::Serialize;

/// The three factors that make up a step cost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub distance: u32,
    pub vertical: u32,
    pub weight: u32,
}

impl CostBreakdown {
    /// `weight * (distance + vertical)`
    pub fn total(&self) -> u64 {
        u64::from(self.weight) * (u64::from(self.distance) + u64::from(self.vertical))
    }
}

/// Authoritative cost model. Holds nothing but a reference to the tables,
/// so it can be created wherever a cost needs to be inspected.
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator<'a> {
    domain: &'a DomainModel,
}

impl<'a> CostEvaluator<'a> {
    pub fn new(domain: &'a DomainModel) -> Self {
        Self { domain }
    }

    pub fn evaluate(&self, mv: &Move) -> SpResult<(u64, CostBreakdown)> {
        let breakdown = self.breakdown(mv)?;
        Ok((breakdown.total(), breakdown))
    }

    pub fn breakdown(&self, mv: &Move) -> SpResult<CostBreakdown> {
        let distance = self.domain.distance(&mv.from.location, &mv.to.location);
        let src_h = self.domain.height(mv.from.slot)?;
        let dst_h = self.domain.height(mv.to.slot)?;
        let weight = self.domain.weight(&mv.item)?;

        Ok(CostBreakdown {
            distance,
            vertical: src_h.abs_diff(dst_h),
            weight,
        })
    }

    pub fn domain(&self) -> &'a DomainModel {
        self.domain
    }
}
