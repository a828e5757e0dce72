use super::{Plan, SolverResult};
use crate::core_types::Move;
use crate::error::{SlotPlanError, SpResult};
use crate::state::{Goal, EMPTY_MARKER};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const MOVE_TAG: &str = "move";

#[derive(Deserialize)]
struct WireResponse {
    ok: bool,
    #[serde(default)]
    plan: Option<Vec<Value>>,
    #[serde(default)]
    cost: Option<i64>,
    #[serde(default)]
    budget: Option<u64>,
    #[serde(default)]
    goal: BTreeMap<String, Value>,
}

/// Parses one planner response document.
///
/// Any structural problem is reported as `MalformedSolverResponse` with
/// the untouched input as payload.
pub fn parse_response(raw: &str) -> SpResult<SolverResult> {
    let malformed = |reason: String| SlotPlanError::malformed(reason, raw);

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty response".to_string()));
    }

    let wire: WireResponse =
        serde_json::from_str(trimmed).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let goal = parse_goal(&wire.goal).map_err(malformed)?;

    if !wire.ok {
        return Ok(SolverResult {
            plan: None,
            goal,
            budget: wire.budget,
            raw: raw.to_string(),
        });
    }

    let steps = wire
        .plan
        .ok_or_else(|| malformed("ok=true but 'plan' is missing".to_string()))?;
    let reported_cost = wire
        .cost
        .ok_or_else(|| malformed("ok=true but 'cost' is missing".to_string()))?;
    let budget = wire
        .budget
        .ok_or_else(|| malformed("ok=true but 'budget' is missing".to_string()))?;

    let moves = steps
        .iter()
        .enumerate()
        .map(|(i, step)| parse_move(step).map_err(|e| format!("plan[{}]: {}", i, e)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(malformed)?;

    Ok(SolverResult {
        plan: Some(Plan {
            moves,
            reported_cost,
            budget,
        }),
        goal,
        budget: Some(budget),
        raw: raw.to_string(),
    })
}

/// Parses a single move given as JSON text, e.g. for ad-hoc cost checks.
pub fn parse_move_str(raw: &str) -> SpResult<Move> {
    let value: Value = serde_json::from_str(raw.trim())?;
    parse_move(&value).map_err(SlotPlanError::Validation)
}

/// `["move", src_loc, src_slot, dst_loc, dst_slot, item]`
fn parse_move(value: &Value) -> Result<Move, String> {
    let parts = value
        .as_array()
        .ok_or_else(|| format!("expected an array, got {}", value))?;
    if parts.len() != 6 {
        return Err(format!("expected 6 elements, got {}", parts.len()));
    }
    match parts[0].as_str() {
        Some(MOVE_TAG) => {}
        _ => return Err(format!("expected tag \"{}\", got {}", MOVE_TAG, parts[0])),
    }

    Ok(Move::new(
        atom(&parts[1], "source location")?,
        slot(&parts[2], "source slot")?,
        atom(&parts[3], "destination location")?,
        slot(&parts[4], "destination slot")?,
        atom(&parts[5], "item")?,
    ))
}

fn atom(value: &Value, what: &str) -> Result<String, String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(format!("{} must be a non-empty string, got {}", what, value)),
    }
}

// Planners emit slot numbers either as JSON integers or numeric strings.
fn slot(value: &Value, what: &str) -> Result<u32, String> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| format!("{} must be a non-negative integer, got {}", what, value))
}

fn parse_goal(raw: &BTreeMap<String, Value>) -> Result<Goal, String> {
    raw.iter().try_fold(Goal::new(), |goal, (key, value)| {
        let v = match value {
            Value::String(s) => s.as_str(),
            Value::Null => EMPTY_MARKER,
            other => return Err(format!("goal '{}' has non-string value {}", key, other)),
        };
        goal.with(key, v).map_err(|e| e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_slots() {
        let mv = parse_move(&serde_json::json!(["move", "a", "1", "c", 2, "b"])).unwrap();
        assert_eq!(mv, Move::new("a", 1, "c", 2, "b"));
    }

    #[test]
    fn rejects_wrong_tag_and_arity() {
        assert!(parse_move(&serde_json::json!(["mov", "a", 1, "c", 2, "b"])).is_err());
        assert!(parse_move(&serde_json::json!(["move", "a", 1, "c", 2])).is_err());
        assert!(parse_move(&serde_json::json!(["move", "a", -1, "c", 2, "b"])).is_err());
    }

    #[test]
    fn null_goal_value_means_empty() {
        let goal = parse_goal(&BTreeMap::from([("a:1".to_string(), Value::Null)])).unwrap();
        assert_eq!(goal.to_string(), "a:1=empty");
    }
}
