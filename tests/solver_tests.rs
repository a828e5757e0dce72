mod common;

use common::{failed_response, ok_response, S1_PLAN, S1_PLAN_COST};
use rstest::rstest;
use slotplan::core_types::Move;
use slotplan::error::SlotPlanError;
use slotplan::solver::{parse_move_str, parse_response, FixtureGateway, SolverGateway};
use std::fs::File;
use std::io::Write;

#[test]
fn ok_response_is_parsed() {
    let raw = ok_response(&S1_PLAN, S1_PLAN_COST, 40);
    let res = parse_response(&raw).unwrap();

    assert!(res.is_ok());
    let plan = res.plan.unwrap();
    assert_eq!(plan.moves.len(), 2);
    assert_eq!(plan.moves[0], Move::new("a", 2, "c", 2, "b"));
    assert_eq!(plan.reported_cost, S1_PLAN_COST);
    assert_eq!(plan.budget, 40);
    assert_eq!(res.budget, Some(40));
    assert_eq!(res.raw, raw);
}

#[test]
fn goal_is_carried_through() {
    let raw = r#"{"ok":true,"plan":[],"cost":0,"budget":5,"goal":{"c:1":"a","a:1":"empty"}}"#;
    let res = parse_response(raw).unwrap();
    assert_eq!(res.goal.len(), 2);
    assert_eq!(res.goal.to_string(), "a:1=empty, c:1=a");
}

#[test]
fn not_ok_has_no_plan() {
    let res = parse_response(&failed_response(10)).unwrap();
    assert!(!res.is_ok());
    assert!(res.plan.is_none());
    assert_eq!(res.budget, Some(10));
}

#[rstest]
#[case("")]
#[case("   \n")]
#[case("Warning: something went wrong")]
#[case(r#"{"plan": []}"#)]
#[case(r#"{"ok": true, "cost": 3, "budget": 4}"#)]
#[case(r#"{"ok": true, "plan": [], "budget": 4}"#)]
#[case(r#"{"ok": true, "plan": [], "cost": 3}"#)]
#[case(r#"{"ok": true, "plan": [["move","a",1,"c"]], "cost": 3, "budget": 4}"#)]
#[case(r#"{"ok": true, "plan": [["shift","a",1,"c",2,"a"]], "cost": 3, "budget": 4}"#)]
#[case(r#"{"ok": true, "plan": [], "cost": 0, "budget": 4, "goal": {"nocolon": "a"}}"#)]
fn malformed_payload_is_preserved(#[case] raw: &str) {
    match parse_response(raw) {
        Err(SlotPlanError::MalformedSolverResponse { payload, .. }) => {
            assert_eq!(payload, raw)
        }
        other => panic!("expected MalformedSolverResponse, got {:?}", other),
    }
}

#[test]
fn malformed_error_reports_step_index() {
    let raw = r#"{"ok":true,"plan":[["move","a",1,"c",2,"a"],["move","a","x","c",2,"a"]],"cost":1,"budget":1}"#;
    let err = parse_response(raw).unwrap_err();
    assert!(err.to_string().contains("plan[1]"), "{}", err);
}

#[test]
fn single_move_parsing() {
    assert_eq!(
        parse_move_str(r#"["move","a",1,"c",2,"a"]"#).unwrap(),
        Move::new("a", 1, "c", 2, "a")
    );
    assert!(matches!(
        parse_move_str(r#"["move","a",1]"#),
        Err(SlotPlanError::Validation(_))
    ));
    assert!(matches!(
        parse_move_str("not json"),
        Err(SlotPlanError::Json(_))
    ));
}

#[test]
fn fixture_gateway_serves_canned_responses() {
    let gw = FixtureGateway::new()
        .with_response("s1", ok_response(&S1_PLAN, S1_PLAN_COST, 40))
        .with_response("s2", failed_response(60));

    assert!(gw.request_plan("s1", None).unwrap().is_ok());
    assert!(!gw.request_plan("s2", Some(99)).unwrap().is_ok());
    assert!(matches!(
        gw.request_plan("s3", None),
        Err(SlotPlanError::MalformedSolverResponse { .. })
    ));
}

#[test]
fn fixture_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixtures.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{
            "s1": {{"ok": true, "plan": [["move","a",2,"c",2,"b"]], "cost": 6, "budget": 40}},
            "s4": {{"ok": false}}
        }}"#
    )
    .unwrap();

    let gw = FixtureGateway::load_from_file(&path).unwrap();
    let plan = gw.request_plan("s1", None).unwrap().plan.unwrap();
    assert_eq!(plan.reported_cost, 6);
    assert!(gw.request_plan("s4", None).unwrap().plan.is_none());
}

#[cfg(unix)]
mod process {
    use super::*;
    use slotplan::solver::ProcessGateway;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    // Stand-in planner: ignores its arguments and runs `body`.
    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("planner.sh");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh\n{}", body).unwrap();
        drop(f);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn stdout_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let prog = script(
            dir.path(),
            r#"echo '{"ok":true,"plan":[["move","a",2,"c",2,"b"]],"cost":6,"budget":40}'"#,
        );
        let gw = ProcessGateway::new(prog.to_string_lossy(), "planner.pl");
        let res = gw.request_plan("s1", None).unwrap();
        assert_eq!(res.plan.unwrap().reported_cost, 6);
    }

    #[test]
    fn non_zero_exit_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let prog = script(dir.path(), "echo 'no such predicate' >&2\nexit 3");
        let gw = ProcessGateway::new(prog.to_string_lossy(), "planner.pl");
        match gw.request_plan("s1", None) {
            Err(SlotPlanError::MalformedSolverResponse { payload, .. }) => {
                assert!(payload.contains("no such predicate"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_stdout_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let prog = script(dir.path(), "exit 0");
        let gw = ProcessGateway::new(prog.to_string_lossy(), "planner.pl");
        assert!(matches!(
            gw.request_plan("s1", None),
            Err(SlotPlanError::MalformedSolverResponse { .. })
        ));
    }

    #[test]
    fn slow_planner_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let prog = script(dir.path(), "exec sleep 5");
        let gw = ProcessGateway::new(prog.to_string_lossy(), "planner.pl")
            .with_timeout(Some(Duration::from_millis(200)));
        match gw.request_plan("s1", None) {
            Err(SlotPlanError::MalformedSolverResponse { reason, .. }) => {
                assert!(reason.contains("timed out"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
