mod common;

use common::DomainBuilder;
use slotplan::core_types::{ItemId, Location, SlotPos};
use slotplan::domain::loader::load_distance_table;
use slotplan::domain::{DomainModel, DomainParams};
use slotplan::error::SlotPlanError;
use std::fs::File;
use std::io::Write;

fn loc(s: &str) -> Location {
    Location::new(s)
}

#[test]
fn standard_tables() {
    let d = DomainModel::standard();

    assert_eq!(d.distance(&loc("a"), &loc("b")), 2);
    assert_eq!(d.distance(&loc("a"), &loc("c")), 3);
    assert_eq!(d.distance(&loc("b"), &loc("c")), 1);

    assert_eq!(d.height(SlotPos(1)).unwrap(), 1);
    assert_eq!(d.height(SlotPos(2)).unwrap(), 3);
    assert_eq!(d.height(SlotPos(3)).unwrap(), 5);

    assert_eq!(d.weight(&ItemId::new("a")).unwrap(), 1);
    assert_eq!(d.weight(&ItemId::new("b")).unwrap(), 2);
    assert_eq!(d.weight(&ItemId::new("c")).unwrap(), 3);
}

#[test]
fn distance_is_symmetric() {
    let d = DomainModel::standard();
    for (a, b, dist) in d.distance_pairs() {
        assert_eq!(d.distance(b, a), dist, "{} <-> {}", a, b);
    }
    assert_eq!(d.distance_pairs().count(), 6);
}

#[test]
fn undefined_pair_costs_zero() {
    let d = DomainModel::standard();
    assert_eq!(d.distance(&loc("a"), &loc("a")), 0);
    assert_eq!(d.distance_entry(&loc("a"), &loc("a")), None);
    assert_eq!(d.distance(&loc("a"), &loc("zz")), 0);
}

#[test]
fn unknown_height_and_weight() {
    let d = DomainModel::standard();

    let err = d.height(SlotPos(4)).unwrap_err();
    assert!(matches!(
        err,
        SlotPlanError::UnknownKey {
            kind: "slot position",
            ..
        }
    ));

    let err = d.weight(&ItemId::new("q")).unwrap_err();
    assert!(matches!(err, SlotPlanError::UnknownKey { kind: "item", .. }));
    assert_eq!(err.to_string(), "Unknown item 'q'");
}

#[test]
fn isolated_location_is_part_of_topology() {
    let d = DomainBuilder::new()
        .location("dock")
        .distance("a", "b", 4)
        .height(1, 0)
        .build();

    assert!(d.has_location(&loc("dock")));
    let locs: Vec<&str> = d.locations().map(|l| l.as_str()).collect();
    assert_eq!(locs, vec!["a", "b", "dock"]);
    assert_eq!(d.distance(&loc("b"), &loc("a")), 4);
}

#[test]
fn repeated_consistent_entry_is_accepted() {
    let d = DomainBuilder::new()
        .distance("a", "b", 2)
        .distance("b", "a", 2)
        .build();
    assert_eq!(d.distance(&loc("a"), &loc("b")), 2);
}

#[test]
fn domain_file_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domain.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{
            "distances": [
                {{"from": "x", "to": "y", "distance": 7}}
            ],
            "heights": {{"1": 0, "2": 2}},
            "weights": {{"crate": 5}}
        }}"#
    )
    .unwrap();

    let d = DomainModel::load_from_file(&path).unwrap();
    assert_eq!(d.distance(&loc("y"), &loc("x")), 7);
    assert_eq!(d.height(SlotPos(2)).unwrap(), 2);
    assert_eq!(d.weight(&ItemId::new("crate")).unwrap(), 5);
}

#[test]
fn missing_domain_file_is_config_error() {
    let res = DomainParams::load_from_file("/definitely/not/here.json");
    assert!(matches!(res, Err(SlotPlanError::Config(_))));
}

#[test]
fn csv_distance_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dist.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "From,To,Distance").unwrap();
    writeln!(f, "a, b, 2").unwrap();
    writeln!(f, "a,c,3").unwrap();
    writeln!(f, "short").unwrap();
    writeln!(f, "b,c,1").unwrap();

    let entries = load_distance_table(&path).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].from, loc("a"));
    assert_eq!(entries[0].to, loc("b"));
    assert_eq!(entries[0].distance, 2);
}

#[test]
fn csv_rejects_bad_distance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dist.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "From,To,Distance").unwrap();
    writeln!(f, "a,b,-2").unwrap();

    let res = load_distance_table(&path);
    assert!(matches!(res, Err(SlotPlanError::Validation(_))));
}
