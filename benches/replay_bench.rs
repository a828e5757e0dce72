use criterion::{criterion_group, criterion_main, Criterion};
use slotplan::core_types::{Location, Move, SlotPos};
use slotplan::cost::CostEvaluator;
use slotplan::domain::{DistanceEntry, DomainModel, DomainParams};
use slotplan::executor::PlanExecutor;
use slotplan::render::{FrameRenderer, RecordingTarget};
use slotplan::state::{ScenarioState, Slot};
use std::collections::BTreeMap;
use std::hint::black_box;

const LOCATIONS: usize = 20;
const SLOTS: u32 = 8;

fn setup_domain() -> DomainModel {
    let names: Vec<String> = (0..LOCATIONS).map(|i| format!("l{:02}", i)).collect();
    let mut distances = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for (j, b) in names.iter().enumerate().skip(i + 1) {
            distances.push(DistanceEntry::new(a, b, (j - i) as u32));
        }
    }

    DomainParams::builder()
        .distances(distances)
        .heights((1..=SLOTS).map(|s| (SlotPos(s), s * 2)).collect())
        .weights(BTreeMap::from([
            ("x".into(), 1),
            ("y".into(), 2),
            ("z".into(), 3),
        ]))
        .build()
        .build_model()
        .unwrap()
}

// Bottom row filled except the last column; the plan shifts every item one
// column right, starting from the far end.
fn setup_plan(domain: &DomainModel) -> (ScenarioState, Vec<Move>) {
    let mut state = ScenarioState::empty(domain);
    let items = ["x", "y", "z"];
    for i in 0..LOCATIONS - 1 {
        let loc = format!("l{:02}", i);
        state.set(Location::new(loc), SlotPos(1), Slot::occupied(items[i % 3]));
    }

    let mut moves = Vec::new();
    for i in (0..LOCATIONS - 1).rev() {
        let from = format!("l{:02}", i);
        let to = format!("l{:02}", i + 1);
        moves.push(Move::new(from.as_str(), 1, to.as_str(), 1, items[i % 3]));
    }
    (state, moves)
}

fn bench_replay(c: &mut Criterion) {
    let domain = setup_domain();
    let (state, moves) = setup_plan(&domain);

    let mut group = c.benchmark_group("replay");

    group.bench_function("cost_evaluate", |b| {
        let eval = CostEvaluator::new(&domain);
        b.iter(|| {
            for mv in &moves {
                black_box(eval.evaluate(black_box(mv)).unwrap());
            }
        })
    });

    group.bench_function("execute_plan", |b| {
        b.iter(|| {
            let mut exec = PlanExecutor::new(&domain, state.clone());
            black_box(exec.run(&moves).unwrap());
        })
    });

    group.bench_function("render_frame", |b| {
        let renderer = FrameRenderer::new(&domain);
        b.iter(|| {
            let mut target = RecordingTarget::new();
            renderer
                .render(&state, 1, "bench", moves.first(), &mut target)
                .unwrap();
            black_box(target);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
