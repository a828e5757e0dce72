use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use slotplan::core_types::Move;
use slotplan::cost::CostBreakdown;
use slotplan::domain::DomainModel;
use slotplan::error::SlotPlanError;
use slotplan::orchestrator::{Consistency, RunOutcome, RunSummary};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, cols: std::ops::Range<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn formula(b: &CostBreakdown) -> String {
    format!(
        "weight({}) * (distance({}) + vertical({}))",
        b.weight, b.distance, b.vertical
    )
}

pub fn weights(domain: &DomainModel) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Item").add_attribute(Attribute::Bold),
        Cell::new("Weight"),
    ]);
    for (item, w) in domain.weights() {
        table.add_row(vec![Cell::new(item), Cell::new(w)]);
    }
    right_align(&mut table, 1..2);
    println!("Item weights:\n{}", table);
}

pub fn domain(domain: &DomainModel) {
    weights(domain);

    let mut heights = new_table();
    heights.set_header(vec![
        Cell::new("Slot").add_attribute(Attribute::Bold),
        Cell::new("Height"),
    ]);
    for (slot, h) in domain.heights() {
        heights.add_row(vec![Cell::new(format!("pos {}", slot)), Cell::new(h)]);
    }
    right_align(&mut heights, 1..2);
    println!("Slot heights:\n{}", heights);

    let locs: Vec<_> = domain.locations().collect();
    let mut dist = new_table();
    let mut header = vec![Cell::new("From \\ To").add_attribute(Attribute::Bold)];
    header.extend(locs.iter().map(|l| Cell::new(l).add_attribute(Attribute::Bold)));
    dist.set_header(header);
    for a in &locs {
        let mut row = vec![Cell::new(a).add_attribute(Attribute::Bold)];
        row.extend(locs.iter().map(|b| {
            match domain.distance_entry(a, b) {
                Some(d) => Cell::new(d),
                // Undefined pairs are charged 0.
                None => Cell::new("?").fg(Color::DarkGrey),
            }
        }));
        dist.add_row(row);
    }
    right_align(&mut dist, 1..locs.len() + 1);
    println!("Distances:\n{}", dist);
}

pub fn cost_table(rows: &[(Move, u64, CostBreakdown)]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Move").add_attribute(Attribute::Bold),
        Cell::new("Formula"),
        Cell::new("Cost").fg(Color::Cyan),
    ]);
    for (mv, cost, b) in rows {
        table.add_row(vec![
            Cell::new(mv),
            Cell::new(formula(b)),
            Cell::new(cost).fg(Color::Cyan),
        ]);
    }
    right_align(&mut table, 2..3);
    println!("{}", table);
}

fn steps(summary: &RunSummary) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Move"),
        Cell::new("Formula"),
        Cell::new("Cost").fg(Color::Cyan),
        Cell::new("Running"),
    ]);

    let mut running = 0u64;
    for rec in &summary.steps {
        running += rec.cost;
        table.add_row(vec![
            Cell::new(rec.index),
            Cell::new(&rec.mv),
            Cell::new(formula(&rec.breakdown)),
            Cell::new(rec.cost).fg(Color::Cyan),
            Cell::new(running),
        ]);
    }
    right_align(&mut table, 3..5);
    println!("{}", table);

    println!("\nInitial state:\n  {}", summary.initial_state);
    for rec in &summary.steps {
        println!("After step {}:\n  {}", rec.index, rec.state_after);
    }
}

fn totals(summary: &RunSummary) {
    let mut table = new_table();

    let (label, color) = match summary.consistency {
        Some(c @ Consistency::Consistent) => (c.to_string(), Color::Green),
        Some(c @ Consistency::Mismatch) => (c.to_string(), Color::Red),
        None => ("not compared".to_string(), Color::Yellow),
    };

    table.add_row(vec![Cell::new("Budget"), Cell::new(summary.budget)]);
    table.add_row(vec![
        Cell::new("Steps replayed"),
        Cell::new(format!("{} / {}", summary.steps.len(), summary.plan_len)),
    ]);
    table.add_row(vec![
        Cell::new("Total cost (planner)"),
        Cell::new(summary.reported_cost),
    ]);
    table.add_row(vec![
        Cell::new("Total cost (recomputed)"),
        Cell::new(summary.recomputed_cost),
    ]);
    table.add_row(vec![
        Cell::new("Consistency").add_attribute(Attribute::Bold),
        Cell::new(label).fg(color),
    ]);
    table.add_row(vec![
        Cell::new("Goal reached"),
        Cell::new(if summary.goal_reached { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        Cell::new("Frames"),
        Cell::new(match &summary.output {
            Some(dir) => format!("{} in {}/", summary.frames.len(), dir.display()),
            None => format!("{} (in memory)", summary.frames.len()),
        }),
    ]);
    println!("{}", table);
}

pub fn outcome(domain: &DomainModel, outcome: &RunOutcome) {
    println!("\n=== Scenario {} ===", outcome.scenario_id());
    weights(domain);

    match outcome {
        RunOutcome::NoPlanFound { goal, raw, .. } => {
            if !goal.is_empty() {
                println!("Goal state:\n  {}", goal);
            }
            println!("No plan found: {}", raw.trim());
        }
        RunOutcome::Completed(summary) => {
            println!("Goal state:\n  {}", summary.goal);
            steps(summary);
            totals(summary);
        }
        RunOutcome::Aborted { summary, violation } => {
            println!("Goal state:\n  {}", summary.goal);
            steps(summary);
            println!("\n❌ Replay stopped: {}", violation);
            totals(summary);
        }
    }
}

pub fn failure(id: &str, err: &SlotPlanError) {
    println!("\n=== Scenario {} ===", id);
    println!("❌ {}", err);
}
