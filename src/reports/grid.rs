use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Table};
use slotplan::state::ScenarioState;

/// Prints the grid the way it is drawn: highest slot on top, one column
/// per location.
pub fn print_state(title: &str, state: &ScenarioState) {
    println!("\nLayout: {}", title);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let locs: Vec<_> = state.locations().collect();
    let mut header = vec![Cell::new("")];
    header.extend(
        locs.iter()
            .map(|l| Cell::new(l.as_str()).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for slot in state.slots().into_iter().rev() {
        let mut row = vec![Cell::new(format!("pos {}", slot))];
        row.extend(locs.iter().map(|loc| {
            let label = state
                .get(loc, slot)
                .and_then(|v| v.item())
                .map_or(" ".to_string(), |i| i.to_string());
            Cell::new(label).set_alignment(CellAlignment::Center)
        }));
        table.add_row(row);
    }
    println!("{}", table);
}
