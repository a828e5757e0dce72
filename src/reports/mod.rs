mod grid;
mod tables;

pub use self::grid::print_state as print_state_grid;
pub use self::tables::{
    cost_table as print_cost_table, domain as print_domain, failure as print_failure,
    outcome as print_outcome,
};
