use crate::reports;
use clap::Args;
use slotplan::config::DataSources;
use slotplan::cost::CostEvaluator;
use slotplan::error::SpResult;
use slotplan::solver::parse_move_str;

#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    #[command(flatten)]
    pub data: DataSources,

    /// Move as JSON, e.g. '["move","a",1,"c",2,"a"]'
    #[arg(value_name = "MOVE")]
    pub moves: Vec<String>,
}

pub fn run(args: CostArgs) -> SpResult<()> {
    let domain = args.data.load_domain()?;
    let evaluator = CostEvaluator::new(&domain);

    let mut rows = Vec::with_capacity(args.moves.len());
    for raw in &args.moves {
        let mv = parse_move_str(raw)?;
        let (cost, breakdown) = evaluator.evaluate(&mv)?;
        rows.push((mv, cost, breakdown));
    }

    reports::print_cost_table(&rows);
    Ok(())
}
