use crate::reports;
use clap::Args;
use slotplan::config::DataSources;
use slotplan::error::SpResult;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataSources,
}

pub fn run(args: ShowArgs) -> SpResult<()> {
    let domain = args.data.load_domain()?;
    let catalog = args.data.load_catalog()?;

    reports::print_domain(&domain);

    for scenario in catalog.iter() {
        let state = scenario.initial_state(&domain)?;
        let title = format!("{} (default budget {})", scenario.id, scenario.default_budget);
        reports::print_state_grid(&title, &state);
        println!("Goal: {}", scenario.goal);
    }
    Ok(())
}
