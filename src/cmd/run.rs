use crate::reports;
use clap::{ArgMatches, Args};
use rayon::prelude::*;
use slotplan::config::RunConfig;
use slotplan::domain::DomainModel;
use slotplan::error::SpResult;
use slotplan::orchestrator::{Orchestrator, RunOutcome, ScenarioRequest};
use slotplan::render::{RecordingTarget, RenderTarget, SvgTarget};
use std::path::Path;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: RunConfig,

    /// Scenario ids; all catalog scenarios when omitted
    #[arg(value_name = "SCENARIO")]
    pub ids: Vec<String>,
}

/// Returns the process exit code: 0 clean, 1 on any failed scenario,
/// 2 on a cost mismatch under `--strict`.
pub fn run(args: RunArgs, matches: &ArgMatches, config_path: Option<&str>) -> SpResult<i32> {
    let config = match config_path {
        Some(path) => {
            info!("⚙️  Loading config from: {}", path);
            let mut file_config = RunConfig::load_from_file(path)?;
            file_config.merge_from_cli(&args.config, matches);
            file_config
        }
        None => args.config.clone(),
    };

    let domain = config.data.load_domain()?;
    let catalog = config.data.load_catalog()?;
    let gateway = config.build_gateway()?;
    let orchestrator = Orchestrator::new(&domain, &catalog, gateway.as_ref());

    let ids: Vec<String> = if args.ids.is_empty() {
        catalog.ids().map(str::to_string).collect()
    } else {
        args.ids.clone()
    };

    let run_one = |id: &String| -> (String, SpResult<RunOutcome>) {
        let request = ScenarioRequest::new(id.clone(), config.budget);
        let mut target: Box<dyn RenderTarget> = if config.dry_run {
            Box::new(RecordingTarget::new())
        } else {
            Box::new(SvgTarget::new(
                Path::new(&config.out_dir).join(format!("viz_{}", id)),
            ))
        };
        (id.clone(), orchestrator.run(&request, target.as_mut()))
    };

    // Reports are printed in request order either way.
    let outcomes: Vec<(String, SpResult<RunOutcome>)> = if config.parallel {
        ids.par_iter().map(run_one).collect()
    } else {
        ids.iter().map(run_one).collect()
    };

    Ok(report(&domain, &outcomes, config.strict))
}

fn report(domain: &DomainModel, outcomes: &[(String, SpResult<RunOutcome>)], strict: bool) -> i32 {
    let mut code = 0;

    for (id, outcome) in outcomes {
        match outcome {
            Ok(outcome) => {
                reports::print_outcome(domain, outcome);
                match outcome {
                    RunOutcome::Aborted { .. } => code = code.max(1),
                    RunOutcome::Completed(summary) if strict => {
                        if let Err(e) = summary.ensure_consistent() {
                            warn!("[{}] {}", id, e);
                            code = code.max(2);
                        }
                    }
                    _ => {}
                }
            }
            Err(e) => {
                reports::print_failure(id, e);
                code = code.max(1);
            }
        }
    }

    code
}
