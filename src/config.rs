use crate::domain::loader::load_distance_table;
use crate::domain::{DomainModel, DomainParams};
use crate::error::{SlotPlanError, SpResult};
use crate::scenario::ScenarioCatalog;
use crate::solver::{FixtureGateway, ProcessGateway, SolverGateway};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Where the topology and scenarios come from.
#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataSources {
    /// Domain JSON (locations, distances, heights, weights)
    #[arg(long)]
    pub domain: Option<String>,

    /// `From,To,Distance` CSV replacing the domain's distance table
    #[arg(long)]
    pub distances: Option<String>,

    /// Scenario catalog JSON
    #[arg(long)]
    pub scenarios: Option<String>,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[command(flatten)]
    pub data: DataSources,

    /// Budget override passed to the planner
    #[arg(long)]
    pub budget: Option<u64>,

    /// Frames go to <out-dir>/viz_<scenario>
    #[arg(long, default_value = ".")]
    pub out_dir: String,

    #[arg(long, default_value = "swipl")]
    pub planner: String,

    #[arg(long, default_value = "planner_astar_slots.pl")]
    pub planner_file: String,

    /// Kill the planner after this many seconds (0 = wait forever)
    #[arg(long, default_value_t = 0)]
    pub solver_timeout_secs: u64,

    /// Replay canned planner responses instead of running the planner
    #[arg(long)]
    pub fixtures: Option<String>,

    /// Record frames in memory instead of writing SVG files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Process scenarios concurrently
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Exit non-zero on a cost mismatch
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data: DataSources::default(),
            budget: None,
            out_dir: ".".to_string(),
            planner: "swipl".to_string(),
            planner_file: "planner_astar_slots.pl".to_string(),
            solver_timeout_secs: 0,
            fixtures: None,
            dry_run: false,
            parallel: false,
            strict: false,
        }
    }
}

impl DataSources {
    pub fn load_domain(&self) -> SpResult<DomainModel> {
        let mut params = match &self.domain {
            Some(path) => {
                info!("📂 Loading Domain: {}", path);
                DomainParams::load_from_file(path)?
            }
            None => {
                if self.distances.is_none() {
                    return Ok(DomainModel::standard());
                }
                standard_params()
            }
        };

        if let Some(path) = &self.distances {
            info!("📏 Loading Distances: {}", path);
            params.distances = load_distance_table(path)?;
        }

        params.build_model()
    }

    pub fn load_catalog(&self) -> SpResult<ScenarioCatalog> {
        match &self.scenarios {
            Some(path) => {
                info!("📂 Loading Scenarios: {}", path);
                ScenarioCatalog::load_from_file(path)
            }
            None => Ok(ScenarioCatalog::standard()),
        }
    }
}

// The standard heights and weights, for when only distances are supplied.
fn standard_params() -> DomainParams {
    let standard = DomainModel::standard();
    DomainParams::builder()
        .locations(standard.locations().cloned().collect())
        .heights(standard.heights().clone())
        .weights(standard.weights().clone())
        .build()
}

impl RunConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlotPlanError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.solver_timeout_secs > 0).then(|| Duration::from_secs(self.solver_timeout_secs))
    }

    pub fn build_gateway(&self) -> SpResult<Box<dyn SolverGateway>> {
        match &self.fixtures {
            Some(path) => {
                info!("🧪 Replaying planner fixtures from {}", path);
                Ok(Box::new(FixtureGateway::load_from_file(path)?))
            }
            None => {
                info!(
                    "🧠 Planner: {} -s {}",
                    self.planner, self.planner_file
                );
                Ok(Box::new(
                    ProcessGateway::new(&self.planner, &self.planner_file)
                        .with_timeout(self.timeout()),
                ))
            }
        }
    }

    /// Copies every option the user actually typed on the command line
    /// over the values loaded from a config file.
    pub fn merge_from_cli(&mut self, cli: &RunConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($($field:ident).+, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$($field).+ = cli.$($field).+.clone();
                }
            };
        }

        update_if_present!(data.domain, "domain");
        update_if_present!(data.distances, "distances");
        update_if_present!(data.scenarios, "scenarios");

        update_if_present!(budget, "budget");
        update_if_present!(out_dir, "out_dir");
        update_if_present!(planner, "planner");
        update_if_present!(planner_file, "planner_file");
        update_if_present!(solver_timeout_secs, "solver_timeout_secs");
        update_if_present!(fixtures, "fixtures");
        update_if_present!(dry_run, "dry_run");
        update_if_present!(parallel, "parallel");
        update_if_present!(strict, "strict");
    }
}
