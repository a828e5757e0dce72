use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replays, checks and renders relocation plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON run configuration; explicit flags override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, replay and render plans for one or more scenarios
    Run(cmd::run::RunArgs),
    /// Evaluate the cost of a single move
    Cost(cmd::cost::CostArgs),
    /// Print the domain tables and scenario catalog
    Show(cmd::show::ShowArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    info!("🚀 slotplan {}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Run(args) => {
            let sub_matches = matches
                .subcommand_matches("run")
                .unwrap_or_else(|| unreachable!("clap dispatched 'run'"));
            cmd::run::run(args, sub_matches, cli.config.as_deref())
        }
        Commands::Cost(args) => cmd::cost::run(args).map(|_| 0),
        Commands::Show(args) => cmd::show::run(args).map(|_| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}
