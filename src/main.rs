//! Voltpath entry point: CLI wiring for simulate, optimize and serve.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;

use cli::{Cli, Command, ScenarioArgs};
use voltpath::config::ScenarioConfig;
use voltpath::io::export::{export_events_csv, export_results_csv};
use voltpath::network::ExistingChargers;
use voltpath::placement::optimize;
use voltpath::runner::simulate_plan;
use voltpath::telemetry;

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Simulate {
            scenario,
            seed,
            year,
            results_out,
            event_log,
        } => {
            let mut config = load_scenario(&scenario)?;
            if let Some(seed) = seed {
                config.simulation.seed = seed;
            }
            if let Some(year) = year {
                config.simulation.year = year;
            }
            if event_log.is_some() {
                config.simulation.record_events = true;
            }
            check(&config)?;

            let highway = config.load_highway().context("loading segments")?;
            let plan = config
                .station_plan(&highway)
                .context("building station plan")?;
            let sim = config.sim_config()?;

            let run = simulate_plan(&highway, &plan, &sim);
            println!("{}", run.report);

            if let Some(path) = results_out {
                export_results_csv(&run.report, &path)
                    .with_context(|| format!("writing results to {}", path.display()))?;
                tracing::info!(path = %path.display(), "results exported");
            }
            if let Some(path) = event_log {
                export_events_csv(&run.events, &path)
                    .with_context(|| format!("writing event log to {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    events = run.events.len(),
                    "event log exported"
                );
            }
            Ok(())
        }

        Command::Optimize {
            scenario,
            budget,
            existing,
        } => {
            let config = load_scenario(&scenario)?;
            check(&config)?;
            if !(budget >= 0.0) {
                bail!("--budget must be >= 0");
            }

            let highway = config.load_highway().context("loading segments")?;
            let fixed = config
                .station_plan(&highway)
                .context("building fixed stations")?;
            let existing = if existing {
                config.load_existing(&highway).context("loading existing chargers")?
            } else {
                ExistingChargers::default()
            };
            let result = optimize(
                &highway,
                budget,
                &fixed,
                &existing,
                config.simulation.range_km,
            )?;

            println!("--- Optimized Placement ---");
            for (lhrs, level) in result.plan.iter() {
                let desc = highway
                    .get(lhrs)
                    .map(|s| s.description.as_str())
                    .unwrap_or_default();
                let fixed_mark = if fixed.contains(lhrs) { " (fixed)" } else { "" };
                println!("  {lhrs} {desc}: {level}{fixed_mark}");
            }
            println!(
                "Cost:                  {:.0} of {budget:.0}",
                result.plan.cumulative_cost()
            );
            println!(
                "Covered demand:        {:.1} of {:.1} cars/day ({:.0}%)",
                result.covered_demand,
                result.total_demand,
                result.coverage_ratio() * 100.0
            );
            if !existing.is_empty() {
                println!("Existing chargers:     {} on the corridor", existing.len());
            }
            println!("Stations query:        {}", result.plan.to_query());
            Ok(())
        }

        #[cfg(feature = "web")]
        Command::Serve { scenario, bind } => {
            let mut config = load_scenario(&scenario)?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            check(&config)?;

            let addr: std::net::SocketAddr = config
                .server
                .bind
                .parse()
                .with_context(|| format!("invalid bind address {}", config.server.bind))?;
            let highway = config.load_highway().context("loading segments")?;
            let existing = config.load_existing(&highway).context("loading existing chargers")?;
            let state =
                std::sync::Arc::new(voltpath::web::AppState::new(highway, existing, config));

            let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
            rt.block_on(voltpath::web::serve(state, addr))
                .with_context(|| format!("serving on {addr}"))?;
            Ok(())
        }
    }
}

fn load_scenario(args: &ScenarioArgs) -> anyhow::Result<ScenarioConfig> {
    Ok(args.load()?)
}

/// Fails with every validation error listed.
fn check(config: &ScenarioConfig) -> anyhow::Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
    bail!("invalid scenario:\n  {}", list.join("\n  "))
}
