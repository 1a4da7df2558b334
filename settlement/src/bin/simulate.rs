//! Interbank payment simulator binary.
//!
//! Runs the full bank network for the configured simulated duration and
//! prints each bank's statistics. The two run parameters, time-unit scale
//! and total duration, come from flags or `SIM_*` environment variables.

use anyhow::Context;
use settlement::{Config, Simulation};

#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    time_unit_ms: Option<u64>,
    total_time: Option<u64>,
    debug: bool,
    json: bool,
}

const USAGE: &str = "\
usage: simulate [options]

options:
  -u, --time-unit-ms <ms>   length of one simulated time unit
  -t, --total-time <units>  total simulated duration
  -c, --config <path>       load configuration from a TOML file
  -d, --debug               log at DEBUG level
      --json                print the final report as JSON
  -h, --help                show this message";

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--time-unit-ms" | "-u" => {
                    let value = args.next().context("--time-unit-ms needs a value")?;
                    parsed.time_unit_ms = Some(value.parse().context("invalid --time-unit-ms")?);
                }
                "--total-time" | "-t" => {
                    let value = args.next().context("--total-time needs a value")?;
                    parsed.total_time = Some(value.parse().context("invalid --total-time")?);
                }
                "--config" | "-c" => {
                    parsed.config_path = Some(args.next().context("--config needs a path")?);
                }
                "--debug" | "-d" => parsed.debug = true,
                "--json" => parsed.json = true,
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other => anyhow::bail!("unknown argument: {other}\n{USAGE}"),
            }
        }
        Ok(parsed)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    // Initialize tracing
    let default_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let mut config = match &args.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(time_unit_ms) = args.time_unit_ms {
        config.time_unit_ms = time_unit_ms;
    }
    if let Some(total_time) = args.total_time {
        config.total_time = total_time;
    }
    config.validate()?;

    tracing::info!(
        time_unit_ms = config.time_unit_ms,
        total_time = config.total_time,
        "starting interbank payment simulation"
    );

    let simulation = Simulation::new(config)?;
    let report = simulation.run()?;

    tracing::info!("simulation complete");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
