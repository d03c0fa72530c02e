use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::commands::{execute, Command};
use campusnav_cli::output::OutputFormat;
use campusnav_cli::terminal::ColorPalette;
use campusnav_lib::{
    load_topology, Navigator, NavigatorConfig, StaticTrafficAdjuster, TrafficCondition,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus walking-route queries")]
struct Cli {
    /// Campus topology JSON; the bundled campus is used when omitted.
    #[arg(long, env = "CAMPUSNAV_TOPOLOGY_PATH")]
    topology: Option<PathBuf>,

    /// Walking speed in km/h used for time estimates.
    #[arg(long)]
    walking_speed: Option<f64>,

    /// Traffic condition applied everywhere: light, moderate or heavy.
    #[arg(long)]
    traffic: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let navigator = build_navigator(&cli)?;
    let output = execute(&cli.command, &navigator, cli.format, &ColorPalette::detect())?;
    println!("{}", output);
    Ok(())
}

fn build_navigator(cli: &Cli) -> Result<Navigator> {
    let topology = load_topology(cli.topology.as_deref()).context("failed to load campus topology")?;

    let mut config = NavigatorConfig::from_env()?;
    if let Some(speed) = cli.walking_speed {
        config.walking_speed_kmh = speed;
    }

    let traffic = match cli.traffic.as_deref() {
        Some(label) => StaticTrafficAdjuster::new(TrafficCondition::from_label(label)),
        None => StaticTrafficAdjuster::from_env(),
    };

    let navigator = Navigator::from_topology(&topology, Arc::new(traffic), config)?;
    tracing::debug!(
        locations = navigator.graph().len(),
        connections = navigator.graph().edge_count(),
        "campus loaded"
    );
    Ok(navigator)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
