use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use lanvakt_capture::PcapCapture;
use lanvakt_config::LanvaktConfig;
use lanvakt_core::HostIdentity;
use lanvakt_detection::standard_rules;
use lanvakt_engine::{
    host_identity, load_config, metrics_recorder, run_once, run_replay, run_watch, EngineError,
};
use lanvakt_telemetry::EventLogger;

#[derive(Parser)]
#[command(name = "lanvakt", version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/lanvakt.yaml plus LANVAKT_* variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify live traffic on an interface every period
    Watch(WatchArgs),
    /// Classify a recorded pcap trace once
    Replay(ReplayArgs),
    /// Print the rule table in priority order
    Rules(RulesArgs),
    /// List capture-capable interfaces
    Interfaces,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[arg(short, long)]
    pub interface: Option<String>,
    #[arg(long)]
    pub period_ms: Option<u64>,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(short, long)]
    pub file: PathBuf,
    /// Hardware address of the host the trace was recorded on
    #[arg(short, long)]
    pub mac: HostIdentity,
}

#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    /// Identity to build filters for; resolved from the configured interface otherwise
    #[arg(short, long)]
    pub mac: Option<HostIdentity>,
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        load_config(cli.config.as_deref()).context("failed to load configuration")?;

    if let Commands::Watch(args) = &cli.command {
        apply_overrides(&mut config, args);
        config
            .ensure_valid()
            .map_err(EngineError::from)
            .context("invalid command-line override")?;
    }

    EventLogger::init(&config.telemetry.log_level);
    let metrics = metrics_recorder(&config)?;

    match cli.command {
        Commands::Watch(args) if args.once => {
            run_once(&config, metrics.clone()).await?;
        }
        Commands::Watch(_) => run_watch(&config, metrics.clone()).await?,
        Commands::Replay(args) => {
            let result = run_replay(
                &args.file,
                args.mac,
                &config.host.network_label,
                config.capture.frame_limit,
                metrics.clone(),
            )
            .await?;
            info!(file = %args.file.display(), ?result, "Replay finished");
        }
        Commands::Rules(args) => {
            let identity = match args.mac {
                Some(mac) => mac,
                None => host_identity(&config)?,
            };
            print_rules(&identity);
            return Ok(());
        }
        Commands::Interfaces => {
            for name in PcapCapture::device_names()? {
                println!("{name}");
            }
            return Ok(());
        }
    }

    if let Some(metrics) = metrics {
        match metrics.gather_metrics() {
            Ok(text) => println!("{text}"),
            Err(e) => warn!("Failed to render metrics: {e}"),
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut LanvaktConfig, args: &WatchArgs) {
    if let Some(interface) = &args.interface {
        config.capture.interface = interface.clone();
    }
    if let Some(period_ms) = args.period_ms {
        config.schedule.period_ms = period_ms;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.capture.timeout_ms = timeout_ms;
    }
}

fn print_rules(identity: &HostIdentity) {
    println!("Rules for {identity}:");
    for (priority, rule) in standard_rules(identity).iter().enumerate() {
        println!("{:>2}  {:<18}  {}", priority + 1, rule.label(), rule.filter());
    }
}
