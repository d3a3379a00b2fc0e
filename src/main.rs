use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use pms_sens::config::{AppConfig, ConfigEntry, ConfigFlow, FlowResult};
use pms_sens::sensors::SensorState;
use pms_sens::{setup_entry, SensorPlatform};
use pms_sens_core::{Coordinator, DEFAULT_NAME};
use pms_sens_types::{SensorEntryConfig, CHANNELS};
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;

/// pms-sens - poll a PMS5003 particulate matter sensor
#[derive(Parser, Debug)]
#[command(name = "pms-sens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0", global = true)]
    debug: u8,

    /// Configuration file to use instead of the default location
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the measurement channels
    Channels,

    /// Validate and store a sensor entry
    Setup {
        #[arg(long, default_value = pms_sens_types::source_configs::DEFAULT_SERIAL_DEVICE)]
        serial_device: String,
        #[arg(long, default_value = pms_sens_types::source_configs::DEFAULT_PIN_ENABLE)]
        pin_enable: String,
        #[arg(long, default_value = pms_sens_types::source_configs::DEFAULT_PIN_RESET)]
        pin_reset: String,
    },

    /// Poll a configured sensor and print its channels after every refresh
    Run {
        /// Serial device path of the entry to run (defaults to the first entry)
        #[arg(long, value_name = "SERIAL_DEVICE")]
        entry: Option<String>,

        /// Device backend
        #[arg(long, default_value = "simulated")]
        backend: String,

        /// Print the first reading and exit
        #[arg(long)]
        once: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

fn save_config(config: &AppConfig, path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    }
}

fn print_channels() {
    for channel in CHANNELS.iter() {
        println!(
            "{:<14} {:<20} {:<15} {}",
            channel.key,
            channel.name,
            channel.unit.symbol(),
            channel.size
        );
    }
}

async fn run_setup(config_path: Option<&PathBuf>, input: SensorEntryConfig) -> Result<()> {
    let mut config = load_config(config_path)?;
    let flow = ConfigFlow::new(&config);

    match flow.step_user(Some(input)).await {
        FlowResult::CreateEntry { title, data } => {
            let entry = config.add_entry(ConfigEntry::new(title, data))?.clone();
            save_config(&config, config_path)?;
            println!("Configured {} on {} ({})", entry.title, entry.unique_id, entry.entry_id);
            Ok(())
        }
        FlowResult::ShowForm { errors, defaults, .. } => {
            let code = errors.get("base").cloned().unwrap_or_default();
            Err(anyhow!("Setup of {} failed: {}", defaults.serial_device, code))
        }
        FlowResult::Abort { reason } => Err(anyhow!("Setup aborted: {}", reason)),
    }
}

fn states(platform: &SensorPlatform) -> Vec<SensorState> {
    platform.sensors.iter().map(|s| s.state()).collect()
}

async fn run_sensor(
    config_path: Option<&PathBuf>,
    entry: Option<String>,
    backend: &str,
    once: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let entry = match entry {
        Some(unique_id) => config
            .find_entry(&unique_id)
            .cloned()
            .ok_or_else(|| anyhow!("No entry configured for {}", unique_id))?,
        None => match config.entries.first() {
            Some(entry) => entry.clone(),
            None => {
                warn!("No entries configured, using default device settings");
                ConfigEntry::new(DEFAULT_NAME, SensorEntryConfig::default())
            }
        },
    };

    let factory = pms_sens_sources::backend(backend, &config.simulation).ok_or_else(|| {
        anyhow!(
            "Unknown backend '{}' (available: {})",
            backend,
            pms_sens_sources::BACKENDS.join(", ")
        )
    })?;

    let platform = setup_entry(&entry, factory)
        .await
        .with_context(|| format!("Could not set up {}", entry.unique_id))?;

    println!("{}", serde_json::to_string(&states(&platform))?);
    if once {
        platform.unload();
        return Ok(());
    }

    let period = platform.coordinator.update_interval();
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                println!("{}", serde_json::to_string(&states(&platform))?);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    platform.unload();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting pms-sens v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.as_ref();
    match cli.command {
        Command::Channels => {
            print_channels();
            Ok(())
        }
        Command::Setup {
            serial_device,
            pin_enable,
            pin_reset,
        } => {
            run_setup(
                config_path,
                SensorEntryConfig {
                    serial_device,
                    pin_enable,
                    pin_reset,
                },
            )
            .await
        }
        Command::Run {
            entry,
            backend,
            once,
        } => run_sensor(config_path, entry, &backend, once).await,
    }
}
