mod driver;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use augury_camera::CameraConfig;
use augury_nav::NavConfig;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::driver::{Driver, Report};
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "augury-cli", about = "Run camera and navigation scenarios headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default controller settings
    Info,
    /// Run a scenario file and check its expectations
    Run {
        scenario: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a camera/navigator config file
    CheckConfig { config: PathBuf },
}

/// Controller settings as kept in a standalone config file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ControllerConfig {
    camera: CameraConfig,
    navigator: NavConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("augury-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_yaml::to_string(&ControllerConfig::default())?);
        }
        Commands::Run { scenario, json } => {
            let loaded = Scenario::load(&scenario)?;
            let mut driver = Driver::new(&loaded)
                .with_context(|| format!("setting up {}", scenario.display()))?;
            let report = driver.run(&loaded)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if !report.passed() {
                anyhow::bail!(
                    "scenario {} failed {} expectation(s)",
                    report.scenario,
                    report.failures.len()
                );
            }
        }
        Commands::CheckConfig { config } => {
            let text = std::fs::read_to_string(&config)
                .with_context(|| format!("reading {}", config.display()))?;
            let parsed: ControllerConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("parsing {}", config.display()))?;
            parsed.camera.validate()?;
            parsed.navigator.validate()?;
            println!("{}: ok", config.display());
        }
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "Scenario {}: {} frames, {:.2}s",
        report.scenario, report.frames, report.elapsed
    );
    println!(
        "Navigator: {:?}, player at {}, {} events",
        report.state,
        report.player,
        report.nav_events.len()
    );
    if let Some(cam) = report.camera {
        println!(
            "Camera: yaw={:.1} pitch={:.1} zoom={:.2} distance={:.2}",
            cam.yaw, cam.pitch, cam.zoom, report.camera_distance
        );
    }
    for (name, count) in &report.interactions {
        println!("Interactions: {name}={count}");
    }
    println!(
        "Markers: peak={}, scene events={}",
        report.peak_markers, report.scene_events
    );
    if report.passed() {
        println!("Result: OK");
    } else {
        for f in &report.failures {
            println!("FAILED: {f}");
        }
    }
}
