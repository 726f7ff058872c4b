//! Kinetic CLI
//!
//! Simulate and validate animated dashboard scenes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinetic_i18n::{Locale, Localizer};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use config::Scene;
use simulate::{RunOptions, Simulation};

#[derive(Parser)]
#[command(name = "kinetic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kinetic animation scene simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene on a simulated host and print sampled widget values
    Simulate {
        /// Scene file
        scene: PathBuf,

        /// Clock step per frame (ms)
        #[arg(long, default_value = "16")]
        step_ms: u32,

        /// Total simulated time (ms)
        #[arg(short, long, default_value = "4000")]
        duration_ms: u32,

        /// Interval between printed samples (ms)
        #[arg(short, long, default_value = "250")]
        sample_ms: u32,

        /// Locale tag (en, fr, de, ar); defaults to the scene's locale
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Parse a scene and mount its widgets without running it
    Check {
        /// Scene file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            scene,
            step_ms,
            duration_ms,
            sample_ms,
            locale,
        } => cmd_simulate(
            &scene,
            RunOptions {
                step_ms,
                duration_ms,
                sample_ms,
            },
            locale.as_deref(),
        ),

        Commands::Check { scene } => cmd_check(&scene),
    }
}

fn load_localizer(scene: &Scene, locale: Option<&str>) -> Result<Localizer> {
    let locale = match locale {
        Some(tag) => tag.parse::<Locale>()?,
        None => scene.config.scene.locale,
    };
    let catalog = scene.catalog()?;
    let localizer = Localizer::new(catalog, locale);
    Ok(localizer)
}

fn cmd_simulate(path: &Path, options: RunOptions, locale: Option<&str>) -> Result<()> {
    let scene = Scene::load(path)?;
    let localizer = load_localizer(&scene, locale)?;
    let simulation = Simulation::build(&scene, localizer)
        .with_context(|| format!("Failed to mount scene {}", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    simulation.run(options, &mut out)?;

    info!("Finished '{}'", simulation.name());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scene = Scene::load(path)?;
    let localizer = load_localizer(&scene, None)?;

    if let Some(catalog) = &scene.config.scene.catalog {
        info!("Catalog: {}", catalog.display());
    }

    let simulation = Simulation::build(&scene, localizer)
        .with_context(|| format!("Failed to mount scene {}", path.display()))?;

    println!(
        "{}: {} widgets, {} regions, {} script steps",
        simulation.name(),
        simulation.widget_count(),
        scene.config.regions.len(),
        scene.config.script.len()
    );
    for widget in &scene.config.widgets {
        match widget.kind.region() {
            Some(region) => println!("  {} ({}) on '{}'", widget.name, widget.kind.label(), region),
            None => println!("  {} ({})", widget.name, widget.kind.label()),
        }
    }
    println!("OK");
    Ok(())
}
