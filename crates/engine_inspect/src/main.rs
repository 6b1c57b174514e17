//! # engine_inspect
//!
//! Reads a scene file and prints every transform's rotator, quaternion and
//! composed matrix. With `--rotate` it edits the rotations in place through
//! the transform's bound quaternion, and with `--output` it writes the edited
//! scene back out.
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use engine_math::MathConfig;
use engine_scene::SceneDocument;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("engine_inspect=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = MathConfig::from_env();
    if cli.nan_checks {
        config = config.with_nan_checks(true);
    }
    config.install();

    let mut document = SceneDocument::load(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;

    if let Some(delta) = cli.rotation() {
        let edited = report::apply_rotation(&mut document, delta, cli.tag.as_deref());
        info!(edited, %delta, "applied rotation");
    }

    let reports = report::build(&document);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    if let Some(output) = &cli.output {
        document
            .save(output)
            .with_context(|| format!("failed to save scene {}", output.display()))?;
    }

    Ok(())
}
