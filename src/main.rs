use std::path::{Path, PathBuf};

use anyhow::Context;
use battlemap::{init_logging_with, Config, Layer, LogFormat, MapDocument, BUILD_DATE, VERSION};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "battlemap")]
#[command(version, about = "Inspect and optimize battle map files", long_about = None)]
struct Args {
    /// Map files to load
    #[arg(value_name = "MAP", required = true)]
    maps: Vec<PathBuf>,

    /// Run the optimize pass on every layer and save the result
    #[arg(long)]
    optimize: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => match Config::default_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = %err, "no config directory, using defaults");
                return Ok(Config::default());
            }
        },
    };
    Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

fn process(path: &Path, config: &Config, optimize: bool) -> anyhow::Result<()> {
    let mut document = MapDocument::with_history_limit(config.history.max_undo_depth);
    document.load_from_file(path)?;
    for layer in Layer::ALL {
        document
            .layer_mut(layer)
            .set_hit_tolerance(config.drawing.hit_tolerance);
    }

    for layer in Layer::ALL {
        let collection = document.layer(layer);
        tracing::info!(
            map = %path.display(),
            layer = layer.name(),
            shapes = collection.len(),
            below_grid = collection.below_grid().len(),
            "layer summary"
        );
    }
    tracing::info!(
        map = %path.display(),
        tokens = document.tokens().len(),
        background_images = document.background_images.len(),
        last_tag = document.last_tag(),
        "document summary"
    );

    if optimize {
        let changed = document.optimize_all();
        document.save_to_file(path)?;
        tracing::info!(map = %path.display(), changed, "optimized");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging_with(format)?;
    tracing::debug!(version = VERSION, build_date = BUILD_DATE, "starting");

    let config = load_config(args.config)?;
    let mut failures = 0usize;
    for path in &args.maps {
        if let Err(err) = process(path, &config, args.optimize) {
            tracing::error!(map = %path.display(), error = format!("{err:#}"), "failed");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} map(s) failed", args.maps.len());
    }
    Ok(())
}
