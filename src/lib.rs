//! # Battlemap
//!
//! The drawing model behind a tabletop battle map editor: layered vector
//! shapes with undo/redo, token placements, a grid, and a versioned
//! line-oriented file format.
//!
//! ## Architecture
//!
//! Battlemap is organized as a workspace with multiple crates:
//!
//! 1. **battlemap-core** - Errors, shared-handle aliases, geometry value types
//! 2. **battlemap-drawing** - Shapes, commands, history, collections, document, codec
//! 3. **battlemap-settings** - Editor configuration (TOML/JSON)
//! 4. **battlemap** - Logging setup and the `battlemap` map inspection tool

pub use battlemap_core::{
    BoundingRect, CoordinateTransform, Error, Point, Result, SerializationError, ShapeError,
};

pub use battlemap_drawing::{
    colors, BackgroundImage, BackgroundImages, Color, CommandHistory, Grid, GridKind,
    HistoryGroup, Layer, MapDataReader, MapDataWriter, MapDocument, Shape, ShapeCollection,
    ShapeHandle, ShapeId, ShapeKind, ShapeVariant, TokenCollection, TokenPlacement,
    CURRENT_VERSION, DEFAULT_LAST_TAG,
};

pub use battlemap_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging in the given format. Fails if a global subscriber
/// is already installed.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .json(),
            )
            .try_init()?,
    }

    Ok(())
}
