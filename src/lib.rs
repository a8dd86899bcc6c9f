//! # SLM Quote
//!
//! Cost estimation for metal powder-bed (SLM) parts, starting from an STL
//! mesh.
//!
//! ## Architecture
//!
//! SLM Quote is organized as a workspace with multiple crates:
//!
//! 1. **slmquote-core** - Mesh data model, errors, parameter fallbacks, units, powder library
//! 2. **slmquote-mesh** - STL decoding and encoding, geometric analysis
//! 3. **slmquote-costing** - Powder-bed, simplified and batch tariff costing, quote session
//! 4. **slmquote-settings** - Configuration files and material presets
//! 5. **slmquote** - Export rendering and the command-line binary
//!
//! ## Pipeline
//!
//! bytes → triangles → geometry statistics → cost breakdown. Every step is a
//! pure, synchronous function of its inputs.

pub mod export;

pub use slmquote_costing as costing;
pub use slmquote_mesh as mesh;
pub use slmquote_settings as settings;

pub use slmquote_core::{
    init_standard_library, BoundingBox, GeometryStats, MaterialLibrary, Mesh, MeshFormatError,
    ParameterSet, Point3, PowderMaterial, PreconditionError, Triangle, VolumeUnit,
};

pub use slmquote_costing::{
    BatchLineItem, BatchQuote, CostBreakdown, PowderBedConfig, QuoteSession, SimpleConfig,
    SimpleQuote, SortDirection, SortKey, SortState,
};

pub use slmquote_mesh::{analyze, decode};

pub use slmquote_settings::{Config, SettingsError};

pub use export::{batch_table, breakdown_report, quote_line, ExportColumns, ExportOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable events
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to quote output
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(tracing::Level::INFO, LogFormat::Pretty)
}

/// Initialize logging at `level` unless RUST_LOG says otherwise
pub fn init_logging_with(level: tracing::Level, format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
