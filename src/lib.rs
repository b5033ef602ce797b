//! # Synoptiq
//!
//! Floor-plan synoptique annotation: label the rooms, walls and openings of
//! a building plan with user-defined categories, view one floor at a time,
//! and save the labelling alongside the plan.
//!
//! ## Architecture
//!
//! Synoptiq is organized as a workspace with multiple crates:
//!
//! 1. **synoptiq-core** - Data types, colors, styling constants, event bus
//! 2. **synoptiq-settings** - Configuration files and validation
//! 3. **synoptiq-data** - Shared `FloorPlanData` model and file stores
//! 4. **synoptiq-viewer** - Camera, gestures, rendering, viewer registry
//! 5. **synoptiq** - Command-line host that integrates all crates

pub mod cli;
pub mod commands;

pub use synoptiq_core::{
    ActiveFilters, AttributeValue, Category, DataError, DataEvent, Error, EventBus, Feature,
    FeatureCollection, MetadataIndex, MetadataRecord, Palette, Result, Rgba, Synoptique,
};
pub use synoptiq_data::{
    DataPaths, FileStore, FloorPlanData, LocalFileStore, MemoryFileStore, PersistTarget,
};
pub use synoptiq_settings::{Config, DataSettings, SettingsError, Styling, ViewerSettings};
pub use synoptiq_viewer::{
    Camera, Cursor, FloorPlanViewer, PixmapHost, SynoptiqueFeature, ViewerOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
