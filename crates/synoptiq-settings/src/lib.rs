//! Synoptiq Settings Crate
//!
//! Viewer styling and interaction parameters, and the data-layer settings
//! (filter facets, persistence folder), loaded from TOML or JSON files.

pub mod config;
pub mod error;

pub use config::{Config, DataSettings, Styling, ViewerSettings};
pub use error::{SettingsError, SettingsResult};
