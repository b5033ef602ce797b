//! # Synoptiq Core
//!
//! Core types, events, and errors shared by the synoptiq crates.
//! Provides the floor-plan data types (geometry, metadata, synoptiques),
//! the event bus used to notify viewers of data changes, and the
//! palette/styling constants consumed by the renderer.

pub mod color;
pub mod constants;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use color::Rgba;
pub use constants::Palette;

pub use data::{
    ActiveFilters, AttributeValue, Category, Feature, FeatureCollection, MetadataIndex,
    MetadataRecord, Polygon, Synoptique, FLOOR_ID_KEY,
};

pub use error::{ColorError, DataError, Error, Result};

// Re-export event bus for convenience
pub use event_bus::{
    DataEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter, Subscription,
    SubscriptionId,
};

pub use types::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};
