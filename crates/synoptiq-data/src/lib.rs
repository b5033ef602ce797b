//! # Synoptiq Data
//!
//! The floor-plan data model shared by every viewer of one dataset, and the
//! file store it loads from and saves to.
//!
//! `FloorPlanData` owns the loaded geometry, metadata and synoptiques, and
//! publishes a `DataEvent` on its own `EventBus` after each mutation.

pub mod model;
pub mod store;

pub use model::{DataPaths, FloorPlanData, LoadedData, PersistTarget};
pub use store::{FileStore, LocalFileStore, MemoryFileStore, SavedFile};
