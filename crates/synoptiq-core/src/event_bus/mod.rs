//! # Event Bus Module
//!
//! Publish/subscribe channel through which the floor-plan data model tells
//! attached viewers that something changed.
//!
//! ## Overview
//!
//! - The data model publishes `DataEvent`s without knowing its viewers
//! - Viewers filter by `EventCategory` and react synchronously
//! - `Subscription` guards unsubscribe when dropped
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use synoptiq_core::event_bus::{DataEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = Arc::new(EventBus::new());
//! let _subscription = bus.subscribe_scoped(
//!     EventFilter::Categories(vec![EventCategory::Mapping]),
//!     |event| {
//!         if let DataEvent::CategoryMappingChanged(list) = event {
//!             println!("{} synoptiques", list.len());
//!         }
//!     },
//! );
//!
//! bus.publish(DataEvent::CategoryMappingChanged(Vec::new())).ok();
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
