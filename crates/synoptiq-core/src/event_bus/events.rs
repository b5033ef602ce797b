//! Event type definitions for the event bus.
//!
//! Every event published by the floor-plan data model carries the state a
//! subscriber needs to refresh itself, so handlers never have to read back
//! through the data model while it is being mutated.

use serde::{Deserialize, Serialize};

use crate::data::{ActiveFilters, Synoptique};

/// Events published when the shared floor-plan data changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataEvent {
    /// All five resource slots have been (re)loaded.
    ContentsLoaded,
    /// Every slot and the active filters were reset.
    DataCleared,
    /// The active filter set was replaced.
    FiltersChanged(ActiveFilters),
    /// A synoptique was added or a failed add was rolled back.
    SynoptiquesChanged(Vec<Synoptique>),
    /// The category list of one synoptique changed.
    CategoryListChanged {
        /// The synoptique whose categories changed.
        synoptique_id: String,
        /// Snapshot of every synoptique after the change.
        synoptiques: Vec<Synoptique>,
    },
    /// A feature → category assignment changed.
    CategoryMappingChanged(Vec<Synoptique>),
}

impl DataEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            DataEvent::ContentsLoaded | DataEvent::DataCleared => EventCategory::Contents,
            DataEvent::FiltersChanged(_) => EventCategory::Filters,
            DataEvent::SynoptiquesChanged(_) | DataEvent::CategoryListChanged { .. } => {
                EventCategory::Synoptiques
            }
            DataEvent::CategoryMappingChanged(_) => EventCategory::Mapping,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            DataEvent::ContentsLoaded => "Floor-plan data loaded".to_string(),
            DataEvent::DataCleared => "Floor-plan data cleared".to_string(),
            DataEvent::FiltersChanged(filters) => {
                format!("Active filters changed ({} keys)", filters.iter().count())
            }
            DataEvent::SynoptiquesChanged(list) => {
                format!("Synoptique list changed ({} synoptiques)", list.len())
            }
            DataEvent::CategoryListChanged { synoptique_id, .. } => {
                format!("Categories of synoptique {} changed", synoptique_id)
            }
            DataEvent::CategoryMappingChanged(_) => "Category mapping changed".to_string(),
        }
    }

    /// Synoptique snapshot carried by this event, if any
    pub fn synoptiques(&self) -> Option<&[Synoptique]> {
        match self {
            DataEvent::SynoptiquesChanged(list)
            | DataEvent::CategoryMappingChanged(list)
            | DataEvent::CategoryListChanged {
                synoptiques: list, ..
            } => Some(list),
            _ => None,
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Load and clear of the whole dataset.
    Contents,
    /// Active filter changes.
    Filters,
    /// Synoptique and category list changes.
    Synoptiques,
    /// Feature → category assignment changes.
    Mapping,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Contents => write!(f, "Contents"),
            EventCategory::Filters => write!(f, "Filters"),
            EventCategory::Synoptiques => write!(f, "Synoptiques"),
            EventCategory::Mapping => write!(f, "Mapping"),
        }
    }
}
