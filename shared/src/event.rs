use serde::{Deserialize, Serialize};

use crate::capabilities::FetchResult;
use crate::config::MapConfig;
use crate::model::{Coordinate, RecordId};

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Debug)]
pub enum Event {
    Noop,

    /// Page is ready; kicks off the one-time dataset fetch.
    AppStarted,
    Configure {
        config: Box<MapConfig>,
    },

    // Capability responses are never sent by the shell directly.
    #[serde(skip)]
    DatasetFetched(Box<FetchResult>),

    FilterChanged {
        term: String,
    },
    MarkerSelected {
        id: RecordId,
    },
    EntrySelected {
        id: RecordId,
    },
    ViewportChanged {
        center: Coordinate,
        zoom: f64,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::Configure { .. } => "configure",
            Self::DatasetFetched(_) => "dataset_fetched",
            Self::FilterChanged { .. } => "filter_changed",
            Self::MarkerSelected { .. } => "marker_selected",
            Self::EntrySelected { .. } => "entry_selected",
            Self::ViewportChanged { .. } => "viewport_changed",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::FilterChanged { .. }
                | Self::MarkerSelected { .. }
                | Self::EntrySelected { .. }
                | Self::ViewportChanged { .. }
        )
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::Noop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(size <= 64, "Event enum is {size} bytes, box more variants");
    }

    #[test]
    fn shell_events_deserialize() {
        let event: Event = serde_json::from_str(r#"{"FilterChanged": {"term": "lima"}}"#).unwrap();
        assert!(matches!(event, Event::FilterChanged { ref term } if term == "lima"));

        let event: Event = serde_json::from_str(r#"{"EntrySelected": {"id": 3}}"#).unwrap();
        assert!(matches!(event, Event::EntrySelected { id: RecordId(3) }));
        assert!(event.is_user_initiated());
    }

    #[test]
    fn viewport_event_rejects_invalid_center() {
        let bad = r#"{"ViewportChanged": {"center": {"lat": 123.0, "lon": 0.0}, "zoom": 3.0}}"#;
        assert!(serde_json::from_str::<Event>(bad).is_err());
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(Event::AppStarted.name(), "app_started");
        assert!(!Event::AppStarted.is_user_initiated());
        assert_eq!(Event::default().name(), "noop");
    }
}
