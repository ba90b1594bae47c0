use tracing::debug;

use crate::config::MapConfig;
use crate::list_view::ListPanel;
use crate::map_view::MapLayer;
use crate::model::{Location, RecordId};
use crate::viewport::Viewport;

/// Both rendered views. Rebuilt as a whole, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub map: MapLayer,
    pub list: ListPanel,
}

impl ViewState {
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        Self {
            map: MapLayer::initialize(
                config.default_center,
                config.default_zoom,
                config.tile_layer.clone(),
                config.detail_zoom,
            ),
            list: ListPanel::new(),
        }
    }

    /// Tears down markers and entries and rebuilds both from `ids`.
    pub fn rebuild(&mut self, dataset: &[Location], ids: &[RecordId], placeholder_image: &str) {
        let displayed = || {
            ids.iter()
                .filter_map(|id| dataset.get(id.index()).map(|location| (*id, location)))
        };

        self.map.render(displayed(), placeholder_image);
        self.list.render(displayed(), placeholder_image);

        debug!(
            requested = ids.len(),
            displayed = self.list.len(),
            "views rebuilt"
        );
    }

    pub fn apply_config(&mut self, config: &MapConfig) {
        self.map.reconfigure(
            config.tile_layer.clone(),
            Viewport::centered(config.default_center, config.default_zoom),
            config.detail_zoom,
        );
    }

    /// Marker ids and entry ids, in order. Always identical after a rebuild.
    #[must_use]
    pub fn displayed_ids(&self) -> Vec<RecordId> {
        self.list.entries().iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLACEHOLDER_IMAGE_URL;

    fn data() -> Vec<Location> {
        vec![
            Location {
                city: Some("Lima".into()),
                street: Some("Av. A".into()),
                latitude: Some(-12.0),
                longitude: Some(-77.0),
                ..Location::default()
            },
            Location {
                city: Some("Quito".into()),
                street: Some("Calle B".into()),
                ..Location::default()
            },
            Location {
                city: Some("Null Island".into()),
                latitude: Some(0.0),
                longitude: Some(0.0),
                ..Location::default()
            },
        ]
    }

    #[test]
    fn markers_and_entries_stay_in_lockstep() {
        let data = data();
        let mut view = ViewState::new(&MapConfig::default());
        let ids: Vec<_> = (0..data.len()).map(RecordId).collect();
        view.rebuild(&data, &ids, PLACEHOLDER_IMAGE_URL);

        let marker_ids: Vec<_> = view.map.markers().iter().map(|m| m.id).collect();
        assert_eq!(marker_ids, view.displayed_ids());
        assert_eq!(marker_ids, vec![RecordId(0), RecordId(2)]);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let data = data();
        let mut view = ViewState::new(&MapConfig::default());
        view.rebuild(&data, &[RecordId(7), RecordId(0)], PLACEHOLDER_IMAGE_URL);
        assert_eq!(view.displayed_ids(), vec![RecordId(0)]);
    }

    #[test]
    fn rebuild_twice_equals_once() {
        let data = data();
        let ids: Vec<_> = (0..data.len()).map(RecordId).collect();

        let mut once = ViewState::new(&MapConfig::default());
        once.rebuild(&data, &ids, PLACEHOLDER_IMAGE_URL);

        let mut twice = once.clone();
        twice.list.activate(RecordId(0));
        twice.map.focus(RecordId(0));
        twice.rebuild(&data, &ids, PLACEHOLDER_IMAGE_URL);
        twice.rebuild(&data, &ids, PLACEHOLDER_IMAGE_URL);

        assert_eq!(once.displayed_ids(), twice.displayed_ids());
        assert_eq!(twice.list.active(), None);
        assert_eq!(twice.map.open_popup(), None);
        assert_eq!(once.map.markers(), twice.map.markers());
    }
}
