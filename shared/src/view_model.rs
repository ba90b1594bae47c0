use serde::{Deserialize, Serialize};

use crate::config::TileLayer;
use crate::list_view::DetailPanel;
use crate::map_view::Popup;
use crate::model::{LoadState, Model, RecordId};
use crate::viewport::{Bounds, Viewport};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerView {
    pub id: RecordId,
    pub lat: f64,
    pub lon: f64,
    pub popup: Popup,
    pub popup_open: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    /// `None` while the shell should fit `fit_bounds` itself.
    pub zoom: Option<f64>,
    pub fit_bounds: Option<Bounds>,
    pub tile_layer: TileLayer,
    pub markers: Vec<MarkerView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EntryView {
    pub id: RecordId,
    pub label: String,
    pub detail: DetailPanel,
    pub expanded: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub filter_term: String,
    pub is_loading: bool,
    /// Load failures stay off-screen; shells may use this for diagnostics.
    pub load_failed: bool,
    pub total_records: usize,
    pub displayed_records: usize,
    pub map: MapView,
    pub entries: Vec<EntryView>,
    pub active_entry: Option<RecordId>,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let layer = &model.view.map;
        let list = &model.view.list;
        let viewport: &Viewport = layer.viewport();
        let center = viewport.center();

        let markers = layer
            .markers()
            .iter()
            .map(|m| MarkerView {
                id: m.id,
                lat: m.position.lat(),
                lon: m.position.lon(),
                popup: m.popup.clone(),
                popup_open: layer.open_popup() == Some(m.id),
            })
            .collect();

        let entries = list
            .entries()
            .iter()
            .map(|e| EntryView {
                id: e.id,
                label: e.label.clone(),
                detail: e.detail.clone(),
                expanded: list.is_expanded(e.id),
            })
            .collect();

        Self {
            filter_term: model.filter_term.clone(),
            is_loading: model.load_state.is_loading(),
            load_failed: matches!(model.load_state, LoadState::Failed { .. }),
            total_records: model.dataset.len(),
            displayed_records: list.len(),
            map: MapView {
                center_lat: center.lat(),
                center_lon: center.lon(),
                zoom: viewport.zoom().map(|z| z.value()),
                fit_bounds: viewport.bounds(),
                tile_layer: layer.tile_layer().clone(),
                markers,
            },
            entries,
            active_entry: list.active(),
        }
    }
}
