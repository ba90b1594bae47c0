use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::list_view::Activation;
use crate::model::{Coordinate, RecordId};
use crate::view_state::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    Marker,
    Entry,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: RecordId,
    pub origin: SelectionOrigin,
    pub center: Coordinate,
    pub activation: Activation,
}

/// Applies a select to both views: center at detail zoom, open the popup,
/// toggle the entry. Ids not currently displayed leave the state untouched.
pub fn select(view: &mut ViewState, id: RecordId, origin: SelectionOrigin) -> Option<Selection> {
    if view.map.marker(id).is_none() || view.list.entry(id).is_none() {
        warn!(%id, ?origin, "select ignored, record is not displayed");
        return None;
    }

    let center = view.map.focus(id)?;
    let activation = view.list.activate(id)?;

    debug!(%id, ?origin, ?activation, "record selected");
    Some(Selection {
        id,
        origin,
        center,
        activation,
    })
}
