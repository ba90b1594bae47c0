use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TileLayer;
use crate::model::{Coordinate, Location, RecordId};
use crate::viewport::{Bounds, Viewport, ZoomLevel};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub thumbnail_url: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: RecordId,
    pub position: Coordinate,
    pub popup: Popup,
}

/// Map side of the view state: viewport, base layer and the current markers.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayer {
    viewport: Viewport,
    default_viewport: Viewport,
    detail_zoom: ZoomLevel,
    tile_layer: TileLayer,
    markers: Vec<Marker>,
    open_popup: Option<RecordId>,
}

impl MapLayer {
    #[must_use]
    pub fn initialize(
        center: Coordinate,
        zoom: ZoomLevel,
        tile_layer: TileLayer,
        detail_zoom: ZoomLevel,
    ) -> Self {
        let viewport = Viewport::centered(center, zoom);
        Self {
            viewport,
            default_viewport: viewport,
            detail_zoom,
            tile_layer,
            markers: Vec::new(),
            open_popup: None,
        }
    }

    /// Fits the viewport around every mappable record, or falls back to the
    /// default view when there is none.
    pub fn fit_to_records<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a Location>,
    {
        let bounds = Bounds::from_coordinates(records.into_iter().filter_map(Location::coordinate));
        self.viewport = match bounds {
            Some(bounds) => Viewport::Fitted { bounds },
            None => self.default_viewport,
        };
    }

    /// Drops every marker and builds one per mappable record, in input order.
    pub fn render<'a, I>(&mut self, records: I, placeholder_image: &str)
    where
        I: IntoIterator<Item = (RecordId, &'a Location)>,
    {
        self.markers.clear();
        self.open_popup = None;

        for (id, location) in records {
            let Some(position) = location.coordinate() else {
                continue;
            };
            if self.markers.iter().any(|m| m.id == id) {
                continue;
            }

            self.markers.push(Marker {
                id,
                position,
                popup: Popup {
                    title: location.display_name(),
                    thumbnail_url: location.image_or(placeholder_image).to_string(),
                    address: location.full_address(),
                },
            });
        }

        debug!(markers = self.markers.len(), "map markers rebuilt");
    }

    /// Centers on the marker at detail zoom and opens its popup.
    pub fn focus(&mut self, id: RecordId) -> Option<Coordinate> {
        let position = self.marker(id)?.position;
        self.viewport = Viewport::centered(position, self.detail_zoom);
        self.open_popup = Some(id);
        Some(position)
    }

    pub fn close_popup(&mut self) {
        self.open_popup = None;
    }

    /// The shell moved the map itself (pan, pinch, scroll).
    pub fn set_view(&mut self, center: Coordinate, zoom: ZoomLevel) {
        self.viewport = Viewport::centered(center, zoom);
    }

    pub fn reconfigure(&mut self, tile_layer: TileLayer, default_viewport: Viewport, detail_zoom: ZoomLevel) {
        if self.viewport == self.default_viewport {
            self.viewport = default_viewport;
        }
        self.default_viewport = default_viewport;
        self.tile_layer = tile_layer;
        self.detail_zoom = detail_zoom;
    }

    #[must_use]
    pub fn marker(&self, id: RecordId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn default_viewport(&self) -> &Viewport {
        &self.default_viewport
    }

    #[must_use]
    pub const fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    #[must_use]
    pub const fn open_popup(&self) -> Option<RecordId> {
        self.open_popup
    }

    #[must_use]
    pub const fn detail_zoom(&self) -> ZoomLevel {
        self.detail_zoom
    }

    /// Current markers as Point features, popup fields as properties.
    #[must_use]
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("title".into(), marker.popup.title.clone().into());
                properties.insert("thumbnail_url".into(), marker.popup.thumbnail_url.clone().into());
                properties.insert("address".into(), marker.popup.address.clone().into());
                properties.insert("popup_open".into(), (self.open_popup == Some(marker.id)).into());

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![
                        marker.position.lon(),
                        marker.position.lat(),
                    ]))),
                    id: Some(Id::Number(marker.id.index().into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DETAIL_ZOOM, FALLBACK_CENTER, FALLBACK_ZOOM, PLACEHOLDER_IMAGE_URL};

    fn layer() -> MapLayer {
        MapLayer::initialize(
            FALLBACK_CENTER,
            ZoomLevel::new(FALLBACK_ZOOM),
            TileLayer::default(),
            ZoomLevel::new(DETAIL_ZOOM),
        )
    }

    fn loc(city: &str, coords: Option<(f64, f64)>) -> Location {
        Location {
            street: Some("Main St".into()),
            city: Some(city.into()),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..Location::default()
        }
    }

    fn data() -> Vec<Location> {
        vec![
            loc("Lima", Some((-12.0, -77.0))),
            loc("Quito", None),
            loc("Accra", Some((5.6, 0.0))),
        ]
    }

    fn indexed(data: &[Location]) -> impl Iterator<Item = (RecordId, &Location)> {
        data.iter().enumerate().map(|(i, l)| (RecordId(i), l))
    }

    #[test]
    fn render_skips_records_without_coordinates() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);

        let ids: Vec<_> = map.markers().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![RecordId(0), RecordId(2)]);
    }

    #[test]
    fn render_replaces_previous_markers() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        map.render(indexed(&data).take(1), PLACEHOLDER_IMAGE_URL);

        assert_eq!(map.markers().len(), 1);
        assert_eq!(map.markers()[0].id, RecordId(0));
    }

    #[test]
    fn render_is_idempotent() {
        let data = data();
        let mut once = layer();
        once.render(indexed(&data), PLACEHOLDER_IMAGE_URL);

        let mut twice = layer();
        twice.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        twice.render(indexed(&data), PLACEHOLDER_IMAGE_URL);

        assert_eq!(once, twice);
    }

    #[test]
    fn popup_uses_placeholder_and_full_address() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);

        let popup = &map.marker(RecordId(0)).unwrap().popup;
        assert_eq!(popup.title, "Lima (Main St)");
        assert_eq!(popup.thumbnail_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(popup.address, "Main St, Lima, , , ");
    }

    #[test]
    fn fit_without_mappable_records_uses_default() {
        let mut map = layer();
        map.fit_to_records(&[loc("Quito", None)]);
        assert_eq!(
            map.viewport(),
            &Viewport::centered(FALLBACK_CENTER, ZoomLevel::new(FALLBACK_ZOOM))
        );
    }

    #[test]
    fn fit_covers_mappable_records() {
        let data = data();
        let mut map = layer();
        map.fit_to_records(&data);

        let bounds = map.viewport().bounds().unwrap();
        assert_eq!(bounds.south_west, Coordinate::new(-12.0, -77.0).unwrap());
        assert_eq!(bounds.north_east, Coordinate::new(5.6, 0.0).unwrap());
    }

    #[test]
    fn focus_centers_and_opens_popup() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);

        let position = map.focus(RecordId(2)).unwrap();
        assert_eq!(position, Coordinate::new(5.6, 0.0).unwrap());
        assert_eq!(
            map.viewport(),
            &Viewport::centered(position, ZoomLevel::new(DETAIL_ZOOM))
        );
        assert_eq!(map.open_popup(), Some(RecordId(2)));
    }

    #[test]
    fn focus_on_hidden_record_is_noop() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        let before = map.clone();

        assert!(map.focus(RecordId(1)).is_none());
        assert!(map.focus(RecordId(9)).is_none());
        assert_eq!(map, before);
    }

    #[test]
    fn render_closes_open_popup() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        map.focus(RecordId(0));
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        assert_eq!(map.open_popup(), None);
    }

    #[test]
    fn geojson_has_one_point_per_marker() {
        let data = data();
        let mut map = layer();
        map.render(indexed(&data), PLACEHOLDER_IMAGE_URL);
        map.focus(RecordId(0));

        let collection = map.to_geojson();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        assert_eq!(
            first.geometry.as_ref().map(|g| &g.value),
            Some(&Value::Point(vec![-77.0, -12.0]))
        );
        let props = first.properties.as_ref().unwrap();
        assert_eq!(props["popup_open"], serde_json::Value::Bool(true));
        assert_eq!(props["title"], serde_json::Value::from("Lima (Main St)"));
    }
}
