//! Map surface abstraction and the GeoJSON-backed surface served to clients.

use std::collections::BTreeMap;

use geo::{HaversineLength, LineString, Point, Rect};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::Coordinate;

/// Geohash precision attached to every marker (~5m cells).
const MARKER_GEOHASH_PRECISION: usize = 9;

pub type MarkerId = u64;

/// What part of the map is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Center {
        latitude: f64,
        longitude: f64,
        zoom: f64,
    },
    Bounds {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
        padding: u32,
    },
}

impl Viewport {
    pub fn fit(bounds: Rect<f64>, padding: u32) -> Self {
        Viewport::Bounds {
            south: bounds.min().y,
            west: bounds.min().x,
            north: bounds.max().y,
            east: bounds.max().x,
            padding,
        }
    }
}

/// Drawing operations the map view needs from a map library.
pub trait MapSurface {
    /// Add a point marker with a popup bound to it.
    fn add_marker(&mut self, at: Coordinate, popup: &str) -> MarkerId;

    fn remove_marker(&mut self, id: MarkerId);

    /// Replace the connecting path geometry.
    fn set_path(&mut self, path: LineString<f64>);

    fn clear_path(&mut self);

    /// Move the viewport to show `bounds` with `padding` pixels around it.
    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: u32);

    fn viewport(&self) -> Viewport;

    /// Release everything attached to the surface.
    fn release(&mut self);
}

#[derive(Debug, Clone)]
struct Marker {
    at: Point<f64>,
    popup: String,
}

/// Surface that records drawn features and renders them as GeoJSON.
#[derive(Debug, Clone)]
pub struct GeoJsonSurface {
    markers: BTreeMap<MarkerId, Marker>,
    next_id: MarkerId,
    path: Option<LineString<f64>>,
    viewport: Viewport,
    released: bool,
}

impl GeoJsonSurface {
    pub fn new(initial_viewport: Viewport) -> Self {
        Self {
            markers: BTreeMap::new(),
            next_id: 0,
            path: None,
            viewport: initial_viewport,
            released: false,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Drawn markers in creation order.
    pub fn markers(&self) -> impl Iterator<Item = (Coordinate, &str)> + '_ {
        self.markers
            .values()
            .map(|marker| (Coordinate::from(marker.at), marker.popup.as_str()))
    }

    pub fn path(&self) -> Option<&LineString<f64>> {
        self.path.as_ref()
    }

    #[cfg(test)]
    fn is_released(&self) -> bool {
        self.released
    }

    /// Render as a GeoJSON `FeatureCollection`.
    ///
    /// Markers become `Point` features with a `popup` property, the path a
    /// single `LineString` feature. The collection carries the marker
    /// `bbox` and the current `viewport` as foreign members.
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|(id, marker)| {
                let geohash = Coordinate::from(marker.at).geohash(MARKER_GEOHASH_PRECISION);
                json!({
                    "type": "Feature",
                    "id": id,
                    "geometry": {
                        "type": "Point",
                        "coordinates": [marker.at.x(), marker.at.y()],
                    },
                    "properties": {
                        "popup": marker.popup,
                        "geohash": geohash,
                    },
                })
            })
            .collect();

        if let Some(path) = &self.path {
            let coordinates: Vec<[f64; 2]> = path.coords().map(|c| [c.x, c.y]).collect();
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates,
                },
                "properties": {
                    "kind": "path",
                    "path_length_meters": path.haversine_length(),
                },
            }));
        }

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
            "viewport": self.viewport,
        });

        if let Some(bounds) = marker_bounds(self.markers.values().map(|m| m.at)) {
            collection["bbox"] = json!([
                bounds.min().x,
                bounds.min().y,
                bounds.max().x,
                bounds.max().y
            ]);
        }

        collection
    }
}

impl MapSurface for GeoJsonSurface {
    fn add_marker(&mut self, at: Coordinate, popup: &str) -> MarkerId {
        let id = self.next_id;
        self.next_id += 1;
        self.markers.insert(
            id,
            Marker {
                at: at.into(),
                popup: popup.to_string(),
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_none() {
            debug!("Marker {} was already removed", id);
        }
    }

    fn set_path(&mut self, path: LineString<f64>) {
        self.path = Some(path);
    }

    fn clear_path(&mut self) {
        self.path = None;
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: u32) {
        self.viewport = Viewport::fit(bounds, padding);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn release(&mut self) {
        self.markers.clear();
        self.path = None;
        self.released = true;
    }
}

/// Smallest rectangle containing every point, or `None` for no points.
pub fn marker_bounds(points: impl IntoIterator<Item = Point<f64>>) -> Option<Rect<f64>> {
    use geo::{BoundingRect, MultiPoint};

    MultiPoint::from(points.into_iter().collect::<Vec<_>>()).bounding_rect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_viewport() -> Viewport {
        Viewport::Center {
            latitude: 0.0,
            longitude: 0.0,
            zoom: 2.0,
        }
    }

    #[test]
    fn test_marker_ids_are_not_reused() {
        let mut surface = GeoJsonSurface::new(default_viewport());
        let first = surface.add_marker(Coordinate::new(1.0, 2.0), "first");
        surface.remove_marker(first);
        let second = surface.add_marker(Coordinate::new(3.0, 4.0), "second");

        assert_ne!(first, second);
        assert_eq!(surface.marker_count(), 1);
        assert_eq!(
            surface.markers().collect::<Vec<_>>(),
            vec![(Coordinate::new(3.0, 4.0), "second")]
        );
    }

    #[test]
    fn test_marker_bounds() {
        let bounds = marker_bounds(vec![
            Point::new(20.0, 10.0),
            Point::new(40.0, 30.0),
            Point::new(25.0, -5.0),
        ])
        .unwrap();

        assert_eq!(bounds.min().x, 20.0);
        assert_eq!(bounds.min().y, -5.0);
        assert_eq!(bounds.max().x, 40.0);
        assert_eq!(bounds.max().y, 30.0);
        assert!(marker_bounds(Vec::new()).is_none());
    }

    #[test]
    fn test_geojson_shape() {
        let mut surface = GeoJsonSurface::new(default_viewport());
        surface.add_marker(Coordinate::new(10.0, 20.0), "A");
        surface.add_marker(Coordinate::new(30.0, 40.0), "C");
        surface.set_path(LineString::from(vec![(20.0, 10.0), (40.0, 30.0)]));
        let bounds = marker_bounds(surface.markers().map(|(c, _)| Point::from(c))).unwrap();
        surface.fit_bounds(bounds, 50);

        let geojson = surface.to_geojson();

        assert_eq!(geojson["type"], "FeatureCollection");
        assert_eq!(geojson["features"].as_array().unwrap().len(), 3);
        assert_eq!(geojson["features"][0]["geometry"]["coordinates"], json!([20.0, 10.0]));
        assert_eq!(geojson["features"][0]["properties"]["popup"], "A");
        assert_eq!(geojson["features"][2]["geometry"]["type"], "LineString");
        assert!(
            geojson["features"][2]["properties"]["path_length_meters"]
                .as_f64()
                .unwrap()
                > 2_000_000.0
        );
        assert_eq!(geojson["bbox"], json!([20.0, 10.0, 40.0, 30.0]));
        assert_eq!(
            geojson["viewport"],
            json!({
                "kind": "bounds",
                "south": 10.0,
                "west": 20.0,
                "north": 30.0,
                "east": 40.0,
                "padding": 50
            })
        );
    }

    #[test]
    fn test_empty_geojson_has_no_bbox() {
        let geojson = GeoJsonSurface::new(default_viewport()).to_geojson();

        assert_eq!(geojson["features"], json!([]));
        assert!(geojson.get("bbox").is_none());
        assert_eq!(geojson["viewport"]["kind"], "center");
    }

    #[test]
    fn test_release_clears_features() {
        let mut surface = GeoJsonSurface::new(default_viewport());
        surface.add_marker(Coordinate::new(1.0, 1.0), "x");
        surface.set_path(LineString::from(vec![(1.0, 1.0), (2.0, 2.0)]));

        surface.release();

        assert!(surface.is_released());
        assert_eq!(surface.marker_count(), 0);
        assert!(surface.path().is_none());
    }
}
