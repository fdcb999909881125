use geo::Point;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
///
/// Only numeric well-formedness is guaranteed; values are not checked
/// against the ±90/±180 GPS ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Geohash cell containing this coordinate, if it is encodable.
    pub fn geohash(&self, precision: usize) -> Option<String> {
        geohash::encode(
            geohash::Coord {
                x: self.longitude,
                y: self.latitude,
            },
            precision,
        )
        .ok()
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

/// One point handed to the map renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub coordinate: Coordinate,
    pub label: String,
    /// Position along the connecting path; points without one keep input order.
    pub connect_order: Option<u64>,
}

impl MapPoint {
    pub fn new(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
            connect_order: None,
        }
    }

    pub fn with_connect_order(mut self, order: Option<u64>) -> Self {
        self.connect_order = order;
        self
    }
}
