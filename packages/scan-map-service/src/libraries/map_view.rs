//! Map view lifecycle: mount, render, unmount.
//!
//! A [`MapView`] owns at most one [`MapSurface`] for its whole life. The
//! surface is created once on mount, fully redrawn on every render and
//! released on unmount or drop. Every render path tolerates a missing
//! surface, so rendering an inert or torn-down view is a no-op.

use geo::{LineString, Point};
use tracing::{debug, error, info};

use super::coordinate_extractor::extract_all;
use super::map_surface::{marker_bounds, MapSurface, MarkerId};
use super::memo_extractor::extract_events;
use crate::models::{EventRecord, LocationRecord, MapPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Initialized,
    Populated,
    TornDown,
}

/// Whether consecutive points are joined by a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    MarkersOnly,
    ConnectPoints,
}

/// Records that can be turned into map points.
pub trait Plottable: Sized {
    fn plot(records: &[Self]) -> Vec<MapPoint>;
}

impl Plottable for LocationRecord {
    fn plot(records: &[Self]) -> Vec<MapPoint> {
        extract_all(records)
    }
}

impl Plottable for EventRecord {
    fn plot(records: &[Self]) -> Vec<MapPoint> {
        extract_events(records)
    }
}

pub struct MapView<S: MapSurface> {
    surface: Option<S>,
    state: ViewState,
    mode: PathMode,
    padding: u32,
    markers: Vec<MarkerId>,
    mount_attempted: bool,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(mode: PathMode, padding: u32) -> Self {
        Self {
            surface: None,
            state: ViewState::Uninitialized,
            mode,
            padding,
            markers: Vec::new(),
            mount_attempted: false,
        }
    }

    /// Create the surface if a map access token is available.
    ///
    /// Only the first call does anything. Without a token the view logs an
    /// error and stays inert for good; there is no retry.
    pub fn mount<F>(&mut self, access_token: Option<&str>, create: F) -> bool
    where
        F: FnOnce(&str) -> S,
    {
        if self.mount_attempted {
            return self.surface.is_some();
        }
        self.mount_attempted = true;

        match access_token.map(str::trim).filter(|token| !token.is_empty()) {
            Some(token) => {
                self.surface = Some(create(token));
                self.state = ViewState::Initialized;
                debug!("Map surface initialized");
                true
            }
            None => {
                error!("Map access token is not configured; map will not be rendered");
                false
            }
        }
    }

    /// Redraw the map from scratch for `points`.
    pub fn render(&mut self, points: &[MapPoint]) {
        let Some(surface) = self.surface.as_mut() else {
            debug!(state = ?self.state, "No map surface; skipping render");
            return;
        };

        for id in self.markers.drain(..) {
            surface.remove_marker(id);
        }
        for point in points {
            self.markers
                .push(surface.add_marker(point.coordinate, &point.label));
        }

        if self.mode == PathMode::ConnectPoints {
            if points.len() >= 2 {
                surface.set_path(ordered_path(points));
            } else {
                surface.clear_path();
            }
        }

        // zero markers leaves the viewport where it was
        if let Some(bounds) = marker_bounds(points.iter().map(|p| Point::from(p.coordinate))) {
            surface.fit_bounds(bounds, self.padding);
        }

        self.state = ViewState::Populated;
        debug!(markers = self.markers.len(), "Map rendered");
    }

    /// Extract coordinates from `records` and redraw.
    pub fn render_records<R: Plottable>(&mut self, records: &[R]) {
        let points = R::plot(records);
        if points.len() < records.len() {
            info!(
                "Plotting {} of {} records; {} skipped",
                points.len(),
                records.len(),
                records.len() - points.len()
            );
        }
        self.render(&points);
    }

    /// Release the surface. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            debug!("Map surface released");
        }
        self.markers.clear();
        self.state = ViewState::TornDown;
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl<S: MapSurface> Drop for MapView<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Path through `points` sorted by connect order, ties in input order.
fn ordered_path(points: &[MapPoint]) -> LineString<f64> {
    let mut ordered: Vec<&MapPoint> = points.iter().collect();
    ordered.sort_by_key(|point| point.connect_order);

    ordered
        .into_iter()
        .map(|point| (point.coordinate.longitude, point.coordinate.latitude))
        .collect::<Vec<_>>()
        .into()
}
