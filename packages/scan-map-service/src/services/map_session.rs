use serde_json::Value;

use super::record_set::RecordSet;
use crate::libraries::map_surface::{GeoJsonSurface, MapSurface};
use crate::libraries::map_view::{MapView, Plottable};
use crate::models::MapResponse;

/// One map view together with the records it shows.
///
/// Markers are rebuilt from scratch whenever a fetch succeeds; a failed
/// fetch leaves both the records and the drawn map untouched.
pub struct MapSession<R, S: MapSurface> {
    records: RecordSet<R>,
    view: MapView<S>,
}

impl<R: Plottable, S: MapSurface> MapSession<R, S> {
    pub fn new(view: MapView<S>) -> Self {
        Self {
            records: RecordSet::new(),
            view,
        }
    }

    pub fn mount<F>(&mut self, access_token: Option<&str>, create: F) -> bool
    where
        F: FnOnce(&str) -> S,
    {
        self.view.mount(access_token, create)
    }

    /// Take in a fetch result and redraw on success.
    pub fn apply<E: std::fmt::Display>(&mut self, fetched: Result<Vec<R>, E>) -> Result<(), E> {
        self.records.refresh(fetched)?;
        self.view.render_records(self.records.records());
        Ok(())
    }

    #[cfg(test)]
    fn records(&self) -> &RecordSet<R> {
        &self.records
    }

    #[cfg(test)]
    fn view(&self) -> &MapView<S> {
        &self.view
    }

    #[cfg(test)]
    fn unmount(&mut self) {
        self.view.unmount();
    }
}

impl<R: Plottable> MapSession<R, GeoJsonSurface> {
    pub fn to_geojson(&self) -> Option<Value> {
        self.view.surface().map(GeoJsonSurface::to_geojson)
    }

    pub fn to_response(&self) -> MapResponse {
        MapResponse {
            success: true,
            initialized: self.view.surface().is_some(),
            record_count: self.records.len(),
            marker_count: self.view.marker_count(),
            map: self.to_geojson(),
        }
    }
}
