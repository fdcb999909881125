pub mod coordinate_extractor;
pub mod map_surface;
pub mod map_view;
pub mod memo_extractor;

pub use coordinate_extractor::{extract, extract_all, Rejection};
pub use map_surface::{GeoJsonSurface, MapSurface, MarkerId, Viewport};
pub use map_view::{MapView, PathMode, Plottable, ViewState};
pub use memo_extractor::{extract_events, extract_memo, MemoRejection};
