pub mod location;
pub mod record;
pub mod responses;

// Re-export commonly used types
pub use location::{Coordinate, MapPoint};
pub use record::{EventRecord, LocationRecord, UNNAMED_LOCATION};
pub use responses::{ErrorResponse, MapResponse};
