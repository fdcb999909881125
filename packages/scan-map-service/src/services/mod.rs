pub mod api_client;
pub mod map_session;
pub mod record_set;

pub use api_client::{ApiClient, FetchError};
pub use map_session::MapSession;
pub use record_set::RecordSet;
