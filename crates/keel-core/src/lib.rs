//! Project store for Keel: an in-memory cache of project records kept in
//! sync with one JSON file per record.

mod clock;
mod error;
mod files;
mod paths;
mod store;

pub use clock::{Clock, IdSource, RandomIds, SystemClock};
pub use error::KeelError;
pub use files::RecordFiles;
pub use paths::{normalize_path, path_within};
pub use store::{default_dir, ProjectStore, StoreOptions};

/// Result type for Keel operations.
pub type Result<T> = std::result::Result<T, KeelError>;
