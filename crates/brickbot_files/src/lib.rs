pub mod storage;
pub mod validate;

pub use storage::{FileStore, StoreError, StoreStats, StoredFile};
pub use validate::{PlaceInfo, PlaceKind, ValidationError};
