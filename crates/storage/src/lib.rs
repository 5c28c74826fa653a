#![forbid(unsafe_code)]

pub mod seed;
pub mod sled;
pub mod snapshot;

pub use crate::sled::{SledInitError, SledStore};
pub use snapshot::{InMemoryStore, SnapshotStore, StorageError};
