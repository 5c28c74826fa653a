use std::path::Path;
use std::sync::Arc;

use lms_core::Clock;
use storage::{InMemoryStore, SledStore};

use crate::course_store::CourseStore;
use crate::error::LmsInitError;

/// The application's composition root.
///
/// Owns the single `CourseStore` instance with its injected persistence
/// backend; the embedding application constructs exactly one of these at
/// startup and hands out access. There is deliberately no ambient global.
pub struct LmsServices {
    courses: CourseStore,
}

impl LmsServices {
    /// Build services backed by a sled database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `LmsInitError` if the database cannot be opened. Snapshot
    /// load problems do not fail startup; the store falls back to the seed
    /// catalog.
    pub fn open_sled(path: impl AsRef<Path>, clock: Clock) -> Result<Self, LmsInitError> {
        let store = Arc::new(SledStore::open(path)?);
        Ok(Self {
            courses: CourseStore::open(store, clock),
        })
    }

    /// Build services with no durable persistence. For tests and previews.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self {
            courses: CourseStore::open(Arc::new(InMemoryStore::new()), clock),
        }
    }

    #[must_use]
    pub fn course_store(&self) -> &CourseStore {
        &self.courses
    }

    pub fn course_store_mut(&mut self) -> &mut CourseStore {
        &mut self.courses
    }
}
