use std::path::Path;

use thiserror::Error;

use lms_core::model::{Course, Progress};

use crate::snapshot::{CourseRecord, ProgressRecord, SnapshotStore, StorageError};

const COURSES_KEY: &str = "courses";
const PROGRESS_KEY: &str = "progress";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SledInitError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

/// Snapshot store backed by an embedded sled key-value database.
///
/// Holds exactly two entries, `courses` and `progress`, each a JSON array.
/// Every save overwrites the whole entry and flushes to disk.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open (or create) the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `SledInitError` if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SledInitError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open a throwaway database that is deleted on drop. For tests.
    ///
    /// # Errors
    ///
    /// Returns `SledInitError` if the database cannot be created.
    pub fn temporary() -> Result<Self, SledInitError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn read_entry(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self
            .db
            .get(key)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn write_entry(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.db
            .insert(key, bytes)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

impl SnapshotStore for SledStore {
    fn load_courses(&self) -> Result<Option<Vec<Course>>, StorageError> {
        match self.read_entry(COURSES_KEY)? {
            None => Ok(None),
            Some(bytes) => {
                let records: Vec<CourseRecord> = serde_json::from_slice(&bytes)?;
                let courses = records
                    .into_iter()
                    .map(CourseRecord::into_course)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(courses))
            }
        }
    }

    fn load_progress(&self) -> Result<Option<Vec<Progress>>, StorageError> {
        match self.read_entry(PROGRESS_KEY)? {
            None => Ok(None),
            Some(bytes) => {
                let records: Vec<ProgressRecord> = serde_json::from_slice(&bytes)?;
                Ok(Some(records.into_iter().map(ProgressRecord::into_progress).collect()))
            }
        }
    }

    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        let records: Vec<CourseRecord> = courses.iter().map(CourseRecord::from_course).collect();
        self.write_entry(COURSES_KEY, serde_json::to_vec(&records)?)
    }

    fn save_progress(&self, progress: &[Progress]) -> Result<(), StorageError> {
        let records: Vec<ProgressRecord> =
            progress.iter().map(ProgressRecord::from_progress).collect();
        self.write_entry(PROGRESS_KEY, serde_json::to_vec(&records)?)
    }
}
