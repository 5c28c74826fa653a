use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use lms_core::model::{
    Course, CourseError, CourseId, Difficulty, Lesson, LessonDraft, LessonId, Progress, UserId,
};

/// Errors surfaced by snapshot stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<CourseError> for StorageError {
    fn from(err: CourseError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: LessonId,
    pub title: String,
    pub content: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl LessonRecord {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id(),
            title: lesson.title().to_owned(),
            content: lesson.content().to_owned(),
            duration: lesson.duration().to_owned(),
            video_url: lesson.video_url().map(str::to_owned),
        }
    }

    /// Convert the record back into a domain `Lesson`, re-validating.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the persisted title fails validation.
    pub fn into_lesson(self) -> Result<Lesson, CourseError> {
        let mut draft = LessonDraft::new(self.title, self.content, self.duration);
        draft.video_url = self.video_url;
        Lesson::new(self.id, draft)
    }
}

/// Persisted shape of a course.
///
/// Field names match the JSON layout the presentation layer historically
/// stored under the `courses` entry, so existing snapshots remain readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub lessons: Vec<LessonRecord>,
    pub enrolled_students: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CourseRecord {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            instructor: course.instructor().to_owned(),
            duration: course.duration().to_owned(),
            category: course.category().to_owned(),
            difficulty: course.difficulty(),
            lessons: course.lessons().iter().map(LessonRecord::from_lesson).collect(),
            enrolled_students: course.enrolled_students().to_vec(),
            created_at: course.created_at(),
            image: course.image().map(str::to_owned),
        }
    }

    /// Convert the record back into a domain `Course`, re-validating.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if any persisted field fails validation.
    pub fn into_course(self) -> Result<Course, CourseError> {
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonRecord::into_lesson)
            .collect::<Result<Vec<_>, _>>()?;

        Course::from_persisted(
            self.id,
            self.title,
            self.description,
            self.instructor,
            self.duration,
            self.category,
            self.difficulty,
            lessons,
            self.enrolled_students,
            self.created_at,
            self.image,
        )
    }
}

/// Persisted shape of a progress record, stored under the `progress` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub completed_lessons: Vec<LessonId>,
    pub progress: f64,
    pub last_accessed: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &Progress) -> Self {
        Self {
            user_id: progress.user_id().clone(),
            course_id: progress.course_id(),
            completed_lessons: progress.completed_lessons().to_vec(),
            progress: progress.percent(),
            last_accessed: progress.last_accessed(),
        }
    }

    #[must_use]
    pub fn into_progress(self) -> Progress {
        Progress::from_persisted(
            self.user_id,
            self.course_id,
            self.completed_lessons,
            self.progress,
            self.last_accessed,
        )
    }
}

//
// ─── SNAPSHOT STORE ────────────────────────────────────────────────────────────
//

/// Durable key-value snapshot of the course catalog and progress records.
///
/// The snapshot is two independent entries (`courses` and `progress`), each a
/// JSON array. `Ok(None)` means the entry has never been written; decode
/// failures surface as `StorageError::Serialization` so the caller can treat
/// them as absence rather than crash.
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted course list, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    fn load_courses(&self) -> Result<Option<Vec<Course>>, StorageError>;

    /// Load the persisted progress records, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    fn load_progress(&self) -> Result<Option<Vec<Progress>>, StorageError>;

    /// Overwrite the `courses` entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on encode or write failure.
    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError>;

    /// Overwrite the `progress` entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on encode or write failure.
    fn save_progress(&self, progress: &[Progress]) -> Result<(), StorageError>;
}

/// In-memory snapshot store for tests and prototyping.
///
/// Keeps the serialized JSON per entry behind a mutex, so round-trip behavior
/// matches the durable backends byte for byte.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_entry(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write_entry(&self, key: &'static str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.insert(key, value);
        Ok(())
    }
}

impl SnapshotStore for InMemoryStore {
    fn load_courses(&self) -> Result<Option<Vec<Course>>, StorageError> {
        match self.read_entry("courses")? {
            None => Ok(None),
            Some(json) => {
                let records: Vec<CourseRecord> = serde_json::from_str(&json)?;
                let courses = records
                    .into_iter()
                    .map(CourseRecord::into_course)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(courses))
            }
        }
    }

    fn load_progress(&self) -> Result<Option<Vec<Progress>>, StorageError> {
        match self.read_entry("progress")? {
            None => Ok(None),
            Some(json) => {
                let records: Vec<ProgressRecord> = serde_json::from_str(&json)?;
                Ok(Some(records.into_iter().map(ProgressRecord::into_progress).collect()))
            }
        }
    }

    fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        let records: Vec<CourseRecord> = courses.iter().map(CourseRecord::from_course).collect();
        self.write_entry("courses", serde_json::to_string(&records)?)
    }

    fn save_progress(&self, progress: &[Progress]) -> Result<(), StorageError> {
        let records: Vec<ProgressRecord> =
            progress.iter().map(ProgressRecord::from_progress).collect();
        self.write_entry("progress", serde_json::to_string(&records)?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::model::{CourseDraft, LessonDraft};
    use lms_core::time::fixed_now;

    fn sample_course() -> Course {
        let draft = CourseDraft::new(
            "Water Sanitation",
            "Safe water handling for field teams.",
            "Prof. Okafor",
            "3 weeks",
            "Health",
            Difficulty::Intermediate,
        )
        .with_image("https://example.org/water.jpg")
        .with_lesson(LessonDraft::new("Testing Kits", "Using field kits.", "25 min"))
        .with_lesson(
            LessonDraft::new("Chlorination", "Dosage basics.", "40 min")
                .with_video_url("https://example.org/chlorination.mp4"),
        );
        Course::new(CourseId::random(), draft, fixed_now()).unwrap()
    }

    #[test]
    fn course_record_round_trip() {
        let mut course = sample_course();
        course.enroll(UserId::new("u1"));

        let record = CourseRecord::from_course(&course);
        let json = serde_json::to_string(&record).unwrap();
        let decoded: CourseRecord = serde_json::from_str(&json).unwrap();
        let restored = decoded.into_course().unwrap();

        assert_eq!(restored, course);
    }

    #[test]
    fn course_record_uses_legacy_field_names() {
        let record = CourseRecord::from_course(&sample_course());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("enrolledStudents").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["difficulty"], "Intermediate");
    }

    #[test]
    fn progress_record_round_trip() {
        let course = sample_course();
        let lesson = course.lessons()[0].id();
        let mut progress = Progress::start(UserId::new("u1"), course.id(), fixed_now());
        progress.complete_lesson(lesson, course.lesson_count(), fixed_now());

        let record = ProgressRecord::from_progress(&progress);
        let json = serde_json::to_string(&record).unwrap();
        let decoded: ProgressRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.into_progress(), progress);
    }

    #[test]
    fn progress_record_uses_legacy_field_names() {
        let progress = Progress::start(UserId::new("u1"), CourseId::random(), fixed_now());
        let json = serde_json::to_value(ProgressRecord::from_progress(&progress)).unwrap();

        assert!(json.get("userId").is_some());
        assert!(json.get("completedLessons").is_some());
        assert!(json.get("lastAccessed").is_some());
        assert_eq!(json["progress"], 0.0);
    }

    #[test]
    fn in_memory_store_round_trips_both_entries() {
        let store = InMemoryStore::new();
        assert!(store.load_courses().unwrap().is_none());
        assert!(store.load_progress().unwrap().is_none());

        let courses = vec![sample_course()];
        let progress = vec![Progress::start(UserId::new("u1"), courses[0].id(), fixed_now())];

        store.save_courses(&courses).unwrap();
        store.save_progress(&progress).unwrap();

        assert_eq!(store.load_courses().unwrap().unwrap(), courses);
        assert_eq!(store.load_progress().unwrap().unwrap(), progress);
    }

    #[test]
    fn record_with_invalid_title_fails_validation() {
        let mut record = CourseRecord::from_course(&sample_course());
        record.title = "   ".into();
        assert!(record.into_course().is_err());
    }
}
