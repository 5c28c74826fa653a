use chrono::{DateTime, Utc};

use crate::model::ids::{CourseId, LessonId, UserId};

/// Completion percentage as a pure function of the completed count and the
/// course's lesson count.
///
/// Defined as 0 for a course with no lessons and clamped to `[0, 100]` so a
/// record can never report an out-of-range value, even against stale counts.
#[must_use]
pub fn completion_percent(completed: usize, lesson_count: usize) -> f64 {
    if lesson_count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let raw = (completed as f64 / lesson_count as f64) * 100.0;
    raw.clamp(0.0, 100.0)
}

/// Per-(user, course) completion tracking.
///
/// At most one record exists per pair; the store enforces this. The percent
/// field is always derived from `completed_lessons` against the course's
/// lesson count, never mutated independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    user_id: UserId,
    course_id: CourseId,
    completed_lessons: Vec<LessonId>,
    percent: f64,
    last_accessed: DateTime<Utc>,
}

impl Progress {
    /// Creates a fresh zero-percent record, as minted on first enrollment or
    /// first completion event.
    #[must_use]
    pub fn start(user_id: UserId, course_id: CourseId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            course_id,
            completed_lessons: Vec::new(),
            percent: 0.0,
            last_accessed: now,
        }
    }

    /// Rebuilds a record from persisted state.
    ///
    /// Duplicate completed-lesson entries are dropped, keeping first
    /// occurrence order. The stored percent is taken as-is; the store
    /// recomputes it against the owning course right after loading.
    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        course_id: CourseId,
        completed_lessons: Vec<LessonId>,
        percent: f64,
        last_accessed: DateTime<Utc>,
    ) -> Self {
        let mut deduped: Vec<LessonId> = Vec::with_capacity(completed_lessons.len());
        for lesson in completed_lessons {
            if !deduped.contains(&lesson) {
                deduped.push(lesson);
            }
        }

        Self {
            user_id,
            course_id,
            completed_lessons: deduped,
            percent: percent.clamp(0.0, 100.0),
            last_accessed,
        }
    }

    // Accessors
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &[LessonId] {
        &self.completed_lessons
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    #[must_use]
    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    /// Returns true if this record tracks the given (user, course) pair.
    #[must_use]
    pub fn is_for(&self, user_id: &UserId, course_id: CourseId) -> bool {
        self.user_id == *user_id && self.course_id == course_id
    }

    /// Marks a lesson as completed.
    ///
    /// Idempotent: re-marking an already-completed lesson changes nothing but
    /// the last-accessed timestamp. The percent is recomputed from the given
    /// lesson count on every call.
    ///
    /// Returns `true` if the lesson was newly recorded.
    pub fn complete_lesson(
        &mut self,
        lesson_id: LessonId,
        lesson_count: usize,
        now: DateTime<Utc>,
    ) -> bool {
        let added = if self.completed_lessons.contains(&lesson_id) {
            false
        } else {
            self.completed_lessons.push(lesson_id);
            true
        };

        self.percent = completion_percent(self.completed_lessons.len(), lesson_count);
        self.last_accessed = now;
        added
    }

    /// Recomputes the percent against a (possibly changed) lesson count.
    ///
    /// Used after loading a snapshot and after authoring adds a lesson to the
    /// course, which changes the denominator for every existing record.
    pub fn recompute(&mut self, lesson_count: usize) {
        self.percent = completion_percent(self.completed_lessons.len(), lesson_count);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
