use std::sync::Arc;

use tracing::{debug, warn};

use lms_core::Clock;
use lms_core::model::{
    Course, CourseDraft, CourseError, CourseId, LessonDraft, LessonId, Progress, UserId,
};
use storage::SnapshotStore;
use storage::seed::seed_courses;

/// The authoritative in-memory state: the course catalog plus per-(user,
/// course) progress records, with every mutation written through to the
/// injected snapshot store.
///
/// There is exactly one writer: all mutations take `&mut self` and run to
/// completion before any read observes them. Persistence is best-effort; a
/// failed save is logged and the in-memory state remains the source of truth
/// for the session.
pub struct CourseStore {
    clock: Clock,
    store: Arc<dyn SnapshotStore>,
    courses: Vec<Course>,
    progress: Vec<Progress>,
}

impl CourseStore {
    /// Load the persisted snapshot, falling back to the seed catalog when the
    /// `courses` entry is absent or unreadable and to an empty progress list
    /// likewise. Never fails: malformed data is logged and treated as
    /// absence.
    #[must_use]
    pub fn open(store: Arc<dyn SnapshotStore>, clock: Clock) -> Self {
        let (courses, seeded) = match store.load_courses() {
            Ok(Some(courses)) => (courses, false),
            Ok(None) => (seed_courses(clock.now()), true),
            Err(err) => {
                warn!(%err, "could not read persisted courses; starting from seed catalog");
                (seed_courses(clock.now()), true)
            }
        };

        let progress = match store.load_progress() {
            Ok(Some(progress)) => progress,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read persisted progress; starting empty");
                Vec::new()
            }
        };

        let mut this = Self {
            clock,
            store,
            courses,
            progress,
        };
        this.normalize_loaded();
        if seeded {
            this.persist_courses();
        }
        this
    }

    // ─── Commands ──────────────────────────────────────────────────────────

    /// Create a new course from an authoring draft.
    ///
    /// Assigns fresh ids to the course and its lessons; nobody is enrolled.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if a required field is empty after trimming, so
    /// the authoring form can show inline errors.
    pub fn create_course(&mut self, draft: CourseDraft) -> Result<CourseId, CourseError> {
        let course = Course::new(CourseId::random(), draft, self.clock.now())?;
        let id = course.id();
        self.courses.push(course);
        self.persist_courses();
        Ok(id)
    }

    /// Append a lesson to an existing course (authoring only).
    ///
    /// Adding a lesson grows the denominator of every progress record for the
    /// course, so their percentages are recomputed. Unknown course ids are a
    /// silent no-op (`Ok(None)`).
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyLessonTitle` if the draft fails validation.
    pub fn add_lesson(
        &mut self,
        course_id: CourseId,
        draft: LessonDraft,
    ) -> Result<Option<LessonId>, CourseError> {
        let Some(course) = self.courses.iter_mut().find(|c| c.id() == course_id) else {
            debug!(%course_id, "add_lesson ignored: unknown course");
            return Ok(None);
        };

        let lesson_id = course.add_lesson(draft)?;
        let lesson_count = course.lesson_count();

        for record in self.progress.iter_mut().filter(|p| p.course_id() == course_id) {
            record.recompute(lesson_count);
        }

        self.persist_courses();
        self.persist_progress();
        Ok(Some(lesson_id))
    }

    /// Delete a course and cascade to every progress record referencing it.
    ///
    /// Idempotent: deleting an unknown id is a no-op, not an error.
    pub fn delete_course(&mut self, course_id: CourseId) {
        let before = self.courses.len();
        self.courses.retain(|c| c.id() != course_id);
        if self.courses.len() == before {
            debug!(%course_id, "delete_course ignored: unknown course");
            return;
        }

        self.progress.retain(|p| p.course_id() != course_id);
        self.persist_courses();
        self.persist_progress();
    }

    /// Enroll a user in a course.
    ///
    /// Unknown course ids are a silent no-op. Enrollment is idempotent: the
    /// membership is never duplicated, and a progress record is created only
    /// if none exists yet for the (user, course) pair.
    pub fn enroll(&mut self, course_id: CourseId, user_id: UserId) {
        let Some(course) = self.courses.iter_mut().find(|c| c.id() == course_id) else {
            debug!(%course_id, "enroll ignored: unknown course");
            return;
        };

        let added = course.enroll(user_id.clone());

        let has_record = self.progress.iter().any(|p| p.is_for(&user_id, course_id));
        if !has_record {
            self.progress
                .push(Progress::start(user_id, course_id, self.clock.now()));
        }

        if added {
            self.persist_courses();
        }
        if !has_record {
            self.persist_progress();
        }
    }

    /// Record a lesson-completion event.
    ///
    /// Unknown course ids are a silent no-op; a lesson id that does not
    /// belong to the course is rejected and leaves progress untouched.
    /// Completion is idempotent. Creates the progress record on first
    /// completion if enrollment never did.
    pub fn record_lesson_completion(
        &mut self,
        user_id: &UserId,
        course_id: CourseId,
        lesson_id: LessonId,
    ) {
        let Some(course) = self.courses.iter().find(|c| c.id() == course_id) else {
            debug!(%course_id, "completion ignored: unknown course");
            return;
        };
        if !course.has_lesson(lesson_id) {
            debug!(%course_id, %lesson_id, "completion rejected: lesson not in course");
            return;
        }

        let lesson_count = course.lesson_count();
        let now = self.clock.now();

        match self
            .progress
            .iter_mut()
            .find(|p| p.is_for(user_id, course_id))
        {
            Some(record) => {
                record.complete_lesson(lesson_id, lesson_count, now);
            }
            None => {
                let mut record = Progress::start(user_id.clone(), course_id, now);
                record.complete_lesson(lesson_id, lesson_count, now);
                self.progress.push(record);
            }
        }

        self.persist_progress();
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    /// The progress record for a (user, course) pair, if one exists.
    ///
    /// Pure read: never synthesizes a record.
    #[must_use]
    pub fn get_progress(&self, user_id: &UserId, course_id: CourseId) -> Option<&Progress> {
        self.progress.iter().find(|p| p.is_for(user_id, course_id))
    }

    /// Current course catalog snapshot.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Current progress snapshot.
    #[must_use]
    pub fn progress(&self) -> &[Progress] {
        &self.progress
    }

    // ─── Internals ─────────────────────────────────────────────────────────

    /// Restore invariants a snapshot from an older build may violate: one
    /// record per (user, course), no records for deleted courses, and a
    /// percent that matches the current lesson counts.
    fn normalize_loaded(&mut self) {
        let mut kept: Vec<Progress> = Vec::with_capacity(self.progress.len());
        for record in self.progress.drain(..) {
            if kept
                .iter()
                .any(|p| p.is_for(record.user_id(), record.course_id()))
            {
                debug!(
                    user_id = %record.user_id(),
                    course_id = %record.course_id(),
                    "dropped duplicate progress record from snapshot"
                );
                continue;
            }
            let Some(course) = self.courses.iter().find(|c| c.id() == record.course_id()) else {
                debug!(course_id = %record.course_id(), "dropped orphan progress record");
                continue;
            };
            let mut record = record;
            record.recompute(course.lesson_count());
            kept.push(record);
        }
        self.progress = kept;
    }

    fn persist_courses(&self) {
        if let Err(err) = self.store.save_courses(&self.courses) {
            warn!(%err, "failed to persist courses; in-memory state remains authoritative");
        }
    }

    fn persist_progress(&self) {
        if let Err(err) = self.store.save_progress(&self.progress) {
            warn!(%err, "failed to persist progress; in-memory state remains authoritative");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
