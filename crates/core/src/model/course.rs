use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("course description cannot be empty")]
    EmptyDescription,

    #[error("course instructor cannot be empty")]
    EmptyInstructor,

    #[error("course duration cannot be empty")]
    EmptyDuration,

    #[error("course category cannot be empty")]
    EmptyCategory,

    #[error("lesson title cannot be empty")]
    EmptyLessonTitle,

    #[error("duplicate lesson id within course")]
    DuplicateLessonId,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Course difficulty rating shown to students when browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Difficulty {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Difficulty::Beginner),
            "Intermediate" => Ok(Difficulty::Intermediate),
            "Advanced" => Ok(Difficulty::Advanced),
            other => Err(CourseError::UnknownDifficulty(other.to_owned())),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Authoring input for a single lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub title: String,
    pub content: String,
    pub duration: String,
    pub video_url: Option<String>,
}

impl LessonDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            duration: duration.into(),
            video_url: None,
        }
    }

    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }
}

/// A single unit of course content.
///
/// Lessons are immutable once created and live only inside their course;
/// they are deleted when the course is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    content: String,
    duration: String,
    video_url: Option<String>,
}

impl Lesson {
    /// Creates a lesson from an authoring draft.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyLessonTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(id: LessonId, draft: LessonDraft) -> Result<Self, CourseError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyLessonTitle);
        }

        let video_url = draft
            .video_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());

        Ok(Self {
            id,
            title,
            content: draft.content.trim().to_owned(),
            duration: draft.duration.trim().to_owned(),
            video_url,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Authoring input for a new course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub image: Option<String>,
    pub lessons: Vec<LessonDraft>,
}

impl CourseDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        instructor: impl Into<String>,
        duration: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            instructor: instructor.into(),
            duration: duration.into(),
            category: category.into(),
            difficulty,
            image: None,
            lessons: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_lesson(mut self, lesson: LessonDraft) -> Self {
        self.lessons.push(lesson);
        self
    }
}

/// A course: ordered lessons plus the set of enrolled students.
///
/// Enrollment has set semantics; a user id appears at most once in
/// `enrolled_students` regardless of how often enrollment is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    instructor: String,
    duration: String,
    category: String,
    difficulty: Difficulty,
    lessons: Vec<Lesson>,
    enrolled_students: Vec<UserId>,
    created_at: DateTime<Utc>,
    image: Option<String>,
}

impl Course {
    /// Creates a new course from an authoring draft, assigning a fresh id to
    /// every lesson. The enrolled set starts empty; nobody is implicitly
    /// enrolled by authoring.
    ///
    /// # Errors
    ///
    /// Returns a `CourseError` if any required text field is empty after
    /// trimming, or if a lesson draft fails validation.
    pub fn new(
        id: CourseId,
        draft: CourseDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let lessons = draft
            .lessons
            .into_iter()
            .map(|l| Lesson::new(LessonId::random(), l))
            .collect::<Result<Vec<_>, _>>()?;

        Self::build(
            id,
            draft.title,
            draft.description,
            draft.instructor,
            draft.duration,
            draft.category,
            draft.difficulty,
            lessons,
            Vec::new(),
            created_at,
            draft.image,
        )
    }

    /// Rebuilds a course from persisted state.
    ///
    /// Duplicate entries in the persisted enrolled set (legacy data) are
    /// dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns a `CourseError` if required fields fail validation or lesson
    /// ids collide.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: CourseId,
        title: String,
        description: String,
        instructor: String,
        duration: String,
        category: String,
        difficulty: Difficulty,
        lessons: Vec<Lesson>,
        enrolled_students: Vec<UserId>,
        created_at: DateTime<Utc>,
        image: Option<String>,
    ) -> Result<Self, CourseError> {
        let mut deduped: Vec<UserId> = Vec::with_capacity(enrolled_students.len());
        for user in enrolled_students {
            if !deduped.contains(&user) {
                deduped.push(user);
            }
        }

        Self::build(
            id,
            title,
            description,
            instructor,
            duration,
            category,
            difficulty,
            lessons,
            deduped,
            created_at,
            image,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        id: CourseId,
        title: String,
        description: String,
        instructor: String,
        duration: String,
        category: String,
        difficulty: Difficulty,
        lessons: Vec<Lesson>,
        enrolled_students: Vec<UserId>,
        created_at: DateTime<Utc>,
        image: Option<String>,
    ) -> Result<Self, CourseError> {
        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        let description = description.trim().to_owned();
        if description.is_empty() {
            return Err(CourseError::EmptyDescription);
        }
        let instructor = instructor.trim().to_owned();
        if instructor.is_empty() {
            return Err(CourseError::EmptyInstructor);
        }
        let duration = duration.trim().to_owned();
        if duration.is_empty() {
            return Err(CourseError::EmptyDuration);
        }
        let category = category.trim().to_owned();
        if category.is_empty() {
            return Err(CourseError::EmptyCategory);
        }

        for (i, lesson) in lessons.iter().enumerate() {
            if lessons[..i].iter().any(|other| other.id() == lesson.id()) {
                return Err(CourseError::DuplicateLessonId);
            }
        }

        let image = image.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty());

        Ok(Self {
            id,
            title,
            description,
            instructor,
            duration,
            category,
            difficulty,
            lessons,
            enrolled_students,
            created_at,
            image,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn has_lesson(&self, lesson_id: LessonId) -> bool {
        self.lessons.iter().any(|l| l.id() == lesson_id)
    }

    #[must_use]
    pub fn enrolled_students(&self) -> &[UserId] {
        &self.enrolled_students
    }

    #[must_use]
    pub fn is_enrolled(&self, user_id: &UserId) -> bool {
        self.enrolled_students.contains(user_id)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Adds the user to the enrolled set if not already present.
    ///
    /// Returns `true` if the membership was added, `false` if the user was
    /// already enrolled.
    pub fn enroll(&mut self, user_id: UserId) -> bool {
        if self.enrolled_students.contains(&user_id) {
            return false;
        }
        self.enrolled_students.push(user_id);
        true
    }

    /// Appends a lesson with a freshly assigned id (authoring only).
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyLessonTitle` if the draft title is empty.
    pub fn add_lesson(&mut self, draft: LessonDraft) -> Result<LessonId, CourseError> {
        let lesson = Lesson::new(LessonId::random(), draft)?;
        let id = lesson.id();
        self.lessons.push(lesson);
        Ok(id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
