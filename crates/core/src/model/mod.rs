mod course;
mod ids;
mod progress;
mod user;

pub use ids::{CourseId, LessonId, ParseIdError, UserId};

pub use course::{Course, CourseDraft, CourseError, Difficulty, Lesson, LessonDraft};
pub use progress::{Progress, completion_percent};
pub use user::{Role, User};
