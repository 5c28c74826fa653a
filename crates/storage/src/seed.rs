use chrono::{DateTime, Utc};

use lms_core::model::{Course, CourseDraft, CourseId, Difficulty, LessonDraft};

/// Deterministic starter catalog used when no snapshot has ever been saved
/// (or the saved one cannot be read). Content mirrors the two example courses
/// the platform has always shipped with.
#[must_use]
pub fn seed_courses(now: DateTime<Utc>) -> Vec<Course> {
    let community = CourseDraft::new(
        "Community Development Fundamentals",
        "Learn the basics of community development and grassroots organizing.",
        "Dr. Sarah Wilson",
        "6 weeks",
        "Community Development",
        Difficulty::Beginner,
    )
    .with_image("https://images.pexels.com/photos/1595391/pexels-photo-1595391.jpeg?auto=compress&cs=tinysrgb&w=400")
    .with_lesson(LessonDraft::new(
        "Introduction to Community Development",
        "Understanding the principles and approaches to community development.",
        "45 min",
    ))
    .with_lesson(LessonDraft::new(
        "Stakeholder Engagement",
        "Learning how to identify and engage with community stakeholders.",
        "60 min",
    ))
    .with_lesson(LessonDraft::new(
        "Resource Mobilization",
        "Strategies for mobilizing resources within communities.",
        "50 min",
    ));

    let agriculture = CourseDraft::new(
        "Sustainable Agriculture Practices",
        "Explore sustainable farming techniques and environmental conservation.",
        "Prof. Michael Green",
        "8 weeks",
        "Agriculture",
        Difficulty::Intermediate,
    )
    .with_image("https://images.pexels.com/photos/1459331/pexels-photo-1459331.jpeg?auto=compress&cs=tinysrgb&w=400")
    .with_lesson(LessonDraft::new(
        "Soil Health Management",
        "Understanding soil composition and health indicators.",
        "55 min",
    ))
    .with_lesson(LessonDraft::new(
        "Water Conservation Techniques",
        "Implementing water-saving methods in agriculture.",
        "40 min",
    ));

    [community, agriculture]
        .into_iter()
        .map(|draft| {
            Course::new(CourseId::random(), draft, now).expect("seed course data is valid")
        })
        .collect()
}
