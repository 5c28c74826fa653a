//! Read-only projections over the store's current snapshot.
//!
//! Everything here is pure: functions borrow the course and progress slices
//! and never mutate or persist. The presentation layer renders these
//! directly.

use std::collections::HashSet;

use lms_core::model::{Course, Progress, User, UserId};

/// Courses matching a free-text term, case-insensitively, across title,
/// description, and category. An empty (or whitespace) term matches every
/// course.
#[must_use]
pub fn search<'a>(courses: &'a [Course], term: &str) -> Vec<&'a Course> {
    let needle = term.trim().to_lowercase();
    courses
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.title().to_lowercase().contains(&needle)
                || c.description().to_lowercase().contains(&needle)
                || c.category().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Courses the given user is enrolled in.
#[must_use]
pub fn enrolled_in<'a>(courses: &'a [Course], user_id: &UserId) -> Vec<&'a Course> {
    courses.iter().filter(|c| c.is_enrolled(user_id)).collect()
}

/// Count of distinct user ids across all courses' enrolled sets.
#[must_use]
pub fn distinct_students(courses: &[Course]) -> usize {
    courses
        .iter()
        .flat_map(|c| c.enrolled_students())
        .collect::<HashSet<_>>()
        .len()
}

/// Courses with at least one enrolled student.
#[must_use]
pub fn active_courses(courses: &[Course]) -> usize {
    courses
        .iter()
        .filter(|c| !c.enrolled_students().is_empty())
        .count()
}

/// Arithmetic mean of the user's completion percentages, 0 when the user has
/// no progress records.
#[must_use]
pub fn average_percent(progress: &[Progress], user_id: &UserId) -> f64 {
    let percents: Vec<f64> = progress
        .iter()
        .filter(|p| p.user_id() == user_id)
        .map(Progress::percent)
        .collect();

    if percents.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = percents.iter().sum::<f64>() / percents.len() as f64;
    mean
}

/// Number of courses the user has fully completed.
#[must_use]
pub fn completed_courses(progress: &[Progress], user_id: &UserId) -> usize {
    progress
        .iter()
        .filter(|p| p.user_id() == user_id && p.is_complete())
        .count()
}

/// Dashboard figures for the current user.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewStats {
    /// All courses for admins; the user's enrolled courses for students.
    pub course_count: usize,
    pub distinct_students: usize,
    pub active_courses: usize,
    pub average_percent: f64,
    pub completed_courses: usize,
}

/// Role-aware dashboard aggregate over the full snapshot.
#[must_use]
pub fn overview(courses: &[Course], progress: &[Progress], user: &User) -> OverviewStats {
    let course_count = if user.role().is_admin() {
        courses.len()
    } else {
        enrolled_in(courses, user.id()).len()
    };

    OverviewStats {
        course_count,
        distinct_students: distinct_students(courses),
        active_courses: active_courses(courses),
        average_percent: average_percent(progress, user.id()),
        completed_courses: completed_courses(progress, user.id()),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
