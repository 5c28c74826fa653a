use lms_core::model::{Course, CourseDraft, CourseId, Difficulty, LessonDraft, Progress, UserId};
use lms_core::time::fixed_now;
use storage::snapshot::SnapshotStore;
use storage::SledStore;

fn build_course(title: &str) -> Course {
    let draft = CourseDraft::new(
        title,
        "Snapshot round-trip fixture.",
        "Ms. Rivera",
        "2 weeks",
        "Logistics",
        Difficulty::Beginner,
    )
    .with_lesson(LessonDraft::new("Inventory", "Tracking stock.", "30 min"))
    .with_lesson(LessonDraft::new("Dispatch", "Routing deliveries.", "35 min"));
    Course::new(CourseId::random(), draft, fixed_now()).expect("valid course")
}

#[test]
fn fresh_database_has_no_entries() {
    let store = SledStore::temporary().expect("open temp sled");
    assert!(store.load_courses().expect("load courses").is_none());
    assert!(store.load_progress().expect("load progress").is_none());
}

#[test]
fn snapshot_round_trips_through_sled() {
    let store = SledStore::temporary().expect("open temp sled");

    let mut course = build_course("Field Logistics");
    course.enroll(UserId::new("u1"));
    let lesson = course.lessons()[0].id();

    let mut progress = Progress::start(UserId::new("u1"), course.id(), fixed_now());
    progress.complete_lesson(lesson, course.lesson_count(), fixed_now());

    let courses = vec![course];
    let records = vec![progress];

    store.save_courses(&courses).expect("save courses");
    store.save_progress(&records).expect("save progress");

    let loaded_courses = store.load_courses().expect("load courses").expect("present");
    let loaded_progress = store.load_progress().expect("load progress").expect("present");

    assert_eq!(loaded_courses, courses);
    assert_eq!(loaded_progress, records);
    assert!((loaded_progress[0].percent() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn save_overwrites_previous_entry() {
    let store = SledStore::temporary().expect("open temp sled");

    store
        .save_courses(&[build_course("First"), build_course("Second")])
        .expect("save two");
    store.save_courses(&[build_course("Only")]).expect("save one");

    let loaded = store.load_courses().expect("load").expect("present");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title(), "Only");
}

#[test]
fn entries_are_independent() {
    let store = SledStore::temporary().expect("open temp sled");

    store.save_courses(&[build_course("Solo")]).expect("save courses");

    // Progress entry untouched by a courses write.
    assert!(store.load_progress().expect("load progress").is_none());
}
