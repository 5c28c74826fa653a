#![forbid(unsafe_code)]

pub mod course_store;
pub mod error;
pub mod lms;
pub mod queries;

pub use lms_core::Clock;

pub use course_store::CourseStore;
pub use error::LmsInitError;
pub use lms::LmsServices;
pub use queries::OverviewStats;
