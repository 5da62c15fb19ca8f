//! Lesson construction errors
//!
//! Runtime paths never fail; only building or opening a lesson can.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LessonError {
    #[error("lesson `{lesson}` has no steps")]
    EmptyLesson { lesson: String },

    #[error("lesson `{lesson}` declares step `{step}` more than once")]
    DuplicateStep { lesson: String, step: String },

    #[error("lesson `{lesson}` uses reserved step id `{step}`")]
    ReservedStepId { lesson: String, step: String },

    #[error("lesson `{0}` is already in the catalog")]
    DuplicateLesson(String),

    #[error("unknown lesson `{0}`")]
    UnknownLesson(String),
}

pub type Result<T> = std::result::Result<T, LessonError>;
