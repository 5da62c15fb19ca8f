//! Lesson Engine - catalog and validation.
//!
//! The engine layer owns the lessons themselves:
//! - Catalog: id lookup, insertion order, opening a lesson
//! - Validation: step list checks shared by the catalog and the mount path

mod catalog;

pub use catalog::*;
