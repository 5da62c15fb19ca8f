//! Lesson Catalog - the set of lessons a learner can pick from.
//!
//! Lessons are validated on insert:
//! - at least one step
//! - unique step ids
//! - no step named after the reserved quiz id
//! - unique lesson ids across the catalog
//!
//! `open` mounts a [`LessonEngine`] for one lesson. The catalog keeps its
//! own `Rc` so reopening a lesson shares the same step data.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::error::{LessonError, Result};
use crate::pipeline::mount::LessonEngine;
use crate::types::{LessonDefinition, QUIZ_STEP_ID};

// =============================================================================
// Validation
// =============================================================================

/// Check a lesson's step list.
pub fn validate_lesson(lesson: &LessonDefinition) -> Result<()> {
    if lesson.steps.is_empty() {
        return Err(LessonError::EmptyLesson {
            lesson: lesson.id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for step in &lesson.steps {
        if step.id == QUIZ_STEP_ID {
            return Err(LessonError::ReservedStepId {
                lesson: lesson.id.clone(),
                step: step.id.clone(),
            });
        }
        if !seen.insert(step.id.as_str()) {
            return Err(LessonError::DuplicateStep {
                lesson: lesson.id.clone(),
                step: step.id.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Default)]
pub struct LessonCatalog {
    lessons: Vec<Rc<LessonDefinition>>,
    /// Lesson id to position in `lessons`.
    index: HashMap<String, usize>,
}

impl LessonCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lesson after validating it.
    pub fn insert(&mut self, lesson: LessonDefinition) -> Result<()> {
        validate_lesson(&lesson)?;
        if self.index.contains_key(&lesson.id) {
            return Err(LessonError::DuplicateLesson(lesson.id));
        }
        self.index.insert(lesson.id.clone(), self.lessons.len());
        self.lessons.push(Rc::new(lesson));
        Ok(())
    }

    /// Builder-style insert.
    pub fn with(mut self, lesson: LessonDefinition) -> Result<Self> {
        self.insert(lesson)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&LessonDefinition> {
        self.index.get(id).map(|&i| self.lessons[i].as_ref())
    }

    /// Lessons in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LessonDefinition> {
        self.lessons.iter().map(|lesson| lesson.as_ref())
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Mount a lesson by id.
    pub fn open(&self, id: &str, config: EngineConfig) -> Result<LessonEngine> {
        let Some(&position) = self.index.get(id) else {
            return Err(LessonError::UnknownLesson(id.to_string()));
        };
        tracing::debug!(lesson = id, "lesson opened");
        LessonEngine::mount(Rc::clone(&self.lessons[position]), config)
    }
}

// =============================================================================
// Tests
// =============================================================================
