//! Renderer boundary.
//!
//! The engine never draws. It resolves the active step into a [`Panel`] and
//! hands it to a [`Renderer`], which must treat it as read-only input.
//! Learner events flow back through [`crate::pipeline::VisualEvent`], never
//! through the renderer.
//!
//! [`TextRenderer`] is a plain-text renderer used for logs and snapshots.

mod text;

pub use text::TextRenderer;

use crate::pipeline::dispatcher::ResolvedVisual;
use crate::types::QuizQuestion;

/// What the pinned panel shows right now.
#[derive(Debug)]
pub enum Panel<'a> {
    /// Nothing to draw: no step, or a mis-shaped state.
    Empty,
    /// The reserved quiz step is active.
    Quiz(&'a QuizQuestion),
    Visual(ResolvedVisual<'a>),
}

/// Pure function from a resolved panel to output.
pub trait Renderer {
    type Output;

    fn render(&self, panel: &Panel<'_>) -> Self::Output;
}
