//! Plain-text renderer.
//!
//! One line per visual element. Markers:
//! - `[x]` draggable, `{x}` drop target, `{>x<}` drop target accepting the drag
//! - `*x*` highlighted term or word, `_x_` input
//! - `>` command prompt, `!` command error

use std::fmt::Write;

use super::{Panel, Renderer};
use crate::pipeline::dispatcher::{AlgebraView, CartesianView, ResolvedVisual, SatView, WaveformView};
use crate::types::{AlgebraTerm, InteractionKind, TextSegment, WaveformFlags, WordEmphasis};

/// Renders a panel as newline separated text.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Decimal places for coordinates.
    pub precision: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn waveform(&self, view: &WaveformView<'_>, out: &mut String) {
        let p = self.precision;
        let _ = write!(
            out,
            "waveform amplitude={:.p$} frequency={:.p$} phase={:.p$}",
            view.amplitude, view.state.frequency, view.phase
        );
        let flags = view.state.flags;
        for (flag, name) in [
            (WaveformFlags::PLAYING, "playing"),
            (WaveformFlags::SHOW_TIME_AXIS, "time-axis"),
            (WaveformFlags::SHOW_DISPLACEMENT_AXIS, "displacement-axis"),
            (WaveformFlags::HIGHLIGHT_POINT, "highlight"),
        ] {
            if flags.contains(flag) {
                let _ = write!(out, " {name}");
            }
        }
        out.push('\n');
    }

    fn cartesian(&self, view: &CartesianView<'_>, out: &mut String) {
        let p = self.precision;
        let state = view.state;
        let _ = writeln!(
            out,
            "plane x[{:.p$}, {:.p$}] y[{:.p$}, {:.p$}]",
            state.domain.0, state.domain.1, state.range.0, state.range.1
        );
        for plot in &state.plots {
            let _ = writeln!(out, "plot {} {}", plot.color, plot.label.as_deref().unwrap_or(""));
        }
        for point in &state.highlight_points {
            let _ = writeln!(
                out,
                "point ({:.p$}, {:.p$}) {}",
                point.at.x,
                point.at.y,
                point.label.as_deref().unwrap_or("")
            );
        }
        if let Some(slope) = state.show_slope_at {
            let _ = writeln!(out, "slope x={:.p$} plot={}", slope.x, slope.plot_index);
        }
        if let Some(hover) = view.hover {
            let _ = writeln!(out, "hover ({:.p$}, {:.p$})", hover.point.x, hover.point.y);
        }
        if let Some(marker) = view.success_marker() {
            let _ = writeln!(out, "solved ({:.p$}, {:.p$})", marker.x, marker.y);
        }
        if let Some(feedback) = view.feedback {
            let _ = writeln!(out, "{feedback}");
        }
    }

    fn algebra(&self, view: &AlgebraView<'_>, out: &mut String) {
        for line in view.equations() {
            for term in line {
                match term {
                    AlgebraTerm::Text { value, .. } => out.push_str(value),
                    AlgebraTerm::Highlight { value, .. } => {
                        let _ = write!(out, "*{value}*");
                    }
                    AlgebraTerm::Draggable { value, .. } => {
                        let _ = write!(out, "[{value}]");
                    }
                    AlgebraTerm::DropTarget { placeholder, .. } => {
                        if view.is_accepting(term) {
                            let _ = write!(out, "{{>{placeholder}<}}");
                        } else {
                            let _ = write!(out, "{{{placeholder}}}");
                        }
                    }
                    AlgebraTerm::Input { id, correct_value, placeholder } => {
                        let shown = if view.machine.is_input_correct(id) {
                            correct_value.as_str()
                        } else {
                            view.machine
                                .input_value(id)
                                .or(placeholder.as_deref())
                                .unwrap_or("")
                        };
                        let _ = write!(out, "_{shown}_");
                    }
                }
            }
            out.push('\n');
        }
        if let Some(annotation) = view.annotation() {
            let _ = writeln!(out, "{annotation}");
        }

        if let Some(message) = view.fill_input_message() {
            let _ = writeln!(out, "{message}");
        }

        if view.machine.is_solved() {
            return;
        }
        let Some(spec) = view.interaction() else {
            return;
        };
        if let Some(title) = &spec.title {
            let _ = writeln!(out, "{title}");
        }
        match &spec.kind {
            InteractionKind::CommandInput { prompt, .. } => {
                if let Some(prompt) = prompt {
                    let _ = writeln!(out, "{prompt}");
                }
                let error = if view.machine.command_error() { " !" } else { "" };
                let _ = writeln!(out, "> {}{error}", view.machine.command_buffer());
            }
            InteractionKind::Choice(choices) => {
                let selected = view.machine.selected_choice();
                for choice in choices {
                    let mark = if selected == Some(choice.id.as_str()) { "(x)" } else { "( )" };
                    let _ = writeln!(out, "{mark} {}", choice.text);
                    if selected == Some(choice.id.as_str()) {
                        if let Some(feedback) = &choice.feedback {
                            let _ = writeln!(out, "    {feedback}");
                        }
                    }
                }
            }
            InteractionKind::FillInput | InteractionKind::DragDrop => {}
        }
    }

    fn sat(&self, view: &SatView<'_>, out: &mut String) {
        for segment in view.segments() {
            match segment {
                TextSegment::Plain(text) => out.push_str(text),
                TextSegment::Emphasized(word) => match &view.state.emphasis {
                    WordEmphasis::Cycling { .. } => {
                        let _ = write!(out, "[{}]", view.cycling_word().unwrap_or(word));
                    }
                    WordEmphasis::Input { .. } => {
                        let _ = write!(out, "_{}_", view.input_value);
                    }
                    WordEmphasis::Flashing(_) => {
                        if view.flash_visible() {
                            out.push_str(word);
                        } else {
                            out.push_str(&" ".repeat(word.chars().count()));
                        }
                    }
                    WordEmphasis::Obscured(_) => out.push_str(&"_".repeat(word.chars().count())),
                    WordEmphasis::Highlighted { .. } | WordEmphasis::Plain => {
                        let _ = write!(out, "*{word}*");
                    }
                },
            }
        }
        out.push('\n');

        if let WordEmphasis::Input { instruction: Some(instruction), .. } = &view.state.emphasis {
            let _ = writeln!(out, "{instruction}");
        }

        for (index, choice) in view.visible_choices().iter().enumerate() {
            let letter = char::from(b'A' + (index % 26) as u8);
            let selected = if view.selected() == Some(choice.id.as_str()) { "*" } else { " " };
            let warning = if view.is_warning(&choice.id) { " (!)" } else { "" };
            let _ = writeln!(out, "{selected}{letter}) {}{warning}", choice.text);
            if view.show_feedback(&choice.id) {
                if let Some(feedback) = &choice.feedback {
                    let _ = writeln!(out, "    {feedback}");
                }
            }
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, panel: &Panel<'_>) -> String {
        let mut out = String::new();
        match panel {
            Panel::Empty => {}
            Panel::Quiz(quiz) => {
                let _ = writeln!(out, "{}", quiz.question);
                for option in &quiz.options {
                    let _ = writeln!(out, "{}. {}", option.id, option.text);
                }
            }
            Panel::Visual(visual) => match visual {
                ResolvedVisual::Nothing => {}
                ResolvedVisual::Waveform(view) => self.waveform(view, &mut out),
                ResolvedVisual::Cartesian(view) => self.cartesian(view, &mut out),
                ResolvedVisual::Algebra(view) => self.algebra(view, &mut out),
                ResolvedVisual::Sat(view) => self.sat(view, &mut out),
            },
        }
        out
    }
}
