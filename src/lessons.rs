//! Built-in lessons.
//!
//! - `systems` - solving a system of two linear equations, graphically then by substitution
//! - `sat-strategy` - the cover-up strategy for words-in-context questions
//! - `waveforms` - amplitude and frequency of a sound wave
//!
//! [`catalog`] bundles them in selection-screen order.

use std::time::Duration;

use crate::engine::LessonCatalog;
use crate::error::Result;
use crate::types::{
    AlgebraFrame, AlgebraState, AlgebraTerm, CartesianState, ChoicesState,
    HighlightPoint, InteractionChain, InteractionSpec, LessonDefinition, LessonStep,
    PickPointInteraction, PickTarget, Plot, QuizOption, QuizQuestion, SatChoice, SatLayout,
    SatState, SequenceFrame, SequenceState, TermAnimation, WaveformFlags, WaveformState,
    WordEmphasis,
};

/// Every built-in lesson.
pub fn catalog() -> Result<LessonCatalog> {
    LessonCatalog::new()
        .with(systems())?
        .with(sat_strategy())?
        .with(waveforms())
}

// =============================================================================
// Systems of equations
// =============================================================================

fn systems_plane() -> CartesianState {
    CartesianState::new(vec![
        Plot::new("#0ea5e9", |x| 2.0 * x + 1.0).labeled("y = 2x + 1", 2.0),
        Plot::new("#ef4444", |x| -x + 4.0).labeled("y = -x + 4", 4.5),
    ])
    .with_domain(-2.0, 6.0)
    .with_range(-2.0, 6.0)
}

fn colored_draggable(id: &str, value: &str, color: &str) -> AlgebraTerm {
    AlgebraTerm::Draggable {
        id: id.into(),
        value: value.into(),
        color: Some(color.into()),
    }
}

/// Substitution puzzle: drag one right-hand side onto the other's `y`, then
/// isolate x with three commands.
pub fn substitution_puzzle() -> AlgebraState {
    let chain = InteractionChain::new(
        InteractionSpec::drag_drop()
            .solved(vec![vec![
                AlgebraTerm::highlight("2x + 1", "#bae6fd"),
                AlgebraTerm::text(" = "),
                AlgebraTerm::highlight("-x + 4", "#fecaca"),
            ]])
            .success("Combined!"),
    )
    .then(
        InteractionSpec::command(
            "+x",
            "What should you do on each side of the equation to group the x terms?",
        )
        .titled("Solve for x")
        .solved(vec![vec![AlgebraTerm::text("3x + 1 = 4")]])
        .success("Added x to both sides!"),
    )
    .then(
        InteractionSpec::command("-1", "Now, how do we isolate 3x?")
            .titled("Solve for x")
            .solved(vec![vec![AlgebraTerm::text("3x = 3")]])
            .success("Subtracted 1 from both sides!"),
    )
    .then(
        InteractionSpec::command("/3", "Finally, how do we find x?")
            .titled("Solve for x")
            .solved(vec![vec![
                AlgebraTerm::highlight("x = 1", "#bbf7d0").animated(TermAnimation::Pulse),
            ]])
            .success("Solved for x!"),
    );

    AlgebraState::new(vec![
        vec![
            AlgebraTerm::drop_target("target-1", "y", &["expr-2"]),
            AlgebraTerm::text(" = "),
            colored_draggable("expr-1", "2x + 1", "#0ea5e9"),
        ],
        vec![
            AlgebraTerm::drop_target("target-2", "y", &["expr-1"]),
            AlgebraTerm::text(" = "),
            colored_draggable("expr-2", "-x + 4", "#ef4444"),
        ],
    ])
    .annotated("Drag one equation into the other!")
    .with_interaction(chain)
}

fn find_y() -> AlgebraState {
    AlgebraState::default().with_sequence(vec![
        AlgebraFrame {
            equations: vec![
                vec![AlgebraTerm::highlight("x = 1", "#bae6fd")],
                vec![
                    AlgebraTerm::text("y = 2"),
                    AlgebraTerm::highlight("x", "#bae6fd"),
                    AlgebraTerm::text(" + 1"),
                ],
            ],
            annotation: None,
            duration: Some(Duration::from_millis(2000)),
        },
        AlgebraFrame {
            equations: vec![
                vec![AlgebraTerm::text("x = 1")],
                vec![
                    AlgebraTerm::text("y = 2("),
                    AlgebraTerm::highlight("1", "#bae6fd").animated(TermAnimation::SlideInTop),
                    AlgebraTerm::text(") + 1"),
                ],
            ],
            annotation: Some("Plug x = 1 into the first equation".into()),
            duration: Some(Duration::from_millis(2000)),
        },
        AlgebraFrame {
            equations: vec![
                vec![AlgebraTerm::text("x = 1")],
                vec![AlgebraTerm::text("y = 2(1) + 1")],
                vec![AlgebraTerm::highlight("y = 3", "#bbf7d0").animated(TermAnimation::Pulse)],
            ],
            annotation: None,
            duration: None,
        },
    ])
}

pub fn systems() -> LessonDefinition {
    let quiz = QuizQuestion {
        question: "Your turn! Solve the system: y = x + 5 and y = 3x - 1".into(),
        options: vec![
            QuizOption::new(0, "(3, 8)", true).explained("Correct! x=3, y=8 works for both."),
            QuizOption::new(1, "(1, 6)", false)
                .explained("Checks out for the first equation, but not the second."),
            QuizOption::new(2, "(2, 7)", false).explained("Close, but not quite."),
            QuizOption::new(3, "(0, 5)", false)
                .explained("That's just the y-intercept of the first line."),
        ],
    };

    let mut intro = systems_plane();
    intro.intro_animation = true;

    let mut pick = systems_plane()
        .with_hover_coordinates()
        .with_interaction(PickPointInteraction::new(
            PickTarget {
                x: 1.0,
                y: 3.0,
                tolerance: Some(0.6),
            },
            "Nice!",
        ));
    pick.intro_animation = true;

    let mut answer_plane = systems_plane().with_highlight(HighlightPoint {
        color: Some("#10b981".into()),
        pulse: true,
        ..HighlightPoint::new(1.0, 3.0).labeled("(1, 3)")
    });
    answer_plane.intro_animation = true;

    let final_answer = SequenceState::new(vec![
        SequenceFrame::millis(
            3000,
            AlgebraState::new(vec![
                vec![AlgebraTerm::text("x = 1, y = 3")],
                vec![AlgebraTerm::highlight("(1, 3)", "#bbf7d0").animated(TermAnimation::FlyIn)],
            ]),
        ),
        SequenceFrame::millis(0, answer_plane),
    ]);

    LessonDefinition::new(
        "systems",
        "Solving Systems of Linear Equations",
        "Find where two lines meet, visually and algebraically.",
        quiz,
    )
    .with_step(LessonStep::new(
        "intro",
        "Find out what happens when two lines meet.",
        intro,
    ))
    .with_step(LessonStep::new(
        "step1",
        "Solving a system of equations means finding the single point where two lines meet. \
         Click on the point where the lines cross.",
        pick,
    ))
    .with_step(LessonStep::new(
        "step2",
        "Both equations equal y, so set them equal to each other and solve for x.",
        substitution_puzzle(),
    ))
    .with_step(LessonStep::new(
        "step3",
        "Plug x = 1 into y = 2x + 1 to find y.",
        find_y(),
    ))
    .with_step(LessonStep::new(
        "step4",
        "x = 1 and y = 3: the same point you clicked on the graph.",
        final_answer,
    ))
}

// =============================================================================
// Words in context
// =============================================================================

const FORM_TEXT: &str =
    "The students hoped to form a new robotics club.\nAs used in the sentence, form most nearly means...";
const OBSERVE_TEXT: &str = "The scientist was able to observe the reaction through the microscope.\n\n\
     As used in the sentence, observe most nearly means...";

fn form_choices() -> Vec<SatChoice> {
    vec![
        SatChoice::new("a", "shape", false),
        SatChoice::new("b", "type", false),
        SatChoice::new("c", "develop", true),
        SatChoice::new("d", "etiquette", false),
    ]
}

fn highlighted(word: &str) -> WordEmphasis {
    WordEmphasis::Highlighted {
        word: word.into(),
        first_only: true,
    }
}

fn input(placeholder: &str, instruction: Option<&str>, as_static: bool) -> WordEmphasis {
    WordEmphasis::Input {
        placeholder: placeholder.into(),
        instruction: instruction.map(Into::into),
        as_static,
    }
}

pub fn sat_strategy() -> LessonDefinition {
    let quiz = QuizQuestion {
        question: "What is the most important first step for 'Words in Context' questions?".into(),
        options: vec![
            QuizOption::new(0, "Read all the answer choices immediately.", false)
                .explained("This is a trap! You might get biased by the common definitions."),
            QuizOption::new(1, "Predict your own word for the blank.", true).explained(
                "Yes! This helps you avoid traps and find the best fit for the specific context.",
            ),
            QuizOption::new(2, "Choose the most sophisticated-sounding word.", false).explained(
                "SAT doesn't just test big words; it tests precise meaning in context.",
            ),
        ],
    };

    let intro = SatState::new(
        "The nature of the debate.",
        WordEmphasis::Cycling {
            target: "nature".into(),
            words: ["character", "quality", "essence", "core", "spirit", "substance", "gist", "nature"]
                .into_iter()
                .map(String::from)
                .collect(),
        },
    );

    let trap = SatState {
        warning_choice: Some("a".into()),
        ..SatState::new(FORM_TEXT, highlighted("form")).with_choices(form_choices(), ChoicesState::Revealed)
    };

    let cover_up = SequenceState::new(vec![
        SequenceFrame::millis(
            1500,
            SatState::new(FORM_TEXT, highlighted("form")).with_choices(form_choices(), ChoicesState::Revealed),
        ),
        SequenceFrame::millis(
            1500,
            SatState {
                fade_second_line: true,
                ..SatState::new(FORM_TEXT, WordEmphasis::Flashing("form".into()))
                    .with_choices(form_choices(), ChoicesState::FadingOut)
            },
        ),
        SequenceFrame::millis(
            0,
            SatState {
                fade_second_line: true,
                ..SatState::new(FORM_TEXT, input("form", Some("Type your own word here"), false))
            },
        ),
    ]);

    let match_prediction = SatState {
        layout: SatLayout::Stacked,
        ..SatState::new(FORM_TEXT, input("form", None, true)).with_choices(
            vec![
                SatChoice::new("a", "shape", false)
                    .with_feedback("Common definition, but doesn't fit context."),
                SatChoice::new("b", "type", false),
                SatChoice::new("c", "develop", true).with_feedback("YES! Matches prediction."),
                SatChoice::new("d", "etiquette", false),
            ],
            ChoicesState::Revealed,
        )
    };

    let stacked = |emphasis| SatState {
        layout: SatLayout::Stacked,
        ..SatState::new(OBSERVE_TEXT, emphasis)
    };
    let your_turn = SequenceState::new(vec![
        SequenceFrame::millis(1500, stacked(highlighted("observe"))),
        SequenceFrame::millis(2000, stacked(WordEmphasis::Flashing("observe".into()))),
        SequenceFrame::millis(
            0,
            SatState {
                reveal_choices_on_input: true,
                ..stacked(input("observe", None, false)).with_choices(
                    vec![
                        SatChoice::new("a", "follow", false),
                        SatChoice::new("b", "watch", true).with_feedback("YES! Perfect match."),
                        SatChoice::new("c", "comment", false),
                        SatChoice::new("d", "obey", false),
                    ],
                    ChoicesState::Initial,
                )
            },
        ),
    ]);

    LessonDefinition::new(
        "sat-strategy",
        "SAT Strategy: Words in Context",
        "Master the \"Words in Context\" questions with a step-by-step guide.",
        quiz,
    )
    .with_step(LessonStep::new(
        "intro",
        "A step-by-step guide to \"Words in Context\" questions.",
        intro,
    ))
    .with_step(LessonStep::new(
        "sat-trap",
        "One answer choice is usually the word's most common definition. It is almost always wrong.",
        trap,
    ))
    .with_step(LessonStep::new(
        "cover-up-strategy",
        "Cover up the word and predict your own before looking at the choices.",
        cover_up,
    ))
    .with_step(LessonStep::new(
        "match-prediction",
        "Find the choice that best matches your prediction.",
        match_prediction,
    ))
    .with_step(LessonStep::new(
        "your-turn",
        "Cover up the word, predict, then find the match.",
        your_turn,
    ))
}

// =============================================================================
// Waveforms
// =============================================================================

pub fn waveforms() -> LessonDefinition {
    let quiz = QuizQuestion {
        question: "If a sound is louder, how does its waveform change?".into(),
        options: vec![
            QuizOption::new(0, "Frequency increases", false).explained("Frequency controls pitch."),
            QuizOption::new(1, "Amplitude increases", true)
                .explained("Amplitude is perceived as loudness."),
            QuizOption::new(2, "Wavelength gets longer", false)
                .explained("Related to pitch, not loudness."),
        ],
    };

    let wave = |flags| WaveformState::new(0.5, 1.0).with_flags(flags);

    LessonDefinition::new("waveforms", "Waveforms", "Learn the basics of sound physics.", quiz)
        .with_step(LessonStep::new(
            "intro",
            "An interactive guide to the shapes of sound.",
            wave(WaveformFlags::PLAYING),
        ))
        .with_step(LessonStep::new(
            "basics",
            "The horizontal axis is time. The vertical axis is displacement.",
            wave(WaveformFlags::SHOW_TIME_AXIS),
        ))
        .with_step(LessonStep::new(
            "amplitude",
            "Amplitude is loudness.",
            wave(WaveformFlags::SHOW_TIME_AXIS | WaveformFlags::SHOW_DISPLACEMENT_AXIS),
        ))
        .with_step(LessonStep::new(
            "frequency",
            "Frequency is pitch.",
            wave(WaveformFlags::PLAYING | WaveformFlags::SHOW_TIME_AXIS),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validate_lesson;

    #[test]
    fn test_builtin_lessons_valid() {
        for lesson in [systems(), sat_strategy(), waveforms()] {
            assert_eq!(validate_lesson(&lesson), Ok(()), "lesson {}", lesson.id);
        }
    }

    #[test]
    fn test_catalog_order() {
        let catalog = catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["systems", "sat-strategy", "waveforms"]);
    }

    #[test]
    fn test_substitution_chain_length() {
        let puzzle = substitution_puzzle();
        assert_eq!(puzzle.interaction.as_ref().map(|c| c.len()), Some(4));
    }
}
