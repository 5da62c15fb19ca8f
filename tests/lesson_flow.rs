//! End-to-end lesson flows through the public engine API.
//!
//! Drives the built-in lessons the way a host would: enter or scroll to a
//! step, feed learner events, advance virtual time, read the panel.
//!
//! Run with: cargo test --test lesson_flow

use std::time::Duration;

use scrolly_engine::{
    lessons, AlgebraPhase, EngineConfig, LessonEngine, Panel, Point, Renderer, ResolvedVisual,
    StepRegion, TextRenderer, VisualEvent, VisualKind,
};

// =============================================================================
// HELPERS
// =============================================================================

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn open(lesson: &str) -> LessonEngine {
    lessons::catalog()
        .unwrap()
        .open(lesson, EngineConfig::default())
        .unwrap()
}

fn render(engine: &LessonEngine) -> String {
    engine.render(&TextRenderer::new())
}

fn algebra_phase(engine: &LessonEngine) -> Option<AlgebraPhase> {
    engine.with_panel(|panel| match panel {
        Panel::Visual(ResolvedVisual::Algebra(view)) => Some(view.phase()),
        _ => None,
    })
}

fn algebra_cursor(engine: &LessonEngine) -> Option<(usize, bool)> {
    engine.with_panel(|panel| match panel {
        Panel::Visual(ResolvedVisual::Algebra(view)) => {
            Some((view.machine.cursor(), view.machine.command_error()))
        }
        _ => None,
    })
}

fn command(engine: &mut LessonEngine, text: &str) {
    assert!(engine.handle(VisualEvent::CommandChanged(text.into())));
    assert!(engine.handle(VisualEvent::SubmitCommand));
}

// =============================================================================
// SYSTEMS
// =============================================================================

#[test]
fn test_substitution_chain_to_terminal() {
    let mut engine = open("systems");
    engine.enter_step("step2");
    assert_eq!(engine.visual_kind(), Some(VisualKind::Algebra));

    // Wrong pairing is rejected
    assert!(!engine.handle(VisualEvent::Drop {
        target: "target-1".into(),
        item: "expr-1".into(),
    }));

    assert!(engine.handle(VisualEvent::DragStart("expr-2".into())));
    assert!(engine.handle(VisualEvent::Drop {
        target: "target-1".into(),
        item: "expr-2".into(),
    }));
    assert!(matches!(algebra_phase(&engine), Some(AlgebraPhase::Solved { .. })));

    engine.advance(ms(800));
    assert_eq!(algebra_cursor(&engine), Some((1, false)));
    assert!(render(&engine).contains("Combined!"));

    command(&mut engine, "+x");
    engine.advance(ms(800));
    command(&mut engine, " -1 ");
    engine.advance(ms(800));
    command(&mut engine, "/3");
    engine.advance(ms(800));

    assert_eq!(algebra_phase(&engine), Some(AlgebraPhase::Terminal));
    let text = render(&engine);
    assert!(text.contains("*x = 1*"));
    assert!(text.contains("Solved for x!"));
    assert!(!engine.has_pending_timers());
}

#[test]
fn test_out_of_order_command_flags_error() {
    let mut engine = open("systems");
    engine.enter_step("step2");

    // Command node is not live before the drop
    assert!(!engine.handle(VisualEvent::CommandChanged("/3".into())));

    engine.handle(VisualEvent::Drop {
        target: "target-2".into(),
        item: "expr-1".into(),
    });
    engine.advance(ms(800));

    command(&mut engine, "/3");
    assert_eq!(algebra_cursor(&engine), Some((1, true)));
    assert!(render(&engine).contains("> /3 !"));

    // Editing clears the flag
    engine.handle(VisualEvent::CommandChanged("+".into()));
    assert_eq!(algebra_cursor(&engine), Some((1, false)));
}

#[test]
fn test_pick_point_hit_and_miss() {
    let mut engine = open("systems");
    engine.enter_step("step1");
    assert_eq!(engine.visual_kind(), Some(VisualKind::Cartesian));

    assert!(engine.handle(VisualEvent::PickAt(Point::new(2.0, 3.0))));
    assert!(render(&engine).contains("Not quite! Try again."));
    assert_eq!(engine.next_deadline(), Some(ms(2000)));

    engine.advance(ms(2000));
    assert!(!render(&engine).contains("Not quite!"));

    assert!(engine.handle(VisualEvent::PickAt(Point::new(1.3, 3.2))));
    let text = render(&engine);
    assert!(text.contains("Nice!"));
    assert!(text.contains("solved (1.00, 3.00)"));

    // Solved planes ignore further picks
    assert!(!engine.handle(VisualEvent::PickAt(Point::new(2.0, 3.0))));
}

#[test]
fn test_hover_snaps_to_integer_points() {
    let mut engine = open("systems");
    engine.enter_step("step1");

    engine.handle(VisualEvent::HoverAt(Point::new(2.1, 5.0)));
    assert!(render(&engine).contains("hover (2.00, 5.00)"));

    engine.handle(VisualEvent::PointerLeave);
    assert!(!render(&engine).contains("hover"));
}

#[test]
fn test_final_answer_sequence() {
    let mut engine = open("systems");
    engine.enter_step("step4");
    assert_eq!(engine.frame_index(), Some(0));
    assert_eq!(engine.visual_kind(), Some(VisualKind::Algebra));

    engine.advance(ms(2999));
    assert_eq!(engine.frame_index(), Some(0));
    engine.advance(ms(1));
    assert_eq!(engine.frame_index(), Some(1));
    assert_eq!(engine.visual_kind(), Some(VisualKind::Cartesian));
    assert!(!engine.has_pending_timers());
}

// =============================================================================
// WORDS IN CONTEXT
// =============================================================================

#[test]
fn test_cover_up_reaches_input_frame() {
    let mut engine = open("sat-strategy");
    engine.enter_step("cover-up-strategy");
    assert_eq!(engine.frame_index(), Some(0));

    engine.advance(ms(1500));
    assert_eq!(engine.frame_index(), Some(1));

    engine.advance(ms(1500));
    assert_eq!(engine.frame_index(), Some(2));
    assert!(render(&engine).contains("Type your own word here"));
}

#[test]
fn test_prediction_persists_into_static_input() {
    let mut engine = open("sat-strategy");
    engine.enter_step("cover-up-strategy");
    engine.advance(ms(3000));

    assert!(engine.handle(VisualEvent::WordInput("create".into())));

    engine.enter_step("match-prediction");
    assert!(render(&engine).contains("_create_"));

    // Static input does not take edits
    assert!(!engine.handle(VisualEvent::WordInput("other".into())));

    assert!(engine.handle(VisualEvent::SelectChoice("c".into())));
    assert!(render(&engine).contains("YES! Matches prediction."));
    assert!(engine.take_celebrate());
    assert!(!engine.take_celebrate());
}

#[test]
fn test_your_turn_reveals_choices_on_input() {
    let mut engine = open("sat-strategy");
    engine.enter_step("your-turn");
    engine.advance(ms(3500));
    assert_eq!(engine.frame_index(), Some(2));

    assert!(!render(&engine).contains("watch"));
    assert!(!engine.handle(VisualEvent::SelectChoice("b".into())));

    engine.handle(VisualEvent::WordInput("see".into()));
    assert!(render(&engine).contains("B) watch"));

    engine.handle(VisualEvent::SelectChoice("b".into()));
    assert!(render(&engine).contains("YES! Perfect match."));
}

#[test]
fn test_cycling_word() {
    let mut engine = open("sat-strategy");
    assert!(render(&engine).contains("[character]"));
    engine.advance(ms(1500));
    assert!(render(&engine).contains("[quality]"));
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_quiz_step() {
    let mut engine = open("waveforms");
    engine.enter_step("quiz");

    assert!(engine.is_quiz());
    assert!(engine.current_step().is_none());
    assert!(!engine.has_pending_timers());
    assert_eq!(
        render(&engine),
        "If a sound is louder, how does its waveform change?\n\
         0. Frequency increases\n\
         1. Amplitude increases\n\
         2. Wavelength gets longer\n"
    );
    assert!(!engine.handle(VisualEvent::PointerLeave));

    engine.enter_step("amplitude");
    assert!(!engine.is_quiz());
    assert_eq!(engine.visual_kind(), Some(VisualKind::Waveform));
}

#[test]
fn test_switching_steps_drops_timers() {
    let mut engine = open("systems");
    engine.enter_step("step1");
    engine.handle(VisualEvent::PickAt(Point::new(-1.0, -1.0)));
    assert!(engine.has_pending_timers());

    engine.enter_step("intro");
    assert!(!engine.has_pending_timers());

    // Coming back starts fresh
    engine.enter_step("step1");
    assert!(!render(&engine).contains("Not quite!"));
}

#[test]
fn test_scroll_drives_activation() {
    let mut engine = open("waveforms");
    for (i, id) in ["intro", "basics", "amplitude", "frequency", "quiz"].iter().enumerate() {
        engine.register_step(StepRegion::new(*id, i as f64 * 600.0, 600.0));
    }

    engine.scroll_to(0.0, 1000.0);
    assert_eq!(engine.active_step_id().as_deref(), Some("intro"));

    engine.scroll_to(1250.0, 1000.0);
    assert_eq!(engine.active_step_id().as_deref(), Some("amplitude"));
    assert_eq!(engine.visual_kind(), Some(VisualKind::Waveform));

    engine.scroll_to(2350.0, 1000.0);
    assert!(engine.is_quiz());

    engine.scroll_to(650.0, 1000.0);
    assert_eq!(engine.active_step_id().as_deref(), Some("basics"));
}

#[test]
fn test_exit_clears_everything() {
    let mut engine = open("sat-strategy");
    engine.enter_step("intro");
    assert!(engine.has_pending_timers());
    engine.exit();

    // A fresh mount starts over with no memory of typed input
    let mut engine = open("sat-strategy");
    engine.enter_step("match-prediction");
    assert!(render(&engine).contains("__"));
}
