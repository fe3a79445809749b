use std::time::Duration;

use super::*;
use crate::foundation::core::{Color, Rect, Speed};
use crate::render::recording::{DrawCall, RecordingSink};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

fn with_speed(v: f64) -> ActorState {
    ActorState {
        speed: Speed::new(v),
        ..ActorState::default()
    }
}

/// An engine that has already consumed its baseline frame.
fn primed(config: EngineConfig) -> (Engine, RecordingSink, RecordingSink) {
    let mut engine = Engine::new(config);
    let mut canvas = RecordingSink::new();
    let mut overlay = RecordingSink::new();
    engine.advance(Duration::ZERO, &mut canvas, &mut overlay);
    (engine, canvas, overlay)
}

#[test]
fn first_advance_only_primes() {
    let mut engine = Engine::new(EngineConfig::default());
    let (id, queue) = engine.register(ActorState::default());
    queue.push(Command::MoveTo(Point::new(10.0, 0.0)));

    let mut canvas = RecordingSink::new();
    let mut overlay = RecordingSink::new();
    engine.advance(Duration::from_secs(10), &mut canvas, &mut overlay);

    assert!(canvas.calls().is_empty());
    assert!(overlay.calls().is_empty());
    assert_eq!(engine.pending(id), Some(1));
    assert_eq!(engine.rendered(id).unwrap().position, Point::ORIGIN);
}

#[test]
fn finite_speed_move_splits_across_frames() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(100.0));
    queue.push(Command::MoveTo(Point::new(50.0, 0.0)));

    engine.advance(ms(200), &mut canvas, &mut overlay);
    assert!(close(engine.rendered(id).unwrap().position, Point::new(20.0, 0.0)));
    assert_eq!(engine.pending(id), Some(1));

    engine.advance(ms(300), &mut canvas, &mut overlay);
    assert_eq!(engine.rendered(id).unwrap().position, Point::new(50.0, 0.0));
    assert_eq!(engine.pending(id), Some(0));

    let segs = canvas.segments();
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].0, Point::ORIGIN);
    assert!(close(segs[0].1, Point::new(20.0, 0.0)));
    assert!(close(segs[1].0, Point::new(20.0, 0.0)));
    assert_eq!(segs[1].1, Point::new(50.0, 0.0));
}

#[test]
fn leftover_time_carries_into_next_command() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(100.0));
    queue.push(Command::MoveTo(Point::new(10.0, 0.0)));
    queue.push(Command::MoveTo(Point::new(10.0, 30.0)));

    // 0.1s finishes the first leg, the remaining 0.1s covers 10 of the second.
    engine.advance(ms(200), &mut canvas, &mut overlay);
    assert!(close(engine.rendered(id).unwrap().position, Point::new(10.0, 10.0)));
    assert_eq!(engine.pending(id), Some(1));
}

#[test]
fn instant_speed_completes_everything_in_one_frame() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(0.0));
    queue.push(Command::MoveTo(Point::new(1000.0, 0.0)));
    queue.push(Command::RotateTo(720.0));
    queue.push(Command::MoveTo(Point::new(1000.0, -1000.0)));

    engine.advance(ms(1), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert_eq!(state.position, Point::new(1000.0, -1000.0));
    assert_eq!(state.heading, 0.0);
    assert!(engine.is_idle());
    assert_eq!(canvas.segments().len(), 2);
}

#[test]
fn zero_elapsed_processes_nothing_but_redraws_glyphs() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(ActorState::default());
    queue.push(Command::SetPenColor(Color::WHITE));

    engine.advance(Duration::ZERO, &mut canvas, &mut overlay);
    assert_eq!(engine.pending(id), Some(1));
    assert!(canvas.calls().is_empty());
    assert_eq!(overlay.polygons().len(), 1);
}

#[test]
fn instruction_limit_defers_the_rest() {
    let config = EngineConfig::default();
    let limit = config.instruction_limit as usize;
    let (mut engine, mut canvas, mut overlay) = primed(config);
    let (id, queue) = engine.register(ActorState::default());
    for _ in 0..limit + 7 {
        queue.push(Command::SetPenDown(true));
    }

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert_eq!(engine.pending(id), Some(7));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert_eq!(engine.pending(id), Some(0));
}

#[test]
fn budgets_are_per_actor() {
    let config = EngineConfig {
        instruction_limit: 2,
        ..EngineConfig::default()
    };
    let (mut engine, mut canvas, mut overlay) = primed(config);
    let (a, qa) = engine.register(ActorState::default());
    let (b, qb) = engine.register(ActorState::default());
    for _ in 0..3 {
        qa.push(Command::SetVisible(true));
        qb.push(Command::SetVisible(true));
    }

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert_eq!(engine.pending(a), Some(1));
    assert_eq!(engine.pending(b), Some(1));
}

#[test]
fn commands_apply_in_submission_order() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(0.0));
    let red = Color::from_rgba8(255, 0, 0, 255);
    queue.push(Command::SetPenColor(red));
    queue.push(Command::MoveTo(Point::new(5.0, 0.0)));
    queue.push(Command::SetPenDown(false));
    queue.push(Command::MoveTo(Point::new(5.0, 5.0)));
    queue.push(Command::SetPenDown(true));
    queue.push(Command::SetPenColor(Color::WHITE));
    queue.push(Command::MoveTo(Point::new(0.0, 5.0)));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert_eq!(
        canvas.calls(),
        &[
            DrawCall::Segment {
                p0: Point::ORIGIN,
                p1: Point::new(5.0, 0.0),
                width: 1.0,
                color: red,
            },
            DrawCall::Segment {
                p0: Point::new(5.0, 5.0),
                p1: Point::new(0.0, 5.0),
                width: 1.0,
                color: Color::WHITE,
            },
        ]
    );
    assert_eq!(engine.rendered(id).unwrap().pen_color, Color::WHITE);
}

#[test]
fn zero_pen_size_draws_no_segments() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (_, queue) = engine.register(with_speed(0.0));
    queue.push(Command::SetSize(0.0));
    queue.push(Command::MoveTo(Point::new(5.0, 0.0)));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert!(canvas.segments().is_empty());
    // Zero pen size also collapses the glyph.
    assert!(overlay.polygons().is_empty());
}

#[test]
fn fill_collects_vertices_and_emits_polygon() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let fill = Color::from_rgba8(0, 128, 0, 255);
    let (id, queue) = engine.register(with_speed(0.0));
    queue.push(Command::SetFillColor(fill));
    queue.push(Command::BeginFill);
    queue.push(Command::MoveTo(Point::new(10.0, 0.0)));
    queue.push(Command::MoveTo(Point::new(10.0, 10.0)));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert!(state.filling);
    assert_eq!(
        state.fill_vertices,
        vec![Point::ORIGIN, Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
    );

    queue.push(Command::EndFill);
    engine.advance(ms(16), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert!(!state.filling);
    assert!(state.fill_vertices.is_empty());
    assert_eq!(
        canvas.calls().last(),
        Some(&DrawCall::Polygon {
            vertices: vec![Point::ORIGIN, Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            color: fill,
        })
    );
}

#[test]
fn partial_moves_while_filling_add_intermediate_vertices() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(100.0));
    queue.push(Command::BeginFill);
    queue.push(Command::MoveTo(Point::new(20.0, 0.0)));

    engine.advance(ms(100), &mut canvas, &mut overlay);
    engine.advance(ms(100), &mut canvas, &mut overlay);
    let vertices = &engine.rendered(id).unwrap().fill_vertices;
    assert_eq!(vertices.len(), 3);
    assert!(close(vertices[1], Point::new(10.0, 0.0)));
    assert_eq!(vertices[2], Point::new(20.0, 0.0));
}

#[test]
fn rotation_uses_raw_difference_and_normalizes_on_completion() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(90.0));
    queue.push(Command::RotateTo(-90.0));

    engine.advance(ms(500), &mut canvas, &mut overlay);
    let mid = engine.rendered(id).unwrap().heading;
    assert!((mid - -45.0).abs() < 1e-9, "{mid}");

    engine.advance(ms(500), &mut canvas, &mut overlay);
    assert_eq!(engine.rendered(id).unwrap().heading, 270.0);
    assert!(engine.is_idle());
}

#[test]
fn rotation_speed_scale_applies_to_turns_only() {
    let config = EngineConfig {
        rotation_speed_scale: 2.0,
        ..EngineConfig::default()
    };
    let (mut engine, mut canvas, mut overlay) = primed(config);
    let (id, queue) = engine.register(with_speed(10.0));
    queue.push(Command::RotateTo(10.0));
    queue.push(Command::MoveTo(Point::new(5.0, 0.0)));

    // The turn takes 0.5s at 20 deg/s, leaving 0.5s for 5 units at 10 units/s.
    engine.advance(ms(1000), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert_eq!(state.heading, 10.0);
    assert_eq!(state.position, Point::new(5.0, 0.0));
}

#[test]
fn glyph_is_redrawn_on_cleared_overlay() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, _) = engine.register(ActorState::default());

    engine.advance(ms(16), &mut canvas, &mut overlay);
    engine.advance(ms(16), &mut canvas, &mut overlay);

    let rect = engine.config().surface_rect();
    let clears: Vec<usize> = overlay
        .calls()
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, DrawCall::Clear(r) if *r == rect))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clears.len(), 2);
    assert_eq!(clears[0], 0);
    assert_eq!(overlay.polygons().len(), 2);
    assert!(canvas.calls().is_empty());

    let state = engine.rendered(id).unwrap().clone();
    let scale = glyph_scale(engine.config().glyph_scale, state.pen_size);
    let expected = arrow_outline(state.position, state.heading, scale);
    assert_eq!(overlay.polygons()[1], &expected[..]);
}

#[test]
fn hidden_actors_have_no_glyph() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (_, queue) = engine.register(ActorState::default());
    queue.push(Command::SetVisible(false));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert!(overlay.polygons().is_empty());
}

#[test]
fn deregister_is_idempotent() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (a, _) = engine.register(ActorState::default());
    let (b, qb) = engine.register(ActorState::default());
    qb.push(Command::SetVisible(false));

    engine.deregister(b);
    engine.deregister(b);
    engine.deregister(ActorId(99));

    assert_eq!(engine.actor_ids(), vec![a]);
    assert!(engine.rendered(b).is_none());
    assert!(!engine.enqueue(b, Command::BeginFill));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    assert_eq!(overlay.polygons().len(), 1);
}

#[test]
fn advance_to_uses_timestamp_deltas() {
    let mut engine = Engine::new(EngineConfig::default());
    let mut canvas = RecordingSink::new();
    let mut overlay = RecordingSink::new();
    let (id, queue) = engine.register(with_speed(100.0));
    queue.push(Command::MoveTo(Point::new(100.0, 0.0)));

    // Baseline, then +0.25s, then a timestamp going backwards, then +0.25s.
    engine.advance_to(Duration::from_secs(5), &mut canvas, &mut overlay);
    engine.advance_to(ms(5250), &mut canvas, &mut overlay);
    assert!(close(engine.rendered(id).unwrap().position, Point::new(25.0, 0.0)));

    engine.advance_to(ms(4000), &mut canvas, &mut overlay);
    assert!(close(engine.rendered(id).unwrap().position, Point::new(25.0, 0.0)));

    engine.advance_to(ms(4250), &mut canvas, &mut overlay);
    assert!(close(engine.rendered(id).unwrap().position, Point::new(50.0, 0.0)));
}

#[test]
fn spawned_handle_feeds_engine() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let mut t = engine.spawn();
    t.set_speed(0.0);
    t.forward(30.0);
    t.left(90.0);
    t.forward(30.0);
    assert_eq!(engine.pending(t.id()), Some(4));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    let rendered = engine.rendered(t.id()).unwrap();
    assert!(close(rendered.position, t.pos()));
    assert_eq!(rendered.heading, t.heading());
    assert!(engine.is_idle());
}

#[test]
fn raw_non_positive_speeds_are_treated_as_instant() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(ActorState::default());
    queue.push(Command::SetSpeed(Speed::Finite(0.0)));
    queue.push(Command::MoveTo(Point::new(10.0, 0.0)));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert_eq!(state.speed, Speed::Instant);
    assert_eq!(state.position, Point::new(10.0, 0.0));
    assert!(engine.is_idle());
}

#[test]
fn registration_sanitizes_initial_state() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(ActorState {
        speed: Speed::Finite(-100.0),
        pen_size: -2.0,
        heading: -90.0,
        ..ActorState::default()
    });
    let state = engine.rendered(id).unwrap();
    assert_eq!(state.speed, Speed::Instant);
    assert_eq!(state.pen_size, 0.0);
    assert_eq!(state.heading, 270.0);

    queue.push(Command::MoveTo(Point::new(50.0, 0.0)));
    engine.advance(ms(200), &mut canvas, &mut overlay);
    assert_eq!(engine.rendered(id).unwrap().position, Point::new(50.0, 0.0));

    let t = engine.spawn_with(ActorState {
        speed: Speed::Finite(f64::NAN),
        ..ActorState::default()
    });
    assert_eq!(t.speed(), Speed::Instant);
    assert_eq!(engine.rendered(t.id()).unwrap().speed, Speed::Instant);
}

#[test]
fn non_finite_targets_are_dropped() {
    let (mut engine, mut canvas, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(0.0));
    queue.push(Command::MoveTo(Point::new(f64::NAN, 0.0)));
    queue.push(Command::RotateTo(f64::INFINITY));
    queue.push(Command::MoveTo(Point::new(1.0, 0.0)));

    engine.advance(ms(16), &mut canvas, &mut overlay);
    let state = engine.rendered(id).unwrap();
    assert_eq!(state.position, Point::new(1.0, 0.0));
    assert_eq!(state.heading, 0.0);
    assert!(engine.is_idle());
    assert_eq!(canvas.segments(), vec![(Point::ORIGIN, Point::new(1.0, 0.0))]);
}

/// Sink that appends one command to an actor's queue from inside `draw_segment`.
struct PushOnDraw {
    queue: CommandQueue,
    next: Option<Command>,
    segments: usize,
}

impl RasterSink for PushOnDraw {
    fn draw_segment(&mut self, _p0: Point, _p1: Point, _width: f64, _color: Color) {
        self.segments += 1;
        if let Some(cmd) = self.next.take() {
            self.queue.push(cmd);
        }
    }

    fn fill_polygon(&mut self, _vertices: &[Point], _color: Color) {}

    fn clear_region(&mut self, _rect: Rect) {}
}

#[test]
fn queue_is_not_locked_while_drawing() {
    let (mut engine, _, mut overlay) = primed(EngineConfig::default());
    let (id, queue) = engine.register(with_speed(0.0));
    queue.push(Command::MoveTo(Point::new(5.0, 0.0)));

    let mut canvas = PushOnDraw {
        queue: queue.clone(),
        next: Some(Command::SetVisible(false)),
        segments: 0,
    };
    engine.advance(ms(16), &mut canvas, &mut overlay);

    assert_eq!(canvas.segments, 1);
    assert!(!engine.rendered(id).unwrap().visible);
    assert!(engine.is_idle());
}
