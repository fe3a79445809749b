use std::time::Duration;

use crate::{
    actor::{command::Command, handle::Turtle, state::ActorState},
    engine::{
        config::EngineConfig,
        glyph::{arrow_outline, glyph_scale},
        queue::CommandQueue,
    },
    foundation::core::{ActorId, Point, Speed},
    foundation::math::normalize_degrees,
    render::sink::RasterSink,
};

// Absorbs float drift so that cumulative elapsed time >= distance / rate always lands exactly
// on the target.
const COMPLETION_EPSILON: f64 = 1e-9;

struct ActorSlot {
    id: ActorId,
    state: ActorState,
    queue: CommandQueue,
}

/// Frame-driven consumer of actor command queues.
///
/// The engine owns one rendered [`ActorState`] and one [`CommandQueue`] per registered actor.
/// Each [`Engine::advance`] call replays queued commands under two per-actor budgets: the
/// frame's elapsed time (shared by consecutive motions) and
/// [`EngineConfig::instruction_limit`] (bounding work from long runs of zero-time commands).
///
/// `advance` must run on a single thread; handles feeding the queues may live elsewhere.
pub struct Engine {
    config: EngineConfig,
    actors: Vec<ActorSlot>,
    next_id: u64,
    primed: bool,
    last_timestamp: Option<Duration>,
}

impl Engine {
    /// Create an engine with no actors.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            actors: Vec::new(),
            next_id: 0,
            primed: false,
            last_timestamp: None,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register an actor whose rendered state starts as a copy of `initial`.
    ///
    /// Returns the actor's id and the producer side of its fresh, empty queue. Actors are
    /// drawn in registration order.
    pub fn register(&mut self, initial: ActorState) -> (ActorId, CommandQueue) {
        let initial = sanitize(initial);
        let id = ActorId(self.next_id);
        self.next_id += 1;
        let queue = CommandQueue::new();
        self.actors.push(ActorSlot {
            id,
            state: initial,
            queue: queue.clone(),
        });
        tracing::debug!(actor = id.0, "registered actor");
        (id, queue)
    }

    /// Remove an actor with its rendered state and pending commands. Unknown ids are ignored.
    pub fn deregister(&mut self, id: ActorId) {
        let before = self.actors.len();
        self.actors.retain(|slot| slot.id != id);
        if self.actors.len() != before {
            tracing::debug!(actor = id.0, "deregistered actor");
        }
    }

    /// Register an actor with default attributes and return its handle.
    pub fn spawn(&mut self) -> Turtle {
        self.spawn_with(ActorState::default())
    }

    /// Register an actor starting from `initial` and return its handle.
    pub fn spawn_with(&mut self, initial: ActorState) -> Turtle {
        let initial = sanitize(initial);
        let (id, queue) = self.register(initial.clone());
        Turtle::attach(id, initial, queue)
    }

    /// Queue a command for `id` directly, bypassing a handle. Returns `false` for unknown ids.
    pub fn enqueue(&self, id: ActorId, cmd: Command) -> bool {
        match self.slot(id) {
            Some(slot) => {
                slot.queue.push(cmd);
                true
            }
            None => false,
        }
    }

    /// Rendered (lagging) state of an actor.
    pub fn rendered(&self, id: ActorId) -> Option<&ActorState> {
        self.slot(id).map(|slot| &slot.state)
    }

    /// Number of commands still queued for an actor.
    pub fn pending(&self, id: ActorId) -> Option<usize> {
        self.slot(id).map(|slot| slot.queue.len())
    }

    /// Registered actors in draw order.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|slot| slot.id).collect()
    }

    /// Return `true` when every queue is empty.
    pub fn is_idle(&self) -> bool {
        self.actors.iter().all(|slot| slot.queue.is_empty())
    }

    /// Advance using an absolute, monotonically increasing host timestamp.
    ///
    /// The elapsed time is the difference from the previous timestamp. The first timestamp
    /// only sets the baseline, and a timestamp that goes backwards counts as zero elapsed.
    pub fn advance_to(
        &mut self,
        timestamp: Duration,
        canvas: &mut dyn RasterSink,
        overlay: &mut dyn RasterSink,
    ) {
        let elapsed = match self.last_timestamp.replace(timestamp) {
            Some(prev) => timestamp.saturating_sub(prev),
            None => Duration::ZERO,
        };
        self.advance(elapsed, canvas, overlay);
    }

    /// Play back queued commands for one host frame.
    ///
    /// Persistent strokes and fills go to `canvas`. The overlay is cleared and every visible
    /// actor's glyph is redrawn on it. The first call after construction only primes the
    /// engine and touches nothing, since the host's first delta is not meaningful.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(elapsed_s = elapsed.as_secs_f64(), actors = self.actors.len())
    )]
    pub fn advance(
        &mut self,
        elapsed: Duration,
        canvas: &mut dyn RasterSink,
        overlay: &mut dyn RasterSink,
    ) {
        if !self.primed {
            self.primed = true;
            return;
        }

        overlay.clear_region(self.config.surface_rect());

        let elapsed_s = elapsed.as_secs_f64();
        for slot in &mut self.actors {
            let mut instruction_budget = self.config.instruction_limit;
            let mut time_budget = elapsed_s;

            // Hold the queue lock only to peek and pop.
            while instruction_budget > 0 && time_budget > 0.0 {
                let Some(cmd) = slot.queue.front() else {
                    break;
                };
                instruction_budget -= 1;

                if apply(&mut slot.state, cmd, &mut time_budget, &self.config, canvas) {
                    slot.queue.pop_front();
                }
            }

            if instruction_budget == 0 && !slot.queue.is_empty() {
                tracing::debug!(
                    actor = slot.id.0,
                    pending = slot.queue.len(),
                    "instruction limit reached; deferring to next frame"
                );
            }

            draw_glyph(&slot.state, &self.config, overlay);
        }
    }

    fn slot(&self, id: ActorId) -> Option<&ActorSlot> {
        self.actors.iter().find(|slot| slot.id == id)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("actors", &self.actor_ids())
            .field("primed", &self.primed)
            .finish()
    }
}

/// Re-establish the invariants a handle would have enforced on a caller-built state.
fn sanitize(mut state: ActorState) -> ActorState {
    state.speed = Speed::new(state.speed.units_per_sec());
    state.pen_size = state.pen_size.max(0.0);
    state.heading = normalize_degrees(state.heading);
    state
}

/// Apply one step of `cmd`. Returns `true` when the command is fully consumed.
fn apply(
    state: &mut ActorState,
    cmd: Command,
    time_budget: &mut f64,
    config: &EngineConfig,
    canvas: &mut dyn RasterSink,
) -> bool {
    match cmd {
        Command::MoveTo(target) if !(target.x.is_finite() && target.y.is_finite()) => {
            tracing::warn!(?target, "dropping move to a non-finite position");
            true
        }
        Command::RotateTo(target) if !target.is_finite() => {
            tracing::warn!(heading = target, "dropping turn to a non-finite heading");
            true
        }
        Command::MoveTo(target) => {
            let rate = state.speed.units_per_sec() * config.linear_speed_scale;
            step_move(state, target, rate, time_budget, canvas)
        }
        Command::RotateTo(target) => {
            let rate = state.speed.units_per_sec()
                * config.linear_speed_scale
                * config.rotation_speed_scale;
            step_rotate(state, target, rate, time_budget)
        }
        Command::SetSize(v) => {
            state.pen_size = v.max(0.0);
            true
        }
        Command::SetVisible(v) => {
            state.visible = v;
            true
        }
        Command::SetPenDown(v) => {
            state.pen_down = v;
            true
        }
        Command::SetPenColor(c) => {
            state.pen_color = c;
            true
        }
        Command::SetFillColor(c) => {
            state.fill_color = c;
            true
        }
        Command::SetSpeed(s) => {
            state.speed = Speed::new(s.units_per_sec());
            true
        }
        Command::BeginFill => {
            state.filling = true;
            state.fill_vertices.clear();
            state.fill_vertices.push(state.position);
            true
        }
        Command::EndFill => {
            canvas.fill_polygon(&state.fill_vertices, state.fill_color);
            state.fill_vertices.clear();
            state.filling = false;
            true
        }
    }
}

/// How far a motion gets on the remaining budget. Returns the fraction of `distance` covered
/// (1.0 when complete) and charges the budget.
fn progress(distance: f64, rate: f64, time_budget: &mut f64) -> f64 {
    let reachable = rate * *time_budget;
    if reachable + COMPLETION_EPSILON >= distance {
        if rate.is_finite() {
            *time_budget -= distance / rate;
        }
        1.0
    } else {
        *time_budget = 0.0;
        reachable / distance
    }
}

fn step_move(
    state: &mut ActorState,
    target: Point,
    rate: f64,
    time_budget: &mut f64,
    canvas: &mut dyn RasterSink,
) -> bool {
    let start = state.position;
    let delta = target - start;
    let fraction = progress(delta.hypot(), rate, time_budget);
    let done = fraction >= 1.0;
    let end = if done { target } else { start + delta * fraction };

    if state.pen_down && state.pen_size > 0.0 {
        canvas.draw_segment(start, end, state.pen_size, state.pen_color);
    }
    state.position = end;
    if state.filling {
        state.fill_vertices.push(end);
    }
    done
}

fn step_rotate(state: &mut ActorState, target: f64, rate: f64, time_budget: &mut f64) -> bool {
    let delta = target - state.heading;
    let fraction = progress(delta.abs(), rate, time_budget);
    if fraction >= 1.0 {
        state.heading = normalize_degrees(target);
        true
    } else {
        state.heading += delta * fraction;
        false
    }
}

fn draw_glyph(state: &ActorState, config: &EngineConfig, overlay: &mut dyn RasterSink) {
    if !state.visible {
        return;
    }
    let scale = glyph_scale(config.glyph_scale, state.pen_size);
    if scale <= 0.0 {
        return;
    }
    let outline = arrow_outline(state.position, state.heading, scale);
    overlay.fill_polygon(&outline, state.fill_color);

    let width = config.glyph_line_width * scale;
    if width > 0.0 {
        for (i, &p0) in outline.iter().enumerate() {
            let p1 = outline[(i + 1) % outline.len()];
            overlay.draw_segment(p0, p1, width, state.pen_color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/animator.rs"]
mod tests;
