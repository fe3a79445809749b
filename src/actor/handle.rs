use crate::{
    actor::{command::Command, state::ActorState},
    engine::queue::CommandQueue,
    foundation::core::{ActorId, Color, Point, Speed, Vec2},
    foundation::math::{degrees, normalize_degrees, radians, shortest_turn_target},
};

/// Producer-side facade for one actor.
///
/// Every setter updates the handle's logical state immediately, so reads on the same handle
/// always see the latest request, and appends the matching [`Command`] to the actor's queue.
/// The engine replays the queue at the actor's speed; its rendered state catches up with the
/// logical state once the queue drains.
///
/// ```
/// use tortuga::{Engine, EngineConfig};
///
/// let mut engine = Engine::new(EngineConfig::default());
/// let mut t = engine.spawn();
/// t.forward(100.0);
/// t.left(90.0);
/// assert_eq!(t.heading(), 90.0);
/// assert_eq!(engine.pending(t.id()), Some(2));
/// ```
#[derive(Debug)]
pub struct Turtle {
    id: ActorId,
    state: ActorState,
    queue: CommandQueue,
}

impl Turtle {
    pub(crate) fn attach(id: ActorId, initial: ActorState, queue: CommandQueue) -> Self {
        Self {
            id,
            state: initial,
            queue,
        }
    }

    /// Engine-side identity of this actor.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Logical state as of the last setter call.
    pub fn state(&self) -> &ActorState {
        &self.state
    }

    /// Logical x coordinate.
    pub fn x(&self) -> f64 {
        self.state.position.x
    }

    /// Logical y coordinate.
    pub fn y(&self) -> f64 {
        self.state.position.y
    }

    /// Logical position.
    pub fn pos(&self) -> Point {
        self.state.position
    }

    /// Heading in degrees, always in `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    /// Logical pen width.
    pub fn size(&self) -> f64 {
        self.state.pen_size
    }

    /// Logical animation rate.
    pub fn speed(&self) -> Speed {
        self.state.speed
    }

    /// Logical stroke color.
    pub fn pen_color(&self) -> Color {
        self.state.pen_color
    }

    /// Logical fill color.
    pub fn fill_color(&self) -> Color {
        self.state.fill_color
    }

    /// Whether the pen is logically down.
    pub fn is_down(&self) -> bool {
        self.state.pen_down
    }

    /// Whether the glyph is logically visible.
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Whether a fill region is logically open.
    pub fn is_filling(&self) -> bool {
        self.state.filling
    }

    /// Travel to an absolute position. Accepts a [`Point`] or an `(x, y)` tuple.
    ///
    /// Non-finite targets are ignored.
    pub fn move_to(&mut self, target: impl Into<Point>) {
        let target = target.into();
        if !(target.x.is_finite() && target.y.is_finite()) {
            tracing::warn!(
                actor = self.id.0,
                ?target,
                "ignoring move to a non-finite position"
            );
            return;
        }
        self.queue.push(Command::MoveTo(target));
        self.state.position = target;
    }

    /// Move horizontally to `x`, keeping the logical `y`.
    pub fn set_x(&mut self, x: f64) {
        self.move_to((x, self.y()));
    }

    /// Move vertically to `y`, keeping the logical `x`.
    pub fn set_y(&mut self, y: f64) {
        self.move_to((self.x(), y));
    }

    /// Alias of [`Turtle::move_to`] for points.
    pub fn set_pos(&mut self, pos: Point) {
        self.move_to(pos);
    }

    /// Move `distance` units along the current heading.
    pub fn forward(&mut self, distance: f64) {
        let rad = radians(self.heading());
        let step = Vec2::new(rad.cos(), rad.sin()) * distance;
        self.move_to(self.pos() + step);
    }

    /// Move `distance` units against the current heading.
    pub fn back(&mut self, distance: f64) {
        self.forward(-distance);
    }

    /// Turn to an absolute heading.
    ///
    /// The logical heading is stored normalized, but the queued target is `degrees` as given,
    /// so `set_heading(-10.0)` from `0` turns 10 degrees clockwise rather than 350 degrees
    /// counter-clockwise. Non-finite headings are ignored.
    pub fn set_heading(&mut self, degrees: f64) {
        if !degrees.is_finite() {
            tracing::warn!(actor = self.id.0, degrees, "ignoring non-finite heading");
            return;
        }
        self.queue.push(Command::RotateTo(degrees));
        self.state.heading = normalize_degrees(degrees);
    }

    /// Turn counter-clockwise.
    pub fn left(&mut self, degrees: f64) {
        self.set_heading(self.heading() + degrees);
    }

    /// Turn clockwise.
    pub fn right(&mut self, degrees: f64) {
        self.set_heading(self.heading() - degrees);
    }

    /// Turn toward `target` the short way round. No-op when already standing on it.
    pub fn face(&mut self, target: impl Into<Point>) {
        let d = target.into() - self.pos();
        if d.x == 0.0 && d.y == 0.0 {
            return;
        }
        let bearing = degrees(d.y.atan2(d.x));
        self.set_heading(shortest_turn_target(self.heading(), bearing));
    }

    /// Set the pen width. Negative values clamp to zero.
    pub fn set_size(&mut self, size: f64) {
        let size = size.max(0.0);
        self.queue.push(Command::SetSize(size));
        self.state.pen_size = size;
    }

    /// Set the animation rate in units per second. `v <= 0` means instantaneous.
    pub fn set_speed(&mut self, v: f64) {
        let speed = Speed::new(v);
        self.queue.push(Command::SetSpeed(speed));
        self.state.speed = speed;
    }

    /// Set the stroke color.
    pub fn set_pen_color(&mut self, color: Color) {
        self.queue.push(Command::SetPenColor(color));
        self.state.pen_color = color;
    }

    /// Set the fill color.
    pub fn set_fill_color(&mut self, color: Color) {
        self.queue.push(Command::SetFillColor(color));
        self.state.fill_color = color;
    }

    /// Lower (`true`) or raise the pen.
    pub fn set_pen_down(&mut self, down: bool) {
        self.queue.push(Command::SetPenDown(down));
        self.state.pen_down = down;
    }

    /// Show or hide the glyph.
    pub fn set_visible(&mut self, visible: bool) {
        self.queue.push(Command::SetVisible(visible));
        self.state.visible = visible;
    }

    /// Lower the pen.
    pub fn down(&mut self) {
        self.set_pen_down(true);
    }

    /// Raise the pen.
    pub fn up(&mut self) {
        self.set_pen_down(false);
    }

    /// Show the glyph.
    pub fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the glyph.
    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    /// Start or finish a fill region. Only state transitions enqueue a command.
    pub fn set_filling(&mut self, filling: bool) {
        match (self.state.filling, filling) {
            (false, true) => self.queue.push(Command::BeginFill),
            (true, false) => self.queue.push(Command::EndFill),
            _ => return,
        }
        self.state.filling = filling;
    }

    /// Open a fill region; no-op if one is already open.
    pub fn begin_fill(&mut self) {
        self.set_filling(true);
    }

    /// Close and fill the open region; no-op if none is open.
    pub fn end_fill(&mut self) {
        self.set_filling(false);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/actor/handle.rs"]
mod tests;
