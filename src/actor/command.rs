use crate::foundation::core::{Color, Point, Speed};

/// A queued request to change an actor's rendered state.
///
/// `MoveTo` and `RotateTo` are interpolated over frame time; every other command applies
/// instantly when the engine reaches it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Travel to an absolute position, drawing if the pen is down.
    MoveTo(Point),
    /// Turn to an absolute heading in degrees. The value is not normalized, so the engine
    /// turns through the raw difference from the current heading.
    RotateTo(f64),
    /// Set the pen width (already clamped to `>= 0`).
    SetSize(f64),
    /// Show or hide the actor glyph.
    SetVisible(bool),
    /// Lower (`true`) or raise the pen.
    SetPenDown(bool),
    /// Stroke color for segments and the glyph outline.
    SetPenColor(Color),
    /// Fill color for fill regions and the glyph body.
    SetFillColor(Color),
    /// Animation rate for subsequent motion.
    SetSpeed(Speed),
    /// Start recording a fill region at the current position.
    BeginFill,
    /// Fill the recorded region and stop recording.
    EndFill,
}
