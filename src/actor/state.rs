use crate::foundation::core::{Color, Point, Speed};

/// Renderable attributes of one actor.
///
/// The same record backs two views: the handle's logical copy (updated on every setter) and
/// the engine's rendered copy (updated as queued commands play back).
#[derive(Clone, Debug, PartialEq)]
pub struct ActorState {
    /// Position in centered, Y-up surface coordinates.
    pub position: Point,
    /// Heading in degrees, counter-clockwise from +X. In `[0, 360)` whenever no rotation is in
    /// flight.
    pub heading: f64,
    /// Pen width, `>= 0`. Also scales the glyph by `sqrt(pen_size)`.
    pub pen_size: f64,
    /// Stroke color.
    pub pen_color: Color,
    /// Fill color.
    pub fill_color: Color,
    /// Whether moves draw segments.
    pub pen_down: bool,
    /// Whether the glyph is drawn on the overlay.
    pub visible: bool,
    /// Animation rate.
    pub speed: Speed,
    /// Whether a fill region is being recorded.
    pub filling: bool,
    /// Vertices of the fill region being recorded; empty unless `filling`.
    pub fill_vertices: Vec<Point>,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            heading: 0.0,
            pen_size: 1.0,
            pen_color: Color::BLACK,
            fill_color: Color::WHITE,
            pen_down: true,
            visible: true,
            speed: Speed::DEFAULT,
            filling: false,
            fill_vertices: Vec::new(),
        }
    }
}
