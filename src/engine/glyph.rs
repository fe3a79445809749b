use crate::foundation::core::{Affine, Point};
use crate::foundation::math::radians;

/// Arrowhead outline in glyph space, pointing along +X.
pub const ARROW: [Point; 4] = [
    Point::new(-0.5, 0.0),
    Point::new(-1.0, 1.0),
    Point::new(1.0, 0.0),
    Point::new(-1.0, -1.0),
];

/// Place the arrow at `position`, rotated to `heading` degrees and scaled by `scale`.
pub fn arrow_outline(position: Point, heading: f64, scale: f64) -> [Point; 4] {
    let xf = Affine::translate(position.to_vec2())
        * Affine::rotate(radians(heading))
        * Affine::scale(scale);
    ARROW.map(|p| xf * p)
}

/// Glyph scale for an actor with the given pen width.
pub(crate) fn glyph_scale(base: f64, pen_size: f64) -> f64 {
    base * pen_size.max(0.0).sqrt()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/glyph.rs"]
mod tests;
