use crate::foundation::core::{Color, Point, Rect};

/// 2D drawing surface consumed by the engine.
///
/// Coordinates are centered on the surface with Y increasing upward; implementations map
/// them onto their own pixel space.
pub trait RasterSink {
    /// Stroke a straight segment with round caps.
    fn draw_segment(&mut self, p0: Point, p1: Point, width: f64, color: Color);

    /// Fill a simple polygon given by its vertices in order. The outline closes implicitly.
    fn fill_polygon(&mut self, vertices: &[Point], color: Color);

    /// Reset a region to transparent.
    fn clear_region(&mut self, rect: Rect);
}

impl<S: RasterSink + ?Sized> RasterSink for &mut S {
    fn draw_segment(&mut self, p0: Point, p1: Point, width: f64, color: Color) {
        (**self).draw_segment(p0, p1, width, color);
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Color) {
        (**self).fill_polygon(vertices, color);
    }

    fn clear_region(&mut self, rect: Rect) {
        (**self).clear_region(rect);
    }
}

/// Sink that discards everything, for hosts that only need rendered state.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RasterSink for NullSink {
    fn draw_segment(&mut self, _p0: Point, _p1: Point, _width: f64, _color: Color) {}

    fn fill_polygon(&mut self, _vertices: &[Point], _color: Color) {}

    fn clear_region(&mut self, _rect: Rect) {}
}
