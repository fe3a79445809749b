use crate::{
    foundation::core::{Color, Point, Rect},
    render::sink::RasterSink,
};

/// One call received by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// A [`RasterSink::draw_segment`] call.
    Segment {
        /// Segment start.
        p0: Point,
        /// Segment end.
        p1: Point,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Color,
    },
    /// A [`RasterSink::fill_polygon`] call.
    Polygon {
        /// Polygon vertices in order.
        vertices: Vec<Point>,
        /// Fill color.
        color: Color,
    },
    /// A [`RasterSink::clear_region`] call.
    Clear(Rect),
}

/// Sink that records calls in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    calls: Vec<DrawCall>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded calls.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded segments as `(p0, p1)` pairs.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Segment { p0, p1, .. } => Some((*p0, *p1)),
                _ => None,
            })
            .collect()
    }

    /// Recorded polygons.
    pub fn polygons(&self) -> Vec<&[Point]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Polygon { vertices, .. } => Some(vertices.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl RasterSink for RecordingSink {
    fn draw_segment(&mut self, p0: Point, p1: Point, width: f64, color: Color) {
        self.calls.push(DrawCall::Segment {
            p0,
            p1,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Color) {
        self.calls.push(DrawCall::Polygon {
            vertices: vertices.to_vec(),
            color,
        });
    }

    fn clear_region(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Clear(rect));
    }
}
