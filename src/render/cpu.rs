use std::path::Path;

use anyhow::Context as _;
use kurbo::{Cap, Circle, Line, PathEl, Shape, Stroke, StrokeOpts};

use crate::{
    foundation::core::{Affine, BezPath, Color, Point, Rect},
    foundation::error::{TortugaError, TortugaResult},
    render::{composite, sink::RasterSink},
};

const PATH_TOLERANCE: f64 = 0.1;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Write the frame as a straight-alpha PNG, creating parent directories as needed.
    pub fn write_png(&self, path: impl AsRef<Path>) -> TortugaResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }

        let mut data = self.data.clone();
        if self.premultiplied {
            composite::unpremultiply_in_place(&mut data);
        }
        image::save_buffer_with_format(
            path,
            &data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Persistent CPU drawing surface backed by a `vello_cpu` pixmap.
///
/// Draw calls are batched into a render context and composited onto the committed pixels
/// when the canvas is read or a region is cleared, so call order is preserved.
pub struct CpuCanvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    pending: bool,
    to_pixels: Affine,
}

impl CpuCanvas {
    /// Create a transparent canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> TortugaResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| TortugaError::render("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| TortugaError::render("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(TortugaError::render("canvas dimensions must be > 0"));
        }

        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            pending: false,
            // Centered, Y-up surface space onto top-left, Y-down pixels.
            to_pixels: Affine::new([
                1.0,
                0.0,
                0.0,
                -1.0,
                f64::from(w) / 2.0,
                f64::from(h) / 2.0,
            ]),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Read back the committed pixels as premultiplied RGBA8.
    pub fn to_frame(&mut self) -> TortugaResult<FrameRGBA> {
        self.flush()?;
        Ok(FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Fill `path` (in surface coordinates) with `color`.
    fn fill_surface_path(&mut self, path: &BezPath, color: Color) {
        if color.a == 0 {
            return;
        }
        let pixel_path = self.to_pixels * path.clone();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(&pixel_path));
        self.pending = true;
    }

    fn flush(&mut self) -> TortugaResult<()> {
        if !self.pending {
            return Ok(());
        }
        clear_pixmap(&mut self.scratch);
        let mut ctx = std::mem::replace(
            &mut self.ctx,
            vello_cpu::RenderContext::new(self.width, self.height),
        );
        ctx.flush();
        ctx.render_to_pixmap(&mut self.scratch);
        self.pending = false;
        composite::over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
        )
    }

    fn pixel_bounds(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let r = self.to_pixels.transform_rect_bbox(rect);
        let x0 = r.x0.floor().max(0.0) as usize;
        let y0 = r.y0.floor().max(0.0) as usize;
        let x1 = (r.x1.ceil().max(0.0) as usize).min(usize::from(self.width));
        let y1 = (r.y1.ceil().max(0.0) as usize).min(usize::from(self.height));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

impl std::fmt::Debug for CpuCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pending", &self.pending)
            .finish()
    }
}

impl RasterSink for CpuCanvas {
    fn draw_segment(&mut self, p0: Point, p1: Point, width: f64, color: Color) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let outline = if p0 == p1 {
            Circle::new(p0, width / 2.0).to_path(PATH_TOLERANCE)
        } else {
            let style = Stroke::new(width).with_caps(Cap::Round);
            kurbo::stroke(
                Line::new(p0, p1).path_elements(PATH_TOLERANCE),
                &style,
                &StrokeOpts::default(),
                PATH_TOLERANCE,
            )
        };
        self.fill_surface_path(&outline, color);
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Color) {
        let [first, rest @ ..] = vertices else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(*first);
        for &p in rest {
            path.line_to(p);
        }
        path.close_path();
        self.fill_surface_path(&path, color);
    }

    fn clear_region(&mut self, rect: Rect) {
        if let Err(err) = self.flush() {
            tracing::warn!(%err, "failed to flush pending draws before clear");
        }
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect) else {
            return;
        };
        let stride = usize::from(self.width) * 4;
        let data = self.pixmap.data_as_u8_slice_mut();
        for row in y0..y1 {
            data[row * stride + x0 * 4..row * stride + x1 * 4].fill(0);
        }
    }
}

/// Flatten layers bottom-to-top over an opaque or transparent background.
pub fn flatten(background: Color, layers: &mut [&mut CpuCanvas]) -> TortugaResult<FrameRGBA> {
    let Some(first) = layers.first() else {
        return Err(TortugaError::render("flatten needs at least one layer"));
    };
    let (width, height) = (first.width(), first.height());

    let bg = background.to_premul();
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..(width as usize * height as usize) {
        data.extend_from_slice(&bg);
    }

    for layer in layers.iter_mut() {
        if layer.width() != width || layer.height() != height {
            return Err(TortugaError::render("flatten layers must share dimensions"));
        }
        let frame = layer.to_frame()?;
        composite::over_in_place(&mut data, &frame.data)?;
    }

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
