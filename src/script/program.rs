use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    actor::handle::Turtle,
    engine::config::EngineConfig,
    foundation::core::{Color, Point},
    foundation::error::{TortugaError, TortugaResult},
};

/// A complete turtle program.
///
/// ```json
/// {
///   "fps": 60,
///   "actors": [
///     { "ops": [{ "speed": 200 }, { "forward": 100 }, { "left": 90 }, "up"] }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    /// Engine tuning; defaults apply when omitted.
    #[serde(default)]
    pub config: EngineConfig,
    /// Simulated host frame rate.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Upper bound on simulated frames, after the baseline frame.
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// Background painted under the drawing when flattening.
    #[serde(default)]
    pub background: Option<Color>,
    /// One script per actor, registered in order.
    pub actors: Vec<ActorScript>,
}

fn default_fps() -> f64 {
    60.0
}

fn default_max_frames() -> u32 {
    36_000
}

/// Ops for one actor, applied through its [`Turtle`] handle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorScript {
    /// Ops in submission order.
    #[serde(default)]
    pub ops: Vec<Op>,
}

/// One handle call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// [`Turtle::forward`].
    Forward(f64),
    /// [`Turtle::back`].
    Back(f64),
    /// [`Turtle::left`].
    Left(f64),
    /// [`Turtle::right`].
    Right(f64),
    /// [`Turtle::move_to`] with `[x, y]`.
    MoveTo([f64; 2]),
    /// [`Turtle::set_heading`].
    Heading(f64),
    /// [`Turtle::set_size`].
    Size(f64),
    /// [`Turtle::set_speed`].
    Speed(f64),
    /// [`Turtle::set_pen_color`].
    PenColor(Color),
    /// [`Turtle::set_fill_color`].
    FillColor(Color),
    /// [`Turtle::up`].
    Up,
    /// [`Turtle::down`].
    Down,
    /// [`Turtle::show`].
    Show,
    /// [`Turtle::hide`].
    Hide,
    /// [`Turtle::begin_fill`].
    BeginFill,
    /// [`Turtle::end_fill`].
    EndFill,
    /// [`Turtle::face`] with `[x, y]`.
    Face([f64; 2]),
}

impl Op {
    /// Issue this op on `turtle`.
    pub fn apply(self, turtle: &mut Turtle) {
        match self {
            Self::Forward(d) => turtle.forward(d),
            Self::Back(d) => turtle.back(d),
            Self::Left(d) => turtle.left(d),
            Self::Right(d) => turtle.right(d),
            Self::MoveTo([x, y]) => turtle.move_to(Point::new(x, y)),
            Self::Heading(v) => turtle.set_heading(v),
            Self::Size(v) => turtle.set_size(v),
            Self::Speed(v) => turtle.set_speed(v),
            Self::PenColor(c) => turtle.set_pen_color(c),
            Self::FillColor(c) => turtle.set_fill_color(c),
            Self::Up => turtle.up(),
            Self::Down => turtle.down(),
            Self::Show => turtle.show(),
            Self::Hide => turtle.hide(),
            Self::BeginFill => turtle.begin_fill(),
            Self::EndFill => turtle.end_fill(),
            Self::Face([x, y]) => turtle.face(Point::new(x, y)),
        }
    }
}

impl Program {
    /// Parse and validate a JSON program.
    pub fn from_json_str(s: &str) -> TortugaResult<Self> {
        let program: Self = serde_json::from_str(s)
            .map_err(|e| TortugaError::script(format!("parse program: {e}")))?;
        program.validate()?;
        Ok(program)
    }

    /// Read, parse and validate a JSON program file.
    pub fn from_json_file(path: impl AsRef<Path>) -> TortugaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read program '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check frame settings and the embedded engine config.
    pub fn validate(&self) -> TortugaResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(TortugaError::script(format!(
                "fps must be finite and > 0 (got {})",
                self.fps
            )));
        }
        if self.max_frames == 0 {
            return Err(TortugaError::script("max_frames must be > 0"));
        }
        self.config.validate()
    }

    /// Total ops across all actors.
    pub fn op_count(&self) -> usize {
        self.actors.iter().map(|a| a.ops.len()).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/program.rs"]
mod tests;
