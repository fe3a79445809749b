use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rect;
use crate::foundation::error::{TortugaError, TortugaResult};

/// Default per-frame, per-actor cap on processed commands.
pub const DEFAULT_INSTRUCTION_LIMIT: u32 = 2048;

/// Environment variable overriding [`EngineConfig::instruction_limit`].
pub const INSTRUCTION_LIMIT_ENV: &str = "TORTUGA_INSTRUCTION_LIMIT";

/// Tuning knobs for an [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum commands processed per actor per frame, whatever their time cost.
    pub instruction_limit: u32,
    /// Units travelled per second for each unit of actor speed.
    pub linear_speed_scale: f64,
    /// Degrees turned per unit of linear travel.
    pub rotation_speed_scale: f64,
    /// Glyph size at pen width 1.
    pub glyph_scale: f64,
    /// Glyph outline width relative to the glyph scale.
    pub glyph_line_width: f64,
    /// Drawing surface width; the overlay is cleared over the centered surface rect.
    pub surface_width: f64,
    /// Drawing surface height.
    pub surface_height: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instruction_limit: DEFAULT_INSTRUCTION_LIMIT,
            linear_speed_scale: 1.0,
            rotation_speed_scale: 1.0,
            glyph_scale: 6.0,
            glyph_line_width: 0.2,
            surface_width: 500.0,
            surface_height: 500.0,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> TortugaResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| TortugaError::config(format!("parse engine config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> TortugaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply overrides from the process environment.
    ///
    /// Only [`INSTRUCTION_LIMIT_ENV`] is consulted; unparsable or zero values are ignored.
    pub fn with_env_overrides(self) -> Self {
        let raw = std::env::var(INSTRUCTION_LIMIT_ENV).ok();
        self.with_instruction_limit_override(raw.as_deref())
    }

    fn with_instruction_limit_override(mut self, raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().parse::<u32>()) {
            Some(Ok(limit)) if limit > 0 => self.instruction_limit = limit,
            Some(_) => tracing::warn!(
                value = raw,
                "ignoring {INSTRUCTION_LIMIT_ENV}: expected a positive integer"
            ),
            None => {}
        }
        self
    }

    /// Check that every knob is usable.
    pub fn validate(&self) -> TortugaResult<()> {
        if self.instruction_limit == 0 {
            return Err(TortugaError::config("instruction_limit must be > 0"));
        }
        for (name, v) in [
            ("linear_speed_scale", self.linear_speed_scale),
            ("rotation_speed_scale", self.rotation_speed_scale),
            ("surface_width", self.surface_width),
            ("surface_height", self.surface_height),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TortugaError::config(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
        }
        for (name, v) in [
            ("glyph_scale", self.glyph_scale),
            ("glyph_line_width", self.glyph_line_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(TortugaError::config(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    /// The drawing surface in centered coordinates.
    pub fn surface_rect(&self) -> Rect {
        let (hw, hh) = (self.surface_width / 2.0, self.surface_height / 2.0);
        Rect::new(-hw, -hh, hw, hh)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
