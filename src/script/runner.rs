use std::time::Duration;

use crate::{
    engine::animator::Engine,
    foundation::error::{TortugaError, TortugaResult},
    render::sink::RasterSink,
    script::program::Program,
};

/// Outcome of [`run_program`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunStats {
    /// Frames advanced after the baseline frame.
    pub frames: u32,
    /// Whether every queue drained before `max_frames` was reached.
    pub idle: bool,
}

/// Replay `program` headlessly.
///
/// Each actor script is issued through a fresh handle up front, then the engine is advanced
/// by `1 / fps` per frame until every queue drains or `max_frames` is reached. At least one
/// frame runs so glyphs reach the overlay.
#[tracing::instrument(level = "debug", skip_all, fields(actors = program.actors.len()))]
pub fn run_program(
    program: &Program,
    canvas: &mut dyn RasterSink,
    overlay: &mut dyn RasterSink,
) -> TortugaResult<RunStats> {
    program.validate()?;

    let mut engine = Engine::new(program.config.clone());
    for script in &program.actors {
        let mut turtle = engine.spawn();
        for &op in &script.ops {
            op.apply(&mut turtle);
        }
    }

    let step = Duration::try_from_secs_f64(1.0 / program.fps)
        .map_err(|e| TortugaError::script(format!("frame step out of range: {e}")))?;
    engine.advance(Duration::ZERO, canvas, overlay);

    let mut frames = 0u32;
    loop {
        engine.advance(step, canvas, overlay);
        frames += 1;
        if engine.is_idle() || frames >= program.max_frames {
            break;
        }
    }

    let stats = RunStats {
        frames,
        idle: engine.is_idle(),
    };
    if !stats.idle {
        tracing::warn!(frames, "program did not finish within max_frames");
    }
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/script/runner.rs"]
mod tests;
