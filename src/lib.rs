//! Tortuga is an animated turtle-graphics engine.
//!
//! Turtle commands are not drawn when they are issued. Each [`Turtle`] handle updates its own
//! logical state immediately and appends a [`Command`] to a per-actor queue; the [`Engine`]
//! replays those queues once per host frame at each actor's [`Speed`], so drawing unfolds
//! smoothly no matter how fast commands arrive.
//!
//! # Frame model
//!
//! 1. **Issue**: `Turtle` setters -> `Command`s appended to the actor's [`CommandQueue`]
//! 2. **Advance**: [`Engine::advance`] spends the frame's elapsed time on queued motions,
//!    splitting a move or turn across frames when it does not fit, and caps the number of
//!    commands per actor per frame at [`EngineConfig::instruction_limit`]
//! 3. **Draw**: strokes and fills go to a persistent [`RasterSink`]; actor glyphs are redrawn
//!    on an overlay sink every frame
//!
//! The key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Never blocks**: handle calls only append to a queue; `advance` runs to completion under
//!   its budgets.
//! - **Order-preserving**: per-actor commands apply in submission order, never dropped.
//! - **Backend-agnostic**: the engine only sees [`RasterSink`]; [`CpuCanvas`] is a `vello_cpu`
//!   implementation, [`RecordingSink`] records calls.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod actor;
mod engine;
mod foundation;
mod render;
mod script;

pub use actor::command::Command;
pub use actor::handle::Turtle;
pub use actor::state::ActorState;
pub use engine::animator::Engine;
pub use engine::config::{DEFAULT_INSTRUCTION_LIMIT, EngineConfig, INSTRUCTION_LIMIT_ENV};
pub use engine::glyph::{ARROW, arrow_outline};
pub use engine::queue::CommandQueue;
pub use foundation::core::{ActorId, Affine, BezPath, Color, Point, Rect, Speed, Vec2};
pub use foundation::error::{TortugaError, TortugaResult};
pub use foundation::math::{degrees, normalize_degrees, radians, shortest_turn_target};
pub use render::composite::{over, over_in_place, unpremultiply_in_place};
pub use render::cpu::{CpuCanvas, FrameRGBA, flatten};
pub use render::recording::{DrawCall, RecordingSink};
pub use render::sink::{NullSink, RasterSink};
pub use script::program::{ActorScript, Op, Program};
pub use script::runner::{RunStats, run_program};
