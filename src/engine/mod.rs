//! Consumer side: per-actor queues replayed under per-frame time and instruction budgets.

/// The frame-driven [`Engine`](animator::Engine).
pub mod animator;
/// Engine tuning and its JSON/env loading.
pub mod config;
/// Actor glyph geometry.
pub mod glyph;
/// Shared FIFO between a handle and the engine.
pub mod queue;
