//! Shared value types, errors and math used by every other module.

/// Geometry re-exports, actor ids, colors and speeds.
pub mod core;
/// [`TortugaError`](error::TortugaError) and the crate result alias.
pub mod error;
/// Angle and channel arithmetic.
pub mod math;
