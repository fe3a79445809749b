//! Raster sinks the engine draws into.

/// Premultiplied RGBA8 compositing helpers.
pub mod composite;
/// `vello_cpu` pixmap backend and PNG output.
pub mod cpu;
/// Sink that records calls, for tests and diagnostics.
pub mod recording;
/// The [`RasterSink`](sink::RasterSink) contract.
pub mod sink;
