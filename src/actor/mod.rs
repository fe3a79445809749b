//! Producer side: the command set, actor attributes and the [`Turtle`](handle::Turtle) handle.

/// Closed set of queued actor commands.
pub mod command;
/// Actor handle with immediately-updated logical state.
pub mod handle;
/// Renderable actor attributes.
pub mod state;
