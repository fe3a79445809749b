//! Headless turtle programs: a JSON op list per actor, replayed at a fixed frame rate.

/// Serializable program model.
pub mod program;
/// Fixed-step driver for programs.
pub mod runner;
