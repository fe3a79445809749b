use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::actor::command::Command;

/// FIFO of pending commands shared between one actor handle (producer) and the engine
/// (consumer).
///
/// Clones share the same queue, so producers may live on other threads than the one driving
/// [`crate::Engine::advance`]. Commands are never reordered or dropped.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<Command>>>,
}

impl CommandQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command at the tail.
    pub fn push(&self, cmd: Command) {
        self.lock().push_back(cmd);
    }

    /// Number of commands not yet fully applied, including one that is partway through.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the pending commands, head first.
    pub fn snapshot(&self) -> Vec<Command> {
        self.lock().iter().copied().collect()
    }

    /// Copy of the head command, if any.
    pub(crate) fn front(&self) -> Option<Command> {
        self.lock().front().copied()
    }

    /// Drop the head command once it is fully applied.
    pub(crate) fn pop_front(&self) {
        self.lock().pop_front();
    }

    // Every operation leaves the deque consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Command>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
