use super::{Scheduler, Task};

/// Runs every task inline on the calling thread.
///
/// Useful in tests and wherever a scheduler is required but no hop is
/// wanted. Order is trivially preserved.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl Scheduler for Immediate {
  #[inline]
  fn schedule(&self, task: Task) { task() }
}
