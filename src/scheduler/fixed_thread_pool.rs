use std::{io, num::NonZeroUsize, thread};

use futures::{executor::ThreadPool, future};

use super::{run_task, Scheduler, Task};

/// A pool with a fixed number of workers, by default one per available core.
///
/// Suited to CPU-bound work. Once every worker is busy, further tasks queue
/// inside the pool.
#[derive(Clone)]
pub struct FixedThreadPool {
  pool: ThreadPool,
  size: usize,
}

/// Configures a [`FixedThreadPool`].
pub struct FixedThreadPoolBuilder {
  pool_size: usize,
  name_prefix: String,
}

impl Default for FixedThreadPoolBuilder {
  fn default() -> Self {
    let pool_size = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    FixedThreadPoolBuilder { pool_size, name_prefix: "rx-fixed".to_string() }
  }
}

impl FixedThreadPoolBuilder {
  /// Number of workers; zero is treated as one.
  pub fn pool_size(mut self, size: usize) -> Self {
    self.pool_size = size.max(1);
    self
  }

  /// Worker threads are named `{prefix}-{n}`.
  pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = prefix.into();
    self
  }

  pub fn create(self) -> io::Result<FixedThreadPool> {
    let pool = ThreadPool::builder()
      .pool_size(self.pool_size)
      .name_prefix(format!("{}-", self.name_prefix))
      .create()?;
    Ok(FixedThreadPool { pool, size: self.pool_size })
  }
}

impl FixedThreadPool {
  pub fn new() -> io::Result<Self> { Self::builder().create() }

  pub fn builder() -> FixedThreadPoolBuilder { FixedThreadPoolBuilder::default() }

  pub fn size(&self) -> usize { self.size }
}

impl Scheduler for FixedThreadPool {
  fn schedule(&self, task: Task) { self.pool.spawn_ok(future::lazy(move |_| run_task(task))); }
}
