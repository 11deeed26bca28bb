use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  thread,
  time::Duration,
};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendError, Sender};
use parking_lot::Mutex;

use super::{run_task, Scheduler, Task};

const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// An unbounded pool that spawns a worker whenever no idle one is available
/// and reuses idle workers otherwise.
///
/// Workers idle for longer than the keep-alive retire. Suited to blocking,
/// I/O-style work; nothing bounds the number of workers.
///
/// Every task travels through one channel. `idle` counts workers that are
/// waiting on it and have not been promised a task yet: `schedule` claims one
/// of them before sending, or spawns a new worker when none is left, so each
/// queued task always has a worker committed to it.
#[derive(Clone)]
pub struct CachedThreadPool {
  inner: Arc<Inner>,
}

struct Inner {
  sender: Sender<Task>,
  receiver: Receiver<Task>,
  idle: Arc<AtomicUsize>,
  spawned: AtomicUsize,
  name_prefix: String,
  keep_alive: Duration,
  stack_size: Option<usize>,
}

/// Configures a [`CachedThreadPool`].
pub struct CachedThreadPoolBuilder {
  name_prefix: String,
  keep_alive: Duration,
  stack_size: Option<usize>,
}

impl Default for CachedThreadPoolBuilder {
  fn default() -> Self {
    CachedThreadPoolBuilder {
      name_prefix: "rx-cached".to_string(),
      keep_alive: DEFAULT_KEEP_ALIVE,
      stack_size: None,
    }
  }
}

impl CachedThreadPoolBuilder {
  /// Worker threads are named `{prefix}-{n}`.
  pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = prefix.into();
    self
  }

  /// How long an idle worker waits for work before it retires.
  pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
    self.keep_alive = keep_alive;
    self
  }

  /// Stack size of each worker, the platform default when unset.
  pub fn stack_size(mut self, stack_size: usize) -> Self {
    self.stack_size = Some(stack_size);
    self
  }

  pub fn create(self) -> CachedThreadPool {
    let (sender, receiver) = channel::unbounded();
    CachedThreadPool {
      inner: Arc::new(Inner {
        sender,
        receiver,
        idle: Arc::new(AtomicUsize::new(0)),
        spawned: AtomicUsize::new(0),
        name_prefix: self.name_prefix,
        keep_alive: self.keep_alive,
        stack_size: self.stack_size,
      }),
    }
  }
}

impl Default for CachedThreadPool {
  fn default() -> Self { CachedThreadPoolBuilder::default().create() }
}

impl CachedThreadPool {
  pub fn new() -> Self { Self::default() }

  pub fn builder() -> CachedThreadPoolBuilder { CachedThreadPoolBuilder::default() }

  /// Number of workers waiting for work right now.
  pub fn idle_workers(&self) -> usize { self.inner.idle.load(Ordering::Acquire) }

  /// Number of workers spawned over the pool's lifetime.
  pub fn spawned_workers(&self) -> usize { self.inner.spawned.load(Ordering::Acquire) }

  fn claim_idle(&self) -> bool {
    self
      .inner
      .idle
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
      .is_ok()
  }

  /// Spawns a worker that starts with `first`. If no thread can be spawned,
  /// `first` runs inline on the caller.
  fn spawn_worker(&self, first: Task) {
    let inner = &self.inner;
    let id = inner.spawned.fetch_add(1, Ordering::AcqRel);
    let first = Arc::new(Mutex::new(Some(first)));
    let (c_first, receiver, idle, keep_alive) =
      (first.clone(), inner.receiver.clone(), inner.idle.clone(), inner.keep_alive);

    let mut builder = thread::Builder::new().name(format!("{}-{}", inner.name_prefix, id));
    if let Some(stack_size) = inner.stack_size {
      builder = builder.stack_size(stack_size);
    }
    let spawned = builder.spawn(move || {
      let task = c_first.lock().take();
      if let Some(task) = task {
        run_task(task);
      }
      worker_loop(receiver, idle, keep_alive)
    });

    if let Err(err) = spawned {
      inner.spawned.fetch_sub(1, Ordering::AcqRel);
      tracing::error!(error = %err, "failed to spawn cached pool worker, running task inline");
      let task = first.lock().take();
      if let Some(task) = task {
        run_task(task);
      }
    }
  }
}

impl Scheduler for CachedThreadPool {
  fn schedule(&self, task: Task) {
    if !self.claim_idle() {
      self.spawn_worker(task);
    } else if let Err(SendError(task)) = self.inner.sender.send(task) {
      // the pool owns a receiver, this only happens while it is torn down
      run_task(task);
    }
  }
}

fn worker_loop(receiver: Receiver<Task>, idle: Arc<AtomicUsize>, keep_alive: Duration) {
  loop {
    idle.fetch_add(1, Ordering::AcqRel);
    let task = match receiver.recv_timeout(keep_alive) {
      Ok(task) => task,
      Err(RecvTimeoutError::Timeout) => {
        if idle.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)).is_ok() {
          return;
        }
        // every idle slot was claimed, one of the claimed tasks is ours
        match receiver.recv() {
          Ok(task) => task,
          Err(_) => return,
        }
      }
      Err(RecvTimeoutError::Disconnected) => return,
    };
    run_task(task);
  }
}
