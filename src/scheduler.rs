//! Schedulers decide where a unit of work runs.
//!
//! A [`Scheduler`] accepts a [`Task`] and returns immediately. Nothing flows
//! back through the scheduler: results travel through the observer contract.
//!
//! | Scheduler | Workers | Order |
//! |---|---|---|
//! | [`CachedThreadPool`] | grows on demand, idle workers reused | unordered |
//! | [`FixedThreadPool`] | one per available core | unordered |
//! | [`SingleThread`] | one dedicated worker | FIFO |
//! | [`Immediate`] | the caller | FIFO |
//!
//! [`io`], [`computation`] and [`single`] return process-wide instances of the
//! first three, created on first use.
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::catch_panic;

mod cached_thread_pool;
mod fixed_thread_pool;
mod immediate;
mod single_thread;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use cached_thread_pool::{CachedThreadPool, CachedThreadPoolBuilder};
pub use fixed_thread_pool::{FixedThreadPool, FixedThreadPoolBuilder};
pub use immediate::Immediate;
pub use single_thread::{SingleThread, SingleThreadBuilder};

/// A unit of work submitted to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler: Send + Sync {
  /// Submits `task` for execution and returns immediately.
  fn schedule(&self, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  #[inline]
  fn schedule(&self, task: Task) { (**self).schedule(task) }
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
  #[inline]
  fn schedule(&self, task: Task) { (**self).schedule(task) }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
  #[inline]
  fn schedule(&self, task: Task) { (**self).schedule(task) }
}

/// Runs a task on a worker, keeping the worker alive if the task panics.
pub(crate) fn run_task(task: Task) {
  if let Err(err) = catch_panic("scheduled task", task) {
    tracing::error!(error = %err, "scheduled task panicked");
  }
}

static IO: Lazy<CachedThreadPool> =
  Lazy::new(|| CachedThreadPool::builder().name_prefix("rx-io").create());

static COMPUTATION: Lazy<Box<dyn Scheduler>> = Lazy::new(|| {
  match FixedThreadPool::builder().name_prefix("rx-computation").create() {
    Ok(pool) => Box::new(pool),
    Err(err) => {
      tracing::warn!(error = %err, "fixed thread pool unavailable, using a cached pool");
      Box::new(CachedThreadPool::builder().name_prefix("rx-computation").create())
    }
  }
});

static SINGLE: Lazy<Box<dyn Scheduler>> =
  Lazy::new(|| match SingleThread::builder().name("rx-single").create() {
    Ok(worker) => Box::new(worker),
    Err(err) => {
      tracing::warn!(error = %err, "single worker unavailable, running tasks inline");
      Box::new(Immediate)
    }
  });

/// Process-wide unbounded pool, suited to blocking work.
pub fn io() -> &'static dyn Scheduler { &*IO }

/// Process-wide pool sized to the available parallelism, suited to CPU-bound
/// work.
pub fn computation() -> &'static dyn Scheduler { &**COMPUTATION }

/// Process-wide dedicated worker executing tasks in submission order.
pub fn single() -> &'static dyn Scheduler { &**SINGLE }
