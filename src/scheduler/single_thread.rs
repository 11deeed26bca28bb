use std::{io, thread};

use crossbeam::channel::{self, Sender};

use super::{run_task, Scheduler, Task};

/// One dedicated worker executing tasks strictly in submission order.
///
/// Handles are cheap to clone and all feed the same worker. The worker exits
/// once every handle is dropped and the queue is drained.
#[derive(Clone)]
pub struct SingleThread {
  sender: Sender<Task>,
}

/// Configures a [`SingleThread`].
pub struct SingleThreadBuilder {
  name: String,
}

impl Default for SingleThreadBuilder {
  fn default() -> Self { SingleThreadBuilder { name: "rx-single".to_string() } }
}

impl SingleThreadBuilder {
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn create(self) -> io::Result<SingleThread> {
    let (sender, receiver) = channel::unbounded::<Task>();
    thread::Builder::new()
      .name(self.name)
      .spawn(move || receiver.iter().for_each(run_task))?;
    Ok(SingleThread { sender })
  }
}

impl SingleThread {
  pub fn new() -> io::Result<Self> { Self::builder().create() }

  pub fn builder() -> SingleThreadBuilder { SingleThreadBuilder::default() }
}

impl Scheduler for SingleThread {
  fn schedule(&self, task: Task) {
    if self.sender.send(task).is_err() {
      tracing::error!("single worker is gone, task dropped");
    }
  }
}
