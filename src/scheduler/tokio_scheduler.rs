use tokio::runtime::Handle;

use super::{run_task, Scheduler, Task};

/// Runs tasks on the tokio blocking pool of the runtime behind the handle.
impl Scheduler for Handle {
  fn schedule(&self, task: Task) {
    // fire and forget, the join handle is not needed
    drop(self.spawn_blocking(move || run_task(task)));
  }
}
