use std::sync::Arc;

use crate::{observable::Observable, scheduler::Scheduler};

impl<Item: 'static> Observable<Item> {
  /// Runs the source's subscription on `scheduler` instead of the calling
  /// thread.
  ///
  /// The returned subscription silences delivery once cancelled; it does not
  /// withdraw the task already submitted.
  pub fn subscribe_on<SD>(self, scheduler: SD) -> Observable<Item>
  where
    SD: Scheduler + 'static,
  {
    let scheduler = Arc::new(scheduler);
    Observable::create(move |observer| {
      let source = self.clone();
      scheduler.schedule(Box::new(move || {
        source.subscribe_with(observer);
      }));
    })
  }
}
