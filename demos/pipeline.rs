//! Example: a small pipeline hopping across schedulers
//!
//! The source is subscribed on the io pool, values are delivered on the
//! single worker, and the remaining sections show the combining operators.
//! Events are printed through `tracing-subscriber`.

use std::time::Duration;

use rxlite::{of_sequence, prelude::*};

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  let source = of_sequence!(1, 2, 3, 4, 5);

  tracing::info!("map and filter across schedulers");
  let (done_tx, done_rx) = crossbeam::channel::bounded(1);
  source
    .clone()
    .map(|i| i * 10)
    .filter(|i| *i >= 30)
    .subscribe_on(scheduler::io())
    .observe_on(scheduler::single())
    .subscribe_all(
      |i| {
        let worker = std::thread::current();
        tracing::info!(value = i, thread = ?worker.name(), "received");
      },
      |err| tracing::error!(error = %err, "subscription failed"),
      move || {
        tracing::info!("completed");
        let _ = done_tx.send(());
      },
    );
  if done_rx.recv_timeout(Duration::from_secs(5)).is_err() {
    tracing::warn!("pipeline did not complete in time");
  }

  tracing::info!("flat_map");
  source
    .clone()
    .flat_map(|i| of_sequence!(i, i * i))
    .subscribe(|i| tracing::info!(value = i, "flat_map"));

  tracing::info!("merge");
  of_sequence!("A", "B")
    .merge(of_sequence!("1", "2"))
    .subscribe(|s| tracing::info!(value = s, "merge"));

  tracing::info!("concat");
  ops::concat(of_sequence!("X", "Y"), observable::of("Z"))
    .subscribe(|s| tracing::info!(value = s, "concat"));

  tracing::info!("reduce");
  source.clone().reduce(|acc, i| acc + i).subscribe(|sum| tracing::info!(sum, "reduce"));

  tracing::info!("a failing stage");
  source
    .map(|i| if i == 4 { panic!("four is unlucky") } else { i })
    .subscribe_err(
      |i| tracing::info!(value = i, "before the failure"),
      |err| tracing::warn!(error = %err, panicked = err.is_panic(), "stream failed"),
    );
}
