use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use crossbeam::queue::SegQueue;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::{CompositeSubscription, Subscription, SubscriptionLike},
};

/// Combines several observables into one by merging their emissions.
///
/// Every source is subscribed when the merged observable is. Values are
/// forwarded as soon as any source emits them. The merged stream terminates
/// once every source has terminated: with an error if any source failed,
/// otherwise with `complete`. With no sources it completes immediately.
///
/// # Example
///
/// ```
/// # use rxlite::prelude::*;
/// let even = observable::from_iter(vec![0, 2, 4]);
/// let odd = observable::from_iter(vec![1, 3]);
///
/// ops::merge([even, odd]).subscribe(|v| println!("{v}"));
/// ```
pub fn merge<Item: 'static>(sources: impl IntoIterator<Item = Observable<Item>>) -> Observable<Item> {
  let sources: Vec<_> = sources.into_iter().collect();
  Observable::create(move |observer| {
    if sources.is_empty() {
      observer.complete();
      return;
    }
    let state = MergeState::new(observer, sources.len());
    sources.iter().for_each(|source| state.subscribe_child(source));
  })
}

impl<Item: 'static> Observable<Item> {
  /// Merges `self` with `other`, see [`merge`].
  pub fn merge(self, other: Observable<Item>) -> Observable<Item> { merge([self, other]) }
}

/// Shared bookkeeping for operators that forward several concurrent sources
/// into one downstream.
///
/// `active` counts sources that have not terminated yet. Every source
/// releases exactly once, with `complete` or `error`; errors are queued
/// rather than delivered. The release that brings the count to zero finishes
/// the downstream, no matter which thread performs it.
pub(crate) struct MergeState<Item> {
  active: AtomicUsize,
  errors: SegQueue<RxError>,
  children: CompositeSubscription,
  observer: Subscriber<Item>,
}

impl<Item: 'static> MergeState<Item> {
  pub(crate) fn new(observer: Subscriber<Item>, active: usize) -> Arc<Self> {
    Arc::new(MergeState {
      active: AtomicUsize::new(active),
      errors: SegQueue::new(),
      children: CompositeSubscription::new(),
      observer,
    })
  }

  /// Accounts for one more source. Must be called before that source is
  /// subscribed.
  pub(crate) fn register(&self) { self.active.fetch_add(1, Ordering::AcqRel); }

  /// Subscribes a source already accounted for in `active`.
  pub(crate) fn subscribe_child(self: &Arc<Self>, source: &Observable<Item>) {
    let subscription = source.subscribe_with(MergeObserver { state: self.clone() });
    self.children.add(subscription);
  }

  pub(crate) fn add_child(&self, subscription: Subscription) {
    self.children.add(subscription);
  }

  #[inline]
  pub(crate) fn next(&self, value: Item) { self.observer.next(value) }

  pub(crate) fn error(&self, err: RxError) {
    self.errors.push(err);
    self.release();
  }

  #[inline]
  pub(crate) fn complete(&self) { self.release() }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.observer.is_closed() }

  fn release(&self) {
    if self.active.fetch_sub(1, Ordering::AcqRel) == 1 {
      self.finish();
    }
  }

  fn finish(&self) {
    match self.errors.pop() {
      Some(err) => self.observer.error(err),
      None => self.observer.complete(),
    }
    while let Some(dropped) = self.errors.pop() {
      tracing::debug!(error = %dropped, "dropping error, merged stream already failed");
    }
    self.children.unsubscribe();
  }
}

/// Observer subscribed to each merged source.
pub(crate) struct MergeObserver<Item> {
  state: Arc<MergeState<Item>>,
}

impl<Item: 'static> Observer<Item> for MergeObserver<Item> {
  #[inline]
  fn next(&self, value: Item) { self.state.next(value) }

  #[inline]
  fn error(&self, err: RxError) { self.state.error(err) }

  #[inline]
  fn complete(&self) { self.state.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.state.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::benchmark_group;
  use std::{
    collections::HashSet,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc, Mutex,
    },
    time::Duration,
  };

  #[test]
  fn odd_even_merge() {
    let numbers = observable::from_iter(0..10);
    let even = numbers.clone().filter(|v| *v % 2 == 0);
    let odd = numbers.filter(|v| *v % 2 != 0);

    let merged = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(AtomicUsize::new(0));
    let (c_merged, c_completed) = (merged.clone(), completed.clone());
    even.merge(odd).subscribe_all(
      move |v| c_merged.lock().unwrap().push(v),
      |e| panic!("{e}"),
      move || {
        c_completed.fetch_add(1, Ordering::Relaxed);
      },
    );

    let mut merged = merged.lock().unwrap().clone();
    merged.sort();
    assert_eq!(merged, (0..10).collect::<Vec<_>>());
    assert_eq!(completed.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn merge_keeps_every_value() {
    let a = crate::of_sequence!("A1", "A2");
    let b = observable::of("B1");
    let values = Arc::new(Mutex::new(HashSet::new()));
    let terminals = Arc::new(AtomicUsize::new(0));
    let (c_values, c_err, c_complete) = (values.clone(), terminals.clone(), terminals.clone());

    ops::merge([a, b]).subscribe_all(
      move |v| {
        c_values.lock().unwrap().insert(v);
      },
      move |_| {
        c_err.fetch_add(1, Ordering::Relaxed);
      },
      move || {
        c_complete.fetch_add(1, Ordering::Relaxed);
      },
    );

    assert_eq!(*values.lock().unwrap(), HashSet::from(["A1", "A2", "B1"]));
    assert_eq!(terminals.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn no_sources_completes_immediately() {
    let completed = Arc::new(AtomicUsize::new(0));
    let c_completed = completed.clone();
    ops::merge(Vec::<Observable<i32>>::new()).subscribe_all(
      |_| panic!("no values expected"),
      |e| panic!("{e}"),
      move || {
        c_completed.fetch_add(1, Ordering::Relaxed);
      },
    );
    assert_eq!(completed.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn error_waits_for_siblings() {
    let log = Arc::new(Mutex::new(vec![]));
    let (c_next, c_err) = (log.clone(), log.clone());

    observable::throw_err::<i32>(RxError::msg("boom"))
      .merge(observable::from_iter(vec![1, 2]))
      .subscribe_all(
        move |v| c_next.lock().unwrap().push(v.to_string()),
        move |e| c_err.lock().unwrap().push(e.to_string()),
        || panic!("must not complete"),
      );

    assert_eq!(*log.lock().unwrap(), vec!["1", "2", "boom"]);
  }

  #[test]
  fn concurrent_errors_deliver_one() {
    let (tx, rx) = crossbeam::channel::unbounded();
    let sources: Vec<_> = (0..8)
      .map(|i| {
        observable::throw_err::<i32>(RxError::msg(format!("source {i}")))
          .subscribe_on(scheduler::io())
      })
      .collect();

    let c_tx = tx.clone();
    ops::merge(sources).subscribe_all(
      |_| {},
      move |e| c_tx.send(format!("error {e}")).unwrap(),
      move || tx.send("complete".to_string()).unwrap(),
    );

    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(first.starts_with("error source "));
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_merge);

  fn bench_merge(b: &mut bencher::Bencher) { b.iter(merge_keeps_every_value); }
}
