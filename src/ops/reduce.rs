//! Reduce operator implementation
//!
//! This module contains the `reduce` operators, which apply an accumulator
//! function over the source Observable and emit the final accumulated value
//! when the source completes.

use std::{mem, sync::Arc};

use crossbeam::queue::SegQueue;
use parking_lot::Mutex;

use crate::{
  error::{catch_panic, RxError},
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
};

/// Defines the strategy for executing the reduction logic (seeded vs.
/// unseeded).
pub trait ReduceStrategy<Acc, Item> {
  /// Applies the reduction logic.
  ///
  /// `acc` is `None` only before the first element of an unseeded reduction.
  fn apply(&self, acc: Option<Acc>, value: Item) -> Option<Acc>;
}

/// Strategy for `reduce` (unseeded).
///
/// Uses the first emitted value as the initial accumulator.
#[derive(Clone)]
pub struct ReduceFn<F>(pub F);

impl<F, Item> ReduceStrategy<Item, Item> for ReduceFn<F>
where
  F: Fn(Item, Item) -> Item,
{
  fn apply(&self, acc: Option<Item>, value: Item) -> Option<Item> {
    match acc {
      Some(acc) => Some((self.0)(acc, value)),
      None => Some(value),
    }
  }
}

/// Strategy for `reduce_initial` (seeded).
#[derive(Clone)]
pub struct ReduceInitialFn<F>(pub F);

impl<F, Acc, Item> ReduceStrategy<Acc, Item> for ReduceInitialFn<F>
where
  F: Fn(Acc, Item) -> Acc,
{
  fn apply(&self, acc: Option<Acc>, value: Item) -> Option<Acc> {
    // always seeded
    acc.map(|a| (self.0)(a, value))
  }
}

impl<Item: Send + 'static> Observable<Item> {
  /// Folds every item with `f`, starting from the first item, and emits the
  /// result when the source completes.
  ///
  /// An empty source emits nothing and just completes. Errors are forwarded
  /// immediately, dropping the partial result.
  ///
  /// # Example
  ///
  /// ```
  /// # use rxlite::prelude::*;
  /// observable::from_iter(vec![2, 3, 5])
  ///   .reduce(|acc, v| acc + v)
  ///   .subscribe(|sum| assert_eq!(sum, 10));
  /// ```
  pub fn reduce<F>(self, f: F) -> Observable<Item>
  where
    F: Fn(Item, Item) -> Item + Send + Sync + 'static,
  {
    self.reduce_with(|| None, ReduceFn(f))
  }

  /// Folds every item into `seed` with `f`. An empty source emits `seed`.
  pub fn reduce_initial<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc>
  where
    Acc: Clone + Send + Sync + 'static,
    F: Fn(Acc, Item) -> Acc + Send + Sync + 'static,
  {
    self.reduce_with(move || Some(seed.clone()), ReduceInitialFn(f))
  }

  fn reduce_with<Acc, I, S>(self, initial: I, strategy: S) -> Observable<Acc>
  where
    Acc: Send + 'static,
    I: Fn() -> Option<Acc> + Send + Sync + 'static,
    S: ReduceStrategy<Acc, Item> + Send + Sync + 'static,
  {
    let strategy = Arc::new(strategy);
    Observable::create(move |observer| {
      self.subscribe_with(ReduceObserver {
        observer,
        strategy: strategy.clone(),
        slot: Mutex::new(AccSlot::Idle(initial())),
        pending: SegQueue::new(),
      });
    })
  }
}

enum AccSlot<Acc> {
  Idle(Option<Acc>),
  /// Some thread is running the accumulator.
  Busy,
}

/// Observer implementation for the Reduce operator.
///
/// The accumulator runs without the lock held. A value arriving while
/// another thread is folding is queued in `pending`, and the folding thread
/// drains the queue before it puts the accumulator back.
pub struct ReduceObserver<Item, Strategy, Acc> {
  observer: Subscriber<Acc>,
  strategy: Arc<Strategy>,
  slot: Mutex<AccSlot<Acc>>,
  pending: SegQueue<Item>,
}

impl<Item, Strategy, Acc> ReduceObserver<Item, Strategy, Acc>
where
  Strategy: ReduceStrategy<Acc, Item>,
{
  fn apply(&self, acc: Option<Acc>, value: Item) -> Result<Option<Acc>, RxError> {
    catch_panic("reduce", || self.strategy.apply(acc, value))
  }

  fn drain(&self, mut acc: Option<Acc>) -> Result<Option<Acc>, RxError> {
    while let Some(value) = self.pending.pop() {
      acc = self.apply(acc, value)?;
    }
    Ok(acc)
  }

  fn fold(&self, acc: Option<Acc>, value: Item) -> Result<(), RxError> {
    let mut acc = self.apply(acc, value)?;
    loop {
      acc = self.drain(acc)?;
      let mut slot = self.slot.lock();
      // pushes happen under the lock
      if self.pending.is_empty() {
        *slot = AccSlot::Idle(acc);
        return Ok(());
      }
    }
  }

  fn fail(&self, err: RxError) {
    tracing::warn!(error = %err, "reduce accumulator failed");
    self.observer.error(err);
  }
}

impl<Item, Strategy, Acc> Observer<Item> for ReduceObserver<Item, Strategy, Acc>
where
  Item: Send,
  Acc: Send,
  Strategy: ReduceStrategy<Acc, Item> + Send + Sync,
{
  fn next(&self, value: Item) {
    let acc = {
      let mut slot = self.slot.lock();
      match mem::replace(&mut *slot, AccSlot::Busy) {
        AccSlot::Idle(acc) => acc,
        AccSlot::Busy => {
          self.pending.push(value);
          return;
        }
      }
    };
    if let Err(err) = self.fold(acc, value) {
      self.fail(err);
    }
  }

  fn error(&self, err: RxError) { self.observer.error(err); }

  fn complete(&self) {
    let slot = mem::replace(&mut *self.slot.lock(), AccSlot::Busy);
    // after a failed accumulator the slot stays busy and the stream is over
    if let AccSlot::Idle(acc) = slot {
      match self.drain(acc) {
        Ok(Some(acc)) => self.observer.next(acc),
        Ok(None) => {}
        Err(err) => return self.fail(err),
      }
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
