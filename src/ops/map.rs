use std::sync::Arc;

use crate::{
  error::{catch_panic, RxError},
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
};

impl<Item: 'static> Observable<Item> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  ///
  /// Errors and completion pass through unchanged. If the closure panics, the
  /// panic is delivered downstream as [`RxError::Panicked`] and the stream
  /// ends there.
  pub fn map<B, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item) -> B + Send + Sync + 'static,
  {
    let func = Arc::new(f);
    Observable::create(move |observer| {
      self.subscribe_with(MapObserver { observer, func: func.clone() });
    })
  }

  /// Like [`map`](Observable::map), with a fallible closure: an `Err` is
  /// delivered as the stream's error.
  pub fn try_map<B, E, F>(self, f: F) -> Observable<B>
  where
    B: 'static,
    E: Into<RxError>,
    F: Fn(Item) -> Result<B, E> + Send + Sync + 'static,
  {
    let func = Arc::new(f);
    Observable::create(move |observer| {
      self.subscribe_with(TryMapObserver { observer, func: func.clone() });
    })
  }
}

pub struct MapObserver<B, F> {
  observer: Subscriber<B>,
  func: Arc<F>,
}

impl<Item, B, F> Observer<Item> for MapObserver<B, F>
where
  F: Fn(Item) -> B + Send + Sync,
{
  fn next(&self, value: Item) {
    match catch_panic("map", || (self.func)(value)) {
      Ok(v) => self.observer.next(v),
      Err(err) => {
        tracing::warn!(error = %err, "map function failed");
        self.observer.error(err);
      }
    }
  }

  #[inline]
  fn error(&self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct TryMapObserver<B, F> {
  observer: Subscriber<B>,
  func: Arc<F>,
}

impl<Item, B, E, F> Observer<Item> for TryMapObserver<B, F>
where
  E: Into<RxError>,
  F: Fn(Item) -> Result<B, E> + Send + Sync,
{
  fn next(&self, value: Item) {
    match catch_panic("map", || (self.func)(value)) {
      Ok(Ok(v)) => self.observer.next(v),
      Ok(Err(err)) => self.observer.error(err.into()),
      Err(err) => {
        tracing::warn!(error = %err, "map function failed");
        self.observer.error(err);
      }
    }
  }

  #[inline]
  fn error(&self, err: RxError) { self.observer.error(err) }

  #[inline]
  fn complete(&self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
