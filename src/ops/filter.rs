use std::sync::Arc;

use crate::{
  error::{catch_panic, RxError},
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
};

impl<Item: 'static> Observable<Item> {
  /// Emit only those items from an Observable that pass a predicate test
  ///
  /// # Example
  ///
  /// ```
  /// use rxlite::prelude::*;
  /// use std::sync::{Arc, Mutex};
  ///
  /// let coll = Arc::new(Mutex::new(vec![]));
  /// let coll_clone = coll.clone();
  ///
  /// observable::from_iter(0..10)
  ///   .filter(|v| *v % 2 == 0)
  ///   .subscribe(move |v| coll_clone.lock().unwrap().push(v));
  ///
  /// // only even numbers received.
  /// assert_eq!(*coll.lock().unwrap(), vec![0, 2, 4, 6, 8]);
  /// ```
  pub fn filter<F>(self, predicate: F) -> Observable<Item>
  where
    F: Fn(&Item) -> bool + Send + Sync + 'static,
  {
    let predicate = Arc::new(predicate);
    Observable::create(move |observer| {
      self.subscribe_with(FilterObserver { observer, predicate: predicate.clone() });
    })
  }

  /// Like [`filter`](Observable::filter), with a fallible predicate: an `Err`
  /// is delivered as the stream's error.
  pub fn try_filter<E, F>(self, predicate: F) -> Observable<Item>
  where
    E: Into<RxError>,
    F: Fn(&Item) -> Result<bool, E> + Send + Sync + 'static,
  {
    let predicate = Arc::new(predicate);
    Observable::create(move |observer| {
      self.subscribe_with(TryFilterObserver { observer, predicate: predicate.clone() });
    })
  }
}

pub struct FilterObserver<Item, F> {
  observer: Subscriber<Item>,
  predicate: Arc<F>,
}

impl<Item, F> Observer<Item> for FilterObserver<Item, F>
where
  F: Fn(&Item) -> bool + Send + Sync,
{
  fn next(&self, value: Item) {
    match catch_panic("filter", || (self.predicate)(&value)) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
      Err(err) => {
        tracing::warn!(error = %err, "filter predicate failed");
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

pub struct TryFilterObserver<Item, F> {
  observer: Subscriber<Item>,
  predicate: Arc<F>,
}

impl<Item, E, F> Observer<Item> for TryFilterObserver<Item, F>
where
  E: Into<RxError>,
  F: Fn(&Item) -> Result<bool, E> + Send + Sync,
{
  fn next(&self, value: Item) {
    match catch_panic("filter", || (self.predicate)(&value)) {
      Ok(Ok(true)) => self.observer.next(value),
      Ok(Ok(false)) => {}
      Ok(Err(err)) => self.observer.error(err.into()),
      Err(err) => {
        tracing::warn!(error = %err, "filter predicate failed");
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
