use std::{marker::PhantomData, sync::Arc};

use crate::{
  error::{catch_panic, RxError},
  observable::Observable,
  observer::Observer,
};

use super::merge::MergeState;

impl<Item: 'static> Observable<Item> {
  /// Maps every item to an inner observable and merges the inner emissions.
  ///
  /// Inner observables run concurrently; their values are forwarded as they
  /// arrive. The result terminates once the outer stream and every inner one
  /// have terminated, with an error if any of them failed. A panic in
  /// `mapper` counts as an inner stream that failed.
  pub fn flat_map<B, F>(self, mapper: F) -> Observable<B>
  where
    B: 'static,
    F: Fn(Item) -> Observable<B> + Send + Sync + 'static,
  {
    let mapper = Arc::new(mapper);
    Observable::create(move |observer| {
      // the outer stream is the first active source
      let state = MergeState::new(observer, 1);
      let outer = self.subscribe_with(FlatMapObserver {
        state: state.clone(),
        mapper: mapper.clone(),
        _item: PhantomData,
      });
      state.add_child(outer);
    })
  }
}

impl<Item: 'static> Observable<Observable<Item>> {
  /// Flattens an observable of observables by merging the inner ones.
  pub fn merge_all(self) -> Observable<Item> { self.flat_map(|inner| inner) }
}

struct FlatMapObserver<Item, B, F> {
  state: Arc<MergeState<B>>,
  mapper: Arc<F>,
  _item: PhantomData<fn(Item)>,
}

impl<Item, B, F> Observer<Item> for FlatMapObserver<Item, B, F>
where
  B: 'static,
  F: Fn(Item) -> Observable<B> + Send + Sync,
{
  fn next(&self, value: Item) {
    self.state.register();
    match catch_panic("flat_map", || (self.mapper)(value)) {
      Ok(inner) => self.state.subscribe_child(&inner),
      Err(err) => {
        tracing::warn!(error = %err, "flat_map mapper failed");
        self.state.error(err);
      }
    }
  }

  #[inline]
  fn error(&self, err: RxError) { self.state.error(err) }

  #[inline]
  fn complete(&self) { self.state.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.state.is_closed() }
}
