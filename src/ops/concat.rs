use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
};

/// Emits every item of `first`, then, once `first` completes, every item of
/// `second`.
///
/// `second` is subscribed only after `first` completes and never when `first`
/// errors.
pub fn concat<Item: 'static>(first: Observable<Item>, second: Observable<Item>) -> Observable<Item> {
  Observable::create(move |observer| {
    first.subscribe_with(ConcatObserver { observer, second: second.clone() });
  })
}

impl<Item: 'static> Observable<Item> {
  /// See [`concat`].
  pub fn concat(self, second: Observable<Item>) -> Observable<Item> { concat(self, second) }
}

pub struct ConcatObserver<Item> {
  observer: Subscriber<Item>,
  second: Observable<Item>,
}

impl<Item: 'static> Observer<Item> for ConcatObserver<Item> {
  #[inline]
  fn next(&self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(&self, err: RxError) { self.observer.error(err) }

  fn complete(&self) { self.second.subscribe_with(self.observer.clone()); }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
