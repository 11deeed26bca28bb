use std::sync::Arc;

use crate::{
  error::RxError,
  observer::Observer,
  subscription::{Subscription, SubscriptionLike},
};

/// The guard every subscription delivers through.
///
/// While the Observer is the public API for consuming the values of an
/// Observable, every observer handed to `subscribe` is wrapped in a
/// Subscriber, which owns the subscription returned to the caller:
///
/// - once the subscription is closed, every call is swallowed;
/// - `error` and `complete` close it first, so at most one terminal
///   notification is delivered and nothing follows it.
///
/// Recipes passed to `Observable::create` receive a `Subscriber` and may
/// clone it freely, for example to emit from another thread.
pub struct Subscriber<Item> {
  observer: Arc<dyn Observer<Item>>,
  subscription: Subscription,
  stopped: Subscription,
}

impl<Item> Clone for Subscriber<Item> {
  fn clone(&self) -> Self {
    Subscriber {
      observer: self.observer.clone(),
      subscription: self.subscription.clone(),
      stopped: self.stopped.clone(),
    }
  }
}

impl<Item> Subscriber<Item> {
  pub(crate) fn new(observer: Arc<dyn Observer<Item>>) -> Self {
    Subscriber { observer, subscription: Subscription::new(), stopped: Subscription::new() }
  }

  /// The subscription this guard delivers under.
  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// Delivers `err` even if the subscription was already cancelled, as long
  /// as no terminal notification went out before.
  pub(crate) fn force_error(&self, err: RxError) {
    if self.stopped.close() {
      self.subscription.unsubscribe();
      self.observer.error(err);
    }
  }

  #[inline]
  fn is_stopped(&self) -> bool { self.subscription.is_closed() || self.stopped.is_closed() }
}

impl<Item> Observer<Item> for Subscriber<Item> {
  fn next(&self, value: Item) {
    if !self.is_stopped() {
      self.observer.next(value);
    }
  }

  fn error(&self, err: RxError) {
    if !self.subscription.is_closed() && self.stopped.close() {
      self.subscription.unsubscribe();
      self.observer.error(err);
    }
  }

  fn complete(&self) {
    if !self.subscription.is_closed() && self.stopped.close() {
      self.subscription.unsubscribe();
      self.observer.complete();
    }
  }

  /// Closed when this subscription was cancelled or terminated, or when the
  /// downstream observer reports itself closed.
  fn is_closed(&self) -> bool { self.is_stopped() || self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::observer::ObserverAll;
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  fn subscriber_creator() -> (
    Arc<AtomicUsize>,
    Arc<AtomicUsize>,
    Arc<AtomicUsize>,
    Subscriber<i32>,
  ) {
    let next = Arc::new(AtomicUsize::new(0));
    let err = Arc::new(AtomicUsize::new(0));
    let complete = Arc::new(AtomicUsize::new(0));
    let (c_next, c_err, c_complete) = (next.clone(), err.clone(), complete.clone());

    (
      next,
      err,
      complete,
      Subscriber::new(Arc::new(ObserverAll::new(
        move |_: i32| {
          c_next.fetch_add(1, Ordering::Relaxed);
        },
        move |_: RxError| {
          c_err.fetch_add(1, Ordering::Relaxed);
        },
        move || {
          c_complete.fetch_add(1, Ordering::Relaxed);
        },
      ))),
    )
  }

  #[test]
  fn next_and_complete() {
    let (next, _, complete, subscriber) = subscriber_creator();

    subscriber.next(1);
    subscriber.next(2);
    subscriber.complete();
    subscriber.next(3);
    subscriber.complete();
    assert_eq!(next.load(Ordering::Relaxed), 2);
    assert_eq!(complete.load(Ordering::Relaxed), 1);
    assert!(subscriber.subscription().is_closed());
  }

  #[test]
  fn next_and_error() {
    let (next, error, complete, subscriber) = subscriber_creator();

    subscriber.next(1);
    subscriber.next(2);
    subscriber.error(RxError::msg("e"));
    subscriber.next(3);
    subscriber.complete();

    assert_eq!(next.load(Ordering::Relaxed), 2);
    assert_eq!(error.load(Ordering::Relaxed), 1);
    assert_eq!(complete.load(Ordering::Relaxed), 0);
  }

  #[test]
  fn unsubscribed_swallows_everything() {
    let (next, error, complete, subscriber) = subscriber_creator();
    subscriber.subscription().unsubscribe();

    subscriber.next(1);
    subscriber.error(RxError::msg("e"));
    subscriber.complete();
    assert_eq!(next.load(Ordering::Relaxed), 0);
    assert_eq!(error.load(Ordering::Relaxed), 0);
    assert_eq!(complete.load(Ordering::Relaxed), 0);
    assert!(subscriber.is_closed());
  }

  #[test]
  fn force_error_ignores_cancellation_but_not_termination() {
    let (_, error, _, subscriber) = subscriber_creator();
    subscriber.subscription().unsubscribe();
    subscriber.force_error(RxError::msg("late"));
    assert_eq!(error.load(Ordering::Relaxed), 1);

    let (_, error, _, subscriber) = subscriber_creator();
    subscriber.complete();
    subscriber.force_error(RxError::msg("late"));
    assert_eq!(error.load(Ordering::Relaxed), 0);
  }
}
