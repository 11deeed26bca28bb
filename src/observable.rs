//! The `Observable` value type and its creation functions.
//!
//! An `Observable` is cold: it is only a recipe, and nothing runs until
//! `subscribe` is called. Each subscription runs the recipe from scratch.

use std::sync::Arc;

use crate::{
  error::{catch_panic, RxError},
  observer::{trace_unhandled_error, Observer, ObserverAll},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod from_iter;
mod of;
mod trivial;
pub use from_iter::*;
pub use of::*;
pub use trivial::*;

type Recipe<Item> = dyn Fn(Subscriber<Item>) + Send + Sync;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block of the crate.
///
/// Cloning is cheap and yields a behaviorally identical recipe; two
/// observables built the same way behave the same but share nothing.
pub struct Observable<Item> {
  recipe: Arc<Recipe<Item>>,
}

impl<Item> Clone for Observable<Item> {
  fn clone(&self) -> Self { Observable { recipe: self.recipe.clone() } }
}

/// Creates an observable from a recipe, see [`Observable::create`].
pub fn create<Item, F>(recipe: F) -> Observable<Item>
where
  Item: 'static,
  F: Fn(Subscriber<Item>) + Send + Sync + 'static,
{
  Observable::create(recipe)
}

impl<Item: 'static> Observable<Item> {
  /// param `recipe`: the function that is called each time the Observable is
  /// subscribed to. This function is given a Subscriber, to which new values
  /// can be `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion.
  ///
  /// A panic raised by the recipe itself is caught and delivered to the
  /// observer as [`RxError::Panicked`].
  pub fn create<F>(recipe: F) -> Self
  where
    F: Fn(Subscriber<Item>) + Send + Sync + 'static,
  {
    Observable { recipe: Arc::new(recipe) }
  }

  /// Subscribes `observer`, returning the subscription that gates delivery to
  /// it.
  ///
  /// Unsubscribing stops delivery but does not interrupt the recipe: work
  /// already in flight upstream still runs, its output is dropped.
  pub fn subscribe_with<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    self.actual_subscribe(Arc::new(observer))
  }

  pub(crate) fn actual_subscribe(&self, observer: Arc<dyn Observer<Item>>) -> Subscription {
    let subscriber = Subscriber::new(observer);
    let subscription = subscriber.subscription().clone();
    tracing::trace!("new subscription");

    let guard = subscriber.clone();
    if let Err(err) = catch_panic("subscribe", || (self.recipe)(subscriber)) {
      tracing::warn!(error = %err, "subscription recipe failed");
      guard.force_error(err);
    }
    subscription
  }

  /// Subscribes with a `next` handler; errors are traced and dropped,
  /// completion is ignored.
  pub fn subscribe<N>(&self, next: N) -> Subscription
  where
    N: Fn(Item) + Send + Sync + 'static,
  {
    self.subscribe_all(next, trace_unhandled_error, || {})
  }

  pub fn subscribe_err<N, E>(&self, next: N, error: E) -> Subscription
  where
    N: Fn(Item) + Send + Sync + 'static,
    E: Fn(RxError) + Send + Sync + 'static,
  {
    self.subscribe_all(next, error, || {})
  }

  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
  where
    N: Fn(Item) + Send + Sync + 'static,
    E: Fn(RxError) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }
}
