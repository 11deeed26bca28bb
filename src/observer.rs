//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::sync::Arc;

use crate::error::RxError;

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Deliveries may arrive from any worker thread, so observers
/// are `Send + Sync` and take `&self`; an observer shared by several sources
/// (see `merge` and `flat_map`) owns whatever synchronisation it needs.
///
/// After `error` or `complete` no further call is made for the same
/// subscription. The [`Subscriber`](crate::subscriber::Subscriber) guard
/// enforces this, so implementations need not.
pub trait Observer<Item>: Send + Sync {
  /// Receive the next value from the observable
  fn next(&self, value: Item);

  /// Handle an error from the observable
  fn error(&self, err: RxError);

  /// Handle completion of the observable
  fn complete(&self);

  /// Checks if the observer is closed.
  ///
  /// Sources (like `from_iter`) use this to stop emitting early once nobody
  /// downstream is listening anymore.
  fn is_closed(&self) -> bool { false }
}

impl<Item, O> Observer<Item> for Arc<O>
where
  O: Observer<Item> + ?Sized,
{
  #[inline]
  fn next(&self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&self, err: RxError) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl<Item, O> Observer<Item> for Box<O>
where
  O: Observer<Item> + ?Sized,
{
  #[inline]
  fn next(&self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&self, err: RxError) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Observer built from three closures, used by `subscribe_all`.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { ObserverAll { next, error, complete } }
}

impl<Item, N, E, C> Observer<Item> for ObserverAll<N, E, C>
where
  N: Fn(Item) + Send + Sync,
  E: Fn(RxError) + Send + Sync,
  C: Fn() + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(&self, err: RxError) { (self.error)(err) }

  #[inline]
  fn complete(&self) { (self.complete)() }
}

/// Error handler used when the caller did not supply one.
///
/// The error is not silently swallowed: it is reported through `tracing` and
/// then dropped.
pub fn trace_unhandled_error(err: RxError) {
  tracing::error!(error = %err, "unhandled error in subscription");
}
