use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
  fmt::{Debug, Formatter},
  hash::{Hash, Hasher},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

/// Subscription returns from `Observable::subscribe` to allow unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering an stream before it has finished receiving all
  /// events (i.e. before `complete` is called).
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

/// A single cancellation flag.
///
/// Clones share the same flag, so any clone can cancel and every clone
/// observes it. Equality and hashing are by identity of the shared flag.
///
/// Unsubscribing only gates delivery: work already running upstream is not
/// interrupted, it just stops reaching the observer.
#[derive(Clone, Default)]
pub struct Subscription(Arc<AtomicBool>);

impl Subscription {
  pub fn new() -> Self { Self::default() }

  /// Closes the flag, returning `true` only for the call that flipped it.
  pub(crate) fn close(&self) -> bool { !self.0.swap(true, Ordering::AcqRel) }

  #[inline]
  pub fn is_same(&self, other: &Subscription) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn unsubscribe(&self) { self.0.store(true, Ordering::Release); }

  #[inline]
  fn is_closed(&self) -> bool { self.0.load(Ordering::Acquire) }
}

impl PartialEq for Subscription {
  fn eq(&self, other: &Self) -> bool { self.is_same(other) }
}

impl Eq for Subscription {}

impl Hash for Subscription {
  fn hash<H: Hasher>(&self, state: &mut H) { Arc::as_ptr(&self.0).hash(state) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// A group of subscriptions cancelled as a unit.
///
/// Membership is by identity; adding the same subscription twice keeps one
/// entry. `unsubscribe` cancels every member present when it starts and
/// leaves the group empty, after which the group can be reused.
#[derive(Clone, Default)]
pub struct CompositeSubscription(Arc<Mutex<SmallVec<[Subscription; 2]>>>);

impl CompositeSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, subscription: Subscription) {
    let mut members = self.0.lock();
    if !members.iter().any(|s| s.is_same(&subscription)) {
      members.push(subscription);
    }
  }

  /// Removes `subscription` from the group without cancelling it.
  pub fn remove(&self, subscription: &Subscription) {
    self.0.lock().retain(|s| !s.is_same(subscription));
  }

  pub fn len(&self) -> usize { self.0.lock().len() }

  pub fn is_empty(&self) -> bool { self.0.lock().is_empty() }
}

impl SubscriptionLike for CompositeSubscription {
  fn unsubscribe(&self) {
    // cancel outside the lock, members may be shared with other groups
    let members = std::mem::take(&mut *self.0.lock());
    for s in members {
      s.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().iter().all(SubscriptionLike::is_closed) }
}

impl Debug for CompositeSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompositeSubscription")
      .field("is_closed", &self.is_closed())
      .field("teardown_count", &self.len())
      .finish()
  }
}
