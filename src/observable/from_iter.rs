use crate::{observable::Observable, observer::Observer};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Emission stops early once the subscriber is closed.
///
/// # Arguments
///
/// * `iter` - An iterator to get all the values from. It is cloned for every
///   subscription, so each subscriber sees the full sequence.
///
/// # Examples
///
/// A simple example for a range:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(0..10)
///   .subscribe(|v| {println!("{},", v)});
/// ```
///
/// Or with a vector:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(vec![0,1,2,3])
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Observable<Iter::Item>
where
  Iter: IntoIterator + Clone + Send + Sync + 'static,
  Iter::Item: 'static,
{
  Observable::create(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  })
}
