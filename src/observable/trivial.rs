use crate::{error::RxError, observable::Observable, observer::Observer};

/// Creates an observable that emits no items, just terminates with an error.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
pub fn throw_err<Item: 'static>(e: RxError) -> Observable<Item> {
  Observable::create(move |subscriber| subscriber.error(e.clone()))
}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
///
/// # Examples
/// ```
/// use rxlite::prelude::*;
///
/// observable::empty()
///   .subscribe(|v: i32| {println!("{},", v)});
///
/// // Result: no thing printed
/// ```
pub fn empty<Item: 'static>() -> Observable<Item> {
  Observable::create(|subscriber| subscriber.complete())
}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error.
pub fn never<Item: 'static>() -> Observable<Item> { Observable::create(|_| {}) }
