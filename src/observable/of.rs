use crate::{observable::Observable, observer::Observer};

/// Creates an observable producing multiple values.
///
/// Completes immediately after emitting the values given, in argument order.
/// Never emits an error.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
/// use rxlite::of_sequence;
///
/// of_sequence!(1, 2, 3)
///   .subscribe(|v| {println!("{},", v)});
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of_sequence {
  ( $( $item:expr ),* $(,)? ) => {
    $crate::observable::from_iter(::std::vec![$( $item ),*])
  };
}

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::of(123)
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn of<Item>(v: Item) -> Observable<Item>
where
  Item: Clone + Send + Sync + 'static,
{
  Observable::create(move |subscriber| {
    subscriber.next(v.clone());
    subscriber.complete();
  })
}

/// Creates an observable that emits value or the error from a [`Result`]
/// given.
///
/// Completes immediately after.
pub fn of_result<Item>(r: Result<Item, crate::error::RxError>) -> Observable<Item>
where
  Item: Clone + Send + Sync + 'static,
{
  Observable::create(move |subscriber| match r.clone() {
    Ok(v) => {
      subscriber.next(v);
      subscriber.complete();
    }
    Err(err) => subscriber.error(err),
  })
}
