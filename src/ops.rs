//! Operators.
//!
//! Each operator is an inherent method on
//! [`Observable`](crate::observable::Observable) that returns a new, equally
//! cold observable. `concat` and `merge` are also available as free
//! functions.

pub mod concat;
pub mod filter;
pub mod flatten;
pub mod map;
pub mod merge;
pub mod observe_on;
pub mod reduce;
pub mod subscribe_on;

pub use concat::concat;
pub use merge::merge;
