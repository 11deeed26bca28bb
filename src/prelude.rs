//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core types
pub use crate::{
  error::RxError,
  observable::Observable,
  observer::{Observer, ObserverAll},
  subscriber::Subscriber,
};
// Creation functions live in `observable::*`, free-standing operators in `ops::*`
pub use crate::{observable, ops, scheduler};
// Scheduler types
pub use crate::scheduler::{
  CachedThreadPool, FixedThreadPool, Immediate, Scheduler, SingleThread, Task,
};
// Subscription
pub use crate::subscription::*;
