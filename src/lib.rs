//! # rxlite: push-based reactive streams
//!
//! Cold, re-subscribable observables with a small set of composition
//! operators and schedulers that move subscription and delivery onto worker
//! threads.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold recipe of values, errors and completion |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Runs a unit of work somewhere else |
//!
//! Every subscription delivers at most one terminal notification (`error` or
//! `complete`), and nothing after it. Panics raised by a recipe or by a
//! function handed to an operator are caught and delivered as
//! [`RxError::Panicked`].
//!
//! ## Logging
//!
//! The crate reports through [`tracing`](https://docs.rs/tracing) and never
//! installs a subscriber itself.
//!
//! ## Feature Flags
//!
//! - **`tokio-scheduler`**: implements [`Scheduler`] for `tokio::runtime::Handle`
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`RxError::Panicked`]: error::RxError::Panicked

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subscriber;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;
