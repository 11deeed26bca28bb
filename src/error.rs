//! The error type carried by every `error` notification.
//!
//! Failures reach an observer in two ways:
//!
//! - a panic raised while a subscription recipe runs, or inside a user
//!   callback handed to an operator (`map`, `filter`, `flat_map`, `reduce`),
//!   which is caught at the boundary and turned into [`RxError::Panicked`];
//! - an error reported by a source through `Observer::error`, usually wrapped
//!   with [`RxError::source`] or [`RxError::msg`].
use std::{
  any::Any,
  error::Error,
  panic::{self, AssertUnwindSafe},
  sync::Arc,
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum RxError {
  /// A panic was caught while running user code.
  #[error("panicked in `{context}`: {message}")]
  Panicked { context: &'static str, message: String },

  /// An error reported by a source.
  #[error("{0}")]
  Source(Arc<dyn Error + Send + Sync + 'static>),

  /// An ad-hoc error message.
  #[error("{0}")]
  Message(String),
}

impl RxError {
  pub fn msg(message: impl Into<String>) -> Self { RxError::Message(message.into()) }

  pub fn source<E>(err: E) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    RxError::Source(Arc::new(err))
  }

  pub fn is_panic(&self) -> bool { matches!(self, RxError::Panicked { .. }) }

  pub(crate) fn panicked(context: &'static str, payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
      (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "non-string panic payload".to_string()
    };
    RxError::Panicked { context, message }
  }
}

impl From<Box<dyn Error + Send + Sync + 'static>> for RxError {
  fn from(err: Box<dyn Error + Send + Sync + 'static>) -> Self { RxError::Source(Arc::from(err)) }
}

impl From<String> for RxError {
  fn from(message: String) -> Self { RxError::Message(message) }
}

impl From<&str> for RxError {
  fn from(message: &str) -> Self { RxError::Message(message.to_string()) }
}

/// Runs `f`, turning a panic into [`RxError::Panicked`] tagged with `context`.
pub(crate) fn catch_panic<R>(context: &'static str, f: impl FnOnce() -> R) -> Result<R, RxError> {
  panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| RxError::panicked(context, payload))
}
