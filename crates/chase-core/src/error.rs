//! Framework error type.
//!
//! Sub-crates define their own error enums (`GraphError`, `MoveError`, …)
//! and wrap `CoreError` as one variant where they need it.

use thiserror::Error;

/// Errors raised by `chase-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot choose from an empty candidate set")]
    EmptyChoice,
}

/// Shorthand result type for `chase-core`.
pub type CoreResult<T> = Result<T, CoreError>;
