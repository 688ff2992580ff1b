//! Define error types for wrapper emission.
//!
//! These errors represent *emission* faults for one declaration (as opposed to manifest loading or schema
//! resolution). They are never shown raw: [`contain`](super::containment::contain) turns them into an
//! [`EmissionFailure`](super::containment::EmissionFailure).
//!
//! ## Notes
//!
//! - An [`EmitError`] captures a backtrace where it is raised, so the aggregated failure can point at the
//!   originating emission step. Capture honours `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.

use std::backtrace::Backtrace;
use std::fmt;

use thiserror::Error;

pub use crate::frontend::symbols::ResolutionError;

use super::schema::MarkerShapeError;

/// What went wrong while emitting one declaration.
#[derive(Debug, Error)]
pub enum EmitErrorKind {
    #[error(transparent)]
    MarkerShape(#[from] MarkerShapeError),

    #[error("exception type `{name}` is not known to the compilation")]
    UnresolvedExceptionType { name: String },

    #[error("parameter `{name}` of a `{exception}` constructor is not a valid identifier")]
    InvalidParameterName { exception: String, name: String },
}

impl EmitErrorKind {
    /// Stable name of the fault, reported as its type.
    pub fn name(&self) -> &'static str {
        match self {
            EmitErrorKind::MarkerShape(_) => "MarkerShape",
            EmitErrorKind::UnresolvedExceptionType { .. } => "UnresolvedExceptionType",
            EmitErrorKind::InvalidParameterName { .. } => "InvalidParameterName",
        }
    }
}

/// Error during wrapper emission.
#[derive(Debug)]
pub struct EmitError {
    kind: EmitErrorKind,
    trace: Backtrace,
}

impl EmitError {
    pub fn new(kind: EmitErrorKind) -> Self {
        Self {
            kind,
            trace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> &EmitErrorKind {
        &self.kind
    }

    /// Backtrace captured where the error was raised.
    pub fn trace(&self) -> &Backtrace {
        &self.trace
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<EmitErrorKind> for EmitError {
    fn from(kind: EmitErrorKind) -> Self {
        EmitError::new(kind)
    }
}

impl From<MarkerShapeError> for EmitError {
    fn from(error: MarkerShapeError) -> Self {
        EmitError::new(EmitErrorKind::MarkerShape(error))
    }
}
