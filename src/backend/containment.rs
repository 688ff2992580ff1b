//! Per-declaration failure containment.
//!
//! Whatever goes wrong while emitting one declaration, an [`EmitError`] or a panic, is converted into a
//! single [`EmissionFailure`] for that declaration. Other declarations in the pass are unaffected and
//! nothing is retried.
//!
//! Contained panics bypass the default panic hook: the hook installed by [`contain`] logs them at
//! `debug` and records where they were raised, so the only report is the [`EmissionFailure`] itself.
//! Panics outside [`contain`] still reach the previously installed hook.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::Once;

use miette::Diagnostic;
use thiserror::Error;

use super::artifact::Artifact;
use super::errors::EmitError;
use crate::frontend::symbols::Declaration;

/// Fault type reported for a panic during emission.
pub const PANIC_FAULT: &str = "Panic";

/// Emission of one declaration failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("generating `{declaration}` failed: {fault_type} was raised. message : {message}")]
#[diagnostic(code(throwgen::emission_fault))]
pub struct EmissionFailure {
    /// Dotted name of the declaration
    pub declaration: String,
    /// Stable name of the fault (`UnresolvedExceptionType`, `Panic`, ...)
    pub fault_type: String,
    pub message: String,
    /// Rendered backtrace of where the fault was raised, when one was captured
    #[help]
    pub trace: Option<String>,
}

impl EmissionFailure {
    fn from_error(declaration: &Declaration, error: &EmitError) -> Self {
        Self {
            declaration: declaration.display_name(),
            fault_type: error.kind().name().to_string(),
            message: error.to_string(),
            trace: rendered(error.trace()),
        }
    }

    fn from_panic(declaration: &Declaration, payload: &(dyn Any + Send), trace: Option<String>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            declaration: declaration.display_name(),
            fault_type: PANIC_FAULT.to_string(),
            message,
            trace,
        }
    }
}

fn rendered(trace: &Backtrace) -> Option<String> {
    match trace.status() {
        BacktraceStatus::Captured => Some(format!("stack trace:\n{trace}")),
        _ => None,
    }
}

thread_local! {
    /// Set while this thread runs inside [`contain`]
    static CONTAINED: Cell<bool> = const { Cell::new(false) };
    /// Where the last contained panic on this thread was raised
    static RAISED_AT: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if CONTAINED.with(Cell::get) {
                tracing::debug!(%info, "contained panic during emission");
                RAISED_AT.with(|slot| *slot.borrow_mut() = Some(raise_site(info)));
            } else {
                previous(info);
            }
        }));
    });
}

fn raise_site(info: &PanicHookInfo<'_>) -> String {
    let mut site = match info.location() {
        Some(location) => format!("panicked at {location}"),
        None => "panicked at an unknown location".to_string(),
    };
    if let Some(trace) = rendered(&Backtrace::capture()) {
        site.push('\n');
        site.push_str(&trace);
    }
    site
}

/// Run the emission step for `declaration`, converting any fault into an [`EmissionFailure`].
pub fn contain<F>(declaration: &Declaration, emit: F) -> Result<Artifact, EmissionFailure>
where
    F: FnOnce() -> Result<Artifact, EmitError>,
{
    install_hook();
    let outer = CONTAINED.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(emit));
    CONTAINED.with(|flag| flag.set(outer));

    match result {
        Ok(Ok(artifact)) => Ok(artifact),
        Ok(Err(error)) => Err(EmissionFailure::from_error(declaration, &error)),
        Err(payload) => {
            let trace = RAISED_AT.with(|slot| slot.borrow_mut().take());
            Err(EmissionFailure::from_panic(declaration, payload.as_ref(), trace))
        }
    }
}
