#![forbid(unsafe_code)]
//! Throw-helper source generator
//!
//! Given a declaration graph, finds type declarations tagged with `ThrowException` markers and generates
//! partial-type sources with one `Throw<Name>` wrapper per public constructor of each named exception.
//! This crate provides the generator: frontend (type references, symbol table, manifest loading),
//! backend (schema, filtering, emission, containment), the text writer and the CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Emission faults**: A panic while emitting one declaration is caught by
//!   [`backend::containment::contain`] and reported for that declaration only.

pub mod backend;
pub mod cli;
pub mod format;
pub mod frontend;
pub mod version;
