//! Throw-helper generation backend
//!
//! Turns annotated declarations into generated source artifacts.
//!
//! ## Module Organization
//!
//! - `schema.rs` - Marker schema, typed marker view, bootstrap artifact
//! - `filter.rs` - Candidate filtering by schema identity
//! - `introspect.rs` - Exception type resolution and public constructors
//! - `emit.rs` - Wrapper emission for one declaration
//! - `artifact.rs` - Artifacts and hint names
//! - `containment.rs` - Per-declaration failure containment
//! - `generator.rs` - Generation pass driver
//! - `errors.rs` - Emission error types

#![deny(clippy::unwrap_used)]

pub mod artifact;
pub mod containment;
pub mod emit;
pub mod errors;
pub mod filter;
pub mod generator;
pub mod introspect;
pub mod schema;

pub use artifact::Artifact;
pub use generator::{GenerationOutput, GeneratorConfig, GeneratorDiagnostic, PassError, ThrowHelperGenerator};
