//! Provide the shared, pure vocabulary of the throwgen source generator.
//!
//! This crate is intentionally small and dependency-free. It holds the spellings and naming laws that the
//! generator, its manifest loader and its tests must agree on:
//! - [`conventions`]: the marker schema names, the wrapper-name prefix and exception suffix, artifact keys;
//! - [`keywords`]: reserved C# words (for verbatim-identifier escaping);
//! - [`predefined`]: C# predefined type keywords and their metadata names;
//! - [`naming`]: suffix stripping, wrapper-name derivation and identifier checks.
//!
//! ## Notes
//!
//! - **No IO**, no global state, no generator-specific types.
//!
//! ## Examples
//! ```rust
//! use throwgen_core::naming;
//!
//! assert_eq!(naming::wrapper_method_name("ArgumentNullException"), "ThrowArgumentNull");
//! ```

pub mod conventions;
pub mod keywords;
pub mod naming;
pub mod predefined;
