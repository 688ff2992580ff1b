//! Generator frontend
//!
//! This module contains everything the generator reads:
//! - `types`: type references and their fully qualified display
//! - `type_syntax`: parser for type names written in manifests
//! - `symbols`: declarations, markers, and the per-pass symbol table
//! - `manifest`: JSON manifest loading and lowering
//! - `diagnostics`: position mapping and report rendering

pub mod diagnostics;
pub mod manifest;
pub mod symbols;
pub mod type_syntax;
pub mod types;
