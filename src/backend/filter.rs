//! Candidate filtering: which attached markers belong to the throw-helper schema.
//!
//! Matching is by schema identity ([`SchemaId`]). A marker type that merely shares the schema's name, from
//! a referenced assembly or another namespace, is a different symbol and never matches.

use crate::frontend::symbols::{MarkerData, SchemaId};

/// Markers written against `schema`, in attachment order.
///
/// An empty result means the declaration is not a candidate.
pub fn matching_markers(markers: &[MarkerData], schema: SchemaId) -> Vec<&MarkerData> {
    markers.iter().filter(|marker| marker.schema == schema).collect()
}
