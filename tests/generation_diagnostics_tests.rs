//! Diagnostics reported by a generation pass
//!
//! Covers marker validation, per-declaration fault isolation, and the pass-level resolution failures.

use throwgen::backend::schema::{MarkerSchema, ViolationReason};
use throwgen::backend::{GeneratorConfig, GeneratorDiagnostic, PassError, ThrowHelperGenerator};
use throwgen::frontend::diagnostics::render_plain;
use throwgen::frontend::manifest::Manifest;
use throwgen::frontend::symbols::{ResolutionError, SourceLocation};

fn manifest(json: &str) -> Manifest {
    Manifest::from_json("inline.json", json).expect("manifest should load")
}

const ARGUMENT_EXCEPTION: &str = r#"
    { "name": "System.ArgumentException", "base": "System.SystemException",
      "constructors": [ { "parameters": [] }, { "parameters": [ { "type": "string", "name": "message" } ] } ] }"#;

fn validating() -> ThrowHelperGenerator {
    ThrowHelperGenerator::new(GeneratorConfig::new().with_validate_markers(true))
}

#[test]
fn test_wrong_supertype_fails_marker_construction() {
    let manifest = manifest(&format!(
        r#"{{ "types": [{ARGUMENT_EXCEPTION}],
             "declarations": [ {{ "name": "H", "namespace": "App", "static": true,
               "markers": [ {{ "arguments": [ {{ "type": "System.ArgumentException" }} ],
                              "location": {{ "file": "Program.cs", "line": 4, "column": 2 }} }} ] }} ] }}"#
    ));
    let output = validating().run_pass(&manifest).unwrap();

    assert_eq!(output.artifacts.len(), 1, "only the bootstrap artifact is expected");
    let [GeneratorDiagnostic::InvalidMarker { declaration, violation }] = &output.diagnostics[..] else {
        panic!("expected one invalid marker, got {:?}", output.diagnostics);
    };
    assert_eq!(declaration, "App.H");
    assert_eq!(
        violation.location,
        Some(SourceLocation {
            file: "Program.cs".to_string(),
            line: 4,
            column: 2
        })
    );
    assert!(matches!(
        &violation.reason,
        ViolationReason::UnexpectedSupertype { found, .. } if found == "global::System.SystemException"
    ));

    let rendered = render_plain(&output.diagnostics[0]);
    assert!(rendered.contains("throwgen::invalid_marker"), "{rendered}");
    assert!(rendered.contains("Program.cs:4:2"), "{rendered}");
}

#[test]
fn test_the_observed_supertype_passes_validation() {
    let manifest = manifest(
        r#"{ "types": [ { "name": "App.MarkerLike", "base": "System.Attribute",
                          "constructors": [ { "parameters": [] } ] } ],
             "declarations": [ { "name": "H", "markers": [ { "arguments": [ { "type": "App.MarkerLike" } ] } ] } ] }"#,
    );
    let output = validating().run_pass(&manifest).unwrap();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert!(output.artifacts[1].source.contains("public static void ThrowMarkerLike()"));
}

#[test]
fn test_one_invalid_declaration_does_not_block_others() {
    let manifest = manifest(&format!(
        r#"{{ "types": [{ARGUMENT_EXCEPTION},
               {{ "name": "App.Quirk", "base": "System.Attribute", "constructors": [ {{ "parameters": [] }} ] }}],
             "declarations": [
               {{ "name": "Bad", "markers": [ {{ "arguments": [ {{ "type": "System.ArgumentException" }} ] }} ] }},
               {{ "name": "Good", "markers": [ {{ "arguments": [ {{ "type": "App.Quirk" }} ] }} ] }}
             ] }}"#
    ));
    let output = validating().run_pass(&manifest).unwrap();
    let hints: Vec<&str> = output.artifacts.iter().map(|a| a.hint_name.as_str()).collect();
    assert_eq!(hints, vec![MarkerSchema::bootstrap_hint_name().as_str(), "Good.g.cs"]);
    assert_eq!(output.diagnostics.len(), 1);
}

#[test]
fn test_emission_fault_is_isolated() {
    let manifest = manifest(&format!(
        r#"{{ "types": [{ARGUMENT_EXCEPTION}],
             "declarations": [
               {{ "name": "First", "markers": [ {{ "arguments": [ {{ "type": "System.ArgumentException" }} ] }} ] }},
               {{ "name": "Broken", "namespace": "App", "markers": [ {{ "arguments": [ {{ "type": "App.NotDeclared" }} ] }} ] }},
               {{ "name": "Last", "markers": [ {{ "arguments": [ {{ "type": "System.ArgumentException" }} ] }} ] }}
             ] }}"#
    ));
    let output = ThrowHelperGenerator::default().run_pass(&manifest).unwrap();
    let hints: Vec<&str> = output.artifacts.iter().skip(1).map(|a| a.hint_name.as_str()).collect();
    assert_eq!(hints, vec!["First.g.cs", "Last.g.cs"]);

    let [GeneratorDiagnostic::EmissionFault(failure)] = &output.diagnostics[..] else {
        panic!("expected one emission fault, got {:?}", output.diagnostics);
    };
    assert_eq!(failure.declaration, "App.Broken");
    assert_eq!(failure.fault_type, "UnresolvedExceptionType");
    assert!(failure.message.contains("global::App.NotDeclared"));

    let rendered = render_plain(&output.diagnostics[0]);
    assert!(rendered.contains("throwgen::emission_fault"), "{rendered}");
}

#[test]
fn test_marker_shape_fault() {
    let manifest = manifest(
        r#"{ "declarations": [ { "name": "H", "markers": [ { "arguments": [ { "int": 3 } ] } ] } ] }"#,
    );
    let output = ThrowHelperGenerator::default().run_pass(&manifest).unwrap();
    let [GeneratorDiagnostic::EmissionFault(failure)] = &output.diagnostics[..] else {
        panic!("expected one emission fault, got {:?}", output.diagnostics);
    };
    assert_eq!(failure.fault_type, "MarkerShape");
    assert!(failure.message.contains("int `3`"), "{}", failure.message);
}

#[test]
fn test_identically_named_foreign_schema_is_ignored() {
    let manifest = manifest(&format!(
        r#"{{ "types": [{ARGUMENT_EXCEPTION}],
             "schemas": [ {{ "name": "ExceptionSupplement.ThrowExceptionAttribute", "assembly": "Vendor.dll" }} ],
             "declarations": [ {{ "name": "H", "markers": [
               {{ "assembly": "Vendor.dll", "arguments": [ {{ "type": "System.ArgumentException" }} ] }} ] }} ] }}"#
    ));
    let output = ThrowHelperGenerator::default().run_pass(&manifest).unwrap();
    assert_eq!(output.artifacts.len(), 1);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_second_source_schema_aborts_the_pass() {
    let manifest = manifest(
        r#"{ "schemas": [ { "name": "ExceptionSupplement.ThrowExceptionAttribute" } ],
             "declarations": [ { "name": "H" } ] }"#,
    );
    let err = ThrowHelperGenerator::default().run_pass(&manifest).unwrap_err();
    assert!(matches!(err, PassError::Resolution(ResolutionError::AmbiguousSchema { .. })), "{err:?}");
}
