//! Integration tests for the throw-helper generator

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use throwgen::backend::{GenerationOutput, PassError, ThrowHelperGenerator};
use throwgen::frontend::manifest::Manifest;

/// Helper to run full pipeline on a manifest file
fn generate_file(path: &Path) -> Result<GenerationOutput, String> {
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let manifest = Manifest::from_json(&path.display().to_string(), &source).map_err(|e| e.to_string())?;
    ThrowHelperGenerator::default()
        .run_pass(&manifest)
        .map_err(|e: PassError| e.to_string())
}

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new("tests/fixtures").join(kind);
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort();
    paths
}

/// Test that all valid fixtures generate without diagnostics
#[test]
fn test_valid_fixtures() {
    let paths = fixtures("valid");
    assert!(!paths.is_empty());
    for path in paths {
        let result = generate_file(&path);
        assert!(
            result.is_ok(),
            "Expected {} to generate successfully, got error: {:?}",
            path.display(),
            result.as_ref().err()
        );
        let output = result.unwrap();
        assert!(
            output.diagnostics.is_empty(),
            "Expected no diagnostics for {}, got {:?}",
            path.display(),
            output.diagnostics
        );
    }
}

/// Test that invalid fixtures abort the pass
#[test]
fn test_invalid_fixtures() {
    let paths = fixtures("invalid");
    assert!(!paths.is_empty());
    for path in paths {
        assert!(
            generate_file(&path).is_err(),
            "Expected {} to fail, but it generated successfully",
            path.display()
        );
    }
}

#[test]
fn test_program_fixture_artifacts() {
    let output = generate_file(Path::new("tests/fixtures/valid/program.json")).unwrap();
    let hints: Vec<&str> = output.artifacts.iter().map(|a| a.hint_name.as_str()).collect();
    assert_eq!(
        hints,
        vec!["ExceptionSupplement.ThrowExceptionAttribute.g.cs", "ThrowHelper.g.cs", "Throw.g.cs"]
    );

    let helper = &output.artifacts[1].source;
    assert!(helper.starts_with("static partial class ThrowHelper\n{\n"));
    assert_eq!(helper.matches("public static void ThrowArgument(").count(), 5);
    assert_eq!(helper.matches("public static void ThrowArgumentNull(").count(), 4);
    assert!(!helper.contains("SerializationInfo"), "protected constructors must not be wrapped");

    // `false` as the second marker argument still yields static members of the static class
    let throw = &output.artifacts[2].source;
    assert!(throw.starts_with("static partial class Throw\n{\n"));
    assert_eq!(throw.matches("public static void Throw").count(), 9);
    assert!(!throw.contains("public void"));
}

#[test]
fn test_foreign_schema_fixture_generates_nothing() {
    let output = generate_file(Path::new("tests/fixtures/valid/foreign_schema.json")).unwrap();
    assert_eq!(output.artifacts.len(), 1, "only the bootstrap artifact is expected");
}

#[test]
fn test_invalid_fixture_messages() {
    let broken = generate_file(Path::new("tests/fixtures/invalid/broken_json.json")).unwrap_err();
    assert!(broken.starts_with("manifest is not valid"), "{broken}");

    let bad_type = generate_file(Path::new("tests/fixtures/invalid/bad_type_name.json")).unwrap_err();
    assert!(bad_type.contains("invalid type name"), "{bad_type}");

    let unknown = generate_file(Path::new("tests/fixtures/invalid/unknown_schema.json")).unwrap_err();
    assert!(unknown.contains("Missing.dll"), "{unknown}");

    let ambiguous = generate_file(Path::new("tests/fixtures/invalid/ambiguous_schema.json")).unwrap_err();
    assert!(ambiguous.contains("ambiguous"), "{ambiguous}");
}

// ============================================================================
// Binary
// ============================================================================

fn throwgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_throwgen"))
}

#[test]
fn test_cli_schema_prints_bootstrap() {
    let output = throwgen().arg("schema").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("namespace ExceptionSupplement\n"), "{stdout}");
}

#[test]
fn test_cli_generate_to_stdout() {
    let output = throwgen()
        .args(["generate", "tests/fixtures/valid/static_helper.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("// ExceptionSupplement.ThrowExceptionAttribute.g.cs\n"));
    assert!(stdout.contains("// App.H.g.cs\nnamespace App\n"));
}

#[test]
fn test_cli_generate_writes_files() {
    let out_dir = std::env::temp_dir().join(format!("throwgen_it_{}", std::process::id()));
    let output = throwgen()
        .args(["generate", "tests/fixtures/valid/static_helper.json", "-o"])
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = fs::read_to_string(out_dir.join("App.H.g.cs")).unwrap();
    assert!(written.contains("public static void ThrowArgumentNull(string paramName)"));
    assert!(out_dir.join("ExceptionSupplement.ThrowExceptionAttribute.g.cs").exists());
    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn test_cli_check_fails_on_invalid_markers() {
    let output = throwgen()
        .args(["check", "tests/fixtures/valid/static_helper.json", "--validate-markers"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("throwgen::invalid_marker"), "{stderr}");
}

#[test]
fn test_cli_reports_manifest_errors() {
    let output = throwgen()
        .args(["check", "tests/fixtures/invalid/broken_json.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("throwgen::manifest::json"), "{stderr}");
}
