//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Component, Path};

use crate::backend::schema::MarkerSchema;
use crate::backend::{Artifact, GenerationOutput, GeneratorConfig, ThrowHelperGenerator};
use crate::format::WriterConfig;
use crate::frontend::manifest::Manifest;

use super::{CliError, CliResult, ExitCode};

/// Maximum manifest size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while loading.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate the output directory to prevent path traversal attacks.
///
/// This function ensures:
/// - The path doesn't contain `..` components
/// - Absolute paths are allowed but logged
pub fn validate_output_dir(out_dir: &Path) -> CliResult<()> {
    if out_dir.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(CliError::failure(format!(
            "Output directory '{}' contains path traversal (..)",
            out_dir.display()
        )));
    }

    if out_dir.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            out_dir.display()
        );
    }

    Ok(())
}

/// Read a manifest file.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Manifest '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path.display(), e)))
}

/// Load and run one pass over the manifest at `path`.
fn run_pass(path: &Path, config: GeneratorConfig) -> CliResult<GenerationOutput> {
    let source = read_source(path)?;
    let manifest = Manifest::from_json(&path.display().to_string(), &source).map_err(CliError::diagnostic)?;
    ThrowHelperGenerator::new(config)
        .run_pass(&manifest)
        .map_err(CliError::diagnostic)
}

/// Print every diagnostic of a pass to stderr and pick the exit code.
fn report(output: &GenerationOutput) -> ExitCode {
    for diagnostic in &output.diagnostics {
        eprintln!("{:?}", miette::Report::new(diagnostic.clone()));
    }
    if output.has_diagnostics() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Write artifacts as `<dir>/<hint_name>`.
pub fn write_artifacts(out_dir: &Path, artifacts: &[Artifact]) -> CliResult<()> {
    validate_output_dir(out_dir)?;
    fs::create_dir_all(out_dir)
        .map_err(|e| CliError::failure(format!("Cannot create directory '{}': {}", out_dir.display(), e)))?;
    for artifact in artifacts {
        let path = out_dir.join(&artifact.hint_name);
        fs::write(&path, &artifact.source)
            .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "wrote artifact");
    }
    Ok(())
}

/// Render artifacts for stdout, each preceded by a `// <hint_name>` header.
pub fn render_artifacts(artifacts: &[Artifact]) -> String {
    let mut out = String::new();
    for (index, artifact) in artifacts.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str("// ");
        out.push_str(&artifact.hint_name);
        out.push('\n');
        out.push_str(&artifact.source);
    }
    out
}

/// `throwgen generate`: run a pass and write or print its artifacts.
pub fn generate(manifest: &Path, out_dir: Option<&Path>, config: GeneratorConfig) -> CliResult<ExitCode> {
    let output = run_pass(manifest, config)?;
    match out_dir {
        Some(dir) => {
            write_artifacts(dir, &output.artifacts)?;
            println!("Wrote {} artifact(s) to {}", output.artifacts.len(), dir.display());
        }
        None => print!("{}", render_artifacts(&output.artifacts)),
    }
    Ok(report(&output))
}

/// `throwgen check`: run a pass and report diagnostics only.
pub fn check(manifest: &Path, config: GeneratorConfig) -> CliResult<ExitCode> {
    let output = run_pass(manifest, config)?;
    let code = report(&output);
    if code == ExitCode::SUCCESS {
        // The bootstrap artifact is always first.
        println!(
            "✓ {} declaration artifact(s), no diagnostics",
            output.artifacts.len().saturating_sub(1)
        );
    }
    Ok(code)
}

/// `throwgen schema`: print the bootstrap artifact.
pub fn print_schema(config: &WriterConfig) -> CliResult<ExitCode> {
    print!("{}", MarkerSchema::bootstrap_artifact(config).source);
    Ok(ExitCode::SUCCESS)
}
