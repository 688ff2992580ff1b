//! Generation pass driver.
//!
//! One pass: register the schema and produce the bootstrap artifact, then for each annotated declaration
//! filter its markers, optionally validate them, and emit its artifact under failure containment.

use std::collections::HashSet;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::artifact::Artifact;
use super::containment::{EmissionFailure, contain};
use super::emit::emit_declaration;
use super::errors::ResolutionError;
use super::filter::matching_markers;
use super::schema::{MarkerSchema, SchemaViolation, ThrowExceptionMarker};
use crate::format::WriterConfig;
use crate::frontend::manifest::{Manifest, ManifestError};
use crate::frontend::symbols::{AnnotatedDeclaration, Compilation};

/// Configuration of a generation pass.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    pub writer: WriterConfig,
    /// Run the schema's construction check on every matching marker before emission
    pub validate_markers: bool,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_validate_markers(mut self, validate: bool) -> Self {
        self.validate_markers = validate;
        self
    }
}

/// A per-declaration problem reported by a pass. The pass itself continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GeneratorDiagnostic {
    #[error("invalid marker on `{declaration}`")]
    #[diagnostic(code(throwgen::invalid_marker))]
    InvalidMarker {
        declaration: String,
        #[source]
        #[diagnostic_source]
        violation: SchemaViolation,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    EmissionFault(EmissionFailure),

    #[error("`{declaration}` generates `{hint_name}`, which an earlier declaration already generated")]
    #[diagnostic(
        code(throwgen::duplicate_artifact),
        help("each declaration may appear once per pass; merge its markers into a single entry")
    )]
    DuplicateArtifact { declaration: String, hint_name: String },
}

/// Errors that abort a whole pass.
#[derive(Debug, Error, Diagnostic)]
pub enum PassError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Result of a pass: artifacts in emission order and the diagnostics collected along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    pub artifacts: Vec<Artifact>,
    pub diagnostics: Vec<GeneratorDiagnostic>,
}

impl GenerationOutput {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// The throw-helper generator.
#[derive(Debug, Clone, Default)]
pub struct ThrowHelperGenerator {
    config: GeneratorConfig,
}

impl ThrowHelperGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Register the marker schema in `compilation` and return the bootstrap artifact defining it.
    pub fn initialize(&self, compilation: &mut Compilation) -> Artifact {
        MarkerSchema::register(compilation);
        MarkerSchema::bootstrap_artifact(&self.config.writer)
    }

    /// Generate artifacts for `declarations`, in order.
    ///
    /// Declarations without a matching marker produce nothing. Invalid markers and emission faults become
    /// diagnostics for their declaration only; a schema that cannot be resolved aborts the pass.
    #[tracing::instrument(skip_all, fields(declarations = declarations.len(), validate = self.config.validate_markers))]
    pub fn generate(
        &self,
        compilation: &Compilation,
        declarations: &[AnnotatedDeclaration],
    ) -> Result<GenerationOutput, ResolutionError> {
        let schema = compilation.resolve_schema(MarkerSchema::FULL_NAME)?;
        let mut output = GenerationOutput::default();
        let mut seen_hints = HashSet::new();

        for annotated in declarations {
            let declaration = &annotated.declaration;
            let markers = matching_markers(&annotated.markers, schema);
            if markers.is_empty() {
                debug!(declaration = %declaration.display_name(), "no matching markers, skipped");
                continue;
            }

            if self.config.validate_markers {
                let violations: Vec<SchemaViolation> = markers
                    .iter()
                    .filter_map(|marker| ThrowExceptionMarker::construct(marker, compilation).err())
                    .collect();
                if !violations.is_empty() {
                    warn!(
                        declaration = %declaration.display_name(),
                        count = violations.len(),
                        "marker construction failed"
                    );
                    output
                        .diagnostics
                        .extend(violations.into_iter().map(|violation| GeneratorDiagnostic::InvalidMarker {
                            declaration: declaration.display_name(),
                            violation,
                        }));
                    continue;
                }
            }

            match contain(declaration, || {
                emit_declaration(compilation, declaration, &markers, &self.config.writer)
            }) {
                Ok(artifact) => {
                    if !seen_hints.insert(artifact.hint_name.clone()) {
                        warn!(hint_name = %artifact.hint_name, "duplicate artifact dropped");
                        output.diagnostics.push(GeneratorDiagnostic::DuplicateArtifact {
                            declaration: declaration.display_name(),
                            hint_name: artifact.hint_name,
                        });
                        continue;
                    }
                    debug!(hint_name = %artifact.hint_name, bytes = artifact.source.len(), "artifact emitted");
                    output.artifacts.push(artifact);
                }
                Err(failure) => {
                    warn!(
                        declaration = %failure.declaration,
                        fault = %failure.fault_type,
                        "emission failed: {}",
                        failure.message
                    );
                    output.diagnostics.push(GeneratorDiagnostic::EmissionFault(failure));
                }
            }
        }

        info!(
            artifacts = output.artifacts.len(),
            diagnostics = output.diagnostics.len(),
            "generation pass finished"
        );
        Ok(output)
    }

    /// Run a full pass over a manifest: bootstrap first, then every declaration's artifact.
    pub fn run_pass(&self, manifest: &Manifest) -> Result<GenerationOutput, PassError> {
        let mut compilation = Compilation::new();
        let bootstrap = self.initialize(&mut compilation);
        let declarations = manifest.lower_into(&mut compilation)?;

        let mut output = self.generate(&compilation, &declarations)?;
        output.artifacts.insert(0, bootstrap);
        Ok(output)
    }
}
