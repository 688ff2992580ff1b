//! JSON manifest: the declaration graph handed to a generation pass.
//!
//! A manifest lists the types markers may name (with their constructors), foreign schema symbols, and the
//! annotated declarations. [`Manifest::lower_into`] turns it into [`Compilation`] entries plus
//! [`AnnotatedDeclaration`]s.
//!
//! ```json
//! {
//!   "types": [{ "name": "System.ArgumentException", "base": "System.SystemException",
//!               "constructors": [{ "parameters": [{ "type": "string", "name": "message" }] }] }],
//!   "declarations": [{ "name": "H", "namespace": "App", "static": true,
//!                      "markers": [{ "arguments": [{ "type": "System.ArgumentException" }] }] }]
//! }
//! ```
//!
//! A marker without `schema` names the canonical schema; a marker without `assembly` refers to a
//! source-defined schema symbol.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

use throwgen_core::conventions::SCHEMA_FULL_NAME;
use throwgen_core::naming::is_identifier;

use super::diagnostics::offset_at;
use super::symbols::{
    Accessibility, AnnotatedDeclaration, Compilation, Constructor, Declaration, DeclarationKind, MarkerArgument,
    MarkerData, Namespace, Parameter, RefKind, SchemaSymbol, SourceLocation, SymbolError, SymbolOrigin,
    TypeDescriptor, TypeShell,
};
use super::type_syntax::{TypeSyntaxError, parse_named_type, parse_type};
use super::types::TypeRef;

/// Errors raised while loading or lowering a manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("manifest is not valid: {message}")]
    #[diagnostic(code(throwgen::manifest::json))]
    Json {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid type name in {context}")]
    #[diagnostic(code(throwgen::manifest::type_name))]
    TypeName {
        context: String,
        #[source_code]
        text: String,
        #[label("{error}")]
        span: SourceSpan,
        #[source]
        error: TypeSyntaxError,
    },

    #[error("`{name}` is not a valid identifier ({context})")]
    #[diagnostic(code(throwgen::manifest::identifier))]
    InvalidIdentifier { context: String, name: String },

    #[error("marker on `{declaration}` refers to unknown schema `{name}` from {origin}")]
    #[diagnostic(
        code(throwgen::manifest::unknown_schema),
        help("list foreign schemas under `schemas`, with the `assembly` they come from")
    )]
    UnknownSchema {
        declaration: String,
        name: String,
        origin: SymbolOrigin,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Symbol(#[from] SymbolError),
}

/// Root of a manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub schemas: Vec<SchemaEntry>,
    #[serde(default)]
    pub declarations: Vec<DeclarationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub constructors: Vec<ConstructorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorEntry {
    #[serde(default = "public_access")]
    pub access: Accessibility,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
}

fn public_access() -> Accessibility {
    Accessibility::Public
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterEntry {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    #[serde(default, rename = "ref")]
    pub ref_kind: RefKind,
}

/// A schema symbol other than the canonical one.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    pub name: String,
    /// Referenced assembly; absent for source-defined symbols
    #[serde(default)]
    pub assembly: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellEntry {
    pub name: String,
    #[serde(default)]
    pub kind: DeclarationKind,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationEntry {
    pub name: String,
    #[serde(default)]
    pub kind: DeclarationKind,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub access: Option<Accessibility>,
    /// Enclosing types, outermost first
    #[serde(default)]
    pub containing: Vec<ShellEntry>,
    #[serde(default)]
    pub markers: Vec<MarkerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerEntry {
    #[serde(default = "canonical_schema")]
    pub schema: String,
    #[serde(default)]
    pub assembly: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentEntry>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl DeclarationEntry {
    fn shell(&self) -> ShellEntry {
        ShellEntry {
            name: self.name.clone(),
            kind: self.kind,
            is_static: self.is_static,
            type_parameters: self.type_parameters.clone(),
        }
    }
}

fn canonical_schema() -> String {
    SCHEMA_FULL_NAME.to_string()
}

/// A positional marker argument: `{ "type": "..." }`, `{ "bool": true }`, ...
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentEntry {
    Type(String),
    Bool(bool),
    String(String),
    Int(i64),
}

fn origin(assembly: &Option<String>) -> SymbolOrigin {
    match assembly {
        Some(assembly) => SymbolOrigin::Reference(assembly.clone()),
        None => SymbolOrigin::Source,
    }
}

fn type_name(text: &str, context: impl FnOnce() -> String, named: bool) -> Result<TypeRef, ManifestError> {
    let parsed = if named { parse_named_type(text) } else { parse_type(text) };
    parsed.map_err(|error| ManifestError::TypeName {
        context: context(),
        text: text.to_string(),
        span: error.span(),
        error,
    })
}

fn identifier(name: &str, context: impl FnOnce() -> String) -> Result<(), ManifestError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ManifestError::InvalidIdentifier {
            context: context(),
            name: name.to_string(),
        })
    }
}

impl Manifest {
    /// Parse a manifest document. `name` is used for error reports.
    pub fn from_json(name: &str, source: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(source).map_err(|e| {
            let offset = offset_at(source, e.line(), e.column());
            ManifestError::Json {
                message: e.to_string(),
                src: NamedSource::new(name, source.to_string()),
                span: SourceSpan::new(offset, 0),
            }
        })
    }

    /// Add the manifest's types and schemas to `compilation` and return its declarations.
    ///
    /// Markers naming a source-defined schema resolve against symbols already in `compilation`, so the
    /// canonical schema must be registered first.
    #[tracing::instrument(skip_all, fields(types = self.types.len(), declarations = self.declarations.len()))]
    pub fn lower_into(&self, compilation: &mut Compilation) -> Result<Vec<AnnotatedDeclaration>, ManifestError> {
        for entry in &self.types {
            compilation.add_type(Self::lower_type(entry)?)?;
        }
        for entry in &self.schemas {
            compilation.add_schema(SchemaSymbol {
                full_name: entry.name.clone(),
                origin: origin(&entry.assembly),
            });
        }
        self.declarations
            .iter()
            .map(|entry| Self::lower_declaration(entry, compilation))
            .collect()
    }

    fn lower_type(entry: &TypeEntry) -> Result<TypeDescriptor, ManifestError> {
        let reference = type_name(&entry.name, || format!("type `{}`", entry.name), true)?;
        let base_type = entry
            .base
            .as_deref()
            .map(|base| type_name(base, || format!("base of `{}`", entry.name), true))
            .transpose()?;

        let mut constructors = Vec::with_capacity(entry.constructors.len());
        for ctor in &entry.constructors {
            let mut parameters = Vec::with_capacity(ctor.parameters.len());
            for param in &ctor.parameters {
                let context = || format!("constructor parameter `{}` of `{}`", param.name, entry.name);
                let ty = type_name(&param.ty, context, false)?;
                parameters.push(Parameter::new(ty, param.name.clone()).with_ref_kind(param.ref_kind));
            }
            constructors.push(Constructor {
                accessibility: ctor.access,
                parameters,
            });
        }

        Ok(TypeDescriptor {
            reference,
            base_type,
            constructors,
        })
    }

    fn lower_shell(entry: &ShellEntry) -> Result<TypeShell, ManifestError> {
        identifier(&entry.name, || "declaration name".to_string())?;
        for param in &entry.type_parameters {
            identifier(param, || format!("type parameter of `{}`", entry.name))?;
        }
        Ok(TypeShell::class(entry.name.clone())
            .with_kind(entry.kind)
            .with_static(entry.is_static)
            .with_type_parameters(entry.type_parameters.iter().cloned()))
    }

    fn lower_declaration(
        entry: &DeclarationEntry,
        compilation: &Compilation,
    ) -> Result<AnnotatedDeclaration, ManifestError> {
        let namespace = Namespace::parse(&entry.namespace);
        for segment in namespace.segments() {
            identifier(segment, || format!("namespace of `{}`", entry.name))?;
        }
        let containing = entry
            .containing
            .iter()
            .map(Self::lower_shell)
            .collect::<Result<Vec<_>, _>>()?;
        let mut declaration =
            Declaration::new(Self::lower_shell(&entry.shell())?, namespace).with_containing_types(containing);
        if let Some(access) = entry.access {
            declaration.accessibility = access;
        }

        let mut markers = Vec::with_capacity(entry.markers.len());
        for marker in &entry.markers {
            let origin = origin(&marker.assembly);
            let schema = compilation.find_schema(&marker.schema, &origin).ok_or_else(|| {
                ManifestError::UnknownSchema {
                    declaration: declaration.display_name(),
                    name: marker.schema.clone(),
                    origin: origin.clone(),
                }
            })?;

            let mut arguments = Vec::with_capacity(marker.arguments.len());
            for argument in &marker.arguments {
                arguments.push(match argument {
                    ArgumentEntry::Type(text) => MarkerArgument::Type(type_name(
                        text,
                        || format!("marker argument on `{}`", declaration.display_name()),
                        false,
                    )?),
                    ArgumentEntry::Bool(value) => MarkerArgument::Bool(*value),
                    ArgumentEntry::String(value) => MarkerArgument::String(value.clone()),
                    ArgumentEntry::Int(value) => MarkerArgument::Int(*value),
                });
            }

            markers.push(MarkerData {
                schema,
                arguments,
                location: marker.location.clone(),
            });
        }

        Ok(AnnotatedDeclaration { declaration, markers })
    }
}
