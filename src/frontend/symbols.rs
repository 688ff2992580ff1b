//! Declaration graph and symbol table
//!
//! Holds everything the generator reads: the exception types it may be asked about (as
//! [`TypeDescriptor`]s), the marker schema symbols markers were written against, and the annotated
//! declarations themselves. All of it is immutable while a generation pass runs.

use std::collections::HashMap;
use std::fmt;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use super::types::TypeRef;

/// Identity of a schema symbol within one [`Compilation`].
///
/// Two markers were written against the same schema iff their ids are equal. Names never enter the
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u32);

/// Where a symbol was defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolOrigin {
    /// The program being compiled, including generated sources
    Source,
    /// A referenced assembly
    Reference(String),
}

impl fmt::Display for SymbolOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolOrigin::Source => write!(f, "source"),
            SymbolOrigin::Reference(assembly) => write!(f, "{assembly}"),
        }
    }
}

/// A marker schema type known to the compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSymbol {
    /// Dotted metadata name (`ExceptionSupplement.ThrowExceptionAttribute`)
    pub full_name: String,
    pub origin: SymbolOrigin,
}

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl Accessibility {
    pub fn is_public(self) -> bool {
        self == Accessibility::Public
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    #[default]
    Value,
    Ref,
    Out,
    In,
    Params,
}

impl RefKind {
    /// Modifier written before the parameter type in a signature.
    pub fn declaration_modifier(self) -> Option<&'static str> {
        match self {
            RefKind::Value => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
            RefKind::Params => Some("params"),
        }
    }

    /// Modifier written before the argument when the parameter is forwarded.
    pub fn argument_modifier(self) -> Option<&'static str> {
        match self {
            RefKind::Value | RefKind::Params => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
        }
    }
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: String,
    pub ref_kind: RefKind,
}

impl Parameter {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            ref_kind: RefKind::Value,
        }
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }
}

/// One constructor, parameters in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub accessibility: Accessibility,
    pub parameters: Vec<Parameter>,
}

impl Constructor {
    pub fn public(parameters: Vec<Parameter>) -> Self {
        Self {
            accessibility: Accessibility::Public,
            parameters,
        }
    }
}

/// Everything the generator needs to know about a type named by a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub reference: TypeRef,
    /// Immediate supertype, `None` for the root type
    pub base_type: Option<TypeRef>,
    /// Constructors in declaration order, all accessibilities
    pub constructors: Vec<Constructor>,
}

impl TypeDescriptor {
    /// Simple name (`ArgumentException`).
    pub fn simple_name(&self) -> &str {
        self.reference.simple_name().unwrap_or_default()
    }
}

/// A dotted namespace; empty for the global namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace(Vec<String>);

impl Namespace {
    pub fn global() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted namespace; the empty string is the global namespace.
    pub fn parse(dotted: &str) -> Self {
        let dotted = dotted.trim();
        if dotted.is_empty() {
            return Self::global();
        }
        Self(dotted.split('.').map(|s| s.trim().to_string()).collect())
    }

    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Keyword introducing a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    #[default]
    Class,
    Struct,
    Record,
    RecordStruct,
    Interface,
}

impl DeclarationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Record => "record",
            DeclarationKind::RecordStruct => "record struct",
            DeclarationKind::Interface => "interface",
        }
    }
}

/// The part of a type declaration a partial shell has to mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShell {
    pub name: String,
    pub kind: DeclarationKind,
    pub is_static: bool,
    pub type_parameters: Vec<String>,
}

impl TypeShell {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Class,
            is_static: false,
            type_parameters: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_type_parameters<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kind(mut self, kind: DeclarationKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A type declaration in the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub shell: TypeShell,
    pub namespace: Namespace,
    pub accessibility: Accessibility,
    /// Enclosing type declarations, outermost first
    pub containing_types: Vec<TypeShell>,
}

impl Declaration {
    pub fn new(shell: TypeShell, namespace: Namespace) -> Self {
        Self {
            shell,
            namespace,
            accessibility: Accessibility::Internal,
            containing_types: Vec::new(),
        }
    }

    pub fn with_containing_types(mut self, containing: Vec<TypeShell>) -> Self {
        self.containing_types = containing;
        self
    }

    pub fn name(&self) -> &str {
        &self.shell.name
    }

    pub fn is_static(&self) -> bool {
        self.shell.is_static
    }

    /// Dotted name without type parameters (`App.Outer.H`), for messages and logs.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = self.namespace.segments().iter().map(String::as_str).collect();
        parts.extend(self.containing_types.iter().map(|t| t.name.as_str()));
        parts.push(&self.shell.name);
        parts.join(".")
    }
}

/// Location of a marker in user source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A positional marker argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerArgument {
    Type(TypeRef),
    Bool(bool),
    String(String),
    Int(i64),
}

impl MarkerArgument {
    /// Short description for diagnostics (`typeof(...)`, `bool`, ...).
    pub fn describe(&self) -> String {
        match self {
            MarkerArgument::Type(ty) => format!("typeof({ty})"),
            MarkerArgument::Bool(value) => format!("bool `{value}`"),
            MarkerArgument::String(value) => format!("string \"{value}\""),
            MarkerArgument::Int(value) => format!("int `{value}`"),
        }
    }
}

/// A marker attached to a declaration, as the host saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerData {
    pub schema: SchemaId,
    pub arguments: Vec<MarkerArgument>,
    pub location: Option<SourceLocation>,
}

impl MarkerData {
    pub fn new(schema: SchemaId, arguments: Vec<MarkerArgument>) -> Self {
        Self {
            schema,
            arguments,
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// A declaration with every marker attached to it, in attachment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDeclaration {
    pub declaration: Declaration,
    pub markers: Vec<MarkerData>,
}

/// Failure to resolve the canonical schema symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ResolutionError {
    #[error("marker schema `{name}` was not found in the compilation")]
    #[diagnostic(
        code(throwgen::resolution::not_found),
        help("the schema is registered by the generator's bootstrap step; make sure it ran for this pass")
    )]
    SchemaNotFound { name: String },

    #[error("marker schema `{name}` is ambiguous between {candidates}")]
    #[diagnostic(code(throwgen::resolution::ambiguous))]
    AmbiguousSchema { name: String, candidates: String },
}

/// Failure to add a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SymbolError {
    #[error("type `{name}` is declared more than once")]
    #[diagnostic(code(throwgen::symbols::duplicate_type))]
    DuplicateType { name: String },

    #[error("type `{name}` cannot be declared: only named types can carry constructors")]
    #[diagnostic(code(throwgen::symbols::unnamed_type))]
    UnnamedType { name: String },
}

/// Symbol table for one generation pass.
#[derive(Debug, Default)]
pub struct Compilation {
    types: Vec<TypeDescriptor>,
    /// Metadata name -> index into `types`
    type_index: HashMap<String, usize>,
    schemas: Vec<SchemaSymbol>,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type descriptor. Metadata names must be unique.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) -> Result<(), SymbolError> {
        let Some(key) = descriptor.reference.metadata_name() else {
            return Err(SymbolError::UnnamedType {
                name: descriptor.reference.fully_qualified(),
            });
        };
        if self.type_index.contains_key(&key) {
            return Err(SymbolError::DuplicateType { name: key });
        }
        self.type_index.insert(key, self.types.len());
        self.types.push(descriptor);
        Ok(())
    }

    /// Look up the descriptor of a named type.
    pub fn lookup_type(&self, reference: &TypeRef) -> Option<&TypeDescriptor> {
        let key = reference.metadata_name()?;
        self.type_index.get(&key).map(|&index| &self.types[index])
    }

    /// All type descriptors, in insertion order.
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Add a schema symbol and return its identity.
    pub fn add_schema(&mut self, symbol: SchemaSymbol) -> SchemaId {
        let id = SchemaId(self.schemas.len() as u32);
        self.schemas.push(symbol);
        id
    }

    pub fn schema(&self, id: SchemaId) -> Option<&SchemaSymbol> {
        self.schemas.get(id.0 as usize)
    }

    /// Find the first schema symbol with exactly this name and origin.
    pub fn find_schema(&self, full_name: &str, origin: &SymbolOrigin) -> Option<SchemaId> {
        self.schemas
            .iter()
            .position(|s| s.full_name == full_name && &s.origin == origin)
            .map(|index| SchemaId(index as u32))
    }

    /// Resolve a schema by metadata name, the way a compiler resolves a type name.
    ///
    /// A symbol defined in source wins over referenced ones. Within the winning tier the match must be
    /// unique.
    pub fn resolve_schema(&self, full_name: &str) -> Result<SchemaId, ResolutionError> {
        let matches: Vec<usize> = self
            .schemas
            .iter()
            .enumerate()
            .filter(|(_, s)| s.full_name == full_name)
            .map(|(index, _)| index)
            .collect();

        let from_source: Vec<usize> = matches
            .iter()
            .copied()
            .filter(|&index| self.schemas[index].origin == SymbolOrigin::Source)
            .collect();
        let tier = if from_source.is_empty() { matches } else { from_source };

        match tier.as_slice() {
            [] => Err(ResolutionError::SchemaNotFound {
                name: full_name.to_string(),
            }),
            [only] => Ok(SchemaId(*only as u32)),
            many => Err(ResolutionError::AmbiguousSchema {
                name: full_name.to_string(),
                candidates: many
                    .iter()
                    .map(|&index| format!("`{}`", self.schemas[index].origin))
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}
