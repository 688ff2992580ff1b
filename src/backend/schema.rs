//! The marker schema: what a valid `ThrowException` marker looks like.
//!
//! The schema has three faces:
//! - [`MarkerSchema`]: the schema symbol registered in the compilation and the fixed bootstrap artifact
//!   that defines it for user code;
//! - [`ThrowExceptionMarker::read`]: the generator's shape-only view of an attached marker;
//! - [`ThrowExceptionMarker::construct`]: full construction, including the schema's supertype check.
//!
//! ## Notes
//!
//! - The supertype check compares the argument's immediate supertype with the schema's own base type
//!   (`System.Attribute`), exactly as the bootstrap source does. Real exception types fail it.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use throwgen_core::conventions::{
    ARTIFACT_EXTENSION, GLOBAL_ALIAS, SCHEMA_BASE_TYPE, SCHEMA_FULL_NAME, SCHEMA_NAME, SCHEMA_NAMESPACE,
    SCHEMA_STATIC_PARAMETER,
};

use super::artifact::Artifact;
use crate::format::{IndentedWriter, WriterConfig};
use crate::frontend::symbols::{
    Compilation, MarkerArgument, MarkerData, SchemaId, SchemaSymbol, SourceLocation, SymbolOrigin,
};
use crate::frontend::types::TypeRef;

/// Static description of the marker schema.
pub struct MarkerSchema;

impl MarkerSchema {
    /// Fully qualified metadata name of the schema.
    pub const FULL_NAME: &'static str = SCHEMA_FULL_NAME;

    /// Symbol the bootstrap artifact defines.
    pub fn symbol() -> SchemaSymbol {
        SchemaSymbol {
            full_name: Self::FULL_NAME.to_string(),
            origin: SymbolOrigin::Source,
        }
    }

    /// Add the schema symbol to a compilation, as the bootstrap artifact would once merged.
    pub fn register(compilation: &mut Compilation) -> SchemaId {
        compilation.add_schema(Self::symbol())
    }

    /// The supertype the construction check compares against.
    pub fn expected_supertype() -> TypeRef {
        TypeRef::from_metadata_name(SCHEMA_BASE_TYPE)
    }

    /// Hint name of the bootstrap artifact.
    pub fn bootstrap_hint_name() -> String {
        format!("{}{ARTIFACT_EXTENSION}", Self::FULL_NAME)
    }

    /// The fixed source defining the schema.
    pub fn bootstrap_artifact(config: &WriterConfig) -> Artifact {
        let base = format!("{GLOBAL_ALIAS}{SCHEMA_BASE_TYPE}");
        let mut w = IndentedWriter::new(config.clone());

        w.token("namespace ").token(SCHEMA_NAMESPACE).line().token("{").line().indent();

        w.token("[global::System.AttributeUsage(")
            .token("global::System.AttributeTargets.Class | global::System.AttributeTargets.Struct")
            .token(", AllowMultiple = true)]")
            .line();
        w.token("internal sealed class ")
            .token(SCHEMA_NAME)
            .token(" : ")
            .token(&base)
            .line()
            .token("{")
            .line()
            .indent();

        w.token("public ")
            .token(SCHEMA_NAME)
            .token("(global::System.Type type, bool ")
            .token(SCHEMA_STATIC_PARAMETER)
            .token(" = true)")
            .line()
            .token("{")
            .line()
            .indent();
        w.token("if (type.BaseType != typeof(")
            .token(&base)
            .token(")) throw new global::System.ArgumentException()")
            .statement();
        w.token("this.ExceptionType = type").statement();
        w.token("this.IsStatic = ").token(SCHEMA_STATIC_PARAMETER).statement();
        w.dedent().token("}").line();
        w.line();

        w.token("public global::System.Type ExceptionType { get; }").line();
        w.line();
        w.token("public bool IsStatic { get; }").line();

        w.dedent().token("}").line();
        w.dedent().token("}").line();

        Artifact {
            hint_name: Self::bootstrap_hint_name(),
            source: w.finish(),
        }
    }
}

/// A marker whose arguments do not fit the schema's constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MarkerShapeError {
    #[error("the marker has no exception type argument")]
    #[diagnostic(code(throwgen::marker::missing_type))]
    MissingExceptionType,

    #[error("the first marker argument must be a type, found {found}")]
    #[diagnostic(code(throwgen::marker::not_a_type))]
    NotAType { found: String },

    #[error("the second marker argument must be a bool, found {found}")]
    #[diagnostic(code(throwgen::marker::not_a_bool))]
    NotABool { found: String },

    #[error("the marker takes at most 2 arguments, found {count}")]
    #[diagnostic(code(throwgen::marker::too_many_arguments))]
    TooManyArguments { count: usize },
}

/// Why a marker could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationReason {
    #[error(transparent)]
    Shape(#[from] MarkerShapeError),

    #[error("exception type `{name}` is not known to the compilation")]
    UnknownExceptionType { name: String },

    #[error("immediate supertype of `{exception}` is `{found}`, expected `{expected}`")]
    UnexpectedSupertype {
        exception: String,
        expected: String,
        found: String,
    },
}

/// Marker construction failed the schema's precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{}{reason}", location_prefix(.location))]
#[diagnostic(
    code(throwgen::schema_violation),
    help("the marker's type argument must pass the ThrowException constructor's supertype check")
)]
pub struct SchemaViolation {
    pub location: Option<SourceLocation>,
    pub reason: ViolationReason,
}

fn location_prefix(location: &Option<SourceLocation>) -> String {
    location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default()
}

/// Typed view of a marker written against this schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowExceptionMarker {
    pub exception: TypeRef,
    /// Second schema argument, defaults to `true`. Wrappers are static either way.
    pub static_wrappers: bool,
}

impl ThrowExceptionMarker {
    /// Read the marker's arguments, checking only their shape.
    pub fn read(data: &MarkerData) -> Result<Self, MarkerShapeError> {
        let exception = match data.arguments.first() {
            None => return Err(MarkerShapeError::MissingExceptionType),
            Some(MarkerArgument::Type(ty)) => ty.clone(),
            Some(other) => return Err(MarkerShapeError::NotAType { found: other.describe() }),
        };
        let static_wrappers = match data.arguments.get(1) {
            None => true,
            Some(MarkerArgument::Bool(value)) => *value,
            Some(other) => return Err(MarkerShapeError::NotABool { found: other.describe() }),
        };
        if data.arguments.len() > 2 {
            return Err(MarkerShapeError::TooManyArguments {
                count: data.arguments.len(),
            });
        }
        Ok(Self {
            exception,
            static_wrappers,
        })
    }

    /// Construct the marker the way the schema's constructor does, including the supertype check.
    pub fn construct(data: &MarkerData, compilation: &Compilation) -> Result<Self, SchemaViolation> {
        let violation = |reason: ViolationReason| SchemaViolation {
            location: data.location.clone(),
            reason,
        };

        let marker = Self::read(data).map_err(|e| violation(e.into()))?;
        let descriptor = compilation.lookup_type(&marker.exception).ok_or_else(|| {
            violation(ViolationReason::UnknownExceptionType {
                name: marker.exception.to_string(),
            })
        })?;

        let expected = MarkerSchema::expected_supertype();
        if descriptor.base_type.as_ref() != Some(&expected) {
            return Err(violation(ViolationReason::UnexpectedSupertype {
                exception: marker.exception.to_string(),
                expected: expected.to_string(),
                found: descriptor
                    .base_type
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "(none)".to_string()),
            }));
        }
        Ok(marker)
    }
}

impl fmt::Display for ThrowExceptionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ThrowException(typeof({}), {})]", self.exception, self.static_wrappers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontend::symbols::{Constructor, TypeDescriptor};

    fn compilation_with(name: &str, base: Option<&str>) -> (Compilation, SchemaId) {
        let mut compilation = Compilation::new();
        let schema = MarkerSchema::register(&mut compilation);
        compilation
            .add_type(TypeDescriptor {
                reference: TypeRef::from_metadata_name(name),
                base_type: base.map(TypeRef::from_metadata_name),
                constructors: vec![Constructor::public(vec![])],
            })
            .unwrap();
        (compilation, schema)
    }

    fn marker(schema: SchemaId, arguments: Vec<MarkerArgument>) -> MarkerData {
        MarkerData::new(schema, arguments)
    }

    fn ty(name: &str) -> MarkerArgument {
        MarkerArgument::Type(TypeRef::from_metadata_name(name))
    }

    #[test]
    fn test_read_defaults_to_static_wrappers() {
        let (_, schema) = compilation_with("System.ArgumentException", Some("System.SystemException"));
        let read = ThrowExceptionMarker::read(&marker(schema, vec![ty("System.ArgumentException")])).unwrap();
        assert!(read.static_wrappers);
    }

    #[test]
    fn test_read_explicit_flag() {
        let (_, schema) = compilation_with("System.ArgumentException", Some("System.SystemException"));
        let data = marker(schema, vec![ty("System.ArgumentException"), MarkerArgument::Bool(false)]);
        assert!(!ThrowExceptionMarker::read(&data).unwrap().static_wrappers);
    }

    #[test]
    fn test_read_shape_errors() {
        let (_, schema) = compilation_with("System.ArgumentException", None);
        assert_eq!(
            ThrowExceptionMarker::read(&marker(schema, vec![])),
            Err(MarkerShapeError::MissingExceptionType)
        );
        assert!(matches!(
            ThrowExceptionMarker::read(&marker(schema, vec![MarkerArgument::Int(1)])),
            Err(MarkerShapeError::NotAType { .. })
        ));
        assert!(matches!(
            ThrowExceptionMarker::read(&marker(
                schema,
                vec![ty("System.ArgumentException"), MarkerArgument::String("x".into())]
            )),
            Err(MarkerShapeError::NotABool { .. })
        ));
        assert_eq!(
            ThrowExceptionMarker::read(&marker(
                schema,
                vec![ty("System.ArgumentException"), MarkerArgument::Bool(true), MarkerArgument::Bool(true)]
            )),
            Err(MarkerShapeError::TooManyArguments { count: 3 })
        );
    }

    #[test]
    fn test_construct_rejects_real_exception_supertype() {
        let (compilation, schema) = compilation_with("System.ArgumentException", Some("System.SystemException"));
        let err = ThrowExceptionMarker::construct(&marker(schema, vec![ty("System.ArgumentException")]), &compilation)
            .unwrap_err();
        assert_eq!(
            err.reason,
            ViolationReason::UnexpectedSupertype {
                exception: "global::System.ArgumentException".to_string(),
                expected: "global::System.Attribute".to_string(),
                found: "global::System.SystemException".to_string(),
            }
        );
    }

    #[test]
    fn test_construct_accepts_the_observed_supertype() {
        let (compilation, schema) = compilation_with("App.OddFault", Some("System.Attribute"));
        let built = ThrowExceptionMarker::construct(&marker(schema, vec![ty("App.OddFault")]), &compilation).unwrap();
        assert_eq!(built.exception, TypeRef::from_metadata_name("App.OddFault"));
    }

    #[test]
    fn test_construct_rejects_root_type() {
        let (compilation, schema) = compilation_with("App.Root", None);
        let err = ThrowExceptionMarker::construct(&marker(schema, vec![ty("App.Root")]), &compilation).unwrap_err();
        assert!(err.to_string().contains("(none)"), "{err}");
    }

    #[test]
    fn test_construct_reports_location() {
        let (compilation, schema) = compilation_with("System.ArgumentException", Some("System.SystemException"));
        let data = marker(schema, vec![ty("System.ArgumentException")]).at(SourceLocation {
            file: "Program.cs".to_string(),
            line: 9,
            column: 2,
        });
        let err = ThrowExceptionMarker::construct(&data, &compilation).unwrap_err();
        assert!(err.to_string().starts_with("Program.cs:9:2: "), "{err}");
    }

    #[test]
    fn test_construct_unknown_type() {
        let (compilation, schema) = compilation_with("System.ArgumentException", None);
        let err = ThrowExceptionMarker::construct(&marker(schema, vec![ty("App.Missing")]), &compilation).unwrap_err();
        assert!(matches!(err.reason, ViolationReason::UnknownExceptionType { .. }));
    }

    #[test]
    fn test_bootstrap_hint_name() {
        assert_eq!(
            MarkerSchema::bootstrap_artifact(&WriterConfig::default()).hint_name,
            "ExceptionSupplement.ThrowExceptionAttribute.g.cs"
        );
    }

    #[test]
    fn test_bootstrap_is_fixed() {
        let a = MarkerSchema::bootstrap_artifact(&WriterConfig::default());
        let b = MarkerSchema::bootstrap_artifact(&WriterConfig::default());
        assert_eq!(a, b);
        assert!(a.source.contains("    internal sealed class ThrowExceptionAttribute : global::System.Attribute\n"));
        assert!(a.source.contains(
            "            if (type.BaseType != typeof(global::System.Attribute)) throw new global::System.ArgumentException();\n"
        ));
    }

    #[test]
    fn test_register_resolves() {
        let mut compilation = Compilation::new();
        let id = MarkerSchema::register(&mut compilation);
        assert_eq!(compilation.resolve_schema(MarkerSchema::FULL_NAME), Ok(id));
    }
}
