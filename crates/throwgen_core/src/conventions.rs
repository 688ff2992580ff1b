//! Well-known names shared by the generator and its host.

/// Namespace the marker schema lives in.
pub const SCHEMA_NAMESPACE: &str = "ExceptionSupplement";

/// Simple name of the marker schema type.
pub const SCHEMA_NAME: &str = "ThrowExceptionAttribute";

/// Fully qualified (metadata) name of the marker schema type.
pub const SCHEMA_FULL_NAME: &str = "ExceptionSupplement.ThrowExceptionAttribute";

/// Base type of the marker schema. Also the supertype the schema's argument check compares against.
pub const SCHEMA_BASE_TYPE: &str = "System.Attribute";

/// Name of the optional boolean constructor parameter of the schema.
pub const SCHEMA_STATIC_PARAMETER: &str = "isStatic";

/// Suffix removed from exception type names when deriving wrapper names.
pub const EXCEPTION_SUFFIX: &str = "Exception";

/// Prefix of every generated wrapper method.
pub const WRAPPER_PREFIX: &str = "Throw";

/// Extension appended to every artifact hint name.
pub const ARTIFACT_EXTENSION: &str = ".g.cs";

/// Prefix of fully qualified type names in emitted source.
pub const GLOBAL_ALIAS: &str = "global::";

/// Statement terminator of the emitted language.
pub const STATEMENT_TERMINATOR: &str = ";";

/// Prefix that turns a reserved word into a verbatim identifier.
pub const VERBATIM_PREFIX: char = '@';

/// Separator between a generic type name and its arity in artifact keys.
pub const ARITY_SEPARATOR: char = '`';
