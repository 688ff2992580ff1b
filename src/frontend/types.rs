//! Type references as they appear in constructor signatures and marker arguments.
//!
//! A [`TypeRef`] is a resolved-enough description of a type to print it fully qualified and to look it up
//! in the [`Compilation`](super::symbols::Compilation). It does not know whether a dotted segment is a
//! namespace or a containing type: both display the same way.

use std::fmt;

use throwgen_core::conventions::{ARITY_SEPARATOR, GLOBAL_ALIAS};
use throwgen_core::predefined::{self, PredefinedType};

/// One dotted segment of a named type, with its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameSegment {
    pub name: String,
    pub type_args: Vec<TypeRef>,
}

impl NameSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, type_args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_args,
        }
    }
}

/// A reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type with a keyword spelling (`int`, `string`, ...)
    Predefined(PredefinedType),
    /// A dotted name, outermost segment first (`System.Collections.Generic.List<int>`)
    Named(Vec<NameSegment>),
    /// `T[]`, `T[,]`, ...
    Array { element: Box<TypeRef>, rank: usize },
    /// `T?`
    Nullable(Box<TypeRef>),
    /// `(A, B, ...)`
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    /// Build a non-generic named type from a dotted metadata name (`System.ArgumentException`).
    ///
    /// Metadata names of predefined types normalize to [`TypeRef::Predefined`].
    pub fn from_metadata_name(name: &str) -> Self {
        if let Some(p) = predefined::from_metadata_name(name) {
            return TypeRef::Predefined(p);
        }
        TypeRef::Named(name.split('.').map(NameSegment::new).collect())
    }

    /// Simple (unqualified) name, as used for naming laws. `None` for constructed shapes.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeRef::Predefined(p) => Some(p.simple_name()),
            TypeRef::Named(segments) => segments.last().map(|s| s.name.as_str()),
            _ => None,
        }
    }

    /// Dotted lookup key, with a `` `N `` arity suffix on generic segments. `None` for constructed shapes.
    pub fn metadata_name(&self) -> Option<String> {
        match self {
            TypeRef::Predefined(p) => Some(p.metadata_name().to_string()),
            TypeRef::Named(segments) => {
                let parts: Vec<String> = segments
                    .iter()
                    .map(|s| {
                        if s.type_args.is_empty() {
                            s.name.clone()
                        } else {
                            format!("{}{ARITY_SEPARATOR}{}", s.name, s.type_args.len())
                        }
                    })
                    .collect();
                Some(parts.join("."))
            }
            _ => None,
        }
    }

    /// Fully qualified display: `global::` on named types, keywords for predefined types.
    pub fn fully_qualified(&self) -> String {
        let mut out = String::new();
        self.write_fully_qualified(&mut out);
        out
    }

    fn write_fully_qualified(&self, out: &mut String) {
        match self {
            TypeRef::Predefined(p) => out.push_str(p.keyword()),
            TypeRef::Named(segments) => {
                out.push_str(GLOBAL_ALIAS);
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&segment.name);
                    write_args(&segment.type_args, out);
                }
            }
            TypeRef::Array { element, rank } => {
                element.write_fully_qualified(out);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            TypeRef::Nullable(inner) => {
                inner.write_fully_qualified(out);
                out.push('?');
            }
            TypeRef::Tuple(elements) => {
                out.push('(');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    element.write_fully_qualified(out);
                }
                out.push(')');
            }
        }
    }
}

fn write_args(args: &[TypeRef], out: &mut String) {
    if args.is_empty() {
        return;
    }
    out.push('<');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        arg.write_fully_qualified(out);
    }
    out.push('>');
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fully_qualified())
    }
}
