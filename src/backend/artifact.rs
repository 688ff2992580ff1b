//! Generated source artifacts and their hint names.

use std::fmt;

use throwgen_core::conventions::{ARITY_SEPARATOR, ARTIFACT_EXTENSION};

use crate::frontend::symbols::{Declaration, TypeShell};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Key the host merges the source under; unique within a pass
    pub hint_name: String,
    pub source: String,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.hint_name, self.source.len())
    }
}

/// Hint name of a declaration's artifact: `App.Outer`1.H.g.cs`.
///
/// Namespace and containing types are included, `global::` and type parameter names are not. Generic
/// segments carry their arity so `H` and `H<T>` in one namespace do not collide.
pub fn hint_name(declaration: &Declaration) -> String {
    let mut parts: Vec<String> = declaration.namespace.segments().to_vec();
    parts.extend(declaration.containing_types.iter().map(segment));
    parts.push(segment(&declaration.shell));
    format!("{}{ARTIFACT_EXTENSION}", parts.join("."))
}

fn segment(shell: &TypeShell) -> String {
    match shell.type_parameters.len() {
        0 => shell.name.clone(),
        n => format!("{}{ARITY_SEPARATOR}{n}", shell.name),
    }
}
