//! Wrapper emission for one declaration.
//!
//! Layout of an artifact, shells opened outermost first and closed innermost first:
//!
//! ```text
//! namespace App
//! {
//!     static partial class H
//!     {
//!         public static void ThrowArgument(string message)
//!         {
//!             throw new global::System.ArgumentException(message);
//!         }
//!     }
//! }
//! ```
//!
//! The namespace shell is omitted for the global namespace. Containing types get one `partial` shell each.

use throwgen_core::naming::{escape_identifier, is_identifier, wrapper_method_name};

use super::artifact::{self, Artifact};
use super::errors::{EmitError, EmitErrorKind};
use super::introspect::{public_constructors, resolve_exception};
use super::schema::ThrowExceptionMarker;
use crate::format::{IndentedWriter, WriterConfig};
use crate::frontend::symbols::{Compilation, Constructor, Declaration, MarkerData, Parameter, TypeShell};
use crate::frontend::types::TypeRef;

/// Emit the artifact for `declaration` from its matching markers, in marker order.
pub fn emit_declaration(
    compilation: &Compilation,
    declaration: &Declaration,
    markers: &[&MarkerData],
    config: &WriterConfig,
) -> Result<Artifact, EmitError> {
    let mut w = IndentedWriter::new(config.clone());
    let mut open_blocks = 0usize;

    if !declaration.namespace.is_global() {
        w.token("namespace ")
            .token(&declaration.namespace.to_string())
            .line()
            .token("{")
            .line()
            .indent();
        open_blocks += 1;
    }

    for shell in declaration.containing_types.iter().chain(std::iter::once(&declaration.shell)) {
        open_shell(&mut w, shell);
        open_blocks += 1;
    }

    for data in markers {
        let marker = ThrowExceptionMarker::read(data)?;
        let exception = resolve_exception(compilation, &marker.exception)?;
        let method_name = wrapper_method_name(exception.simple_name());
        for ctor in public_constructors(exception) {
            emit_wrapper(&mut w, &method_name, &marker, ctor)?;
        }
    }

    for _ in 0..open_blocks {
        w.dedent().token("}").line();
    }

    Ok(Artifact {
        hint_name: artifact::hint_name(declaration),
        source: w.finish(),
    })
}

fn open_shell(w: &mut IndentedWriter, shell: &TypeShell) {
    if shell.is_static {
        w.token("static ");
    }
    w.token("partial ")
        .token(shell.kind.keyword())
        .token(" ")
        .token(&escape_identifier(&shell.name));
    if !shell.type_parameters.is_empty() {
        w.token("<")
            .separated(&shell.type_parameters, ", ", |w, param| {
                w.token(param);
            })
            .token(">");
    }
    w.line().token("{").line().indent();
}

fn emit_wrapper(
    w: &mut IndentedWriter,
    method_name: &str,
    marker: &ThrowExceptionMarker,
    ctor: &Constructor,
) -> Result<(), EmitError> {
    let names = ctor
        .parameters
        .iter()
        .map(|param| parameter_name(&marker.exception, param))
        .collect::<Result<Vec<_>, _>>()?;

    w.token("public static void ")
        .token(method_name)
        .token("(")
        .separated(ctor.parameters.iter().zip(&names), ", ", |w, (param, name)| {
            if let Some(modifier) = param.ref_kind.declaration_modifier() {
                w.token(modifier).token(" ");
            }
            w.token(&param.ty.fully_qualified()).token(" ").token(name);
        })
        .token(")")
        .line()
        .token("{")
        .line()
        .indent();

    w.token("throw new ")
        .token(&marker.exception.fully_qualified())
        .token("(")
        .separated(ctor.parameters.iter().zip(&names), ", ", |w, (param, name)| {
            if let Some(modifier) = param.ref_kind.argument_modifier() {
                w.token(modifier).token(" ");
            }
            w.token(name);
        })
        .token(")")
        .statement();

    w.dedent().token("}").line();
    Ok(())
}

fn parameter_name(exception: &TypeRef, param: &Parameter) -> Result<String, EmitError> {
    if !is_identifier(&param.name) {
        return Err(EmitErrorKind::InvalidParameterName {
            exception: exception.to_string(),
            name: param.name.clone(),
        }
        .into());
    }
    Ok(escape_identifier(&param.name))
}
