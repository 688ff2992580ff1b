//! Exception introspection: which constructors a wrapper can be generated for.

use crate::frontend::symbols::{Compilation, Constructor, TypeDescriptor};
use crate::frontend::types::TypeRef;

use super::errors::{EmitError, EmitErrorKind};

/// Look up the descriptor of the exception type a marker names.
pub fn resolve_exception<'c>(compilation: &'c Compilation, exception: &TypeRef) -> Result<&'c TypeDescriptor, EmitError> {
    compilation.lookup_type(exception).ok_or_else(|| {
        EmitError::from(EmitErrorKind::UnresolvedExceptionType {
            name: exception.to_string(),
        })
    })
}

/// Public constructors in declaration order. No filtering on arity or parameter types.
pub fn public_constructors(exception: &TypeDescriptor) -> impl Iterator<Item = &Constructor> {
    exception
        .constructors
        .iter()
        .filter(|ctor| ctor.accessibility.is_public())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontend::symbols::{Accessibility, Parameter};
    use throwgen_core::predefined::PredefinedType;

    fn string_param(name: &str) -> Parameter {
        Parameter::new(TypeRef::Predefined(PredefinedType::String), name)
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            reference: TypeRef::from_metadata_name("App.Fault"),
            base_type: Some(TypeRef::from_metadata_name("System.Exception")),
            constructors: vec![
                Constructor::public(vec![]),
                Constructor {
                    accessibility: Accessibility::Protected,
                    parameters: vec![string_param("hidden")],
                },
                Constructor::public(vec![string_param("message")]),
                Constructor {
                    accessibility: Accessibility::Internal,
                    parameters: vec![],
                },
                Constructor {
                    accessibility: Accessibility::Private,
                    parameters: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_only_public_constructors_in_order() {
        let exception = descriptor();
        let arities: Vec<usize> = public_constructors(&exception).map(|c| c.parameters.len()).collect();
        assert_eq!(arities, vec![0, 1]);
    }

    #[test]
    fn test_no_public_constructors() {
        let mut exception = descriptor();
        exception.constructors.retain(|c| !c.accessibility.is_public());
        assert_eq!(public_constructors(&exception).count(), 0);
    }

    #[test]
    fn test_resolve_exception() {
        let mut compilation = Compilation::new();
        compilation.add_type(descriptor()).unwrap();
        assert!(resolve_exception(&compilation, &TypeRef::from_metadata_name("App.Fault")).is_ok());

        let err = resolve_exception(&compilation, &TypeRef::from_metadata_name("App.Missing")).unwrap_err();
        assert_eq!(err.kind().name(), "UnresolvedExceptionType");
    }
}
