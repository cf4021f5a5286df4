use std::sync::Arc;

use crate::{
    metadata::{
        generics::GenericContext,
        token::Token,
        typesystem::{TypeEntityRc, TypeRegistry},
    },
    Error::{RecursionLimit, TypeNotFound},
    Result,
};

/// Maximum recursion depth for constraint reference resolution
const MAX_RECURSION_DEPTH: usize = 100;

/// A raw constraint reference as emitted by a metadata store, before
/// resolution against a [`GenericContext`].
///
/// Constraint lists are ordered (source declaration order); the order is
/// observable through the synthesized base type and interface list.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintRef {
    /// Direct reference to a registered entity
    Type(Token),
    /// The declaring type's generic parameter at the given position
    Var(u32),
    /// The declaring method's generic parameter at the given position
    MVar(u32),
    /// An instantiated constraint, e.g. `IComparable<T>`: the generic
    /// definition's token plus its argument references, which may themselves
    /// be `Var`/`MVar`
    GenericInst(Token, Vec<ConstraintRef>),
}

/// Resolves raw constraint references to concrete entities in the registry.
///
/// `Var`/`MVar` references go through the supplied substitution context; a
/// position the context cannot supply indicates corrupt or mismatched
/// metadata and resolves to a descriptive error, never a default.
pub struct TypeResolver {
    /// Reference to the type registry
    registry: Arc<TypeRegistry>,
}

impl TypeResolver {
    /// Create a new resolver with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        TypeResolver { registry }
    }

    /// Resolve a constraint reference to a concrete entity
    ///
    /// ## Arguments
    /// * 'reference' - The raw constraint reference to resolve
    /// * 'context'   - The substitution context for `Var`/`MVar` positions
    ///
    /// # Errors
    /// Returns an error if:
    /// - A referenced token cannot be found in the registry
    /// - A `Var`/`MVar` position is missing from the substitution context
    /// - Recursion depth exceeds the maximum limit
    pub fn resolve(
        &self,
        reference: &ConstraintRef,
        context: &GenericContext,
    ) -> Result<TypeEntityRc> {
        self.resolve_with_depth(reference, context, 0)
    }

    /// Internal recursive resolver with depth tracking
    fn resolve_with_depth(
        &self,
        reference: &ConstraintRef,
        context: &GenericContext,
        depth: usize,
    ) -> Result<TypeEntityRc> {
        if depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        match reference {
            ConstraintRef::Type(token) => {
                self.registry.get(token).ok_or(TypeNotFound(*token))
            }
            ConstraintRef::Var(index) => context.type_argument(*index).ok_or_else(|| {
                malformed_error!(
                    "Type parameter {} missing from substitution context",
                    index
                )
            }),
            ConstraintRef::MVar(index) => context.method_argument(*index).ok_or_else(|| {
                malformed_error!(
                    "Method parameter {} missing from substitution context",
                    index
                )
            }),
            ConstraintRef::GenericInst(token, args) => {
                let definition = self.registry.get(token).ok_or(TypeNotFound(*token))?;

                let mut arg_names = Vec::with_capacity(args.len());
                for arg in args {
                    let resolved = self.resolve_with_depth(arg, context, depth + 1)?;
                    arg_names.push(resolved.name.clone());
                }

                // Build a name like IComparable`1<T>. The instance inherits
                // the definition's kind so an instantiated interface
                // constraint still classifies as an interface.
                let name = format!("{}<{}>", definition.name, arg_names.join(","));
                let instance = self.registry.get_or_create(
                    definition.kind.clone(),
                    &definition.namespace,
                    &name,
                );

                if instance.base().is_none() {
                    instance.set_base(definition).ok();
                }

                Ok(instance)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::typesystem::{TypeAttributes, TypeEntity, TypeKind},
        Error,
    };

    fn registry_with(entries: &[(u32, TypeKind, &str, &str)]) -> Arc<TypeRegistry> {
        let registry = Arc::new(TypeRegistry::new());
        for (token, kind, namespace, name) in entries {
            let entity = Arc::new(TypeEntity::new(
                Token::new(*token),
                kind.clone(),
                namespace,
                name,
                TypeAttributes::PUBLIC,
            ));
            registry.insert(&entity).unwrap();
        }
        registry
    }

    fn placeholder(registry: &TypeRegistry, index: u32, method: bool, name: &str) -> TypeEntityRc {
        let entity = Arc::new(TypeEntity::new(
            registry.alloc_token(),
            TypeKind::GenericParameter { index, method },
            "",
            name,
            TypeAttributes::PUBLIC,
        ));
        registry.insert_artificial(&entity);
        entity
    }

    #[test]
    fn resolve_direct_reference() {
        let registry = registry_with(&[(0x02000010, TypeKind::Interface, "System", "IDisposable")]);
        let resolver = TypeResolver::new(registry);

        let resolved = resolver
            .resolve(
                &ConstraintRef::Type(Token::new(0x02000010)),
                &GenericContext::empty(),
            )
            .unwrap();
        assert_eq!(resolved.name, "IDisposable");
        assert!(resolved.kind.is_interface());
    }

    #[test]
    fn resolve_unknown_token_fails() {
        let registry = Arc::new(TypeRegistry::new());
        let resolver = TypeResolver::new(registry);

        let result = resolver.resolve(
            &ConstraintRef::Type(Token::new(0x02999999)),
            &GenericContext::empty(),
        );
        assert!(matches!(result, Err(Error::TypeNotFound(_))));
    }

    #[test]
    fn resolve_var_through_context() {
        let registry = Arc::new(TypeRegistry::new());
        let t = placeholder(&registry, 0, false, "T");
        let resolver = TypeResolver::new(registry);

        let context = GenericContext::for_type(vec![t.clone()]);
        let resolved = resolver.resolve(&ConstraintRef::Var(0), &context).unwrap();
        assert!(Arc::ptr_eq(&resolved, &t));
    }

    #[test]
    fn resolve_mvar_through_context() {
        let registry = Arc::new(TypeRegistry::new());
        let t = placeholder(&registry, 0, false, "T");
        let u = placeholder(&registry, 0, true, "U");
        let resolver = TypeResolver::new(registry);

        let context = GenericContext::for_method(vec![t.clone()], vec![u.clone()]);
        let resolved = resolver.resolve(&ConstraintRef::MVar(0), &context).unwrap();
        assert!(Arc::ptr_eq(&resolved, &u));

        // The chained type arguments stay reachable from the method context
        let resolved = resolver.resolve(&ConstraintRef::Var(0), &context).unwrap();
        assert!(Arc::ptr_eq(&resolved, &t));
    }

    #[test]
    fn resolve_out_of_range_position_is_malformed() {
        let registry = Arc::new(TypeRegistry::new());
        let resolver = TypeResolver::new(registry);

        let result = resolver.resolve(&ConstraintRef::Var(3), &GenericContext::empty());
        assert!(matches!(result, Err(Error::Malformed { .. })));

        let result = resolver.resolve(&ConstraintRef::MVar(0), &GenericContext::empty());
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn resolve_generic_instance_inherits_kind() {
        let registry =
            registry_with(&[(0x02000020, TypeKind::Interface, "System", "IComparable`1")]);
        let t = placeholder(&registry, 0, false, "T");
        let resolver = TypeResolver::new(registry.clone());

        let context = GenericContext::for_type(vec![t]);
        let reference =
            ConstraintRef::GenericInst(Token::new(0x02000020), vec![ConstraintRef::Var(0)]);

        let instance = resolver.resolve(&reference, &context).unwrap();
        assert_eq!(instance.name, "IComparable`1<T>");
        assert_eq!(instance.namespace, "System");
        assert!(instance.kind.is_interface());
        assert_eq!(instance.base().unwrap().name, "IComparable`1");

        // Resolving the same instantiation again reuses the entity
        let again = resolver.resolve(&reference, &context).unwrap();
        assert!(Arc::ptr_eq(&instance, &again));
    }

    #[test]
    fn recursion_limit() {
        let registry = registry_with(&[(0x02000020, TypeKind::Interface, "System", "IEnumerable`1")]);
        let resolver = TypeResolver::new(registry);

        let token = Token::new(0x02000020);
        let mut reference = ConstraintRef::Type(token);
        for _ in 0..MAX_RECURSION_DEPTH + 10 {
            reference = ConstraintRef::GenericInst(token, vec![reference]);
        }

        let result = resolver.resolve(&reference, &GenericContext::empty());
        assert!(matches!(result, Err(Error::RecursionLimit(_))));
    }
}
