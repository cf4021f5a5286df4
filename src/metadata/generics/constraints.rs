//! Base-type and interface synthesis from resolved constraints.
//!
//! A generic parameter's effective supertype structure is not stored in
//! metadata; it is re-derived from the parameter's ordered constraint list:
//!
//! - The synthesized base type is the first constraint in declaration order
//!   that is not an interface. Without a class constraint the base type is
//!   the root object type.
//! - The directly implemented interfaces are every interface constraint, in
//!   declaration order, duplicates preserved. Transitive closure and
//!   de-duplication belong to the caller enumerating the full interface set.
//!
//! Multiple class constraints are not legal in the constraint languages this
//! models, but if present only the first in declaration order is honored.
//! This is a deterministic tie-break, not an error.

use std::sync::Arc;

use crate::{
    metadata::{
        generics::GenericContext,
        typesystem::{ConstraintRef, TypeEntityRc, TypeRegistry, TypeResolver},
    },
    Result,
};

/// Derives a generic parameter's synthesized base type and interface list
/// from its raw constraint list.
///
/// All derivations are pure functions of the resolved constraint sequence;
/// the resolver holds no per-parameter state. Callers decide whether and
/// where to cache results.
pub struct ConstraintResolver {
    /// Registry supplying resolved entities and the root object type
    registry: Arc<TypeRegistry>,
}

impl ConstraintResolver {
    /// Create a new resolver over the given registry
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        ConstraintResolver { registry }
    }

    /// Resolve an ordered raw constraint list against a substitution
    /// context, preserving declaration order.
    ///
    /// An empty list short-circuits to an empty vector without touching the
    /// type resolver.
    ///
    /// # Errors
    /// Returns an error if any constraint reference cannot be resolved
    /// (unknown token or a parameter position missing from the context);
    /// no partial result is produced.
    pub fn resolve_all(
        &self,
        references: &[ConstraintRef],
        context: &GenericContext,
    ) -> Result<Vec<TypeEntityRc>> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let resolver = TypeResolver::new(self.registry.clone());
        let mut resolved = Vec::with_capacity(references.len());
        for reference in references {
            resolved.push(resolver.resolve(reference, context)?);
        }

        Ok(resolved)
    }

    /// The synthesized base type: the first resolved constraint that is not
    /// an interface, or the root object type if every constraint is an
    /// interface (or there are none).
    #[must_use]
    pub fn base_type(&self, resolved: &[TypeEntityRc]) -> TypeEntityRc {
        for constraint in resolved {
            if constraint.kind.is_interface() {
                continue;
            }
            return constraint.clone();
        }

        self.registry.object_type()
    }

    /// The synthesized directly implemented interfaces: every resolved
    /// constraint that is an interface, in declaration order.
    #[must_use]
    pub fn direct_interfaces(&self, resolved: &[TypeEntityRc]) -> Vec<TypeEntityRc> {
        resolved
            .iter()
            .filter(|constraint| constraint.kind.is_interface())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        token::Token,
        typesystem::{TypeAttributes, TypeEntity, TypeKind},
    };

    fn entity(token: u32, kind: TypeKind, name: &str) -> TypeEntityRc {
        Arc::new(TypeEntity::new(
            Token::new(token),
            kind,
            "System",
            name,
            TypeAttributes::PUBLIC,
        ))
    }

    fn resolver() -> ConstraintResolver {
        ConstraintResolver::new(Arc::new(TypeRegistry::new()))
    }

    #[test]
    fn empty_list_synthesizes_object_base() {
        let resolver = resolver();
        let resolved = resolver
            .resolve_all(&[], &GenericContext::empty())
            .unwrap();
        assert!(resolved.is_empty());

        assert_eq!(resolver.base_type(&resolved).fullname(), "System.Object");
        assert!(resolver.direct_interfaces(&resolved).is_empty());
    }

    #[test]
    fn class_constraint_wins_regardless_of_position() {
        let resolver = resolver();
        let disposable = entity(0x02000010, TypeKind::Interface, "IDisposable");
        let base_class = entity(0x02000011, TypeKind::Class, "SomeBaseClass");
        let enumerable = entity(0x02000012, TypeKind::Interface, "IEnumerable");

        // [IDisposable, SomeBaseClass, IEnumerable]
        let resolved = vec![disposable.clone(), base_class.clone(), enumerable.clone()];

        let base = resolver.base_type(&resolved);
        assert!(Arc::ptr_eq(&base, &base_class));

        let interfaces = resolver.direct_interfaces(&resolved);
        assert_eq!(interfaces.len(), 2);
        assert!(Arc::ptr_eq(&interfaces[0], &disposable));
        assert!(Arc::ptr_eq(&interfaces[1], &enumerable));
    }

    #[test]
    fn interface_only_constraints_fall_back_to_object() {
        let resolver = resolver();
        let disposable = entity(0x02000010, TypeKind::Interface, "IDisposable");
        let enumerable = entity(0x02000012, TypeKind::Interface, "IEnumerable");

        let resolved = vec![disposable.clone(), enumerable.clone()];
        assert_eq!(resolver.base_type(&resolved).fullname(), "System.Object");

        let interfaces = resolver.direct_interfaces(&resolved);
        assert_eq!(interfaces.len(), 2);
        assert!(Arc::ptr_eq(&interfaces[0], &disposable));
        assert!(Arc::ptr_eq(&interfaces[1], &enumerable));
    }

    #[test]
    fn two_class_constraints_first_wins() {
        let resolver = resolver();
        let first = entity(0x02000011, TypeKind::Class, "FirstBase");
        let second = entity(0x02000013, TypeKind::Class, "SecondBase");

        // Malformed input; the tie-break is first-in-declaration-order, not an error
        let resolved = vec![first.clone(), second.clone()];
        assert!(Arc::ptr_eq(&resolver.base_type(&resolved), &first));

        let reordered = vec![second.clone(), first.clone()];
        assert!(Arc::ptr_eq(&resolver.base_type(&reordered), &second));
    }

    #[test]
    fn value_type_constraint_counts_as_class_constraint() {
        let resolver = resolver();
        let value_type = entity(0x02000014, TypeKind::ValueType, "ValueType");
        let resolved = vec![value_type.clone()];
        assert!(Arc::ptr_eq(&resolver.base_type(&resolved), &value_type));
        assert!(resolver.direct_interfaces(&resolved).is_empty());
    }

    #[test]
    fn duplicate_interfaces_are_not_deduplicated() {
        let resolver = resolver();
        let disposable = entity(0x02000010, TypeKind::Interface, "IDisposable");

        let resolved = vec![disposable.clone(), disposable.clone()];
        let interfaces = resolver.direct_interfaces(&resolved);
        assert_eq!(interfaces.len(), 2);
    }
}
