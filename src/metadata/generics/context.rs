//! Substitution context for constraint resolution.
//!
//! Constraints may reference other generic parameters (`T : IComparable<T>`,
//! or a method parameter constrained by the enclosing type's parameter). The
//! [`GenericContext`] maps type- and method-parameter positions to the
//! entities standing in for them. For an open definition those entities are
//! the parameters' own placeholders; the context never owns the mapping's
//! targets.

use crate::metadata::typesystem::TypeEntityRc;

/// An opaque mapping from type-parameter and method-parameter positions to
/// type arguments, used when resolving constraints that themselves reference
/// generic parameters.
///
/// A type-level parameter's context carries only type arguments. A
/// method-level parameter's context additionally chains the declaring type's
/// arguments in, so constraints on a method parameter may reference the
/// enclosing type's parameters.
#[derive(Clone, Default)]
pub struct GenericContext {
    /// Arguments for the declaring type's parameter positions
    type_args: Vec<TypeEntityRc>,
    /// Arguments for the declaring method's parameter positions
    method_args: Vec<TypeEntityRc>,
}

impl GenericContext {
    /// A context that can resolve no parameter positions
    #[must_use]
    pub fn empty() -> Self {
        GenericContext::default()
    }

    /// Context for a type-level parameter: positions resolve against the
    /// declaring type's argument list only
    #[must_use]
    pub fn for_type(type_args: Vec<TypeEntityRc>) -> Self {
        GenericContext {
            type_args,
            method_args: Vec::new(),
        }
    }

    /// Context for a method-level parameter: method positions resolve
    /// against the method's argument list, type positions against the
    /// chained declaring type's argument list
    #[must_use]
    pub fn for_method(type_args: Vec<TypeEntityRc>, method_args: Vec<TypeEntityRc>) -> Self {
        GenericContext {
            type_args,
            method_args,
        }
    }

    /// The argument at the given type-parameter position, if present
    #[must_use]
    pub fn type_argument(&self, index: u32) -> Option<TypeEntityRc> {
        self.type_args.get(index as usize).cloned()
    }

    /// The argument at the given method-parameter position, if present
    #[must_use]
    pub fn method_argument(&self, index: u32) -> Option<TypeEntityRc> {
        self.method_args.get(index as usize).cloned()
    }

    /// True if no positions can be resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_args.is_empty() && self.method_args.is_empty()
    }
}
