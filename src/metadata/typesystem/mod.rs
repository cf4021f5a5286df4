//! Managed type-system modeling for reflection metadata.
//!
//! This module provides the resolved type-system entities that constraint
//! resolution operates on. It bridges the gap between raw constraint
//! references supplied by a metadata store and a usable type system for
//! deriving a generic parameter's effective supertype structure.
//!
//! # Key Components
//!
//! - [`TypeEntity`]: Core resolved type representation (classes, interfaces,
//!   value types, synthesized generic instances and parameter placeholders)
//! - [`TypeRegistry`]: Central registry for all entities, including the root
//!   object type every unconstrained parameter falls back to
//! - [`TypeResolver`]: Resolves raw constraint references within a
//!   substitution context
//! - [`TypeKind`]: Classification used to partition constraints into class
//!   and interface constraints
//!
//! # Examples
//!
//! ```rust
//! use typescope::metadata::typesystem::{TypeKind, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let object = registry.object_type();
//! assert_eq!(object.fullname(), "System.Object");
//! assert!(!object.kind.is_interface());
//! ```

mod registry;
mod resolver;

use std::sync::{Arc, OnceLock, Weak};

pub use registry::TypeRegistry;
pub use resolver::{ConstraintRef, TypeResolver};

use crate::{
    metadata::{assembly::AssemblyRc, generics::GenericParamList, token::Token},
    Result,
};

/// A vector that holds a list of `TypeEntity`
pub type TypeEntityList = Arc<boxcar::Vec<TypeEntityRc>>;
/// Reference to a `TypeEntity`
pub type TypeEntityRc = Arc<TypeEntity>;
/// A vector that holds `TypeEntityRef` instances (weak references)
pub type TypeEntityRefList = Arc<boxcar::Vec<TypeEntityRef>>;

#[allow(non_snake_case)]
/// All possible flags for `TypeAttributes`, §II.23.1.15
pub mod TypeAttributes {
    /// The type is not publicly visible
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// The type is publicly visible
    pub const PUBLIC: u32 = 0x0000_0001;
    /// The type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// The type is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// The type is sealed
    pub const SEALED: u32 = 0x0000_0100;
}

/// Classification of a type-system entity.
///
/// An entity is an interface constraint iff its kind reports
/// [`TypeKind::Interface`]; everything else counts as a class constraint
/// when it appears in a generic parameter's constraint list.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
pub enum TypeKind {
    /// A concrete or abstract class
    Class,
    /// An interface
    Interface,
    /// A value type
    ValueType,
    /// The root object type (`System.Object`)
    Object,
    /// A generic parameter placeholder standing for the parameter itself
    GenericParameter {
        /// Index in the owner's generic parameter list
        index: u32,
        /// Whether the owner is a method (true) or a type (false)
        method: bool,
    },
    /// Kind could not be determined
    Unknown,
}

impl TypeKind {
    /// Check whether this entity classifies as an interface constraint
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeKind::Interface)
    }

    /// Check whether this entity stands for an unsubstituted generic parameter
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeKind::GenericParameter { .. })
    }
}

/// A smart reference to a `TypeEntity` that automatically handles weak
/// references to prevent circular reference memory leaks while providing a
/// clean API. Owners reference their parameters strongly; everything pointing
/// back at an owner goes through this type.
#[derive(Clone, Debug)]
pub struct TypeEntityRef {
    weak_ref: Weak<TypeEntity>,
}

impl TypeEntityRef {
    /// Create a new `TypeEntityRef` from a strong reference
    pub fn new(strong_ref: &TypeEntityRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the entity, returning None if it has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeEntityRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced entity is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced entity (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the name of the referenced entity (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }

    /// Get the namespace of the referenced entity (if still alive)
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        self.upgrade().map(|t| t.namespace.clone())
    }

    /// Get the `generic_params` collection of the referenced entity (if still alive)
    #[must_use]
    pub fn generic_params(&self) -> Option<GenericParamList> {
        self.upgrade().map(|t| t.generic_params.clone())
    }
}

impl From<TypeEntityRc> for TypeEntityRef {
    fn from(strong_ref: TypeEntityRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// A resolved type-system entity.
///
/// Combines what a metadata store would expose across its type definition
/// and reference tables into one resolved item. Synthesized entities
/// (generic instances, parameter placeholders) use artificial tokens
/// allocated by the [`TypeRegistry`].
pub struct TypeEntity {
    /// Token
    pub token: Token,
    /// Classification of this entity
    pub kind: TypeKind,
    /// Namespace (can be empty, e.g. for parameter placeholders)
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Flags (a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15)
    pub flags: u32,
    /// This entity's base aka 'extends'
    base: OnceLock<TypeEntityRef>,
    /// All interfaces this entity directly implements
    pub interfaces: TypeEntityRefList,
    /// All generic parameters this entity declares (open definition, not an instantiation)
    pub generic_params: GenericParamList,
    /// The assembly this entity is defined in
    assembly: OnceLock<AssemblyRc>,
}

impl TypeEntity {
    /// Create a new instance of a `TypeEntity`
    pub fn new(token: Token, kind: TypeKind, namespace: &str, name: &str, flags: u32) -> Self {
        TypeEntity {
            token,
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            base: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            generic_params: Arc::new(boxcar::Vec::new()),
            assembly: OnceLock::new(),
        }
    }

    /// Access the base type of this entity, if it exists
    pub fn base(&self) -> Option<TypeEntityRc> {
        if let Some(base) = self.base.get() {
            base.upgrade()
        } else {
            None
        }
    }

    /// Set the base type of this entity
    ///
    /// # Errors
    /// Returns an error if the base has already been set
    pub fn set_base(&self, base: TypeEntityRc) -> Result<()> {
        self.base
            .set(base.into())
            .map_err(|_| malformed_error!("Base of {} already set", self.fullname()))
    }

    /// Access the assembly this entity is defined in, if attributed
    pub fn assembly(&self) -> Option<AssemblyRc> {
        self.assembly.get().cloned()
    }

    /// Attribute this entity to an assembly
    ///
    /// # Errors
    /// Returns an error if the assembly has already been set
    pub fn set_assembly(&self, assembly: AssemblyRc) -> Result<()> {
        self.assembly
            .set(assembly)
            .map_err(|_| malformed_error!("Assembly of {} already set", self.fullname()))
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }
}
