//! Generic parameter descriptors and constraint-driven supertype synthesis.
//!
//! A generic parameter (`T` in `List<T>`) has no stored base type or
//! interface list; both are derived from its declared constraints. This
//! module provides the descriptor, the substitution context used while
//! resolving constraints, and the derivation rules:
//!
//! - [`GenericParam`]: the parameter descriptor (position, declaring entity,
//!   constraints, derived properties)
//! - [`GenericParamOwner`]: the closed variant set of declaring entities
//!   (type-level vs method-level parameters)
//! - [`GenericContext`]: the substitution context for constraints that
//!   reference other generic parameters
//! - [`ConstraintResolver`]: derives the synthesized base type and
//!   directly-implemented-interfaces list from a resolved constraint
//!   sequence
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::metadata::{
//!     generics::{GenericParam, GenericParamAttributes, GenericParamOwner},
//!     token::Token,
//!     typesystem::{TypeAttributes, TypeEntity, TypeKind, TypeRegistry},
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let container = Arc::new(TypeEntity::new(
//!     Token::new(0x02000001),
//!     TypeKind::Class,
//!     "App",
//!     "Container`1",
//!     TypeAttributes::PUBLIC,
//! ));
//! registry.insert(&container)?;
//!
//! let param = Arc::new(GenericParam::new(
//!     Token::new(0x2A000001),
//!     0,
//!     GenericParamAttributes::empty(),
//!     "T",
//!     registry.clone(),
//! ));
//! param.set_owner(GenericParamOwner::Type(container.clone().into()))?;
//! container.generic_params.push(param.clone());
//!
//! // Unconstrained: the synthesized base type is the root object type
//! assert_eq!(param.base_type()?.fullname(), "System.Object");
//! assert!(param.direct_interfaces()?.is_empty());
//! # Ok::<(), typescope::Error>(())
//! ```

mod constraints;
mod context;
mod param;

use std::sync::Arc;

use bitflags::bitflags;
use crossbeam_skiplist::SkipMap;

pub use constraints::ConstraintResolver;
pub use context::GenericContext;
pub use param::{GenericParam, GenericParamOwner};

use crate::metadata::token::Token;

/// A map that holds the mapping of Token to parsed `GenericParam`
pub type GenericParamMap = SkipMap<Token, GenericParamRc>;
/// A vector that holds a list of `GenericParam`
pub type GenericParamList = Arc<boxcar::Vec<GenericParamRc>>;
/// A reference to a `GenericParam`
pub type GenericParamRc = Arc<GenericParam>;

bitflags! {
    /// All possible flags for `GenericParamAttributes`, §II.23.1.7
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GenericParamAttributes: u32 {
        /// The generic parameter is covariant
        const COVARIANT = 0x0001;
        /// The generic parameter is contravariant
        const CONTRAVARIANT = 0x0002;
        /// The generic parameter has a reference type constraint
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The generic parameter has a value type constraint
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The generic parameter has a default constructor constraint
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

impl GenericParamAttributes {
    /// Mask for the variance bits
    pub const VARIANCE_MASK: u32 = 0x0003;

    /// Extract the variance bits from this flag set
    #[must_use]
    pub fn variance(&self) -> u32 {
        self.bits() & Self::VARIANCE_MASK
    }
}
