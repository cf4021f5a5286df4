//! # typescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the typescope library. Import this module to get quick access to the
//! essential types for generic parameter reflection.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all typescope operations
pub use crate::Error;

/// The result type used throughout typescope
pub use crate::Result;

// ================================================================================================
// Metadata System - Core Types
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Assembly identity
pub use crate::metadata::assembly::{Assembly, AssemblyRc};

/// Methods as generic parameter owners
pub use crate::metadata::method::{Method, MethodList, MethodRc, MethodRef};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    ConstraintRef, TypeAttributes, TypeEntity, TypeEntityList, TypeEntityRc, TypeEntityRef,
    TypeEntityRefList, TypeKind, TypeRegistry, TypeResolver,
};

// ================================================================================================
// Generics
// ================================================================================================

/// Generic parameter descriptors and constraint-derived views
pub use crate::metadata::generics::{
    ConstraintResolver, GenericContext, GenericParam, GenericParamAttributes, GenericParamList,
    GenericParamMap, GenericParamOwner, GenericParamRc,
};
