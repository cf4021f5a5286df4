//! Metadata representation for managed type systems.
//!
//! This module contains the in-memory model the reflection surface is built
//! on: token identities, type entities, assemblies, methods, and the generic
//! parameter machinery that synthesizes reflection-visible facts from raw
//! constraint lists.
//!
//! # Key Components
//!
//! - [`token`] - Metadata table row references used throughout the model
//! - [`typesystem`] - Type entities, the shared registry, and constraint resolution
//! - [`generics`] - Generic parameter descriptors and the constraint-derived views
//! - [`method`] - Minimal method representation as a generic parameter owner
//! - [`assembly`] - Assembly identity for attribution delegation
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::metadata::typesystem::TypeRegistry;
//!
//! let registry = Arc::new(TypeRegistry::new());
//!
//! // Every registry carries the root object type from the start
//! assert_eq!(registry.object_type().fullname(), "System.Object");
//! ```

/// Implementation of assembly identity
pub mod assembly;
/// Implementation of generic parameters and their constraint-derived views
pub mod generics;
/// Implementation of methods as generic parameter owners
pub mod method;
/// Commonly used metadata token type
pub mod token;
/// Implementation of the type system
pub mod typesystem;
