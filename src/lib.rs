// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # typescope
//!
//! A reflection model for the generic parameters of a managed type system.
//! Built in pure Rust, `typescope` materializes the metadata a reflection
//! caller observes on a generic parameter - position, declaring entity,
//! constraint list, synthesized base type and directly implemented
//! interfaces - from raw constraint references, without requiring a runtime.
//!
//! ## Features
//!
//! - **Descriptor model** - One immutable descriptor per (declaring entity, position) pair
//! - **Constraint resolution** - Positional substitution through explicit generic contexts
//! - **Synthesized hierarchy** - First class constraint becomes the base type, interface constraints become the interface list
//! - **Lock-free sharing** - Registry and descriptors are shared freely across threads
//! - **Comprehensive error handling** - Corrupt metadata surfaces as errors, never as silent defaults
//!
//! ## Quick Start
//!
//! Add `typescope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! typescope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::prelude::*;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! assert_eq!(registry.object_type().fullname(), "System.Object");
//! ```
//!
//! ### Basic Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::metadata::{
//!     generics::{GenericParam, GenericParamAttributes, GenericParamOwner},
//!     token::Token,
//!     typesystem::{ConstraintRef, TypeAttributes, TypeEntity, TypeKind, TypeRegistry},
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//!
//! let comparable = Arc::new(TypeEntity::new(
//!     Token::new(0x02000005),
//!     TypeKind::Interface,
//!     "System",
//!     "IComparable",
//!     TypeAttributes::PUBLIC | TypeAttributes::INTERFACE,
//! ));
//! registry.insert(&comparable)?;
//!
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
//! param.push_constraint(ConstraintRef::Type(comparable.token));
//! container.generic_params.push(param.clone());
//!
//! // No class constraint, so the base type falls back to the root object
//! assert_eq!(param.base_type()?.fullname(), "System.Object");
//! assert_eq!(param.direct_interfaces()?.len(), 1);
//! # Ok::<(), typescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `typescope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - Tokens, type entities, assemblies, methods, and generics
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::{
//!     metadata::{
//!         generics::GenericContext,
//!         token::Token,
//!         typesystem::{ConstraintRef, TypeRegistry, TypeResolver},
//!     },
//!     Error,
//! };
//!
//! let resolver = TypeResolver::new(Arc::new(TypeRegistry::new()));
//! match resolver.resolve(&ConstraintRef::Type(Token::new(0x02000099)), &GenericContext::empty()) {
//!     Ok(entity) => println!("Resolved {}", entity.fullname()),
//!     Err(Error::TypeNotFound(token)) => println!("Unknown token: {}", token),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types.
///
/// This module provides a curated selection of the most frequently used types
/// from across the typescope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typescope::prelude::*;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let resolver = TypeResolver::new(registry);
/// ```
pub mod prelude;

/// Definitions and resolution of managed type metadata
///
/// This module implements the in-memory metadata model: tokens, type
/// entities, the shared registry, methods, assemblies, and the generic
/// parameter machinery.
///
/// # Key Components
///
/// ## Type System
/// - [`metadata::typesystem`] - Type entities, registry, and constraint resolution
/// - [`metadata::token`] - Metadata tokens for cross-references
///
/// ## Generics
/// - [`metadata::generics`] - Generic parameter descriptors, contexts, and constraint-derived views
///
/// ## Owners
/// - [`metadata::method`] - Methods as generic parameter owners
/// - [`metadata::assembly`] - Assembly identity for attribution delegation
pub mod metadata;

/// `typescope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. This is used consistently throughout the crate for all
/// fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `typescope` Error type
///
/// The main error type for all operations in this crate. Provides detailed
/// error information for metadata validation and constraint resolution.
///
/// # Examples
///
/// ```rust
/// use typescope::Error;
///
/// let err = Error::InvalidArgument("other");
/// assert!(err.to_string().contains("other"));
/// ```
pub use error::Error;
