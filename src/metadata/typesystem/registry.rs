//! Central type registry for reflection metadata resolution.
//!
//! This module provides the [`TypeRegistry`], a thread-safe registry for all
//! type-system entities constraint resolution can reach. It serves as the
//! root-object-type provider (the fallback base type of unconstrained
//! parameters) and as the backing store for synthesized entities such as
//! instantiated constraints and parameter placeholders.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using metadata tokens (`SkipMap`)
//! - **Name-based lookup**: Secondary full-name index (`DashMap`)
//! - **Artificial tokens**: Atomic allocation for synthesized entities
//!
//! # Thread Safety
//!
//! Lock-free data structures are used for primary storage and indices; no
//! blocking operations occur during lookup or insertion. The registry is
//! assumed immutable (no further insertions) once the owning metadata has
//! been loaded, matching the concurrency contract of the descriptors built
//! on top of it.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use typescope::metadata::{
//!     token::Token,
//!     typesystem::{TypeAttributes, TypeEntity, TypeKind, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new();
//!
//! let widget = Arc::new(TypeEntity::new(
//!     Token::new(0x02000010),
//!     TypeKind::Class,
//!     "App",
//!     "Widget",
//!     TypeAttributes::PUBLIC,
//! ));
//! registry.insert(&widget)?;
//!
//! assert!(registry.get(&Token::new(0x02000010)).is_some());
//! assert_eq!(registry.get_by_fullname("App.Widget").unwrap().name, "Widget");
//! # Ok::<(), typescope::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{
        token::Token,
        typesystem::{TypeAttributes, TypeEntity, TypeEntityRc, TypeKind},
    },
    Error::TypeInsert,
    Result,
};

/// Table byte used for tokens of synthesized entities (generic instances,
/// parameter placeholders). Outside the range any metadata store emits.
const TABLE_ARTIFICIAL: u32 = 0xF000_0000;

/// Central registry for all type-system entities.
///
/// Owns the root object type (`System.Object`) that every unconstrained or
/// interface-only-constrained generic parameter synthesizes as its base
/// type.
pub struct TypeRegistry {
    /// Primary storage, keyed by token
    types: SkipMap<Token, TypeEntityRc>,
    /// Secondary index: full name -> token
    fullname_index: DashMap<String, Token>,
    /// Row counter for artificial token allocation
    next_artificial: AtomicU32,
    /// The root object type, preregistered at construction
    object: TypeEntityRc,
}

impl TypeRegistry {
    /// Create a new registry with the root object type preregistered
    #[must_use]
    pub fn new() -> Self {
        let next_artificial = AtomicU32::new(1);
        let object = Arc::new(TypeEntity::new(
            Token::new(TABLE_ARTIFICIAL | next_artificial.fetch_add(1, Ordering::Relaxed)),
            TypeKind::Object,
            "System",
            "Object",
            TypeAttributes::PUBLIC,
        ));

        let registry = TypeRegistry {
            types: SkipMap::new(),
            fullname_index: DashMap::new(),
            next_artificial,
            object: object.clone(),
        };

        registry.types.insert(object.token, object.clone());
        registry
            .fullname_index
            .insert(object.fullname(), object.token);
        registry
    }

    /// The root object type (`System.Object`), used as the fallback base
    /// type for parameters without a class constraint
    #[must_use]
    pub fn object_type(&self) -> TypeEntityRc {
        self.object.clone()
    }

    /// Look up an entity by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeEntityRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up an entity by its full name (Namespace.Name)
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeEntityRc> {
        self.fullname_index
            .get(fullname)
            .and_then(|token| self.get(&token))
    }

    /// Register an entity under its own token
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the token is already occupied
    pub fn insert(&self, entity: &TypeEntityRc) -> Result<()> {
        if self.types.contains_key(&entity.token) {
            return Err(TypeInsert(entity.token));
        }

        self.types.insert(entity.token, entity.clone());
        self.fullname_index.insert(entity.fullname(), entity.token);
        Ok(())
    }

    /// Get an existing synthesized entity by full name, or create and
    /// register it under a fresh artificial token.
    ///
    /// Used for instantiated constraints (`IComparable<T>`) where the same
    /// instantiation may be referenced from several constraint lists.
    pub fn get_or_create(&self, kind: TypeKind, namespace: &str, name: &str) -> TypeEntityRc {
        let fullname = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", namespace, name)
        };

        if let Some(existing) = self.get_by_fullname(&fullname) {
            return existing;
        }

        let entity = Arc::new(TypeEntity::new(
            self.alloc_token(),
            kind,
            namespace,
            name,
            TypeAttributes::PUBLIC,
        ));

        self.types.insert(entity.token, entity.clone());
        self.fullname_index.insert(fullname, entity.token);
        entity
    }

    /// Allocate a fresh artificial token for a synthesized entity
    pub(crate) fn alloc_token(&self) -> Token {
        Token::new(TABLE_ARTIFICIAL | self.next_artificial.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a synthesized entity under its already-allocated artificial
    /// token without touching the full-name index. Parameter placeholders
    /// share simple names ("T") across owners, so they are reachable by
    /// token only.
    pub(crate) fn insert_artificial(&self, entity: &TypeEntityRc) {
        self.types.insert(entity.token, entity.clone());
    }

    /// Number of registered entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no entities are registered (never the case after `new`)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
