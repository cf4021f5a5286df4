//! Method-level declaring entities.
//!
//! A generic parameter declared by a method (`void Transform<U>()`) reports
//! no declaring type; its assembly and namespace delegate through the
//! method's own declaring type instead. This module provides the minimal
//! method representation that delegation chain needs.

use std::sync::{Arc, OnceLock, Weak};

use crate::{
    metadata::{
        generics::GenericParamList,
        token::Token,
        typesystem::{TypeEntityRc, TypeEntityRef},
    },
    Result,
};

/// Reference to a [`Method`]
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

/// A method that can declare generic parameters.
pub struct Method {
    /// Token
    pub token: Token,
    /// Name of the method
    pub name: String,
    /// The type this method is declared on
    declaring_type: OnceLock<TypeEntityRef>,
    /// All generic parameters this method declares
    pub generic_params: GenericParamList,
}

impl Method {
    /// Create a new method
    pub fn new(token: Token, name: &str) -> Self {
        Method {
            token,
            name: name.to_string(),
            declaring_type: OnceLock::new(),
            generic_params: Arc::new(boxcar::Vec::new()),
        }
    }

    /// The type this method is declared on, if still alive
    pub fn declaring_type(&self) -> Option<TypeEntityRc> {
        self.declaring_type.get().and_then(TypeEntityRef::upgrade)
    }

    /// Attach this method to its declaring type
    ///
    /// # Errors
    /// Returns an error if the declaring type has already been set
    pub fn set_declaring_type(&self, declaring_type: &TypeEntityRc) -> Result<()> {
        self.declaring_type
            .set(TypeEntityRef::new(declaring_type))
            .map_err(|_| malformed_error!("Declaring type of {} already set", self.name))
    }
}

/// A smart reference to a `Method` that automatically handles weak
/// references, preventing cycles between methods, their parameters and
/// their declaring types.
#[derive(Clone)]
pub struct MethodRef {
    weak_ref: Weak<Method>,
}

impl MethodRef {
    /// Create a new `MethodRef` from a strong reference
    pub fn new(strong_ref: &MethodRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the method, returning None if it has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<MethodRc> {
        self.weak_ref.upgrade()
    }

    /// Get the token of the referenced method (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|m| m.token)
    }
}

impl From<MethodRc> for MethodRef {
    fn from(strong_ref: MethodRc) -> Self {
        Self::new(&strong_ref)
    }
}
