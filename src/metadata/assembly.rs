//! Assembly identity for declaring-entity attribution.
//!
//! A generic parameter's assembly is never stored on the parameter itself;
//! it is derived by delegation through the declaring type. This module holds
//! the minimal assembly identity that delegation resolves to.

use std::sync::Arc;

use crate::metadata::token::Token;

/// Reference to an [`Assembly`]
pub type AssemblyRc = Arc<Assembly>;

/// The identity of an assembly that owns type definitions.
pub struct Assembly {
    /// Token
    pub token: Token,
    /// a 2-byte value specifying the Major version number
    pub major_version: u32,
    /// a 2-byte value specifying the Minor version number
    pub minor_version: u32,
    /// a 2-byte value specifying the Build number
    pub build_number: u32,
    /// a 2-byte value specifying the Revision number
    pub revision_number: u32,
    /// The simple name of the assembly
    pub name: String,
}

impl Assembly {
    /// Create a new assembly identity
    pub fn new(token: Token, name: &str, version: (u32, u32, u32, u32)) -> Self {
        Assembly {
            token,
            major_version: version.0,
            minor_version: version.1,
            build_number: version.2,
            revision_number: version.3,
            name: name.to_string(),
        }
    }

    /// Returns the display name of the assembly, e.g. `Core, Version=4.0.0.0`
    #[must_use]
    pub fn fullname(&self) -> String {
        format!(
            "{}, Version={}.{}.{}.{}",
            self.name,
            self.major_version,
            self.minor_version,
            self.build_number,
            self.revision_number
        )
    }
}
