use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, covering all errors this library can return.
///
/// Every failure mode is synchronous and propagates directly to the immediate
/// caller; there are no transient failure modes and no retries.
///
/// # Error Categories
///
/// ## Metadata Consistency
/// - [`Error::Malformed`] - Corrupt or mismatched metadata (e.g. a constraint
///   reference or substitution-context lookup that cannot be resolved)
///
/// ## Invalid Arguments
/// - [`Error::InvalidArgument`] - A required argument was absent
///
/// ## Type System Errors
/// - [`Error::TypeInsert`] - Failed to register a new type in the registry
/// - [`Error::TypeNotFound`] - Requested type not found in the registry
/// - [`Error::TypeError`] - General type system operation error
///
/// ## Resolution Errors
/// - [`Error::RecursionLimit`] - Maximum resolution recursion depth exceeded
///
/// # Examples
///
/// ```rust
/// use typescope::{Error, metadata::{token::Token, typesystem::TypeRegistry}};
///
/// let registry = TypeRegistry::new();
/// match registry.get(&Token::new(0x02999999)) {
///     Some(entity) => println!("Found {}", entity.fullname()),
///     None => eprintln!("Type not registered"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is inconsistent and could not be resolved.
    ///
    /// This error indicates corrupt or mismatched metadata, such as a
    /// constraint reference to a generic parameter position that does not
    /// exist in the substitution context. It is fatal to the current
    /// operation and never silently defaulted. The error includes the source
    /// location where the inconsistency was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A required argument was not provided.
    ///
    /// This error occurs when a caller passes an absent value where a
    /// present one is required, such as the `other` argument to
    /// [`crate::metadata::generics::GenericParam::has_same_metadata_definition_as`].
    /// It is locally checkable and reported immediately.
    #[error("Required argument was absent - {0}")]
    InvalidArgument(&'static str),

    /// Failed to insert new type into the [`crate::metadata::typesystem::TypeRegistry`].
    ///
    /// This error occurs when registering a type whose token is already
    /// occupied by a different entity.
    ///
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// Failed to find type in the [`crate::metadata::typesystem::TypeRegistry`].
    ///
    /// This error occurs when a constraint reference names a token that does
    /// not exist in the registry.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(Token),

    /// General error during type system usage.
    ///
    /// Covers type system operations that can fail outside the more specific
    /// variants, such as owner references that have been dropped.
    #[error("{0}")]
    TypeError(String),

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow while resolving nested constraint
    /// references (instantiated constraints may nest arbitrarily), a maximum
    /// recursion depth is enforced. This error indicates that limit was
    /// exceeded.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
