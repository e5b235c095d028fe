//! Error types for xsdgen
//!
//! Two families of failures exist: schema-time errors raised while building
//! or compiling a schema set (`InvalidSchema`, `UnresolvedReference`) and
//! runtime errors raised by the particle containers while a generated value
//! is populated or serialized (`WrongType`, `NoPlaceForItem`,
//! `MissingRequiredElement`). All of them are fatal for the operation that
//! raised them; nothing is retried.

use std::fmt;
use thiserror::Error;

/// Result type alias using the xsdgen Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// Contradictory or malformed schema structure
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] InvalidSchema),

    /// A qualified reference that could not be resolved to a declaration
    #[error("unresolved reference: {0}")]
    UnresolvedReference(#[from] UnresolvedReference),

    /// An item offered to a container whose type is not in the allowed set
    #[error("wrong type: expected one of [{expected}], got '{actual}'")]
    WrongType {
        /// Comma-joined allowed type witnesses
        expected: String,
        /// Witness of the rejected item
        actual: String,
    },

    /// The slot search exhausted every container without finding room
    #[error("no place to put item of type '{0}'")]
    NoPlaceForItem(String),

    /// A required sequence slot was never populated
    #[error("missing required element '{0}'")]
    MissingRequiredElement(String),

    /// Value error (a lexical value rejected by a facet or built-in type)
    #[error("value error: {0}")]
    Value(String),

    /// Name error (invalid NCName or QName)
    #[error("name error: {0}")]
    Name(String),

    /// XML parsing error from the document layer
    #[error("XML error: {0}")]
    Xml(String),

    /// Resource loading error (import location could not be provided)
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contradictory schema input, surfaced with the offending location
///
/// Raised for mutually exclusive attributes both set, an attribute that is
/// disallowed for its parent, a missing required `base`, an unknown child
/// element, or a duplicate declaration.
#[derive(Debug, Clone)]
pub struct InvalidSchema {
    /// Error message
    pub message: String,
    /// Location of the offending construct (e.g. "complexType 'Foo'")
    pub location: Option<String>,
}

impl InvalidSchema {
    /// Create a new invalid-schema error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the offending location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref loc) = self.location {
            write!(f, " (in {})", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidSchema {}

/// A reference that resolved to nothing
///
/// Carries the reference as written plus the namespace of the schema the
/// lookup started from.
#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    /// The reference as written in the schema document
    pub reference: String,
    /// Target namespace of the schema the resolution started from
    pub from_namespace: Option<String>,
}

impl UnresolvedReference {
    /// Create a new unresolved-reference error
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            from_namespace: None,
        }
    }

    /// Set the namespace resolution started from
    pub fn from_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.from_namespace = Some(namespace.into());
        self
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.reference)?;
        if let Some(ref ns) = self.from_namespace {
            write!(f, " (resolved from schema '{}')", ns)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnresolvedReference {}

impl Error {
    /// Build a `WrongType` error from an allowed set and the offending witness
    pub fn wrong_type<'a, I>(allowed: I, actual: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Error::WrongType {
            expected: allowed.into_iter().collect::<Vec<_>>().join(", "),
            actual: actual.to_string(),
        }
    }
}
