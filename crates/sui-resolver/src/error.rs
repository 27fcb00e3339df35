//! Resolution failures.
//!
//! Every variant is fatal for the build that hit it. They travel inside
//! `anyhow::Error`, so callers inspect them with `downcast_ref`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The registry or direct query returned nothing for a name.
    NameNotFound { name: String },
    /// A layout or direct type query returned nothing for a type string.
    TypeNotFound { type_name: String },
    /// A registry record points at a metadata object the bulk fetch did not return.
    MissingMetadataObject { name: String, object_id: String },
    /// The rewriter found a reference with no entry in the resolution map.
    UnresolvedName { name: String },
    /// A symbolic name is malformed or unsupported by the selected protocol.
    InvalidName { name: String, reason: String },
    /// A resolved value could itself be read as a symbolic reference or is not an address.
    InvalidResolvedValue { key: String, value: String },
    /// A built transaction still references something that is not concrete.
    UnresolvedReference { command: usize, reference: String },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameNotFound { name } => write!(f, "name not found: {}", name),
            Self::TypeNotFound { type_name } => write!(f, "type not found: {}", type_name),
            Self::MissingMetadataObject { name, object_id } => write!(
                f,
                "metadata object {} for name {} was not returned",
                object_id, name
            ),
            Self::UnresolvedName { name } => {
                write!(f, "no resolution available for name: {}", name)
            }
            Self::InvalidName { name, reason } => write!(f, "invalid name {}: {}", name, reason),
            Self::InvalidResolvedValue { key, value } => {
                write!(f, "resolved value '{}' for {} is not usable", value, key)
            }
            Self::UnresolvedReference { command, reference } => write!(
                f,
                "command {} still references unresolved '{}'",
                command, reference
            ),
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Downcast helper for tests and callers matching on the failure kind.
pub fn resolution_error(err: &anyhow::Error) -> Option<&ResolutionError> {
    err.downcast_ref::<ResolutionError>()
}
