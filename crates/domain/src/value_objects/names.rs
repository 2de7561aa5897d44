//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty (except Description)
//! - Within length limits (counted in characters, not bytes)
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for actor names (matches the `Actors.Name` column).
pub const MAX_ACTOR_NAME_LENGTH: usize = 32;

/// Maximum length for movie titles
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for invoice numbers and contact names
pub const MAX_INVOICE_FIELD_LENGTH: usize = 32;

/// Maximum length for description fields
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated value.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after
            /// trimming or longer than the column allows.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.chars().count() > $max {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label, $max
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_name!(
    /// A validated actor name (non-empty, <=32 chars, trimmed). Unique across actors.
    ActorName,
    "Actor name",
    MAX_ACTOR_NAME_LENGTH
);

define_name!(
    /// A validated movie title (non-empty, <=200 chars, trimmed)
    MovieTitle,
    "Movie title",
    MAX_TITLE_LENGTH
);

define_name!(InvoiceNumber, "Invoice number", MAX_INVOICE_FIELD_LENGTH);

define_name!(ContactName, "Contact name", MAX_INVOICE_FIELD_LENGTH);

// ============================================================================
// Description
// ============================================================================

/// A validated free-text description (may be empty, <=256 chars, trimmed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Description> for String {
    fn from(value: Description) -> String {
        value.0
    }
}
