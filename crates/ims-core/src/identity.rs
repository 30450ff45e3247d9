//! # Identifier Newtypes
//!
//! The platform API keys every table by a positive integer. Each key family
//! gets its own type so the compiler rejects, for example, a document id in
//! a subcategory position. All identifiers serialize as bare JSON numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw key as returned by the platform API.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Access the raw numeric key.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<u64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(ValidationError::InvalidIdentifier {
                        kind: $kind,
                        input: s.to_string(),
                    }),
                }
            }
        }
    };
}

numeric_id!(
    /// Identifier of a persisted document row.
    DocumentId,
    "document"
);
numeric_id!(
    /// Identifier of a top-level document category.
    CategoryId,
    "category"
);
numeric_id!(
    /// Identifier of a subcategory. Every subcategory belongs to exactly
    /// one [`CategoryId`].
    SubcategoryId,
    "subcategory"
);
numeric_id!(
    /// Identifier of a submission periodicity (monthly, quarterly, ...).
    PeriodicityId,
    "periodicity"
);
numeric_id!(
    /// Identifier of the acting platform user.
    UserId,
    "user"
);
numeric_id!(
    /// Identifier of the incubator (tenant) that owns the data.
    IncubatorId,
    "incubator"
);
