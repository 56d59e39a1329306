//! Identifier types for task records and the entities they reference.
//!
//! Every identifier wraps a UUID. Task, tag and stage identifiers are minted
//! by this crate; project, user and company identifiers come from records
//! owned elsewhere and are only ever read.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for an imported task record.
    TaskId
);

uuid_identifier!(
    /// Unique identifier for a task tag.
    TagId
);

uuid_identifier!(
    /// Unique identifier for a task stage.
    StageId
);

uuid_identifier!(
    /// Identifier of a project looked up by commessa code.
    ProjectId
);

uuid_identifier!(
    /// Identifier of a user looked up by display name.
    UserId
);

uuid_identifier!(
    /// Identifier of a company or contact partner.
    CompanyId
);
