//! Stable identifiers for workers and workspaces.
//!
//! Ids survive save/restore across level transitions, so they are opaque
//! UUIDs rather than storage indices.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! stable_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// A fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Deterministic id, e.g. for restore or tests.
            pub fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

stable_id!(
    /// Identity of a worker.
    WorkerId
);

stable_id!(
    /// Identity of a workspace.
    WorkspaceId
);
