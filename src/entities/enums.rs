//! Fixed value sets stored as display strings in the name and permission columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored string is not part of a fixed value set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(
    /// Names a role row may carry.
    RoleName, "role name", {
        Admin => "Admin",
        User => "User",
        Guest => "Guest",
    }
);

string_enum!(
    /// Permissions shared by roles and statuses.
    Permission, "permission", {
        Create => "Create",
        Read => "Read",
        Update => "Update",
        Delete => "Delete",
    }
);

string_enum!(
    /// Names a priority row may carry.
    PriorityName, "priority name", {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
);

string_enum!(
    /// Names a status row may carry.
    StatusName, "status name", {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
        InProgress => "In Progress",
        Completed => "Completed",
    }
);

/// Structured text stored in the `permissions` column of roles and statuses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub permissions: Vec<Permission>,
}

impl PermissionSet {
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self { permissions }
    }

    /// Serialize to the JSON text stored in the database.
    pub fn to_json(&self) -> String {
        // A struct of unit enum variants cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"permissions\":[]}"))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
