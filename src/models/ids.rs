//! Strongly-typed ID wrappers for every server-side entity
//!
//! The API identifies all records by UUID. The newtypes keep a budget id from
//! being passed where a category id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $short_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID (client-side drafts before the server assigns one)
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Compact form for tables, e.g. `cat-550e8400`
            pub fn short(&self) -> String {
                format!("{}{}", $short_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        /// Displays the full hyphenated UUID, which is what the API expects in paths.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($short_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(CategoryId, "cat-");
define_id!(BudgetId, "bud-");
define_id!(BudgetItemId, "itm-");
define_id!(TransactionId, "txn-");
define_id!(TransactionGroupId, "grp-");

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_display_is_full_uuid() {
        let id: BudgetId = SAMPLE.parse().unwrap();
        assert_eq!(id.to_string(), SAMPLE);
    }

    #[test]
    fn test_short_form() {
        let id: CategoryId = SAMPLE.parse().unwrap();
        assert_eq!(id.short(), "cat-550e8400");
    }

    #[test]
    fn test_prefixed_parse() {
        let id: TransactionGroupId = format!("grp-{}", SAMPLE).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), SAMPLE);
        assert!("grp-nothex".parse::<TransactionGroupId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id: UserId = SAMPLE.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(BudgetItemId::new(), BudgetItemId::new());
    }
}
