//! The signed-in user's profile

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
}

impl User {
    /// Name to greet the user with; falls back to the email's local part
    pub fn greeting_name(&self) -> &str {
        if !self.display_name.trim().is_empty() {
            return self.display_name.trim();
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.greeting_name(), self.email)
    }
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_name_fallback() {
        let mut user = User {
            id: UserId::new(),
            email: "sam@example.com".into(),
            display_name: String::new(),
        };
        assert_eq!(user.greeting_name(), "sam");

        user.display_name = "Sam Rivera".into();
        assert_eq!(user.to_string(), "Sam Rivera <sam@example.com>");
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = UserUpdate {
            display_name: Some("Sam".into()),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"display_name":"Sam"}"#
        );
    }
}
