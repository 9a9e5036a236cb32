//! Canonical, provider-agnostic user model.
//!
//! Every provider normalizer produces [`User`] values; the import document
//! builder consumes nothing else.

use serde::{Deserialize, Serialize};

/// A normalized human user.
///
/// Optional text fields are empty strings when the provider had no value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
    /// Encoded hash understood by the import, or empty for no password.
    pub password_hash: String,
    pub nickname: String,
    pub display_name: String,
    /// Primary language subtag, see [`crate::language::reduce`].
    pub preferred_language: String,
    pub phone: String,
    pub phone_verified: bool,
}

impl User {
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

/// Return the first non-empty candidate, or an empty string.
pub(crate) fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(&["", "b", "c"]), "b");
        assert_eq!(first_non_empty(&["a", "b"]), "a");
        assert_eq!(first_non_empty(&["", ""]), "");
        assert_eq!(first_non_empty(&[]), "");
    }

    #[test]
    fn test_has_password() {
        let mut user = User::default();
        assert!(!user.has_password());
        user.password_hash = "$2b$10$abc".into();
        assert!(user.has_password());
    }
}
