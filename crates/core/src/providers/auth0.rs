//! Auth0 user and password exports.
//!
//! Both exports are streams of JSON objects, one per line:
//!
//! ```text
//! {"user_id":"auth0|1","email":"jdoe@example.com","name":"John Doe","given_name":"John",...}
//! {"_id":{"$oid":"..."},"email":"jdoe@example.com","passwordHash":"$2b$10$..."}
//! ```
//!
//! Passwords are joined to users by email. Auth0 hashes are already in a
//! self-describing format (bcrypt) and are passed through untouched.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MigrationConfig;
use crate::errors::ReadError;
use crate::language;
use crate::models::{first_non_empty, User};
use crate::reader;

/// One record of the Auth0 user export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Auth0User {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub phone_verified: Option<bool>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// One record of the Auth0 password export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Auth0Password {
    pub email: String,
    #[serde(rename = "passwordHash", alias = "password_hash", default)]
    pub password_hash: Option<String>,
}

/// Read the line-delimited user export.
pub fn read_users<P: AsRef<Path>>(path: P) -> Result<Vec<Auth0User>, ReadError> {
    reader::read_json_lines_file(path)
}

/// Read the line-delimited password export.
pub fn read_passwords<P: AsRef<Path>>(path: P) -> Result<Vec<Auth0Password>, ReadError> {
    reader::read_json_lines_file(path)
}

/// Map Auth0 users onto canonical users, attaching the password hash whose
/// record has the same email, compared after trimming surrounding
/// whitespace. When several password records share an email the first one
/// wins.
pub fn normalize_users(
    users: &[Auth0User],
    passwords: &[Auth0Password],
    config: &MigrationConfig,
) -> Vec<User> {
    let mut hashes: HashMap<&str, &str> = HashMap::with_capacity(passwords.len());
    for p in passwords {
        let hash = p.password_hash.as_deref().unwrap_or_default();
        if !hash.is_empty() {
            hashes.entry(p.email.trim()).or_insert(hash);
        }
    }
    info!(
        users = users.len(),
        passwords = hashes.len(),
        "normalizing auth0 users"
    );

    users
        .iter()
        .map(|u| {
            let password_hash = hashes.get(u.email.trim()).copied().unwrap_or_default();
            normalize_user(u, password_hash, config)
        })
        .collect()
}

/// Map a single Auth0 user.
///
/// Fallbacks, in order:
/// - user name: `username`, `email`
/// - display name: `name`, user name
/// - first name: `given_name`, `name`, user name, `family_name`
/// - last name: `family_name`, `name`, user name, first name
pub fn normalize_user(u: &Auth0User, password_hash: &str, config: &MigrationConfig) -> User {
    let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();

    let name = text(&u.name);
    let given_name = text(&u.given_name);
    let family_name = text(&u.family_name);
    let username = text(&u.username);
    let email = u.email.trim().to_string();

    let user_name = first_non_empty(&[username.as_str(), &email]).to_string();
    let display_name = first_non_empty(&[name.as_str(), &user_name]).to_string();
    let first_name =
        first_non_empty(&[given_name.as_str(), &name, &user_name, &family_name]).to_string();
    let last_name =
        first_non_empty(&[family_name.as_str(), &name, &user_name, &first_name]).to_string();

    let locale = text(&u.locale);
    let preferred_language = language::reduce(&locale);
    if preferred_language.is_empty() && !locale.is_empty() {
        debug!(user_id = %u.user_id, locale = %locale, "dropping unsupported locale");
    }

    User {
        user_id: u.user_id.clone(),
        user_name,
        first_name,
        last_name,
        email,
        email_verified: u.email_verified.unwrap_or(false) || config.email_verified,
        password_hash: password_hash.to_string(),
        nickname: text(&u.nickname),
        display_name,
        preferred_language,
        phone: text(&u.phone_number),
        phone_verified: u.phone_verified.unwrap_or(false),
    }
}
