//! Keycloak realm export.
//!
//! The export is one JSON document holding the realm and all of its users.
//! Only the fields needed for the canonical user are decoded; the rest
//! (created timestamp, enabled flag, TOTP, required actions, realm roles,
//! groups, ...) is ignored. Credentials may hold more than passwords, see
//! [`crate::credential`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::credential::{self, Credential};
use crate::errors::{NormalizeError, ReadError};
use crate::models::{first_non_empty, User};
use crate::reader;

/// A realm export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Realm {
    #[serde(default)]
    pub realm: String,
    #[serde(default)]
    pub users: Vec<KeycloakUser>,
}

/// A user inside a realm export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

/// Read a realm export document.
pub fn read_realm<P: AsRef<Path>>(path: P) -> Result<Realm, ReadError> {
    let realm: Realm = reader::read_json_file(path)?;
    debug!(realm = %realm.realm, users = realm.users.len(), "realm export decoded");
    Ok(realm)
}

/// Map every realm user onto a canonical user. The first user whose password
/// credential cannot be decoded aborts the mapping.
pub fn normalize_users(users: &[KeycloakUser]) -> Result<Vec<User>, NormalizeError> {
    info!(users = users.len(), "normalizing keycloak users");
    users
        .iter()
        .enumerate()
        .map(|(index, u)| normalize_user(index, u))
        .collect()
}

/// Map a single realm user; `index` is its position in the export and is
/// only used for error reporting.
///
/// First and last name are taken as exported. Keycloak practically always
/// has them; if one is blank it falls back to the user name, then the email,
/// and the last name finally to the first name.
pub fn normalize_user(index: usize, u: &KeycloakUser) -> Result<User, NormalizeError> {
    let password_hash =
        credential::decode_password(&u.credentials).map_err(|source| NormalizeError::Credential {
            index,
            user_id: u.id.clone(),
            source,
        })?;

    let first_name = first_non_empty(&[u.first_name.as_str(), &u.username, &u.email]).to_string();
    let last_name =
        first_non_empty(&[u.last_name.as_str(), &u.username, &u.email, &first_name]).to_string();

    Ok(User {
        user_id: u.id.clone(),
        user_name: u.username.clone(),
        first_name,
        last_name,
        email: u.email.clone(),
        email_verified: u.email_verified,
        password_hash,
        ..Default::default()
    })
}
