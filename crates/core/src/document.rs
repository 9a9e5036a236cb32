//! Import document builder and the ZITADEL bulk-import wire types.
//!
//! The wire structs mirror the JSON mapping of the admin API's
//! `ImportDataRequest`:
//!
//! ```text
//! {
//!   "dataOrgs": { "orgs": [ { "orgId": "...", "humanUsers": [
//!     { "userId": "...", "user": {
//!         "userName": "...",
//!         "profile": { "firstName", "lastName", "nickName", "displayName", "preferredLanguage" },
//!         "email": { "email", "isEmailVerified" },
//!         "phone": { "phone", "isPhoneVerified" },
//!         "hashedPassword": { "value" } } } ] } ] },
//!   "timeout": "30m0s"
//! }
//! ```
//!
//! As in proto3 JSON, empty strings, `false` and absent messages are omitted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MigrationConfig;
use crate::duration;
use crate::models::User;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// All users of one migration run, scoped to a single organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDocument {
    pub organization_id: String,
    pub timeout: Duration,
    pub users: Vec<User>,
}

impl ImportDocument {
    pub fn new(organization_id: impl Into<String>, timeout: Duration, users: Vec<User>) -> Self {
        Self {
            organization_id: organization_id.into(),
            timeout,
            users,
        }
    }

    /// Build a document with the organization and timeout of `config`.
    pub fn from_config(config: &MigrationConfig, users: Vec<User>) -> Self {
        Self::new(config.organization_id.clone(), config.timeout, users)
    }

    /// Number of users carrying a password hash.
    pub fn users_with_password(&self) -> usize {
        self.users.iter().filter(|u| u.has_password()).count()
    }

    /// Build the wire request: one organization holding every user.
    pub fn to_request(&self) -> ImportDataRequest {
        debug!(
            org_id = %self.organization_id,
            users = self.users.len(),
            "building import request"
        );
        ImportDataRequest {
            data_orgs: ImportDataOrg {
                orgs: vec![DataOrg {
                    org_id: self.organization_id.clone(),
                    human_users: self.users.iter().map(DataHumanUser::from).collect(),
                }],
            },
            timeout: duration::format(self.timeout),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportDataRequest {
    pub data_orgs: ImportDataOrg,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportDataOrg {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orgs: Vec<DataOrg>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataOrg {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub human_users: Vec<DataHumanUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataHumanUser {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    pub user: ImportHumanUser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportHumanUser {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    pub profile: Profile,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<HashedPassword>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nick_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preferred_language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_email_verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_phone_verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashedPassword {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl From<&User> for DataHumanUser {
    fn from(u: &User) -> Self {
        let phone = (!u.phone.is_empty() || u.phone_verified).then(|| Phone {
            phone: u.phone.clone(),
            is_phone_verified: u.phone_verified,
        });
        let hashed_password = u.has_password().then(|| HashedPassword {
            value: u.password_hash.clone(),
        });

        DataHumanUser {
            user_id: u.user_id.clone(),
            user: ImportHumanUser {
                user_name: u.user_name.clone(),
                profile: Profile {
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    nick_name: u.nickname.clone(),
                    display_name: u.display_name.clone(),
                    preferred_language: u.preferred_language.clone(),
                },
                email: Email {
                    email: u.email.clone(),
                    is_email_verified: u.email_verified,
                },
                phone,
                hashed_password,
            },
        }
    }
}
