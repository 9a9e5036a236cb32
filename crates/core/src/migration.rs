//! Migration pipeline.
//!
//! A run is strictly sequential:
//!
//! 1. Validate the [`MigrationConfig`].
//! 2. Load and normalize users from a [`Source`].
//! 3. Build the [`ImportDocument`] and its wire request.
//! 4. Encode and write the request to the output path.
//!
//! The first error aborts the run; the output file is only touched in the
//! last step.

use std::path::PathBuf;

use tracing::info;

use crate::config::{Auth0Config, KeycloakConfig, MigrationConfig};
use crate::document::ImportDocument;
use crate::errors::CoreError;
use crate::models::User;
use crate::providers::{auth0, keycloak};
use crate::serializer;

/// A provider export that can be turned into canonical users.
pub trait Source {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Read the export and normalize every user.
    fn load_users(&self, config: &MigrationConfig) -> Result<Vec<User>, CoreError>;
}

/// Auth0 user export plus the matching password export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth0Source {
    pub users_path: PathBuf,
    pub passwords_path: PathBuf,
}

impl From<&Auth0Config> for Auth0Source {
    fn from(config: &Auth0Config) -> Self {
        Self {
            users_path: config.users_path.clone(),
            passwords_path: config.passwords_path.clone(),
        }
    }
}

impl Source for Auth0Source {
    fn name(&self) -> &'static str {
        "auth0"
    }

    fn load_users(&self, config: &MigrationConfig) -> Result<Vec<User>, CoreError> {
        let users = auth0::read_users(&self.users_path)?;
        info!(path = %self.users_path.display(), count = users.len(), "read auth0 users");
        let passwords = auth0::read_passwords(&self.passwords_path)?;
        info!(path = %self.passwords_path.display(), count = passwords.len(), "read auth0 passwords");
        Ok(auth0::normalize_users(&users, &passwords, config))
    }
}

/// Keycloak realm export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeycloakSource {
    pub realm_path: PathBuf,
}

impl From<&KeycloakConfig> for KeycloakSource {
    fn from(config: &KeycloakConfig) -> Self {
        Self {
            realm_path: config.realm_path.clone(),
        }
    }
}

impl Source for KeycloakSource {
    fn name(&self) -> &'static str {
        "keycloak"
    }

    fn load_users(&self, _config: &MigrationConfig) -> Result<Vec<User>, CoreError> {
        let realm = keycloak::read_realm(&self.realm_path)?;
        info!(
            path = %self.realm_path.display(),
            realm = %realm.realm,
            count = realm.users.len(),
            "read keycloak realm"
        );
        Ok(keycloak::normalize_users(&realm.users)?)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub users: usize,
    pub users_with_password: usize,
    pub output_path: PathBuf,
}

/// Run the full pipeline for `source`.
pub fn run_migration(
    source: &dyn Source,
    config: &MigrationConfig,
) -> Result<MigrationReport, CoreError> {
    config.validate()?;
    info!(
        provider = source.name(),
        org_id = %config.organization_id,
        "starting migration"
    );

    let users = source.load_users(config)?;
    let document = ImportDocument::from_config(config, users);
    let request = document.to_request();
    serializer::write_document(&config.output_path, &request, config.multi_line)?;

    let report = MigrationReport {
        users: document.users.len(),
        users_with_password: document.users_with_password(),
        output_path: config.output_path.clone(),
    };
    info!(
        provider = source.name(),
        users = report.users,
        with_password = report.users_with_password,
        "migration complete"
    );
    Ok(report)
}
