//! Configuration for migration runs.
//!
//! [`MigrationConfig`] holds the run-level settings every pipeline stage
//! receives explicitly. It is usually built from CLI flags, optionally on top
//! of a TOML file loaded into [`AppConfig`]:
//!
//! ```toml
//! [migration]
//! organization_id = "123456789"
//! output_path = "./importBody.json"
//! timeout = "30m"
//! email_verified = true
//! multi_line = false
//!
//! [auth0]
//! users_path = "./users.json"
//! passwords_path = "./passwords.json"
//!
//! [keycloak]
//! realm_path = "./realm.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::duration;
use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Run-level settings
// ---------------------------------------------------------------------------

/// Settings shared by all stages of one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// ZITADEL organization that receives every imported user.
    pub organization_id: String,

    /// Where the import document is written.
    pub output_path: PathBuf,

    /// Timeout the import API should apply to the request.
    pub timeout: Duration,

    /// Mark every imported email as verified. Can only force verification
    /// on; a provider's own `email_verified = true` always survives.
    pub email_verified: bool,

    /// Pretty-print the output document.
    pub multi_line: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            organization_id: String::new(),
            output_path: default_output_path(),
            timeout: Duration::from_secs(30 * 60),
            email_verified: default_true(),
            multi_line: false,
        }
    }
}

impl MigrationConfig {
    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.organization_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "migration.organization_id".into(),
                detail: "organization id must not be empty".into(),
            });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "migration.output_path".into(),
                detail: "output path must not be empty".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "migration.timeout".into(),
                detail: "timeout must be > 0".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TOML file
// ---------------------------------------------------------------------------

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub migration: MigrationSection,

    /// Auth0 export locations.
    #[serde(default)]
    pub auth0: Auth0Config,

    /// Keycloak export location.
    #[serde(default)]
    pub keycloak: KeycloakConfig,
}

/// `[migration]` section; see [`MigrationConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSection {
    #[serde(default)]
    pub organization_id: String,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Duration such as `30m` or `1h30m`.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default = "default_true")]
    pub email_verified: bool,

    #[serde(default)]
    pub multi_line: bool,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            organization_id: String::new(),
            output_path: default_output_path(),
            timeout: default_timeout(),
            email_verified: default_true(),
            multi_line: false,
        }
    }
}

/// `[auth0]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth0Config {
    /// Line-delimited user export.
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,

    /// Line-delimited password export.
    #[serde(default = "default_passwords_path")]
    pub passwords_path: PathBuf,
}

impl Default for Auth0Config {
    fn default() -> Self {
        Self {
            users_path: default_users_path(),
            passwords_path: default_passwords_path(),
        }
    }
}

/// `[keycloak]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    /// Realm export in JSON format.
    #[serde(default = "default_realm_path")]
    pub realm_path: PathBuf,
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            realm_path: default_realm_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./importBody.json")
}
fn default_timeout() -> String {
    "30m".into()
}
fn default_true() -> bool {
    true
}
fn default_users_path() -> PathBuf {
    PathBuf::from("./users.json")
}
fn default_passwords_path() -> PathBuf {
    PathBuf::from("./passwords.json")
}
fn default_realm_path() -> PathBuf {
    PathBuf::from("./realm.json")
}

/// Commented configuration written by `init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# zitadel-migrate configuration

[migration]
# ID of the ZITADEL organization the users are imported into (required).
organization_id = ""
output_path = "./importBody.json"
# Timeout for the import request, e.g. "30m" or "1h30m".
timeout = "30m"
# Mark all imported emails as verified.
email_verified = true
# Pretty-print the generated JSON.
multi_line = false

[auth0]
users_path = "./users.json"
passwords_path = "./passwords.json"

[keycloak]
realm_path = "./realm.json"
"#;

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Convert the `[migration]` section into run-level settings.
    pub fn migration_config(&self) -> Result<MigrationConfig, ConfigError> {
        let section = &self.migration;
        Ok(MigrationConfig {
            organization_id: section.organization_id.clone(),
            output_path: section.output_path.clone(),
            timeout: duration::parse(&section.timeout)?,
            email_verified: section.email_verified,
            multi_line: section.multi_line,
        })
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.migration_config()?.validate()
    }
}
