//! zitadel-migrate core library.
//!
//! Converts identity-provider user exports into a ZITADEL bulk-import
//! document: reading provider exports, decoding stored credentials,
//! normalizing users onto one canonical shape, and building and writing the
//! import request.

pub mod config;
pub mod credential;
pub mod document;
pub mod duration;
pub mod errors;
pub mod language;
pub mod migration;
pub mod models;
pub mod providers;
pub mod reader;
pub mod serializer;

// Re-exports for convenience.
pub use config::{AppConfig, MigrationConfig};
pub use document::{ImportDataRequest, ImportDocument};
pub use errors::CoreError;
pub use migration::{run_migration, Auth0Source, KeycloakSource, MigrationReport, Source};
pub use models::User;
