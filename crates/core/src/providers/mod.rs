//! Provider export formats and their mapping onto the canonical [`User`].
//!
//! - [`auth0`]: line-delimited user and password exports.
//! - [`keycloak`]: single-document realm export with embedded credentials.
//!
//! [`User`]: crate::models::User

pub mod auth0;
pub mod keycloak;

pub use auth0::{Auth0Password, Auth0User};
pub use keycloak::{KeycloakUser, Realm};
