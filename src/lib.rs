//! Citizen principals from e-identification SAML assertions.
//!
//! The SAML library verifies the login. This crate reads the released
//! attributes, checks the civic registration number and produces a
//! [`Citizen`](auth::Citizen) carrying the configured roles.
//!
//! ```ignore
//! use citizen_saml::{auth::CitizenAuthenticationService, config::Config};
//!
//! let config = Config::from_file("citizen.toml")?;
//! citizen_saml::observability::init_tracing(&config.observability.logging)?;
//!
//! let service = CitizenAuthenticationService::from_config(&config.citizen);
//! let citizen = service.authenticate(&assertion)?;
//! ```

pub mod auth;
pub mod config;
pub mod observability;

#[cfg(test)]
mod tests;

pub use auth::{Citizen, CitizenAuthError, CitizenAuthenticationService, Role, map_citizen};
