use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::auth::RoleList;

/// Citizen login configuration.
///
/// ```toml
/// [citizen]
/// roles = "ROLE_CITIZEN, ROLE_PATIENT"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitizenAuthConfig {
    /// Comma-separated roles granted to every citizen that logs in.
    pub roles: String,
}

impl CitizenAuthConfig {
    /// The configured roles, parsed.
    pub fn role_list(&self) -> RoleList {
        RoleList::parse(&self.roles)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.role_list().is_empty() {
            return Err(ConfigError::Validation(format!(
                "citizen.roles must name at least one role (got {:?})",
                self.roles
            )));
        }
        Ok(())
    }
}
