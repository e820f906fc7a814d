//! Capability traits expected by the surrounding security layer.
//!
//! [`Citizen`] stays a plain record. These impls are the only place where it
//! takes the shape of a "user" with granted authorities.

use super::{Citizen, Role};

/// Something that grants a named permission.
pub trait GrantedAuthority {
    fn authority(&self) -> &str;
}

impl GrantedAuthority for Role {
    fn authority(&self) -> &str {
        self.name()
    }
}

/// An authenticated user as seen by the security layer.
pub trait UserDetails {
    type Authority: GrantedAuthority;

    /// Unique identifier of the user.
    fn username(&self) -> &str;

    /// Credential used at login. Empty for federated logins.
    fn password(&self) -> &str;

    fn authorities(&self) -> &[Self::Authority];

    fn is_account_non_expired(&self) -> bool {
        true
    }

    fn is_account_non_locked(&self) -> bool {
        true
    }

    fn is_credentials_non_expired(&self) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

impl UserDetails for Citizen {
    type Authority = Role;

    fn username(&self) -> &str {
        self.civic_registration_number()
    }

    // The IdP has already authenticated the citizen; nothing is kept locally.
    fn password(&self) -> &str {
        ""
    }

    fn authorities(&self) -> &[Role] {
        self.roles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citizen_as_user_details() {
        let citizen = Citizen::builder(Some("198001011234".into()))
            .roles([Role::new("ROLE_CITIZEN"), Role::new("ROLE_PATIENT")])
            .build()
            .unwrap();

        assert_eq!(citizen.username(), "198001011234");
        assert_eq!(citizen.password(), "");
        let authorities: Vec<_> = citizen
            .authorities()
            .iter()
            .map(GrantedAuthority::authority)
            .collect();
        assert_eq!(authorities, vec!["ROLE_CITIZEN", "ROLE_PATIENT"]);
        assert!(citizen.is_enabled());
        assert!(citizen.is_account_non_locked());
        assert!(citizen.is_account_non_expired());
        assert!(citizen.is_credentials_non_expired());
    }
}
