//! Assertion to citizen mapping.
//!
//! Turns the attribute statement of a verified assertion into a [`Citizen`]
//! with the configured roles attached. The mapping is a single stateless pass:
//! there is no I/O, nothing is cached, and a malformed assertion is a hard
//! failure.
//!
//! ```text
//! Subject_SerialNumber ──► validate (len == 12) ──► CitizenBuilder ──► Citizen
//!                                   │                     ▲
//!                                   ▼                     │
//!                          InvalidPrincipal     optional attributes + roles
//! ```

use super::{
    Citizen, CitizenAuthError, RoleList,
    attributes::{AttributeSource, CitizenAttribute, first_value},
    citizen::CIVIC_REGISTRATION_NUMBER_LEN,
};
use crate::config::CitizenAuthConfig;

/// Map an assertion credential to a citizen.
///
/// `roles` is the comma-separated role list from configuration, e.g.
/// `"ROLE_CITIZEN, ROLE_PATIENT"`.
pub fn map_citizen<S>(source: &S, roles: &str) -> Result<Citizen, CitizenAuthError>
where
    S: AttributeSource + ?Sized,
{
    map_with_roles(source, &RoleList::parse(roles))
}

fn map_with_roles<S>(source: &S, roles: &RoleList) -> Result<Citizen, CitizenAuthError>
where
    S: AttributeSource + ?Sized,
{
    let get = |attr: CitizenAttribute| first_value(source, attr.as_str());

    let subject_serial_number = get(CitizenAttribute::SubjectSerialNumber);
    tracing::debug!(
        subject_serial_number = subject_serial_number.as_deref().unwrap_or("null"),
        "Mapping SAML assertion to citizen"
    );

    let is_valid = subject_serial_number
        .as_deref()
        .is_some_and(|crn| crn.chars().count() == CIVIC_REGISTRATION_NUMBER_LEN);
    if !is_valid {
        tracing::warn!(
            present = subject_serial_number.is_some(),
            "Rejecting login: civic registration number is missing or malformed"
        );
        return Err(CitizenAuthError::InvalidPrincipal {
            value: subject_serial_number,
        });
    }

    let age = get(CitizenAttribute::Age)
        .map(|raw| {
            raw.parse::<u32>().map_err(|source| {
                tracing::warn!(age = %raw, "Rejecting login: age attribute is not an integer");
                CitizenAuthError::InvalidAge { value: raw, source }
            })
        })
        .transpose()?;

    let citizen = Citizen::builder(subject_serial_number)
        .display_name(get(CitizenAttribute::SubjectCommonName))
        .given_name(get(CitizenAttribute::SubjectGivenName))
        .surname(get(CitizenAttribute::SubjectSurname))
        .age(age)
        .certificate_serial_number(get(CitizenAttribute::CertificateSerialNumber))
        .country_code(get(CitizenAttribute::SubjectCountryName))
        .date_of_birth(get(CitizenAttribute::DateOfBirth))
        .gender(get(CitizenAttribute::Gender))
        .issuer_name(get(CitizenAttribute::IssuerCommonName))
        .issuer_organization(get(CitizenAttribute::IssuerOrganizationName))
        .ocsp_response(get(CitizenAttribute::ValidationOcspResponse))
        .security_level(get(CitizenAttribute::SecurityLevel))
        .security_level_description(get(CitizenAttribute::SecurityLevelDescription))
        .short_serial_number(get(CitizenAttribute::ShortSerialNumber))
        .roles(roles.iter().cloned())
        .build()?;

    tracing::debug!(
        roles = citizen.roles().len(),
        security_level = citizen.security_level().unwrap_or("-"),
        "Citizen mapped from SAML assertion"
    );

    Ok(citizen)
}

/// Hook the security layer calls once the SAML library has verified a login.
pub trait SamlUserDetailsService {
    type Principal;
    type Error: std::error::Error;

    fn load_user_by_saml(
        &self,
        credential: &dyn AttributeSource,
    ) -> Result<Self::Principal, Self::Error>;
}

/// Maps verified assertions to [`Citizen`]s with a fixed role list.
///
/// Holds no mutable state. One instance can serve every login concurrently.
#[derive(Debug, Clone)]
pub struct CitizenAuthenticationService {
    roles: RoleList,
}

impl CitizenAuthenticationService {
    /// Create a service from a comma-separated role list.
    pub fn new(roles: &str) -> Self {
        Self {
            roles: RoleList::parse(roles),
        }
    }

    pub fn from_config(config: &CitizenAuthConfig) -> Self {
        Self::new(&config.roles)
    }

    /// Roles attached to every citizen this service produces.
    pub fn roles(&self) -> &RoleList {
        &self.roles
    }

    pub fn authenticate<S>(&self, source: &S) -> Result<Citizen, CitizenAuthError>
    where
        S: AttributeSource + ?Sized,
    {
        map_with_roles(source, &self.roles)
    }
}

impl SamlUserDetailsService for CitizenAuthenticationService {
    type Principal = Citizen;
    type Error = CitizenAuthError;

    fn load_user_by_saml(&self, credential: &dyn AttributeSource) -> Result<Citizen, Self::Error> {
        self.authenticate(credential)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::auth::AttributeBag;

    const CRN: &str = "198001011234";

    fn bag() -> AttributeBag {
        AttributeBag::new().with_value("Subject_SerialNumber", CRN)
    }

    #[test]
    fn test_maps_every_attribute() {
        let source = bag()
            .with_value("Subject_CommonName", "Anna Andersson")
            .with_value("Subject_GivenName", "Anna")
            .with_value("Subject_Surname", "Andersson")
            .with_value("age", "44")
            .with_value("CertificateSerialNumber", "5A0F33C1")
            .with_value("Subject_CountryName", "SE")
            .with_value("dateOfBirth", "1980-01-01")
            .with_value("Gender", "F")
            .with_value("Issuer_CommonName", "Testbank Customer CA1 v1 for BankID Test")
            .with_value("Issuer_OrganizationName", "Testbank A AB (publ)")
            .with_value("ValidationOcspResponce", "MIIHdwoBAKCCB3Aw")
            .with_value("SecurityLevel", "3")
            .with_value("SecurityLevelDescription", "MobileTwofactorContract")
            .with_value("sn_id", "8001011234");

        let c = map_citizen(&source, "ROLE_CITIZEN").unwrap();

        assert_eq!(c.civic_registration_number(), CRN);
        assert_eq!(c.display_name(), Some("Anna Andersson"));
        assert_eq!(c.given_name(), Some("Anna"));
        assert_eq!(c.surname(), Some("Andersson"));
        assert_eq!(c.age(), Some(44));
        assert_eq!(c.certificate_serial_number(), Some("5A0F33C1"));
        assert_eq!(c.country_code(), Some("SE"));
        assert_eq!(c.date_of_birth(), Some("1980-01-01"));
        assert_eq!(c.gender(), Some("F"));
        assert_eq!(
            c.issuer_name(),
            Some("Testbank Customer CA1 v1 for BankID Test")
        );
        assert_eq!(c.issuer_organization(), Some("Testbank A AB (publ)"));
        assert_eq!(c.ocsp_response(), Some("MIIHdwoBAKCCB3Aw"));
        assert_eq!(c.security_level(), Some("3"));
        assert_eq!(
            c.security_level_description(),
            Some("MobileTwofactorContract")
        );
        assert_eq!(c.short_serial_number(), Some("8001011234"));
    }

    #[test]
    fn test_absent_optional_attributes_stay_unset() {
        let c = map_citizen(&bag(), "ROLE_CITIZEN").unwrap();

        assert!(c.display_name().is_none());
        assert!(c.given_name().is_none());
        assert!(c.surname().is_none());
        assert!(c.age().is_none());
        assert!(c.certificate_serial_number().is_none());
        assert!(c.country_code().is_none());
        assert!(c.date_of_birth().is_none());
        assert!(c.gender().is_none());
        assert!(c.issuer_name().is_none());
        assert!(c.issuer_organization().is_none());
        assert!(c.ocsp_response().is_none());
        assert!(c.security_level().is_none());
        assert!(c.security_level_description().is_none());
        assert!(c.short_serial_number().is_none());
    }

    #[rstest]
    #[case::empty("")]
    #[case::eleven("19800101123")]
    #[case::thirteen("1980010112345")]
    #[case::ten_digit_form("8001011234")]
    fn test_rejects_malformed_serial_number(#[case] crn: &str) {
        let source = AttributeBag::new().with_value("Subject_SerialNumber", crn);
        let err = map_citizen(&source, "ROLE_CITIZEN").unwrap_err();
        assert!(matches!(err, CitizenAuthError::InvalidPrincipal { .. }));
        assert_eq!(err.parsed_value(), Some(crn));
    }

    #[test]
    fn test_rejects_missing_serial_number() {
        let source = AttributeBag::new().with_value("Subject_CommonName", "Anna Andersson");
        let err = map_citizen(&source, "ROLE_CITIZEN").unwrap_err();
        assert!(matches!(err, CitizenAuthError::InvalidPrincipal { value: None }));
    }

    #[test]
    fn test_serial_number_without_values_is_missing() {
        let source =
            AttributeBag::new().with_values("Subject_SerialNumber", Vec::<String>::new());
        let err = map_citizen(&source, "ROLE_CITIZEN").unwrap_err();
        assert!(matches!(err, CitizenAuthError::InvalidPrincipal { value: None }));
    }

    #[test]
    fn test_serial_number_uses_first_value() {
        let source =
            AttributeBag::new().with_values("Subject_SerialNumber", [CRN, "too-short"]);
        let c = map_citizen(&source, "ROLE_CITIZEN").unwrap();
        assert_eq!(c.civic_registration_number(), CRN);
    }

    #[test]
    fn test_multi_valued_attribute_keeps_first() {
        let source = bag().with_values("Subject_GivenName", ["A", "B"]);
        let c = map_citizen(&source, "ROLE_CITIZEN").unwrap();
        assert_eq!(c.given_name(), Some("A"));
    }

    #[rstest]
    #[case::zero("0", 0)]
    #[case::adult("42", 42)]
    fn test_parses_age(#[case] raw: &str, #[case] expected: u32) {
        let c = map_citizen(&bag().with_value("age", raw), "").unwrap();
        assert_eq!(c.age(), Some(expected));
    }

    #[rstest]
    #[case::word("abc")]
    #[case::negative("-1")]
    #[case::padded(" 42")]
    #[case::empty("")]
    fn test_rejects_malformed_age(#[case] raw: &str) {
        let err = map_citizen(&bag().with_value("age", raw), "ROLE_CITIZEN").unwrap_err();
        assert!(matches!(err, CitizenAuthError::InvalidAge { ref value, .. } if value == raw));
    }

    #[test]
    fn test_attaches_configured_roles_in_order() {
        let c = map_citizen(&bag(), "ROLE_CITIZEN, ROLE_PATIENT").unwrap();
        let names: Vec<_> = c.roles().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["ROLE_CITIZEN", "ROLE_PATIENT"]);
    }

    #[test]
    fn test_duplicate_roles_are_preserved() {
        let c = map_citizen(&bag(), "ROLE_CITIZEN,ROLE_CITIZEN").unwrap();
        assert_eq!(c.roles().len(), 2);
    }

    #[test]
    fn test_service_uses_preparsed_roles() {
        let service = CitizenAuthenticationService::new(" ROLE_CITIZEN ,ROLE_PATIENT");
        assert_eq!(service.roles().len(), 2);

        let c = service.authenticate(&bag()).unwrap();
        assert!(c.has_role("ROLE_CITIZEN"));
        assert!(c.has_role("ROLE_PATIENT"));
    }

    #[test]
    fn test_service_from_config() {
        let config = CitizenAuthConfig {
            roles: "ROLE_CITIZEN".to_string(),
        };
        let service = CitizenAuthenticationService::from_config(&config);
        let c = service.authenticate(&bag()).unwrap();
        assert_eq!(c.roles().len(), 1);
    }

    #[test]
    fn test_load_user_by_saml_through_trait_object() {
        let service = CitizenAuthenticationService::new("ROLE_CITIZEN");
        let source = bag();
        let credential: &dyn AttributeSource = &source;

        let c = service.load_user_by_saml(credential).unwrap();
        assert_eq!(c.civic_registration_number(), CRN);

        let empty = AttributeBag::new();
        assert!(service.load_user_by_saml(&empty).is_err());
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CitizenAuthenticationService>();
    }
}
