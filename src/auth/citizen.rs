//! The authenticated citizen.
//!
//! A [`Citizen`] is built once per successful login through
//! [`CitizenBuilder`] and is read-only afterwards.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CitizenAuthError, Role};

/// Length of a civic registration number in its 12-digit form (`YYYYMMDDNNNN`).
pub const CIVIC_REGISTRATION_NUMBER_LEN: usize = 12;

/// An individual authenticated through the e-identification federation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CitizenRecord")]
pub struct Citizen {
    civic_registration_number: String,
    display_name: Option<String>,
    given_name: Option<String>,
    surname: Option<String>,
    country_code: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<String>,
    age: Option<u32>,
    issuer_name: Option<String>,
    issuer_organization: Option<String>,
    security_level: Option<String>,
    security_level_description: Option<String>,
    ocsp_response: Option<String>,
    short_serial_number: Option<String>,
    certificate_serial_number: Option<String>,
    roles: Vec<Role>,
}

impl Citizen {
    /// Start building a citizen around its civic registration number.
    ///
    /// The number is checked when [`CitizenBuilder::build`] runs.
    pub fn builder(civic_registration_number: Option<String>) -> CitizenBuilder {
        CitizenBuilder::new(civic_registration_number)
    }

    /// 12-digit personal identity number. Always present.
    pub fn civic_registration_number(&self) -> &str {
        &self.civic_registration_number
    }

    /// Full name, when the certificate carries a common name.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// One or more given names, depending on the issuing CA.
    pub fn given_name(&self) -> Option<&str> {
        self.given_name.as_deref()
    }

    pub fn surname(&self) -> Option<&str> {
        self.surname.as_deref()
    }

    /// Country code, e.g. `SE`.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// Date of birth exactly as released by the identity provider.
    pub fn date_of_birth(&self) -> Option<&str> {
        self.date_of_birth.as_deref()
    }

    /// Date of birth as a calendar date.
    ///
    /// Accepts `YYYY-MM-DD` and the compact `YYYYMMDD` form. Returns `None` when
    /// the attribute was absent or does not parse.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let raw = self.date_of_birth.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
            .ok()
    }

    /// Age in years. `None` when the identity provider did not release it.
    ///
    /// Negative or non-numeric `age` attributes are rejected at login, never stored.
    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Name of the CA that issued the e-identification.
    pub fn issuer_name(&self) -> Option<&str> {
        self.issuer_name.as_deref()
    }

    /// Organization behind the issuing CA.
    pub fn issuer_organization(&self) -> Option<&str> {
        self.issuer_organization.as_deref()
    }

    /// Assurance level code of the login method.
    pub fn security_level(&self) -> Option<&str> {
        self.security_level.as_deref()
    }

    pub fn security_level_description(&self) -> Option<&str> {
        self.security_level_description.as_deref()
    }

    /// Signed OCSP revocation receipt. Opaque to this crate.
    pub fn ocsp_response(&self) -> Option<&str> {
        self.ocsp_response.as_deref()
    }

    /// 10-digit form of the civic registration number, as supplied by the IdP.
    pub fn short_serial_number(&self) -> Option<&str> {
        self.short_serial_number.as_deref()
    }

    /// Serial number of the client certificate. Not the personal identity number.
    pub fn certificate_serial_number(&self) -> Option<&str> {
        self.certificate_serial_number.as_deref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl fmt::Display for Citizen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash(value: Option<&str>) -> &str {
            value.unwrap_or("-")
        }

        let age = self
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());

        writeln!(f, "==== CITIZEN ====")?;
        writeln!(f, "Crn: {}", self.civic_registration_number)?;
        writeln!(f, "Name: {}", or_dash(self.display_name()))?;
        writeln!(f, "Given name: {}", or_dash(self.given_name()))?;
        writeln!(f, "Surname: {}", or_dash(self.surname()))?;
        writeln!(f, "Country: {}", or_dash(self.country_code()))?;
        writeln!(f, "Gender: {}", or_dash(self.gender()))?;
        writeln!(f, "Date of birth: {}", or_dash(self.date_of_birth()))?;
        writeln!(f, "Age: {}", age)?;
        writeln!(f, "Issuer name: {}", or_dash(self.issuer_name()))?;
        writeln!(
            f,
            "Issuer organization: {}",
            or_dash(self.issuer_organization())
        )?;
        writeln!(f, "Security level: {}", or_dash(self.security_level()))?;
        writeln!(
            f,
            "Security level description: {}",
            or_dash(self.security_level_description())
        )?;
        writeln!(f, "Serial number: {}", or_dash(self.short_serial_number()))?;
        writeln!(
            f,
            "Certificate serial number: {}",
            or_dash(self.certificate_serial_number())
        )?;
        writeln!(f, "=================")
    }
}

/// Serialized form of a [`Citizen`].
///
/// Stored citizens are rebuilt through [`CitizenBuilder`] so a tampered or
/// truncated civic registration number cannot come back in.
#[derive(Deserialize)]
struct CitizenRecord {
    #[serde(default)]
    civic_registration_number: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    surname: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    issuer_name: Option<String>,
    #[serde(default)]
    issuer_organization: Option<String>,
    #[serde(default)]
    security_level: Option<String>,
    #[serde(default)]
    security_level_description: Option<String>,
    #[serde(default)]
    ocsp_response: Option<String>,
    #[serde(default)]
    short_serial_number: Option<String>,
    #[serde(default)]
    certificate_serial_number: Option<String>,
    #[serde(default)]
    roles: Vec<Role>,
}

impl TryFrom<CitizenRecord> for Citizen {
    type Error = CitizenAuthError;

    fn try_from(record: CitizenRecord) -> Result<Self, Self::Error> {
        Citizen::builder(record.civic_registration_number)
            .display_name(record.display_name)
            .given_name(record.given_name)
            .surname(record.surname)
            .country_code(record.country_code)
            .gender(record.gender)
            .date_of_birth(record.date_of_birth)
            .age(record.age)
            .issuer_name(record.issuer_name)
            .issuer_organization(record.issuer_organization)
            .security_level(record.security_level)
            .security_level_description(record.security_level_description)
            .ocsp_response(record.ocsp_response)
            .short_serial_number(record.short_serial_number)
            .certificate_serial_number(record.certificate_serial_number)
            .roles(record.roles)
            .build()
    }
}

/// Consuming builder for [`Citizen`].
///
/// Optional fields take `Option`s directly so attribute lookups can be fed in
/// without unwrapping.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct CitizenBuilder {
    civic_registration_number: Option<String>,
    display_name: Option<String>,
    given_name: Option<String>,
    surname: Option<String>,
    country_code: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<String>,
    age: Option<u32>,
    issuer_name: Option<String>,
    issuer_organization: Option<String>,
    security_level: Option<String>,
    security_level_description: Option<String>,
    ocsp_response: Option<String>,
    short_serial_number: Option<String>,
    certificate_serial_number: Option<String>,
    roles: Vec<Role>,
}

macro_rules! optional_setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, value: Option<$ty>) -> Self {
                self.$field = value;
                self
            }
        )*
    };
}

impl CitizenBuilder {
    pub fn new(civic_registration_number: Option<String>) -> Self {
        Self {
            civic_registration_number,
            ..Self::default()
        }
    }

    optional_setters! {
        display_name: String,
        given_name: String,
        surname: String,
        country_code: String,
        gender: String,
        date_of_birth: String,
        age: u32,
        issuer_name: String,
        issuer_organization: String,
        security_level: String,
        security_level_description: String,
        ocsp_response: String,
        short_serial_number: String,
        certificate_serial_number: String,
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Finish the citizen.
    ///
    /// Fails with [`CitizenAuthError::InvalidPrincipal`] unless the civic
    /// registration number is present and exactly 12 characters long.
    pub fn build(self) -> Result<Citizen, CitizenAuthError> {
        let civic_registration_number = match self.civic_registration_number {
            Some(crn) if crn.chars().count() == CIVIC_REGISTRATION_NUMBER_LEN => crn,
            value => return Err(CitizenAuthError::InvalidPrincipal { value }),
        };

        Ok(Citizen {
            civic_registration_number,
            display_name: self.display_name,
            given_name: self.given_name,
            surname: self.surname,
            country_code: self.country_code,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            age: self.age,
            issuer_name: self.issuer_name,
            issuer_organization: self.issuer_organization,
            security_level: self.security_level,
            security_level_description: self.security_level_description,
            ocsp_response: self.ocsp_response,
            short_serial_number: self.short_serial_number,
            certificate_serial_number: self.certificate_serial_number,
            roles: self.roles,
        })
    }
}
