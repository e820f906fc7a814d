//! Attribute lookup over an already-verified assertion.
//!
//! The SAML library owns parsing and signature checks. This crate only
//! needs "give me the values of attribute X", which is what
//! [`AttributeSource`] captures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Named attribute lookup on an authenticated assertion credential.
pub trait AttributeSource {
    /// Text content of every value of `name`.
    ///
    /// `None` means the attribute is not part of the assertion. `Some(vec![])`
    /// means it is present but carries no values.
    fn attribute_values(&self, name: &str) -> Option<Vec<&str>>;
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn attribute_values(&self, name: &str) -> Option<Vec<&str>> {
        (**self).attribute_values(name)
    }
}

/// First value of `name`, if there is one.
///
/// An attribute with zero values reads as absent. Values after the first are
/// ignored, so a multi-valued attribute such as several given names only
/// yields the first.
pub fn first_value(source: &(impl AttributeSource + ?Sized), name: &str) -> Option<String> {
    source
        .attribute_values(name)?
        .first()
        .map(|value| (*value).to_string())
}

/// The attributes the e-identification federation releases about a citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitizenAttribute {
    SubjectSerialNumber,
    SubjectCommonName,
    SubjectGivenName,
    SubjectSurname,
    Age,
    CertificateSerialNumber,
    SubjectCountryName,
    DateOfBirth,
    Gender,
    IssuerCommonName,
    IssuerOrganizationName,
    ValidationOcspResponse,
    SecurityLevel,
    SecurityLevelDescription,
    ShortSerialNumber,
}

impl CitizenAttribute {
    pub const ALL: [CitizenAttribute; 15] = [
        Self::SubjectSerialNumber,
        Self::SubjectCommonName,
        Self::SubjectGivenName,
        Self::SubjectSurname,
        Self::Age,
        Self::CertificateSerialNumber,
        Self::SubjectCountryName,
        Self::DateOfBirth,
        Self::Gender,
        Self::IssuerCommonName,
        Self::IssuerOrganizationName,
        Self::ValidationOcspResponse,
        Self::SecurityLevel,
        Self::SecurityLevelDescription,
        Self::ShortSerialNumber,
    ];

    /// Attribute name as released by the identity provider.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubjectSerialNumber => "Subject_SerialNumber",
            Self::SubjectCommonName => "Subject_CommonName",
            Self::SubjectGivenName => "Subject_GivenName",
            Self::SubjectSurname => "Subject_Surname",
            Self::Age => "age",
            Self::CertificateSerialNumber => "CertificateSerialNumber",
            Self::SubjectCountryName => "Subject_CountryName",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "Gender",
            Self::IssuerCommonName => "Issuer_CommonName",
            Self::IssuerOrganizationName => "Issuer_OrganizationName",
            // Misspelling is the IdP's.
            Self::ValidationOcspResponse => "ValidationOcspResponce",
            Self::SecurityLevel => "SecurityLevel",
            Self::SecurityLevelDescription => "SecurityLevelDescription",
            Self::ShortSerialNumber => "sn_id",
        }
    }
}

/// In-memory attribute multimap.
///
/// Useful when the SAML layer hands over its attributes already flattened
/// into `name -> values`, and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag {
    attributes: HashMap<String, Vec<String>>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single-valued attribute, replacing any previous values.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, vec![value.into()]);
        self
    }

    /// Adds a multi-valued attribute, replacing any previous values.
    #[must_use]
    pub fn with_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl AttributeSource for AttributeBag {
    fn attribute_values(&self, name: &str) -> Option<Vec<&str>> {
        self.attributes
            .get(name)
            .map(|values| values.iter().map(String::as_str).collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (name, value) in iter {
            bag.attributes
                .entry(name.into())
                .or_default()
                .push(value.into());
        }
        bag
    }
}

impl From<HashMap<String, Vec<String>>> for AttributeBag {
    fn from(attributes: HashMap<String, Vec<String>>) -> Self {
        Self { attributes }
    }
}

/// Lookup directly on an assertion validated by `samael`.
///
/// Attributes match on `Name` or `FriendlyName` across every attribute
/// statement. The first match wins. A value element without text content
/// reads as an empty string.
#[cfg(feature = "saml")]
impl AttributeSource for samael::schema::Assertion {
    fn attribute_values(&self, name: &str) -> Option<Vec<&str>> {
        let statements = self.attribute_statements.as_ref()?;

        statements
            .iter()
            .flat_map(|statement| statement.attributes.iter())
            .find(|attr| {
                attr.name.as_deref() == Some(name) || attr.friendly_name.as_deref() == Some(name)
            })
            .map(|attr| {
                attr.values
                    .iter()
                    .map(|v| v.value.as_deref().unwrap_or_default())
                    .collect()
            })
    }
}
