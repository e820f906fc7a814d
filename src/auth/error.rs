use std::num::ParseIntError;

/// Failures raised while turning an assertion into a [`Citizen`](super::Citizen).
///
/// Every variant rejects the login attempt. No partial principal is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum CitizenAuthError {
    /// `Subject_SerialNumber` is missing or is not exactly 12 characters long.
    #[error(
        "Civic registration number is invalid. Parsed value is {}",
        .value.as_deref().unwrap_or("null")
    )]
    InvalidPrincipal { value: Option<String> },

    /// The `age` attribute is present but is not a non-negative integer.
    #[error("Age attribute is not a valid integer: '{value}'")]
    InvalidAge {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl CitizenAuthError {
    /// The raw attribute value that caused the failure, if any.
    pub fn parsed_value(&self) -> Option<&str> {
        match self {
            Self::InvalidPrincipal { value } => value.as_deref(),
            Self::InvalidAge { value, .. } => Some(value),
        }
    }
}
