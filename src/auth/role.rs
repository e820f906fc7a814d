//! Granted roles.
//!
//! Roles are never derived from the assertion. They come from a static,
//! comma-separated list in configuration and are attached to every citizen
//! that logs in.

use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// A single opaque role name. Equality is by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Role {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Role {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An ordered list of roles parsed from configuration.
///
/// Order is preserved and duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleList(Vec<Role>);

impl RoleList {
    /// Parse a comma-separated role list such as `"ROLE_CITIZEN, ROLE_PATIENT"`.
    ///
    /// Each token is trimmed. Empty tokens (stray or trailing commas, blank input)
    /// carry no role and are skipped.
    pub fn parse(raw: &str) -> Self {
        let roles = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Role::new)
            .collect();
        Self(roles)
    }

    pub fn roles(&self) -> &[Role] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Role> {
        self.0
    }
}

impl Deref for RoleList {
    type Target = [Role];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Role> for RoleList {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn names(list: &RoleList) -> Vec<&str> {
        list.iter().map(Role::name).collect()
    }

    #[test]
    fn test_parse_trims_and_keeps_order() {
        let list = RoleList::parse("ROLE_CITIZEN, ROLE_PATIENT");
        assert_eq!(names(&list), vec!["ROLE_CITIZEN", "ROLE_PATIENT"]);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let list = RoleList::parse("ROLE_CITIZEN, ROLE_CITIZEN");
        assert_eq!(names(&list), vec!["ROLE_CITIZEN", "ROLE_CITIZEN"]);
    }

    #[rstest]
    #[case::empty("", &[])]
    #[case::blank("   ", &[])]
    #[case::trailing_comma("ROLE_A,", &["ROLE_A"])]
    #[case::inner_gap("ROLE_A,,ROLE_B, ", &["ROLE_A", "ROLE_B"])]
    #[case::tabs("\tROLE_A\t,\nROLE_B", &["ROLE_A", "ROLE_B"])]
    fn test_parse_skips_empty_tokens(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(names(&RoleList::parse(raw)), expected);
    }

    #[test]
    fn test_role_equality_is_by_name() {
        assert_eq!(Role::new("ROLE_CITIZEN"), Role::from("ROLE_CITIZEN"));
        assert_ne!(Role::new("ROLE_CITIZEN"), Role::new("role_citizen"));
        assert_eq!(Role::new("ROLE_CITIZEN"), "ROLE_CITIZEN");
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoleList::parse("A, B")).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
    }
}
