pub mod attributes;
mod citizen;
pub mod details;
mod error;
mod mapper;
mod role;

pub use attributes::{AttributeBag, AttributeSource, CitizenAttribute};
pub use citizen::{CIVIC_REGISTRATION_NUMBER_LEN, Citizen, CitizenBuilder};
pub use details::{GrantedAuthority, UserDetails};
pub use error::CitizenAuthError;
pub use mapper::{CitizenAuthenticationService, SamlUserDetailsService, map_citizen};
pub use role::{Role, RoleList};
