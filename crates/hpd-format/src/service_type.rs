//! Service type table
//!
//! Uniden stores a channel's service type (its "function tag") as an
//! arbitrary numeric code. This module maps those codes to their labels
//! and back.

use std::fmt;
use std::str::FromStr;

use crate::error::LookupError;

/// Known service types as (code, label)
const SERVICE_TYPES: &[(u16, &str)] = &[
    (1, "Multi-Dispatch"),
    (2, "Law Dispatch"),
    (3, "Fire Dispatch"),
    (4, "EMS Dispatch"),
    (6, "Multi-Tac"),
    (7, "Law-Tac"),
    (8, "Fire-Tac"),
    (9, "EMS-Tac"),
    (11, "Interop"),
    (12, "Hospital"),
    (13, "Ham"),
    (14, "Public Works"),
    (15, "Aircraft"),
    (16, "Federal"),
    (17, "Business"),
    (20, "Railroad"),
    (21, "Other"),
    (22, "Multi-Talk"),
    (23, "Law-Talk"),
    (24, "Fire-Talk"),
    (25, "EMS-Talk"),
    (26, "Transportation"),
    (29, "Emergency Ops"),
    (30, "Military"),
    (31, "Media"),
    (32, "Schools"),
    (33, "Security"),
    (34, "Utilities"),
    (37, "Corrections"),
    (208, "Custom 1"),
    (209, "Custom 2"),
    (210, "Custom 3"),
    (211, "Custom 4"),
    (212, "Custom 5"),
    (213, "Custom 6"),
    (214, "Custom 7"),
    (215, "Custom 8"),
    (216, "Racing Officials"),
    (217, "Racing Teams"),
];

/// A service type resolved through the service type table
///
/// Only codes present in the table can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ServiceType(u16);

impl ServiceType {
    /// Service type used when nothing more specific applies
    pub const OTHER: ServiceType = ServiceType(21);

    /// Look up a service type by numeric code
    pub fn from_code(code: u16) -> Result<Self, LookupError> {
        SERVICE_TYPES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(c, _)| ServiceType(*c))
            .ok_or_else(|| LookupError(code.to_string()))
    }

    /// Look up a service type by label
    pub fn from_label(label: &str) -> Result<Self, LookupError> {
        SERVICE_TYPES
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(c, _)| ServiceType(*c))
            .ok_or_else(|| LookupError(label.to_string()))
    }

    /// Numeric code as stored in HPD files
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        SERVICE_TYPES
            .iter()
            .find(|(c, _)| *c == self.0)
            .map(|(_, l)| *l)
            .unwrap_or("Other")
    }

    /// All known service types in table order
    pub fn all() -> impl Iterator<Item = ServiceType> {
        SERVICE_TYPES.iter().map(|(c, _)| ServiceType(*c))
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::OTHER
    }
}

/// Parses either a numeric code or a label
impl FromStr for ServiceType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let code = s.parse::<u16>().map_err(|_| LookupError(s.to_string()))?;
            Self::from_code(code)
        } else {
            Self::from_label(s)
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for ServiceType {
    type Error = LookupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.label().to_string()
    }
}
