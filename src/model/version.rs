use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder for a version no signal could resolve.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Installed and latest available WordPress versions of one target.
///
/// Each field is either a dotted numeric version such as `4.7.3` or
/// [`UNKNOWN_VERSION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub current_version: String,
    pub last_version: String,
}

impl VersionInfo {
    pub fn new(current_version: impl Into<String>, last_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            last_version: last_version.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_VERSION, UNKNOWN_VERSION)
    }

    /// True when the installed version was resolved to an actual number.
    pub fn has_current(&self) -> bool {
        is_known(&self.current_version)
    }

    /// Checks that both fields are empty, `unknown`, or dotted numeric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("current_version", &self.current_version),
            ("last_version", &self.last_version),
        ] {
            if !value.is_empty() && value != UNKNOWN_VERSION && !is_dotted_numeric(value) {
                return Err(Error::ContractViolation(format!(
                    "{} is not a version: {:?}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    /// Returns true if the latest upstream release is newer than the installed one.
    ///
    /// Unknown versions on either side are never reported as outdated.
    pub fn is_outdated(&self) -> bool {
        is_newer(&self.last_version, &self.current_version)
    }
}

fn is_known(version: &str) -> bool {
    !version.is_empty() && version != UNKNOWN_VERSION
}

/// A version token made of digits and dots, with at least one digit.
pub fn is_dotted_numeric(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Compares two WordPress versions, padding short ones (`4.7` -> `4.7.0`).
pub fn is_newer(latest: &str, current: &str) -> bool {
    if !is_known(latest) || !is_known(current) {
        return false;
    }

    match (to_semver(latest), to_semver(current)) {
        (Some(latest_ver), Some(current_ver)) => latest_ver > current_ver,
        _ => false,
    }
}

fn to_semver(version: &str) -> Option<semver::Version> {
    let mut parts: Vec<&str> = version.split('.').filter(|p| !p.is_empty()).take(3).collect();
    if parts.is_empty() {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    // semver rejects leading zeros, WordPress never uses them
    let normalized: Vec<String> = parts
        .iter()
        .map(|p| p.parse::<u64>().map(|n| n.to_string()))
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    semver::Version::parse(&normalized.join(".")).ok()
}
