use std::fmt::Display;

/// Represents a semantic version number.
///
/// This struct follows the semantic versioning format of MAJOR.MINOR.PATCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// The major version number. Incremented for incompatible API changes.
    pub major: u32,
    /// The minor version number. Incremented for backward-compatible new functionality.
    pub minor: u32,
    /// The patch version number. Incremented for backward-compatible bug fixes.
    pub patch: u32,
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// get the current version from cargo
pub fn current_version() -> Version {
    // get the current version from the cargo package
    let version_string = env!("CARGO_PKG_VERSION");
    let version_parts = version_string.split('.').collect::<Vec<&str>>();

    Version {
        major: version_parts.first().and_then(|p| p.parse::<u32>().ok()).unwrap_or(0),
        minor: version_parts.get(1).and_then(|p| p.parse::<u32>().ok()).unwrap_or(0),
        patch: version_parts.get(2).and_then(|p| p.parse::<u32>().ok()).unwrap_or(0),
    }
}

/// The rule-set version tag stamped on every capability and similarity row.
///
/// Stored rows produced by different rule-set versions must never be
/// confused with each other, so re-classification runs carry this tag.
pub fn detector_version() -> String {
    format!("hugin/{}", current_version())
}
