use std::fmt;

/// A `(major, minor)` balance-change epoch. Ordering is numeric on the
/// tuple; comparing the string forms is wrong ("14.9" sorts above "14.10").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatchVersion {
    pub major: u32,
    pub minor: u32
}

impl PatchVersion {
    /// Returned for malformed or empty version strings.
    pub const SENTINEL: PatchVersion = PatchVersion { major: 0, minor: 0 };

    /// Oldest patch the processor will ever report when no other source
    /// has an answer.
    pub const MINIMUM: PatchVersion = PatchVersion { major: 14, minor: 1 };

    /// Reduces a full version string ("14.23.632.8576") to its first two
    /// components. Anything unparseable yields [`PatchVersion::SENTINEL`].
    pub fn parse(version: &str) -> PatchVersion {
        let mut parts = version.split('.');
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u32>().ok());

        match (major, minor) {
            (Some(major), Some(minor)) => PatchVersion { major, minor },
            _ => PatchVersion::SENTINEL
        }
    }

    /// The short `major.minor` form stored on every match record.
    pub fn short(version: &str) -> String {
        PatchVersion::parse(version).to_string()
    }
}

impl fmt::Display for PatchVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        assert!(PatchVersion::parse("14.2") < PatchVersion::parse("14.10"));
        assert!(PatchVersion::parse("14.9") < PatchVersion::parse("14.10"));
        assert!(PatchVersion::parse("13.24") < PatchVersion::parse("14.1"));
    }

    #[test]
    fn test_parse_full_version_string() {
        assert_eq!(
            PatchVersion::parse("14.23.632.8576"),
            PatchVersion { major: 14, minor: 23 }
        );
    }

    #[test]
    fn test_malformed_input_yields_sentinel() {
        assert_eq!(PatchVersion::parse(""), PatchVersion::SENTINEL);
        assert_eq!(PatchVersion::parse("14"), PatchVersion::SENTINEL);
        assert_eq!(PatchVersion::parse("garbage.text"), PatchVersion::SENTINEL);
    }

    #[test]
    fn test_short_form() {
        assert_eq!(PatchVersion::short("14.23.632.8576"), "14.23");
        assert_eq!(PatchVersion::short(""), "0.0");
    }
}
