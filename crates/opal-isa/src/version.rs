//! Version and edition model
//!
//! Two separate notions govern compatibility:
//!
//! - The runtime edition names a generation of the VM. Editions are not
//!   ordered and carry no backward compatibility: an application runs
//!   only on a runtime whose edition matches exactly.
//! - Effective versions follow semantic versioning and are used for
//!   shared module resolution. When the same module appears in a
//!   dependency tree with several versions, differing major numbers are
//!   a conflict; with equal major numbers the highest minor/patch wins.
//!   A zero major number marks a beta stage where every minor number is
//!   its own compatibility island.

use std::fmt;
use std::str::FromStr;

/// Edition of the current runtime, zero-padded to 8 bytes for embedding
/// in image headers.
pub const RUNTIME_EDITION: &[u8; 8] = b"2025\0\0\0\0";
pub const RUNTIME_EDITION_STRING: &str = "2025";

/// Highest module image format version the current runtime understands.
pub const IMAGE_FORMAT_MAJOR_VERSION: u16 = 1;
pub const IMAGE_FORMAT_MINOR_VERSION: u16 = 0;

/// Semantic version with 16-bit components.
///
/// Packs into a u64 as `0x0000_MMMM_mmmm_pppp` so versions can be stored
/// in fixed-width image fields and compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

/// Outcome of comparing two versions of the same shared module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCompatibility {
    Equals,
    GreaterThan,
    LessThan,
    /// The two versions cannot coexist in one dependency tree.
    Conflict,
}

/// Error parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    text: String,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version string: {:?}", self.text)
    }
}

impl std::error::Error for ParseVersionError {}

impl EffectiveVersion {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self {
            major: ((value >> 32) & 0xffff) as u16,
            minor: ((value >> 16) & 0xffff) as u16,
            patch: (value & 0xffff) as u16,
        }
    }

    pub fn to_u64(&self) -> u64 {
        ((self.major as u64) << 32) | ((self.minor as u64) << 16) | self.patch as u64
    }

    /// How this version relates to another version of the same module.
    ///
    /// With a non-zero major number, equal majors are compatible and
    /// ordered by minor then patch. With a zero major number, the minor
    /// number must match as well and only the patch is ordered.
    pub fn compatible(&self, other: &EffectiveVersion) -> VersionCompatibility {
        if self.major != other.major {
            return VersionCompatibility::Conflict;
        }

        if self.major == 0 && self.minor != other.minor {
            return VersionCompatibility::Conflict;
        }

        match (self.minor, self.patch).cmp(&(other.minor, other.patch)) {
            std::cmp::Ordering::Greater => VersionCompatibility::GreaterThan,
            std::cmp::Ordering::Less => VersionCompatibility::LessThan,
            std::cmp::Ordering::Equal => VersionCompatibility::Equals,
        }
    }
}

impl FromStr for EffectiveVersion {
    type Err = ParseVersionError;

    /// Parse a "major.minor.patch" string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError {
            text: s.to_owned(),
        };

        let mut parts = s.split('.');
        let mut next = || -> Result<u16, ParseVersionError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u16>()
                .map_err(|_| invalid())
        };

        let major = next()?;
        let minor = next()?;
        let patch = next()?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl PartialOrd for EffectiveVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EffectiveVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_u64().cmp(&other.to_u64())
    }
}

impl fmt::Display for EffectiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(s: &str) -> EffectiveVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_version_packing() {
        let v0 = EffectiveVersion::new(0x11, 0x13, 0x17);
        assert_eq!(v0.to_u64(), 0x0011_0013_0017_u64);
        assert_eq!(EffectiveVersion::from_u64(0x0011_0013_0017_u64), v0);
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(version("11.13.17"), EffectiveVersion::new(11, 13, 17));
        assert_eq!(version("1.0.0").to_string(), "1.0.0");

        assert!("1.2".parse::<EffectiveVersion>().is_err());
        assert!("1.2.3.4".parse::<EffectiveVersion>().is_err());
        assert!("1.2.x".parse::<EffectiveVersion>().is_err());
        assert!("".parse::<EffectiveVersion>().is_err());
    }

    #[test]
    fn test_version_ordering() {
        let v0 = EffectiveVersion::new(0x11, 0x13, 0x17);
        let v1 = EffectiveVersion::new(0x11, 0x13, 0x17);
        let v2 = EffectiveVersion::new(0x13, 0x11, 0x07);
        let v3 = EffectiveVersion::new(0x11, 0x17, 0x13);
        let v4 = EffectiveVersion::new(0x11, 0x13, 0x23);

        assert!(v0 == v1);
        assert!(v0 != v2);
        assert!(v0 >= v1);
        assert!(v0 <= v1);
        assert!(v0 < v2);
        assert!(v0 < v3);
        assert!(v0 < v4);
    }

    #[test]
    fn test_version_compatibility() {
        assert_eq!(
            version("1.2.3").compatible(&version("1.2.3")),
            VersionCompatibility::Equals
        );
        assert_eq!(
            version("1.2.3").compatible(&version("1.1.3")),
            VersionCompatibility::GreaterThan
        );
        assert_eq!(
            version("1.2.3").compatible(&version("1.2.2")),
            VersionCompatibility::GreaterThan
        );
        assert_eq!(
            version("1.2.3").compatible(&version("1.11.3")),
            VersionCompatibility::LessThan
        );
        assert_eq!(
            version("1.2.3").compatible(&version("2.1.3")),
            VersionCompatibility::Conflict
        );
    }

    #[test]
    fn test_zero_major_compatibility() {
        assert_eq!(
            version("0.2.3").compatible(&version("0.2.3")),
            VersionCompatibility::Equals
        );
        assert_eq!(
            version("0.2.3").compatible(&version("0.2.2")),
            VersionCompatibility::GreaterThan
        );
        assert_eq!(
            version("0.2.3").compatible(&version("0.2.11")),
            VersionCompatibility::LessThan
        );
        assert_eq!(
            version("0.2.3").compatible(&version("0.3.2")),
            VersionCompatibility::Conflict
        );
    }

    #[test]
    fn test_runtime_edition() {
        let strlen = RUNTIME_EDITION
            .iter()
            .position(|c| *c == 0)
            .unwrap_or(RUNTIME_EDITION.len());

        assert_eq!(
            std::str::from_utf8(&RUNTIME_EDITION[..strlen]).unwrap(),
            RUNTIME_EDITION_STRING
        );
    }
}
