use std::{fmt, str::FromStr};
use crate::error::Error;

/// An MCCS version as advertised by feature `0xDF` or the capabilities
/// string.
///
/// `VersionSpec::UNKNOWN` means the version has not been determined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VersionSpec {
    pub major: u8,
    pub minor: u8,
}

impl VersionSpec {
    pub const UNKNOWN: VersionSpec = VersionSpec { major: 0, minor: 0 };
    pub const V20: VersionSpec = VersionSpec { major: 2, minor: 0 };
    pub const V21: VersionSpec = VersionSpec { major: 2, minor: 1 };
    pub const V22: VersionSpec = VersionSpec { major: 2, minor: 2 };
    pub const V30: VersionSpec = VersionSpec { major: 3, minor: 0 };

    pub fn new(major: u8, minor: u8) -> Self {
        VersionSpec { major, minor }
    }

    pub fn is_unknown(&self) -> bool {
        *self == VersionSpec::UNKNOWN
    }

    /// The version assumed when the monitor's is unknown.
    pub fn or_default_v22(self) -> Self {
        if self.is_unknown() {
            VersionSpec::V22
        } else {
            self
        }
    }

    /// Numeric comparison on `(major, minor)`.
    pub fn at_least(&self, other: VersionSpec) -> bool {
        (self.major, self.minor) >= (other.major, other.minor)
    }

    /// Converts to the `mccs` crate's version type.
    pub fn to_mccs(&self) -> Option<mccs::Version> {
        if self.is_unknown() {
            None
        } else {
            Some(mccs::Version::new(self.major, self.minor))
        }
    }
}

impl From<mccs::Version> for VersionSpec {
    fn from(v: mccs::Version) -> Self {
        VersionSpec::new(v.major, v.minor)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("Unknown")
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

impl FromStr for VersionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidArgument(format!("invalid MCCS version {:?}", s));
        let mut parts = s.trim().splitn(2, '.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };
        Ok(VersionSpec::new(major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_order() {
        let v: VersionSpec = "2.1".parse().unwrap();
        assert_eq!(v, VersionSpec::V21);
        assert!(VersionSpec::V30.at_least(VersionSpec::V22));
        assert!(!VersionSpec::V20.at_least(VersionSpec::V21));
        assert_eq!("3".parse::<VersionSpec>().unwrap(), VersionSpec::V30);
        assert!("x.1".parse::<VersionSpec>().is_err());
    }

    #[test]
    fn unknown_defaults() {
        assert_eq!(VersionSpec::UNKNOWN.or_default_v22(), VersionSpec::V22);
        assert_eq!(VersionSpec::V21.or_default_v22(), VersionSpec::V21);
        assert_eq!(VersionSpec::UNKNOWN.to_string(), "Unknown");
        assert_eq!(VersionSpec::V21.to_mccs().map(VersionSpec::from), Some(VersionSpec::V21));
    }
}
