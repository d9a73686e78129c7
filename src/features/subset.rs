use std::fmt;
use std::str::FromStr;
use crate::commands::FeatureCode;
use crate::error::Error;
use crate::version::VersionSpec;
use super::{entries, is_manufacturer_code, parse_feature_code, subsets};

/// A named group of feature codes, or a single code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeatureSubset {
    Single(FeatureCode),
    Color,
    Profile,
    Lut,
    Audio,
    Window,
    Tv,
    Dpvl,
    Crt,
    Preset,
    /// Every code `0x00..=0xFF`.
    Scan,
    /// Every code in the feature table.
    Known,
    /// The manufacturer range `0xE0..=0xFF`.
    Mfg,
    /// Every table-type code.
    Table,
    /// Every known code plus the manufacturer range.
    All,
}

impl FeatureSubset {
    pub const NAMED: [(FeatureSubset, &'static str); 14] = [
        (FeatureSubset::Color, "COLOR"),
        (FeatureSubset::Profile, "PROFILE"),
        (FeatureSubset::Lut, "LUT"),
        (FeatureSubset::Audio, "AUDIO"),
        (FeatureSubset::Window, "WINDOW"),
        (FeatureSubset::Tv, "TV"),
        (FeatureSubset::Dpvl, "DPVL"),
        (FeatureSubset::Crt, "CRT"),
        (FeatureSubset::Preset, "PRESET"),
        (FeatureSubset::Scan, "SCAN"),
        (FeatureSubset::Known, "KNOWN"),
        (FeatureSubset::Mfg, "MFG"),
        (FeatureSubset::Table, "TABLE"),
        (FeatureSubset::All, "ALL"),
    ];

    fn bit(self) -> Option<u16> {
        Some(match self {
            FeatureSubset::Color => subsets::COLOR,
            FeatureSubset::Profile => subsets::PROFILE,
            FeatureSubset::Lut => subsets::LUT,
            FeatureSubset::Audio => subsets::AUDIO,
            FeatureSubset::Window => subsets::WINDOW,
            FeatureSubset::Tv => subsets::TV,
            FeatureSubset::Dpvl => subsets::DPVL,
            FeatureSubset::Crt => subsets::CRT,
            FeatureSubset::Preset => subsets::PRESET,
            _ => return None,
        })
    }

    /// Whether table features are part of a bulk query over this subset by
    /// default.
    pub fn includes_tables(self) -> bool {
        match self {
            FeatureSubset::Single(_) | FeatureSubset::Table | FeatureSubset::Lut => true,
            _ => false,
        }
    }
}

impl fmt::Display for FeatureSubset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeatureSubset::Single(code) => write!(f, "0x{:02x}", code),
            subset => {
                let name = FeatureSubset::NAMED.iter()
                    .find(|&&(s, _)| s == *subset)
                    .map(|&(_, name)| name)
                    .unwrap_or("?");
                f.write_str(name)
            },
        }
    }
}

impl FromStr for FeatureSubset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let upper = s.trim().to_ascii_uppercase();
        let alias = match &upper[..] {
            "MANUFACTURER" => "MFG",
            "SCAN_ALL" => "SCAN",
            "CRT_GEOMETRY" => "CRT",
            other => other,
        };

        if let Some(&(subset, _)) = FeatureSubset::NAMED.iter().find(|&&(_, name)| name == alias) {
            return Ok(subset)
        }

        parse_feature_code(s)
            .map(FeatureSubset::Single)
            .map_err(|_| Error::InvalidArgument(format!("unrecognized feature code or subset {:?}", s)))
    }
}

/// The codes of a subset, in ascending order.
///
/// Table membership of `TABLE` depends on the MCCS version.
pub fn subset_codes(subset: FeatureSubset, version: VersionSpec) -> Vec<FeatureCode> {
    match subset {
        FeatureSubset::Single(code) => vec![code],
        FeatureSubset::Scan => (0..=0xffu8).collect(),
        FeatureSubset::Mfg => (0xe0..=0xffu8).collect(),
        FeatureSubset::Known => entries().iter().map(|e| e.code).collect(),
        FeatureSubset::All => entries().iter()
            .map(|e| e.code)
            .filter(|&code| !is_manufacturer_code(code))
            .chain(0xe0..=0xff)
            .collect(),
        FeatureSubset::Table => entries().iter()
            .filter(|e| e.flags(version).is_table())
            .map(|e| e.code)
            .collect(),
        named => {
            let bit = named.bit().unwrap_or(0);
            entries().iter().filter(|e| e.subsets & bit != 0).map(|e| e.code).collect()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_subsets() {
        assert_eq!("color".parse::<FeatureSubset>().unwrap(), FeatureSubset::Color);
        assert_eq!("Manufacturer".parse::<FeatureSubset>().unwrap(), FeatureSubset::Mfg);
        assert_eq!("0x10".parse::<FeatureSubset>().unwrap(), FeatureSubset::Single(0x10));
        assert_eq!("e0".parse::<FeatureSubset>().unwrap(), FeatureSubset::Single(0xe0));
        assert!("bogus".parse::<FeatureSubset>().is_err());
        assert_eq!(FeatureSubset::Profile.to_string(), "PROFILE");
    }

    #[test]
    fn subset_membership() {
        let preset = subset_codes(FeatureSubset::Preset, VersionSpec::V22);
        assert_eq!(preset, vec![0x04, 0x05, 0x06, 0x08, 0x0a]);

        let profile = subset_codes(FeatureSubset::Profile, VersionSpec::V22);
        assert!(profile.contains(&0x10) && profile.contains(&0x12) && profile.contains(&0x14));

        assert_eq!(subset_codes(FeatureSubset::Scan, VersionSpec::V22).len(), 256);
        assert_eq!(subset_codes(FeatureSubset::Mfg, VersionSpec::V22).len(), 32);

        let tables = subset_codes(FeatureSubset::Table, VersionSpec::V22);
        assert!(tables.contains(&0x73) && tables.contains(&0xd2));
        assert!(subset_codes(FeatureSubset::Table, VersionSpec::V20).contains(&0x73));

        let all = subset_codes(FeatureSubset::All, VersionSpec::V22);
        assert!(all.contains(&0xdf) && all.contains(&0xff));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
