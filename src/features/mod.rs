//! The MCCS VCP feature table.
//!
//! Entries are static and describe each known code separately for MCCS 2.0,
//! 2.1, 3.0 and 2.2, because the standard redefines several codes between
//! versions. [`feature_info`] resolves an entry against a monitor's version.

use std::fmt;
use std::ops::BitOr;
use crate::commands::FeatureCode;
use crate::error::{Error, Result};
use crate::version::VersionSpec;

mod table;
pub mod values;
mod format;
mod subset;

pub use format::{format_value, format_terse, Formatter};
pub use subset::{FeatureSubset, subset_codes};
pub use values::{value_name, ValueTable};

/// Per-version feature attributes.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeatureFlags(u16);

impl FeatureFlags {
    pub const NONE: FeatureFlags = FeatureFlags(0);
    pub const READABLE: FeatureFlags = FeatureFlags(0x0001);
    pub const WRITABLE: FeatureFlags = FeatureFlags(0x0002);
    pub const CONTINUOUS: FeatureFlags = FeatureFlags(0x0004);
    pub const SIMPLE_NC: FeatureFlags = FeatureFlags(0x0008);
    pub const COMPLEX_NC: FeatureFlags = FeatureFlags(0x0010);
    pub const TABLE: FeatureFlags = FeatureFlags(0x0020);
    pub const DEPRECATED: FeatureFlags = FeatureFlags(0x0040);
    pub const MANUFACTURER: FeatureFlags = FeatureFlags(0x0080);
    pub const SYNTHETIC: FeatureFlags = FeatureFlags(0x0100);

    pub const RO: FeatureFlags = FeatureFlags(0x0001);
    pub const WO: FeatureFlags = FeatureFlags(0x0002);
    pub const RW: FeatureFlags = FeatureFlags(0x0003);

    const NAMES: [(FeatureFlags, &'static str); 9] = [
        (FeatureFlags::READABLE, "READABLE"),
        (FeatureFlags::WRITABLE, "WRITABLE"),
        (FeatureFlags::CONTINUOUS, "CONTINUOUS"),
        (FeatureFlags::SIMPLE_NC, "SIMPLE_NC"),
        (FeatureFlags::COMPLEX_NC, "COMPLEX_NC"),
        (FeatureFlags::TABLE, "TABLE"),
        (FeatureFlags::DEPRECATED, "DEPRECATED"),
        (FeatureFlags::MANUFACTURER, "MANUFACTURER"),
        (FeatureFlags::SYNTHETIC, "SYNTHETIC"),
    ];

    pub const fn union(self, other: FeatureFlags) -> FeatureFlags {
        FeatureFlags(self.0 | other.0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: FeatureFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: FeatureFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_readable(self) -> bool {
        self.contains(FeatureFlags::READABLE)
    }

    pub fn is_writable(self) -> bool {
        self.contains(FeatureFlags::WRITABLE)
    }

    pub fn is_continuous(self) -> bool {
        self.contains(FeatureFlags::CONTINUOUS)
    }

    pub fn is_nc(self) -> bool {
        self.intersects(FeatureFlags::SIMPLE_NC.union(FeatureFlags::COMPLEX_NC))
    }

    pub fn is_table(self) -> bool {
        self.contains(FeatureFlags::TABLE)
    }

    pub fn is_deprecated(self) -> bool {
        self.contains(FeatureFlags::DEPRECATED)
    }

    /// `RW`, `RO` or `WO`.
    pub fn access_name(self) -> &'static str {
        match (self.is_readable(), self.is_writable()) {
            (true, true) => "RW",
            (true, false) => "RO",
            (false, true) => "WO",
            (false, false) => "--",
        }
    }

    /// `C`, `NC`, `T` or `?`.
    pub fn type_name(self) -> &'static str {
        if self.is_continuous() {
            "C"
        } else if self.is_nc() {
            "NC"
        } else if self.is_table() {
            "T"
        } else {
            "?"
        }
    }
}

impl BitOr for FeatureFlags {
    type Output = FeatureFlags;

    fn bitor(self, rhs: FeatureFlags) -> FeatureFlags {
        self.union(rhs)
    }
}

impl fmt::Debug for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<_> = FeatureFlags::NAMES.iter()
            .filter(|&&(flag, _)| self.contains(flag))
            .map(|&(_, name)| name)
            .collect();
        write!(f, "FeatureFlags({})", names.join(" | "))
    }
}

/// Bits naming the subsets an entry belongs to.
pub mod subsets {
    pub const PROFILE: u16 = 0x0001;
    pub const COLOR: u16 = 0x0002;
    pub const LUT: u16 = 0x0004;
    pub const CRT: u16 = 0x0008;
    pub const TV: u16 = 0x0010;
    pub const AUDIO: u16 = 0x0020;
    pub const WINDOW: u16 = 0x0040;
    pub const DPVL: u16 = 0x0080;
    pub const PRESET: u16 = 0x0100;
}

/// One static feature table entry.
///
/// Flags and names of later versions are empty when unchanged; lookups
/// inherit from the nearest earlier version that sets them.
#[derive(Copy, Clone, Debug)]
pub struct FeatureEntry {
    pub code: FeatureCode,
    pub subsets: u16,
    pub desc: &'static str,
    pub v20_name: &'static str,
    pub v21_name: Option<&'static str>,
    pub v30_name: Option<&'static str>,
    pub v22_name: Option<&'static str>,
    pub v20_flags: FeatureFlags,
    pub v21_flags: FeatureFlags,
    pub v30_flags: FeatureFlags,
    pub v22_flags: FeatureFlags,
    pub values: Option<ValueTable>,
    pub v30_values: Option<ValueTable>,
    pub v22_values: Option<ValueTable>,
    pub formatter: Formatter,
}

impl FeatureEntry {
    pub(crate) const DEFAULT: FeatureEntry = FeatureEntry {
        code: 0,
        subsets: 0,
        desc: "",
        v20_name: "",
        v21_name: None,
        v30_name: None,
        v22_name: None,
        v20_flags: FeatureFlags::NONE,
        v21_flags: FeatureFlags::NONE,
        v30_flags: FeatureFlags::NONE,
        v22_flags: FeatureFlags::NONE,
        values: None,
        v30_values: None,
        v22_values: None,
        formatter: Formatter::Default,
    };

    /// Version slots consulted for `version`, most specific first.
    fn lookup_order(version: VersionSpec) -> &'static [usize] {
        // slot indices: 0 = 2.0, 1 = 2.1, 2 = 3.0, 3 = 2.2
        let v = version.or_default_v22();
        if v.at_least(VersionSpec::V30) {
            &[2, 3, 1, 0]
        } else if v.at_least(VersionSpec::V22) {
            &[3, 1, 0]
        } else if v.at_least(VersionSpec::V21) {
            &[1, 0]
        } else {
            &[0]
        }
    }

    fn flags_slot(&self, slot: usize) -> FeatureFlags {
        match slot {
            0 => self.v20_flags,
            1 => self.v21_flags,
            2 => self.v30_flags,
            _ => self.v22_flags,
        }
    }

    fn name_slot(&self, slot: usize) -> Option<&'static str> {
        match slot {
            0 if !self.v20_name.is_empty() => Some(self.v20_name),
            0 => None,
            1 => self.v21_name,
            2 => self.v30_name,
            _ => self.v22_name,
        }
    }

    /// Flags as defined by `version` itself or an earlier one.
    pub fn defined_flags(&self, version: VersionSpec) -> Option<FeatureFlags> {
        FeatureEntry::lookup_order(version).iter()
            .map(|&slot| self.flags_slot(slot))
            .find(|flags| !flags.is_empty())
    }

    /// Flags for `version`, falling back to the newest definition for
    /// codes introduced after it.
    pub fn flags(&self, version: VersionSpec) -> FeatureFlags {
        self.defined_flags(version)
            .or_else(|| [3, 2, 1, 0].iter().map(|&slot| self.flags_slot(slot)).find(|f| !f.is_empty()))
            .unwrap_or_default()
    }

    pub fn name(&self, version: VersionSpec) -> &'static str {
        FeatureEntry::lookup_order(version).iter()
            .filter_map(|&slot| self.name_slot(slot))
            .next()
            .or_else(|| [3, 2, 1, 0].iter().filter_map(|&slot| self.name_slot(slot)).next())
            .unwrap_or("Unknown feature")
    }

    pub fn values(&self, version: VersionSpec) -> Option<ValueTable> {
        let v = version.or_default_v22();
        if v.at_least(VersionSpec::V30) {
            self.v30_values.or(self.v22_values).or(self.values)
        } else if v.at_least(VersionSpec::V22) {
            self.v22_values.or(self.values)
        } else {
            self.values
        }
    }

    /// The earliest version defining this code.
    pub fn introduced_in(&self) -> VersionSpec {
        if !self.v20_flags.is_empty() {
            VersionSpec::V20
        } else if !self.v21_flags.is_empty() {
            VersionSpec::V21
        } else if !self.v30_flags.is_empty() {
            VersionSpec::V30
        } else {
            VersionSpec::V22
        }
    }
}

/// A feature entry resolved against one MCCS version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureInfo {
    pub code: FeatureCode,
    pub version: VersionSpec,
    pub name: &'static str,
    pub desc: &'static str,
    pub flags: FeatureFlags,
    pub values: Option<ValueTable>,
    pub formatter: Formatter,
    pub subsets: u16,
    pub introduced_in: VersionSpec,
    /// `false` when the code only exists in a later version.
    pub defined_in_version: bool,
}

impl FeatureInfo {
    pub fn is_readable(&self) -> bool {
        self.flags.is_readable()
    }

    pub fn is_writable(&self) -> bool {
        self.flags.is_writable()
    }

    pub fn is_table(&self) -> bool {
        self.flags.is_table()
    }

    pub fn is_deprecated(&self) -> bool {
        self.flags.is_deprecated()
    }

    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(FeatureFlags::SYNTHETIC)
    }

    /// Name of an NC value, if the table has one.
    pub fn value_name(&self, value: u8) -> Option<&'static str> {
        match self.values {
            Some(table) => value_name(table, value).or_else(|| if value == 0xff {
                Some("Manufacturer specific")
            } else {
                None
            }),
            None => None,
        }
    }
}

/// Every static entry, in code order.
pub fn entries() -> &'static [FeatureEntry] {
    table::FEATURES
}

/// The static entry for `code`.
pub fn find_entry(code: FeatureCode) -> Option<&'static FeatureEntry> {
    table::FEATURES.binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|i| &table::FEATURES[i])
}

/// Whether `code` is in the manufacturer-reserved range.
pub fn is_manufacturer_code(code: FeatureCode) -> bool {
    code >= 0xe0
}

fn resolve(entry: &FeatureEntry, version: VersionSpec) -> FeatureInfo {
    FeatureInfo {
        code: entry.code,
        version,
        name: entry.name(version),
        desc: entry.desc,
        flags: entry.flags(version),
        values: entry.values(version),
        formatter: entry.formatter,
        subsets: entry.subsets,
        introduced_in: entry.introduced_in(),
        defined_in_version: entry.defined_flags(version).is_some(),
    }
}

/// Looks up `code` in the table for `version`.
pub fn feature_info(code: FeatureCode, version: VersionSpec) -> Option<FeatureInfo> {
    find_entry(code).map(|entry| resolve(entry, version))
}

/// An entry for a code absent from the table, interpreted generically.
pub fn synthetic_info(code: FeatureCode, version: VersionSpec) -> FeatureInfo {
    let mut flags = FeatureFlags::RW | FeatureFlags::COMPLEX_NC | FeatureFlags::SYNTHETIC;
    let name = if is_manufacturer_code(code) {
        flags = flags | FeatureFlags::MANUFACTURER;
        "Manufacturer Specific"
    } else {
        "Unknown feature"
    };

    FeatureInfo {
        code,
        version,
        name,
        desc: "",
        flags,
        values: None,
        formatter: Formatter::Generic,
        subsets: 0,
        introduced_in: VersionSpec::UNKNOWN,
        defined_in_version: false,
    }
}

/// Looks up `code`, accepting unknown codes only when `force` is set.
///
/// Manufacturer-specific codes are always accepted.
pub fn lookup(code: FeatureCode, version: VersionSpec, force: bool) -> Result<FeatureInfo> {
    match feature_info(code, version) {
        Some(info) => Ok(info),
        None if force || is_manufacturer_code(code) => Ok(synthetic_info(code, version)),
        None => Err(Error::UnknownFeature(code)),
    }
}

/// Whether a set of `code` can be verified by reading it back.
///
/// New control value, soft controls and input source reads do not reflect
/// a preceding write on many monitors.
pub fn is_rereadable(code: FeatureCode, version: VersionSpec) -> bool {
    match code {
        0x02 | 0x03 | 0x60 => false,
        _ => lookup(code, version, true).map(|info| info.is_readable()).unwrap_or(false),
    }
}

/// Parses a feature code: `10`, `0x10`, `x10` and `10h` are all hex.
pub fn parse_feature_code(s: &str) -> Result<FeatureCode> {
    let t = s.trim();
    let hex = t.strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .or_else(|| t.strip_prefix('x'))
        .or_else(|| t.strip_prefix('X'))
        .or_else(|| t.strip_suffix('h'))
        .or_else(|| t.strip_suffix('H'))
        .unwrap_or(t);

    if hex.is_empty() || hex.len() > 2 {
        return Err(Error::InvalidArgument(format!("invalid feature code {:?}", s)))
    }
    u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidArgument(format!("invalid feature code {:?}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in table::FEATURES.windows(2) {
            assert!(pair[0].code < pair[1].code, "0x{:02x} before 0x{:02x}", pair[0].code, pair[1].code);
        }
    }

    #[test]
    fn every_entry_has_a_name_and_flags() {
        for e in entries() {
            assert!(!e.name(VersionSpec::V22).is_empty(), "0x{:02x}", e.code);
            assert!(!e.flags(VersionSpec::V22).is_empty(), "0x{:02x}", e.code);
        }
    }

    #[test]
    fn luminance() {
        let info = feature_info(0x10, VersionSpec::V21).unwrap();
        assert_eq!(info.name, "Brightness");
        assert!(info.is_readable() && info.is_writable());
        assert!(info.flags.is_continuous());
        assert!(info.subsets & subsets::PROFILE != 0);
    }

    #[test]
    fn version_specific_flags() {
        // 0x14 changed from simple to complex NC in 3.0
        let v21 = feature_info(0x14, VersionSpec::V21).unwrap();
        let v30 = feature_info(0x14, VersionSpec::V30).unwrap();
        assert!(v21.flags.contains(FeatureFlags::SIMPLE_NC));
        assert!(v30.flags.contains(FeatureFlags::COMPLEX_NC));

        // 2.2 inherits 2.1 where it is silent
        let v22 = feature_info(0x10, VersionSpec::V22).unwrap();
        assert_eq!(v22.flags, feature_info(0x10, VersionSpec::V21).unwrap().flags);

        // unknown behaves as 2.2
        assert_eq!(feature_info(0x14, VersionSpec::UNKNOWN).unwrap().flags, feature_info(0x14, VersionSpec::V22).unwrap().flags);
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(lookup(0x4f, VersionSpec::V22, false), Err(Error::UnknownFeature(0x4f)));
        let info = lookup(0x4f, VersionSpec::V22, true).unwrap();
        assert!(info.is_synthetic());
        assert_eq!(info.formatter, Formatter::Generic);

        let mfg = lookup(0xe1, VersionSpec::V22, false).unwrap();
        assert!(mfg.flags.contains(FeatureFlags::MANUFACTURER));
    }

    #[test]
    fn rereadable() {
        assert!(is_rereadable(0x10, VersionSpec::V22));
        assert!(!is_rereadable(0x60, VersionSpec::V22));
        assert!(!is_rereadable(0x02, VersionSpec::V22));
        assert!(!is_rereadable(0x03, VersionSpec::UNKNOWN));
    }

    #[test]
    fn feature_codes() {
        assert_eq!(parse_feature_code("10").unwrap(), 0x10);
        assert_eq!(parse_feature_code("0xdf").unwrap(), 0xdf);
        assert_eq!(parse_feature_code("x60").unwrap(), 0x60);
        assert_eq!(parse_feature_code("14h").unwrap(), 0x14);
        assert!(parse_feature_code("100").is_err());
        assert!(parse_feature_code("zz").is_err());
    }

    #[test]
    fn nc_value_names() {
        let info = feature_info(0x60, VersionSpec::V22).unwrap();
        assert_eq!(info.value_name(0x0f), Some("DisplayPort-1"));
        assert_eq!(info.value_name(0xff), Some("Manufacturer specific"));
        assert_eq!(info.value_name(0x7f), None);
    }
}
