//! Human and terse renderings of command results.

use std::fmt::Write;
use std::path::Path;
use ddcci::features::{self, FeatureEntry, FeatureInfo, FeatureSubset};
use ddcci::registry::{self, BusInfo, DisplayRef, Registry};
use ddcci::{i2c, stats, Capabilities, Edid, Error, FeatureCode, VcpValue, VersionSpec};

/// Prints a failed command to stderr.
pub fn report_error(error: &Error, display: Option<&DisplayRef>, verbose: bool) {
    match display {
        Some(display) => eprintln!("Error ({}, code {}) on {}: {}", error.kind(), error.code(), display, error),
        None => eprintln!("Error ({}, code {}): {}", error.kind(), error.code(), error),
    }
    if verbose {
        eprint!("{}", stats::tries_report());
    }
}

fn feature_label(code: FeatureCode, name: &str) -> String {
    format!("VCP code 0x{:02x} ({})", code, name)
}

/// One `getvcp` result line. Deprecated features get a warning prefix in
/// the human form.
pub fn value_line(info: &FeatureInfo, value: &VcpValue, terse: bool) -> String {
    if terse {
        return features::format_terse(info, value)
    }

    let line = format!("{}: {}", feature_label(info.code, info.name), features::format_value(info, value));
    if info.is_deprecated() {
        format!("(Deprecated in MCCS {}) {}", info.version, line)
    } else {
        line
    }
}

/// One `getvcp` failure line.
pub fn error_line(info: &FeatureInfo, error: &Error, terse: bool) -> String {
    match (terse, error) {
        (true, Error::FeatureUnsupportedByMonitor(_)) => format!("VCP {:02X} UNSUPPORTED", info.code),
        (true, _) => format!("VCP {:02X} ERR", info.code),
        (false, Error::FeatureUnsupportedByMonitor(_)) =>
            format!("{}: Unsupported feature code", feature_label(info.code, info.name)),
        (false, e) => format!("{}: {}", feature_label(info.code, info.name), e),
    }
}

fn edid_lines(out: &mut String, edid: &Edid, indent: &str) {
    let _ = writeln!(out, "{}Mfg id:        {}", indent, edid.mfg_id);
    let _ = writeln!(out, "{}Model:         {}", indent, edid.model());
    let _ = writeln!(out, "{}Serial number: {}", indent, edid.serial());
    let _ = writeln!(out, "{}Product code:  {}", indent, edid.product_code);
    let _ = writeln!(out, "{}Manufactured:  week {}, year {}", indent, edid.week, edid.year);
    let _ = writeln!(out, "{}EDID version:  {}.{}", indent, edid.version, edid.revision);
}

fn bus_lines(out: &mut String, bus: &BusInfo) {
    let _ = writeln!(out, "   I2C bus:  {}", i2c::bus_path(bus.busno).display());
    if let Some(name) = &bus.adapter_name {
        let _ = writeln!(out, "   Adapter:  {}", name);
    }
}

/// The `detect` listing.
pub fn detect_report(registry: &Registry, verbose: bool, terse: bool) -> String {
    let mut out = String::new();
    let displays = registry.displays();

    for display in &displays {
        let bus = registry.buses().iter().find(|b| b.busno == display.busno);
        let dispno = display.dispno.unwrap_or_default();
        if terse {
            let (mfg, model, sn) = match &display.edid {
                Some(edid) => (edid.mfg_id.clone(), edid.model(), edid.serial()),
                None => Default::default(),
            };
            let _ = writeln!(out, "Display {}:{}:{}:{}:{}:{}", dispno, display.busno, mfg, model, sn,
                if display.ddc_ok { "ok" } else { "noddc" });
            continue
        }

        let _ = writeln!(out, "Display {}", dispno);
        if let Some(bus) = bus {
            bus_lines(&mut out, bus);
        }
        if let Some(edid) = &display.edid {
            let _ = writeln!(out, "   EDID synopsis:");
            edid_lines(&mut out, edid, "      ");
            if verbose {
                let _ = writeln!(out, "      EDID hex:      {}", edid.to_hex());
            }
        }
        if !display.ddc_ok {
            let _ = writeln!(out, "   DDC communication failed");
        } else if let Some(version) = display.version {
            let _ = writeln!(out, "   VCP version:  {}", version);
        }
        let _ = writeln!(out);
    }

    if displays.is_empty() && !terse {
        let _ = writeln!(out, "No displays found");
    }

    if verbose {
        for bus in registry.buses().iter().filter(|b| !b.is_display()) {
            let _ = writeln!(out, "Bus /dev/i2c-{} has no display", bus.busno);
            if let Some(name) = &bus.adapter_name {
                let _ = writeln!(out, "   Adapter:  {}", name);
            }
            if let Some(e) = &bus.error {
                let _ = writeln!(out, "   Error:    {}", e);
            }
        }
    }

    out
}

/// The parsed form of a capabilities string.
pub fn capabilities_report(caps: &Capabilities, terse: bool) -> String {
    if terse {
        return format!("{}\n", caps.raw)
    }

    let mut out = String::new();
    let version = caps.mccs_version.unwrap_or(VersionSpec::UNKNOWN);
    if let Some(model) = &caps.model {
        let _ = writeln!(out, "Model: {}", model);
    }
    if let Some(v) = caps.mccs_version {
        let _ = writeln!(out, "MCCS version: {}", v);
    }
    if let Some(ty) = &caps.ty {
        let _ = writeln!(out, "Type: {}", ty);
    }
    if !caps.commands.is_empty() {
        let codes: Vec<_> = caps.commands.iter().map(|c| format!("{:02x}", c)).collect();
        let _ = writeln!(out, "Commands: {}", codes.join(" "));
    }

    let _ = writeln!(out, "VCP features:");
    for (&code, values) in &caps.vcp {
        let info = features::feature_info(code, version)
            .unwrap_or_else(|| features::synthetic_info(code, version));
        let _ = writeln!(out, "   Feature: {:02X} ({})", code, info.name);
        if let Some(values) = values {
            let _ = writeln!(out, "      Values:");
            for &value in values {
                match info.value_name(value) {
                    Some(name) => { let _ = writeln!(out, "         {:02x}: {}", value, name); },
                    None => { let _ = writeln!(out, "         {:02x}", value); },
                }
            }
        }
    }

    for (name, value) in &caps.other {
        let _ = writeln!(out, "{}: {}", name, value);
    }
    for e in &caps.errors {
        let _ = writeln!(out, "Parse error: {}", e);
    }

    out
}

const VERSIONS: [VersionSpec; 4] = [VersionSpec::V20, VersionSpec::V21, VersionSpec::V30, VersionSpec::V22];

/// `vcpinfo` for one table entry.
pub fn feature_entry_report(entry: &FeatureEntry, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "VCP code {:02X}: {}", entry.code, entry.name(VersionSpec::V22));
    let _ = writeln!(out, "   {}", entry.desc);

    let subsets: Vec<_> = FeatureSubset::NAMED.iter()
        .filter(|(subset, _)| features::subset_codes(*subset, VersionSpec::V22).contains(&entry.code))
        .filter(|(subset, _)| !matches!(subset, FeatureSubset::All | FeatureSubset::Scan | FeatureSubset::Known))
        .map(|(_, name)| *name)
        .collect();
    if !subsets.is_empty() {
        let _ = writeln!(out, "   Subsets: {}", subsets.join(" "));
    }

    for &version in &VERSIONS {
        match entry.defined_flags(version) {
            Some(flags) => {
                let _ = writeln!(out, "   MCCS {}: {}, {}, {}", version, entry.name(version), flags.access_name(), flags.type_name());
            },
            None => {
                let _ = writeln!(out, "   MCCS {}: not defined", version);
            },
        }
    }

    if verbose {
        if let Some(values) = entry.values(VersionSpec::V22) {
            let _ = writeln!(out, "   Values:");
            for &(value, name) in values.iter() {
                let _ = writeln!(out, "      {:02x}: {}", value, name);
            }
        }
    }

    out
}

/// One `listvcp` row.
pub fn feature_entry_row(entry: &FeatureEntry) -> String {
    let flags = entry.flags(VersionSpec::V22);
    format!("{:02X}  {:<40} {:<3} {}", entry.code, entry.name(VersionSpec::V22), flags.access_name(), flags.type_name())
}

fn i2c_dev_loaded() -> bool {
    Path::new("/sys/module/i2c_dev").exists() || std::fs::read_to_string("/proc/modules")
        .map(|modules| modules.lines().any(|l| l.starts_with("i2c_dev ")))
        .unwrap_or(false)
}

/// One `/dev/i2c-N` as seen by `environment`.
pub struct NodeReport {
    pub busno: u32,
    pub adapter_name: Option<String>,
    pub open_error: Option<Error>,
    pub functionality: u64,
}

/// The `environment` report.
pub fn environment_report(nodes: &[NodeReport], verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Kernel module i2c_dev: {}", if i2c_dev_loaded() { "loaded" } else { "not loaded (or built in)" });

    if nodes.is_empty() {
        let _ = writeln!(out, "No /dev/i2c-* device nodes found");
        return out
    }

    let _ = writeln!(out, "I2C device nodes:");
    for node in nodes {
        let name = node.adapter_name.as_deref().unwrap_or("(unknown adapter)");
        let ignorable = if registry::is_ignorable_adapter(name) { ", ignored" } else { "" };
        let _ = writeln!(out, "   {}  {}{}", i2c::bus_path(node.busno).display(), name, ignorable);
        match &node.open_error {
            Some(Error::Io(e)) if e.errno == libc::EACCES =>
                { let _ = writeln!(out, "      Not accessible: permission denied; check group membership or udev rules"); },
            Some(e) => { let _ = writeln!(out, "      Not accessible: {}", e); },
            None if verbose => {
                let names = i2c::functionality_names(node.functionality);
                let _ = writeln!(out, "      Functionality: {}", names.join(" "));
            },
            None => (),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddcci::NonTableValue;

    #[test]
    fn getvcp_lines() {
        let info = features::lookup(0x10, VersionSpec::V22, false).unwrap();
        let value = VcpValue::NonTable(NonTableValue::new(0x10, 100, 50));
        assert_eq!(value_line(&info, &value, true), "VCP 10 C 50 100");
        assert!(value_line(&info, &value, false).starts_with("VCP code 0x10 (Brightness): "));

        let e = Error::FeatureUnsupportedByMonitor(0x10);
        assert_eq!(error_line(&info, &e, true), "VCP 10 UNSUPPORTED");
        assert_eq!(error_line(&info, &e, false), "VCP code 0x10 (Brightness): Unsupported feature code");
        assert_eq!(error_line(&info, &Error::InvalidArgument("x".into()), true), "VCP 10 ERR");
    }

    #[test]
    fn deprecated_values_carry_a_warning() {
        let info = features::lookup(0x13, VersionSpec::V22, false).unwrap();
        assert!(info.is_deprecated());
        let value = VcpValue::NonTable(NonTableValue::new(0x13, 100, 40));
        assert!(value_line(&info, &value, false).starts_with("(Deprecated in MCCS 2.2) VCP code 0x13 ("));
        assert_eq!(value_line(&info, &value, true), "VCP 13 C 40 100");

        let current = features::lookup(0x13, VersionSpec::V20, false).unwrap();
        assert!(value_line(&current, &value, false).starts_with("VCP code 0x13 ("));
    }

    #[test]
    fn vcpinfo_lists_versions() {
        let entry = features::find_entry(0x10).unwrap();
        let report = feature_entry_report(entry, false);
        assert!(report.starts_with("VCP code 10: Brightness"));
        assert!(report.contains("MCCS 2.2"));
        assert!(report.contains("PROFILE"));
    }
}
