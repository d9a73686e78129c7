use crate::commands::{NonTableValue, VcpValue};
use crate::version::VersionSpec;
use crate::hexfmt;
use super::{feature_info, values, FeatureInfo};

/// How a feature's raw value is rendered for people.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formatter {
    /// Chosen from the feature's flags.
    Default,
    /// Raw `mh/ml/sh/sl` bytes.
    Generic,
    NewControlValue,
    ColorTemperatureIncrement,
    ColorTemperatureRequest,
    ColorPreset,
    ActiveControl,
    Gamma,
    AudioMute,
    HorizontalFrequency,
    VerticalFrequency,
    UsageTime,
    ApplicationKey,
    DisplayControllerType,
    FirmwareLevel,
    Version,
}

fn continuous(v: &NonTableValue) -> String {
    format!("current value = {:5}, max value = {:5}", v.value(), v.maximum())
}

fn generic(v: &NonTableValue) -> String {
    format!("mh=0x{:02x}, ml=0x{:02x}, sh=0x{:02x}, sl=0x{:02x}", v.mh, v.ml, v.sh, v.sl)
}

fn simple_nc(info: &FeatureInfo, v: &NonTableValue) -> String {
    let name = info.value_name(v.sl).unwrap_or("Unrecognized value");
    format!("{} (sl=0x{:02x})", name, v.sl)
}

fn color_preset(info: &FeatureInfo, v: &NonTableValue) -> String {
    let preset = simple_nc(info, v);
    if info.version.or_default_v22().at_least(VersionSpec::V30) {
        let tolerance = values::value_name(values::COLOR_PRESET_TOLERANCE, v.mh & 0x0f).unwrap_or("Invalid tolerance");
        format!("{}, Tolerance: {} (mh=0x{:02x})", preset, tolerance, v.mh)
    } else {
        preset
    }
}

fn active_control(info: &FeatureInfo, v: &NonTableValue) -> String {
    if v.sl == 0 {
        return "No changed features (sl=0x00)".into()
    }

    let name = feature_info(v.sl, info.version).map(|i| i.name).unwrap_or("Unrecognized feature");
    format!("Changed feature: 0x{:02x} ({})", v.sl, name)
}

fn gamma(v: &NonTableValue) -> String {
    match v.sh {
        0x00 => format!("Absolute gamma: {:.2} (sl=0x{:02x})", (v.sl as f64 + 100.0) / 100.0, v.sl),
        0x01 => format!("Relative gamma adjustment: {} (sl=0x{:02x})", v.sl as i8, v.sl),
        _ => format!("Unrecognized gamma mode (sh=0x{:02x}, sl=0x{:02x})", v.sh, v.sl),
    }
}

fn audio_mute(info: &FeatureInfo, v: &NonTableValue) -> String {
    if !info.version.or_default_v22().at_least(VersionSpec::V22) {
        return simple_nc(info, v)
    }

    let audio = values::value_name(values::AUDIO_MUTE, v.sl).unwrap_or("Invalid value");
    let screen = values::value_name(values::SCREEN_BLANK, v.sh).unwrap_or("Invalid value");
    format!("{} (sl=0x{:02x}), {} (sh=0x{:02x})", audio, v.sl, screen, v.sh)
}

fn horizontal_frequency(v: &NonTableValue) -> String {
    if v.ml == 0xff && v.sh == 0xff && v.sl == 0xff {
        return "Cannot determine frequency or out of range".into()
    }
    let hz = ((v.ml as u32) << 16) | ((v.sh as u32) << 8) | v.sl as u32;
    format!("{} hz", hz)
}

fn vertical_frequency(v: &NonTableValue) -> String {
    if v.sh == 0xff && v.sl == 0xff {
        return "Cannot determine frequency or out of range".into()
    }
    format!("{:.2} hz", v.value() as f64 / 100.0)
}

fn usage_time(v: &NonTableValue) -> String {
    let hours = ((v.ml as u32) << 16) | ((v.sh as u32) << 8) | v.sl as u32;
    format!("Usage time (hours) = {} (0x{:06x}) mh=0x{:02x}, ml=0x{:02x}, sh=0x{:02x}, sl=0x{:02x}", hours, hours, v.mh, v.ml, v.sh, v.sl)
}

fn controller_type(info: &FeatureInfo, v: &NonTableValue) -> String {
    let mfg = info.value_name(v.sl).unwrap_or("Unrecognized manufacturer");
    format!("Mfg: {} (sl=0x{:02x}), controller number: mh=0x{:02x}, ml=0x{:02x}, sh=0x{:02x}", mfg, v.sl, v.mh, v.ml, v.sh)
}

fn color_temperature_request(v: &NonTableValue) -> String {
    format!("3000 + {} * (feature 0B color temp increment) degree(s) Kelvin", v.value())
}

fn color_temperature_increment(v: &NonTableValue) -> String {
    match v.value() {
        0 | 5001..=0xffff => format!("Invalid value: {}", v.value()),
        n => format!("{} degree(s) Kelvin", n),
    }
}

fn non_table(info: &FeatureInfo, v: &NonTableValue) -> String {
    match info.formatter {
        Formatter::Default if info.flags.is_continuous() => continuous(v),
        Formatter::Default if info.flags.is_nc() => simple_nc(info, v),
        Formatter::Default | Formatter::Generic => generic(v),
        Formatter::NewControlValue => simple_nc(info, v),
        Formatter::ColorTemperatureIncrement => color_temperature_increment(v),
        Formatter::ColorTemperatureRequest => color_temperature_request(v),
        Formatter::ColorPreset => color_preset(info, v),
        Formatter::ActiveControl => active_control(info, v),
        Formatter::Gamma => gamma(v),
        Formatter::AudioMute => audio_mute(info, v),
        Formatter::HorizontalFrequency => horizontal_frequency(v),
        Formatter::VerticalFrequency => vertical_frequency(v),
        Formatter::UsageTime => usage_time(v),
        Formatter::ApplicationKey => format!("0x{:02x}{:02x}", v.sh, v.sl),
        Formatter::DisplayControllerType => controller_type(info, v),
        Formatter::FirmwareLevel => format!("{}.{}", v.sh, v.sl),
        Formatter::Version => format!("{}.{}", v.sh, v.sl),
    }
}

/// Renders a value the way `getvcp` prints it.
pub fn format_value(info: &FeatureInfo, value: &VcpValue) -> String {
    match value {
        VcpValue::NonTable(v) => non_table(info, v),
        VcpValue::Table(t) if t.bytes.is_empty() => "(empty table)".into(),
        VcpValue::Table(t) => hexfmt::dump(&t.bytes),
    }
}

/// The machine-readable form: `VCP 10 C 50 100`, `VCP 60 SNC x0f`,
/// `VCP DF CNC x00 x00 x02 x01` or `VCP 73 T x0102`.
pub fn format_terse(info: &FeatureInfo, value: &VcpValue) -> String {
    match value {
        VcpValue::Table(t) => format!("VCP {:02X} T x{}", info.code, hex::encode(&t.bytes)),
        VcpValue::NonTable(v) if info.flags.is_continuous() =>
            format!("VCP {:02X} C {} {}", info.code, v.value(), v.maximum()),
        VcpValue::NonTable(v) if info.flags.contains(super::FeatureFlags::SIMPLE_NC) =>
            format!("VCP {:02X} SNC x{:02x}", info.code, v.sl),
        VcpValue::NonTable(v) =>
            format!("VCP {:02X} CNC x{:02x} x{:02x} x{:02x} x{:02x}", info.code, v.mh, v.ml, v.sh, v.sl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TableValue;
    use crate::features::{lookup, synthetic_info};

    fn nt(code: u8, mh: u8, ml: u8, sh: u8, sl: u8) -> VcpValue {
        VcpValue::NonTable(NonTableValue { code, mh, ml, sh, sl })
    }

    #[test]
    fn continuous_values() {
        let info = lookup(0x10, VersionSpec::V22, false).unwrap();
        let v = VcpValue::NonTable(NonTableValue::new(0x10, 100, 50));
        assert_eq!(format_value(&info, &v), "current value =    50, max value =   100");
        assert_eq!(format_terse(&info, &v), "VCP 10 C 50 100");
    }

    #[test]
    fn simple_nc_values() {
        let info = lookup(0x60, VersionSpec::V22, false).unwrap();
        let v = nt(0x60, 0, 0, 0, 0x11);
        assert_eq!(format_value(&info, &v), "HDMI-1 (sl=0x11)");
        assert_eq!(format_terse(&info, &v), "VCP 60 SNC x11");
        assert_eq!(format_value(&info, &nt(0x60, 0, 0, 0, 0x70)), "Unrecognized value (sl=0x70)");
    }

    #[test]
    fn complex_values() {
        let version = lookup(0xdf, VersionSpec::V22, false).unwrap();
        let v = nt(0xdf, 0, 0, 2, 1);
        assert_eq!(format_value(&version, &v), "2.1");
        assert_eq!(format_terse(&version, &v), "VCP DF CNC x00 x00 x02 x01");

        let vfreq = lookup(0xae, VersionSpec::V22, false).unwrap();
        assert_eq!(format_value(&vfreq, &VcpValue::NonTable(NonTableValue::new(0xae, 0, 6000))), "60.00 hz");

        let preset = lookup(0x14, VersionSpec::V30, false).unwrap();
        assert_eq!(format_value(&preset, &nt(0x14, 0x02, 0, 0, 0x05)), "6500 K (sl=0x05), Tolerance: 2% (mh=0x02)");

        let active = lookup(0x52, VersionSpec::V22, false).unwrap();
        assert_eq!(format_value(&active, &nt(0x52, 0, 0, 0, 0x10)), "Changed feature: 0x10 (Brightness)");
    }

    #[test]
    fn synthetic_and_table() {
        let info = synthetic_info(0xe9, VersionSpec::V22);
        assert_eq!(format_value(&info, &nt(0xe9, 1, 2, 3, 4)), "mh=0x01, ml=0x02, sh=0x03, sl=0x04");

        let lut = lookup(0x73, VersionSpec::V22, false).unwrap();
        let t = VcpValue::Table(TableValue { code: 0x73, bytes: vec![1, 2, 0xab] });
        assert_eq!(format_value(&lut, &t), "01 02 ab");
        assert_eq!(format_terse(&lut, &t), "VCP 73 T x0102ab");
    }
}
