//! Saving and restoring a monitor's settings as a text file.
//!
//! ```text
//! TIMESTAMP_TEXT   2020-04-01 12:00:00
//! TIMESTAMP_MILLIS 1585742400000
//! BUS     4
//! MFG_ID  DEL
//! MODEL   DELL U2415
//! SN      7MT0186
//! EDID    00FFFFFFFFFFFF00...
//! VCP 10    75
//! VCP 12    60
//! ```

use std::fmt::Write;
use std::path::PathBuf;
use chrono::{Local, TimeZone};
use tracing::{debug, info};
use crate::commands::FeatureCode;
use crate::edid::Edid;
use crate::error::{Error, Result};
use crate::features::{self, FeatureSubset};
use crate::registry::DisplayIdentifier;
use crate::transport::Transport;
use crate::vcp::NewValue;
use crate::Ddc;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The contents of a dump file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpData {
    pub bus: Option<u32>,
    pub mfg_id: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub edid: Option<Edid>,
    pub timestamp_millis: Option<i64>,
    /// Saved values, restored in this order.
    pub values: Vec<(FeatureCode, u16)>,
}

fn invalid(lineno: usize, line: &str, what: &str) -> Error {
    Error::InvalidArgument(format!("line {}: {}: {:?}", lineno, what, line))
}

impl DumpData {
    /// Parses a dump file.
    ///
    /// Blank lines and lines starting with `*` or `#` are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut data = DumpData::default();

        for (i, line) in text.lines().enumerate() {
            let lineno = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('*') || line.starts_with('#') {
                continue
            }

            let (key, rest) = match line.find(char::is_whitespace) {
                Some(pos) => (&line[..pos], line[pos..].trim()),
                None => return Err(invalid(lineno, line, "missing value")),
            };

            match key {
                "BUS" => data.bus = Some(rest.parse().map_err(|_| invalid(lineno, line, "invalid bus number"))?),
                "MFG_ID" => data.mfg_id = Some(rest.to_string()),
                "MODEL" => data.model = Some(rest.to_string()),
                "SN" => data.serial = Some(rest.to_string()),
                "EDID" | "EDIDSTR" => data.edid = Some(Edid::from_hex(rest)?),
                "TIMESTAMP_MILLIS" => data.timestamp_millis = rest.parse().ok(),
                "TIMESTAMP_TEXT" => (),
                "VCP" => {
                    let mut fields = rest.split_whitespace();
                    let (code, value) = match (fields.next(), fields.next(), fields.next()) {
                        (Some(code), Some(value), None) => (code, value),
                        _ => return Err(invalid(lineno, line, "expected VCP <code> <value>")),
                    };
                    let code = features::parse_feature_code(code).map_err(|_| invalid(lineno, line, "invalid feature code"))?;
                    let value = value.parse::<u16>().map_err(|_| invalid(lineno, line, "invalid value"))?;
                    data.values.push((code, value));
                },
                _ => return Err(invalid(lineno, line, "unexpected field")),
            }
        }

        Ok(data)
    }

    /// Renders the file contents.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(millis) = self.timestamp_millis {
            if let Some(time) = Local.timestamp_millis_opt(millis).single() {
                let _ = writeln!(out, "TIMESTAMP_TEXT   {}", time.format(TIMESTAMP_FORMAT));
            }
            let _ = writeln!(out, "TIMESTAMP_MILLIS {}", millis);
        }
        if let Some(bus) = self.bus {
            let _ = writeln!(out, "BUS     {}", bus);
        }
        if let Some(mfg) = &self.mfg_id {
            let _ = writeln!(out, "MFG_ID  {}", mfg);
        }
        if let Some(model) = &self.model {
            let _ = writeln!(out, "MODEL   {}", model);
        }
        if let Some(sn) = &self.serial {
            let _ = writeln!(out, "SN      {}", sn);
        }
        if let Some(edid) = &self.edid {
            let _ = writeln!(out, "EDID    {}", edid.to_hex().to_ascii_uppercase());
        }
        for &(code, value) in &self.values {
            let _ = writeln!(out, "VCP {:02X} {:5}", code, value);
        }
        out
    }

    /// `$XDG_DATA_HOME/icc/<model>-<serial>-<timestamp>.vcp`
    pub fn default_path(&self) -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::InvalidArgument("no data directory for this user".into()))?
            .join("icc");

        let stamp = self.timestamp_millis
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .unwrap_or_else(Local::now);
        let name = format!("{}-{}-{}.vcp",
            self.model.as_deref().unwrap_or("unknown"),
            self.serial.as_deref().unwrap_or("unknown"),
            stamp.format("%Y%m%d-%H%M%S"),
        ).replace(|c: char| c.is_whitespace() || c == '/', "_");

        Ok(dir.join(name))
    }

    /// The display this file was taken from.
    pub fn identifier(&self) -> Option<DisplayIdentifier> {
        match (&self.edid, &self.model, &self.serial) {
            (Some(edid), _, _) => Some(DisplayIdentifier::ByEdid(*edid.bytes())),
            (None, None, None) => None,
            (None, model, serial) => Some(DisplayIdentifier::ByMfgModelSerial {
                mfg: self.mfg_id.clone(),
                model: model.clone(),
                serial: serial.clone(),
            }),
        }
    }
}

impl<T: Transport> Ddc<T> {
    /// Reads every restorable setting of the `PROFILE` subset.
    ///
    /// Features the monitor does not support are left out.
    pub fn dump(&mut self) -> Result<DumpData> {
        let edid = self.read_edid()?;
        let version = self.mccs_version();

        let mut values = Vec::new();
        for code in features::subset_codes(FeatureSubset::Profile, version) {
            let info = match features::feature_info(code, version) {
                Some(info) if info.is_readable() && info.is_writable() && !info.is_table() => info,
                _ => continue,
            };

            match self.get_vcp_feature(info.code) {
                Ok(value) => values.push((info.code, value.value())),
                Err(Error::FeatureUnsupportedByMonitor(_)) => debug!(code, "not supported, skipping"),
                Err(e) => return Err(e),
            }
        }

        Ok(DumpData {
            bus: None,
            mfg_id: Some(edid.mfg_id.clone()),
            model: Some(edid.model()),
            serial: Some(edid.serial()),
            edid: Some(edid),
            timestamp_millis: Some(Local::now().timestamp_millis()),
            values,
        })
    }

    /// Restores the values of a dump, in file order.
    pub fn load(&mut self, data: &DumpData) -> Result<()> {
        for &(code, value) in &data.values {
            let info = self.feature_info(code, true)?;
            info!(code, value, "restoring");
            self.set_feature_value(&info, NewValue::Absolute(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render() {
        let block = Edid::synthesize("DEL", "DELL U2415", "7MT0186", 0xa0bb).unwrap();
        let text = format!("\
* saved settings
TIMESTAMP_TEXT   2020-04-01 12:00:00
TIMESTAMP_MILLIS 1585742400000
BUS     4
MFG_ID  DEL
MODEL   DELL U2415
SN      7MT0186
EDID    {}
# brightness first
VCP 10    75
VCP 12    60
VCP 0x60 15
", hex::encode(&block).to_ascii_uppercase());

        let data = DumpData::parse(&text).unwrap();
        assert_eq!(data.bus, Some(4));
        assert_eq!(data.model.as_deref(), Some("DELL U2415"));
        assert_eq!(data.timestamp_millis, Some(1585742400000));
        assert_eq!(data.values, vec![(0x10, 75), (0x12, 60), (0x60, 15)]);
        assert_eq!(data.identifier(), Some(DisplayIdentifier::ByEdid(block)));

        let reparsed = DumpData::parse(&data.to_text()).unwrap();
        assert_eq!(reparsed, data);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(DumpData::parse("VCP 10").is_err());
        assert!(DumpData::parse("VCP zz 10").is_err());
        assert!(DumpData::parse("COLOR red").is_err());
        assert!(DumpData::parse("MODEL").is_err());
    }

    #[test]
    fn default_path_is_sanitized() {
        let data = DumpData {
            model: Some("DELL U2415".into()),
            serial: Some("7MT/0186".into()),
            timestamp_millis: Some(0),
            ..Default::default()
        };
        if let Ok(path) = data.default_path() {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("DELL_U2415-7MT_0186-"));
            assert!(name.ends_with(".vcp"));
            assert_eq!(path.parent().unwrap().file_name().unwrap(), "icc");
        }
    }
}
