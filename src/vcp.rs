//! Feature-level reads and writes, interpreted through the feature table.

use tracing::{debug, warn};
use crate::commands::{FeatureCode, NonTableValue, TableValue, VcpValue};
use crate::error::{Error, Result};
use crate::features::{self, FeatureInfo};
use crate::transport::Transport;
use crate::{hexfmt, stats, Ddc};

/// A value to write, as given on a command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewValue {
    Absolute(u16),
    /// Added to the current value; continuous features only.
    Relative(i32),
    Table(Vec<u8>),
}

impl NewValue {
    /// Parses `75`, `0x4b`, `x4b`, `+5` or `-5`; table features take hex
    /// bytes.
    pub fn parse(s: &str, table: bool) -> Result<Self> {
        let s = s.trim();
        if table {
            return hexfmt::decode(s).map(NewValue::Table)
        }

        let invalid = || Error::InvalidArgument(format!("invalid feature value {:?}", s));
        if let Some(n) = s.strip_prefix('+') {
            return n.parse::<u16>().map(|n| NewValue::Relative(n as i32)).map_err(|_| invalid())
        }
        if let Some(n) = s.strip_prefix('-') {
            return n.parse::<u16>().map(|n| NewValue::Relative(-(n as i32))).map_err(|_| invalid())
        }

        let hex_digits = s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix('x'))
            .or_else(|| s.strip_prefix('X'));
        match hex_digits {
            Some(h) => u16::from_str_radix(h, 16),
            None => s.parse::<u16>(),
        }.map(NewValue::Absolute).map_err(|_| invalid())
    }
}

fn describe(value: &VcpValue) -> String {
    match value {
        VcpValue::NonTable(v) => format!("{}", v.value()),
        VcpValue::Table(t) => hex::encode(&t.bytes),
    }
}

fn same_value(written: &VcpValue, read: &VcpValue) -> bool {
    match (written, read) {
        (VcpValue::NonTable(w), VcpValue::NonTable(r)) => w.value() == r.value(),
        (VcpValue::Table(w), VcpValue::Table(r)) => w.bytes == r.bytes,
        _ => false,
    }
}

impl<T: Transport> Ddc<T> {
    /// Resolves a code against the monitor's MCCS version.
    pub fn feature_info(&mut self, code: FeatureCode, force: bool) -> Result<FeatureInfo> {
        let version = self.mccs_version();
        features::lookup(code, version, force)
    }

    /// Reads a feature as the table describes it: table features through a
    /// multi-part read, everything else with a VCP request.
    pub fn get_feature_value(&mut self, info: &FeatureInfo) -> Result<VcpValue> {
        if !info.is_readable() {
            let e = Error::InvalidOperation(format!("feature 0x{:02x} ({}) is not readable", info.code, info.name));
            stats::record_status(&e);
            return Err(e)
        }

        if info.is_deprecated() {
            warn!(code = info.code, version = %info.version, "feature is deprecated");
        }

        if info.is_table() {
            let bytes = self.table_read(info.code)?;
            Ok(TableValue { code: info.code, bytes }.into())
        } else {
            self.get_vcp_feature(info.code).map(VcpValue::from)
        }
    }

    /// Writes `value` without checking the feature table.
    pub fn set_value(&mut self, value: &VcpValue) -> Result<()> {
        match value {
            VcpValue::NonTable(v) => self.set_vcp_feature(v.code, v.value()),
            VcpValue::Table(t) => self.table_write(t.code, &t.bytes),
        }
    }

    /// Writes a feature, resolving relative values against its current
    /// value, and verifies the result when verification is enabled.
    pub fn set_feature_value(&mut self, info: &FeatureInfo, value: NewValue) -> Result<VcpValue> {
        if !info.is_writable() {
            let e = Error::InvalidOperation(format!("feature 0x{:02x} ({}) is not writable", info.code, info.name));
            stats::record_status(&e);
            return Err(e)
        }

        let value = match (value, info.is_table()) {
            (NewValue::Table(bytes), true) => VcpValue::Table(TableValue { code: info.code, bytes }),
            (NewValue::Absolute(v), false) => NonTableValue::new(info.code, 0, v).into(),
            (NewValue::Relative(delta), false) => {
                if !info.flags.is_continuous() {
                    return Err(Error::InvalidArgument(format!("relative values need a continuous feature, 0x{:02x} is not", info.code)))
                }
                let current = self.get_vcp_feature(info.code)?;
                let target = (current.value() as i32 + delta).max(0).min(current.maximum() as i32);
                debug!(code = info.code, current = current.value(), target, "relative set");
                NonTableValue::new(info.code, current.maximum(), target as u16).into()
            },
            (_, true) => return Err(Error::InvalidArgument(format!("feature 0x{:02x} takes a hex table value", info.code))),
            (NewValue::Table(_), false) => return Err(Error::InvalidArgument(format!("feature 0x{:02x} is not a table feature", info.code))),
        };

        self.set_value(&value)?;

        if self.options.verify && features::is_rereadable(info.code, info.version) {
            self.verify(info, &value)?;
        }

        Ok(value)
    }

    fn verify(&mut self, info: &FeatureInfo, written: &VcpValue) -> Result<()> {
        let read = self.get_feature_value(info)?;
        if same_value(written, &read) {
            debug!(code = info.code, "verified");
            Ok(())
        } else {
            let e = Error::VerifyFailed {
                code: info.code,
                expected: describe(written),
                actual: describe(&read),
            };
            stats::record_status(&e);
            Err(e)
        }
    }
}
