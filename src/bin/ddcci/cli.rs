//! Command line definition.

use std::path::PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ddcci::registry::DisplayIdentifier;
use ddcci::stats::StatsType;
use ddcci::{edid, hexfmt, Error, Result, RetryClass};

#[derive(Parser, Debug)]
#[command(name = "ddcci")]
#[command(version)]
#[command(about = "Query and change monitor settings over DDC/CI")]
#[command(long_about = "Query and change monitor settings over DDC/CI

EXAMPLES:
    ddcci detect                       List attached displays
    ddcci getvcp 10                    Show brightness of display 1
    ddcci --bus 4 setvcp 10 +5         Raise brightness on /dev/i2c-4
    ddcci getvcp color --terse         All color features, one per line
    ddcci dumpvcp                      Save settings to ~/.local/share/icc

ENVIRONMENT VARIABLES:
    RUST_LOG=ddcci=debug               Overrides --trace and friends")]
pub struct Cli {
    #[command(flatten)]
    pub select: DisplaySelection,

    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Monitor selection. Methods may not be combined.
#[derive(Args, Debug, Clone, Default)]
pub struct DisplaySelection {
    /// Display number, as listed by `detect`
    #[arg(short = 'd', long = "display", global = true)]
    pub display: Option<u32>,

    /// I2C bus number
    #[arg(short = 'b', long, global = true)]
    pub bus: Option<u32>,

    /// USB HID device number
    #[arg(long, global = true)]
    pub hiddev: Option<u32>,

    /// USB bus and device number, as B.D
    #[arg(short = 'u', long, global = true)]
    pub usb: Option<String>,

    /// Three letter manufacturer id
    #[arg(short = 'g', long, global = true)]
    pub mfg: Option<String>,

    /// Model name
    #[arg(short = 'l', long, global = true)]
    pub model: Option<String>,

    /// Serial number
    #[arg(short = 'n', long = "sn", global = true)]
    pub sn: Option<String>,

    /// 256 hex digits of the EDID
    #[arg(short = 'e', long, global = true)]
    pub edid: Option<String>,
}

impl DisplaySelection {
    /// The selected identifier, or `None` when nothing was given.
    pub fn identifier(&self) -> Result<Option<DisplayIdentifier>> {
        let mut ids = Vec::new();
        if let Some(n) = self.display {
            if n == 0 {
                return Err(Error::InvalidArgument("display numbers start at 1".into()))
            }
            ids.push(DisplayIdentifier::ByDisplayNumber(n));
        }
        if let Some(n) = self.bus {
            ids.push(DisplayIdentifier::ByBus(n));
        }
        if let Some(n) = self.hiddev {
            ids.push(DisplayIdentifier::ByHiddev(n));
        }
        if let Some(usb) = &self.usb {
            ids.push(parse_usb(usb)?);
        }
        if self.mfg.is_some() || self.model.is_some() || self.sn.is_some() {
            ids.push(DisplayIdentifier::ByMfgModelSerial {
                mfg: self.mfg.clone(),
                model: self.model.clone(),
                serial: self.sn.clone(),
            });
        }
        if let Some(s) = &self.edid {
            ids.push(parse_edid(s)?);
        }

        match ids.len() {
            0 => Ok(None),
            1 => Ok(ids.pop()),
            _ => Err(Error::InvalidArgument("monitor selection options may not be combined".into())),
        }
    }
}

fn parse_usb(s: &str) -> Result<DisplayIdentifier> {
    let invalid = || Error::InvalidArgument(format!("invalid USB device {:?}, expected BUS.DEVICE", s));
    let mut parts = s.splitn(2, |c| c == '.' || c == ':');
    match (parts.next().map(str::parse::<u32>), parts.next().map(str::parse::<u32>)) {
        (Some(Ok(bus)), Some(Ok(dev))) => Ok(DisplayIdentifier::ByUsb(bus, dev)),
        _ => Err(invalid()),
    }
}

fn parse_edid(s: &str) -> Result<DisplayIdentifier> {
    let bytes = hexfmt::decode(s)?;
    if bytes.len() != edid::EDID_LENGTH {
        return Err(Error::InvalidArgument(format!("--edid takes {} hex digits, got {}", edid::EDID_LENGTH * 2, bytes.len() * 2)))
    }
    let mut block = [0u8; edid::EDID_LENGTH];
    block.copy_from_slice(&bytes);
    Ok(DisplayIdentifier::ByEdid(block))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatsArg {
    Tries,
    Errors,
    Calls,
    Elapsed,
    All,
}

impl From<StatsArg> for StatsType {
    fn from(s: StatsArg) -> Self {
        match s {
            StatsArg::Tries => StatsType::Tries,
            StatsArg::Errors => StatsType::Errors,
            StatsArg::Calls => StatsType::Calls,
            StatsArg::Elapsed => StatsType::Elapsed,
            StatsArg::All => StatsType::All,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Brief, machine readable output
    #[arg(short = 't', long, global = true, conflicts_with = "verbose")]
    pub terse: bool,

    /// Extended output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Report execution statistics on exit
    #[arg(short = 's', long, global = true, value_enum, num_args = 0..=1, require_equals = true, default_missing_value = "all")]
    pub stats: Option<StatsArg>,

    /// Maximum tries as WRITE,READ,MULTIPART; `.` leaves one unchanged
    #[arg(long, global = true, value_name = "W,R,M")]
    pub maxtries: Option<String>,

    /// Scale every protocol sleep
    #[arg(long, global = true, value_name = "FACTOR")]
    pub sleep_multiplier: Option<f64>,

    /// 1 adapts sleeps to the observed error rate, 2 also skips optional sleeps
    #[arg(long, global = true, value_name = "N")]
    pub sleep_strategy: Option<u8>,

    /// Report DDC protocol errors
    #[arg(long, global = true)]
    pub ddc: bool,

    /// Accept feature codes missing from the feature table
    #[arg(short = 'f', long, global = true)]
    pub force: bool,

    /// Do not read back values after setting them
    #[arg(long, global = true)]
    pub noverify: bool,

    /// Open --bus without probing every bus first
    #[arg(long, global = true)]
    pub nodetect: bool,

    /// Probe buses in parallel
    #[arg(long = "async", global = true)]
    pub async_probe: bool,

    /// Also report features the monitor does not support
    #[arg(short = 'U', long, global = true)]
    pub show_unsupported: bool,

    /// Only read-write features
    #[arg(long, global = true, conflicts_with_all = ["ro", "wo"])]
    pub rw: bool,

    /// Only read-only features
    #[arg(long, global = true, conflicts_with = "wo")]
    pub ro: bool,

    /// Only write-only features
    #[arg(long, global = true)]
    pub wo: bool,

    /// Skip table features
    #[arg(long, global = true, conflicts_with = "show_table")]
    pub no_table: bool,

    /// Include table features
    #[arg(long, global = true)]
    pub show_table: bool,

    /// Trace a group of modules: BASE, I2C, DDC, VCP, TOP, ENV, USB or ALL
    #[arg(long, global = true, value_name = "CLASS")]
    pub trace: Vec<String>,

    /// Trace an operation by name
    #[arg(long, global = true, value_name = "NAME")]
    pub trcfunc: Vec<String>,

    /// Trace a source file
    #[arg(long, global = true, value_name = "FILE")]
    pub trcfile: Vec<String>,

    /// Prefix trace output with elapsed time
    #[arg(long, global = true)]
    pub timestamp: bool,

    /// Read with a single I2C_RDWR ioctl rather than read(2)
    #[arg(long, global = true)]
    pub ioctl: bool,

    /// Use libudev to name I2C adapters
    #[arg(long, global = true)]
    pub udev: bool,
}

/// Parses `--maxtries`: up to three comma separated values for the
/// write-only, write-read and multi-part classes, `.` or empty for
/// unchanged.
pub fn parse_maxtries(s: &str) -> Result<Vec<(RetryClass, u8)>> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    if fields.len() > 3 {
        return Err(Error::InvalidArgument(format!("--maxtries takes at most 3 values: {:?}", s)))
    }

    let mut out = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if field.is_empty() || *field == "." {
            continue
        }

        let n = field.parse::<u8>()
            .map_err(|_| Error::InvalidArgument(format!("invalid maxtries value {:?}", field)))?;
        match i {
            0 => out.push((RetryClass::WriteOnly, n)),
            1 => out.push((RetryClass::WriteRead, n)),
            _ => {
                out.push((RetryClass::MultiPartRead, n));
                out.push((RetryClass::MultiPartWrite, n));
            },
        }
    }
    Ok(out)
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List attached displays
    Detect,

    /// Show the capabilities string
    Capabilities,

    /// Read features
    Getvcp {
        /// Feature codes or subset names (COLOR, PROFILE, SCAN, KNOWN, ...)
        #[arg(required = true)]
        features: Vec<String>,
    },

    /// Write features
    Setvcp {
        /// FEATURE VALUE pairs; VALUE may be +N or -N
        #[arg(required = true, allow_hyphen_values = true, num_args = 2..)]
        args: Vec<String>,
    },

    /// Describe features from the feature table
    Vcpinfo {
        /// Feature codes or subset names, all known features when empty
        features: Vec<String>,
    },

    /// List known feature codes
    Listvcp,

    /// List diagnostic test cases
    Listtests,

    /// Run a diagnostic test case
    Testcase {
        number: u32,
    },

    /// Restore settings saved by dumpvcp
    Loadvcp {
        file: PathBuf,
    },

    /// Save restorable settings to a file
    Dumpvcp {
        file: Option<PathBuf>,
    },

    /// Report everything about the system and every display
    Interrogate,

    /// Report I2C devices and drivers
    Environment,

    /// Report USB monitor devices
    Usbenv,

    /// Watch for changes made through the monitor's controls
    Readchanges,

    /// Check whether a USB device is a monitor
    Chkusbmon {
        device: String,
    },

    /// Exercise the selected display
    Probe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maxtries_fields() {
        assert_eq!(parse_maxtries(".,3,.").unwrap(), vec![(RetryClass::WriteRead, 3)]);
        assert_eq!(parse_maxtries("5").unwrap(), vec![(RetryClass::WriteOnly, 5)]);
        assert_eq!(parse_maxtries(",,7").unwrap(), vec![(RetryClass::MultiPartRead, 7), (RetryClass::MultiPartWrite, 7)]);
        assert!(parse_maxtries("1,2,3,4").is_err());
        assert!(parse_maxtries("x").is_err());
    }

    #[test]
    fn selection_methods_are_exclusive() {
        let select = DisplaySelection { bus: Some(4), ..Default::default() };
        assert_eq!(select.identifier().unwrap(), Some(DisplayIdentifier::ByBus(4)));

        let select = DisplaySelection { model: Some("XYZ".into()), sn: Some("1".into()), ..Default::default() };
        assert!(matches!(select.identifier().unwrap(), Some(DisplayIdentifier::ByMfgModelSerial { .. })));

        let select = DisplaySelection { bus: Some(4), display: Some(1), ..Default::default() };
        assert!(select.identifier().is_err());

        let select = DisplaySelection { usb: Some("3.7".into()), ..Default::default() };
        assert_eq!(select.identifier().unwrap(), Some(DisplayIdentifier::ByUsb(3, 7)));
    }

    #[test]
    fn parses_command_line() {
        let cli = Cli::try_parse_from(&["ddcci", "--bus", "4", "--maxtries=.,3,.", "setvcp", "10", "-5"]).unwrap();
        assert_eq!(cli.select.bus, Some(4));
        assert_eq!(cli.options.maxtries.as_deref(), Some(".,3,."));
        match cli.command {
            Command::Setvcp { args } => assert_eq!(args, vec!["10", "-5"]),
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(&["ddcci", "--stats", "getvcp", "10"]).unwrap();
        assert_eq!(cli.options.stats, Some(StatsArg::All));
    }
}
