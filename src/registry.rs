//! Display detection and selection.
//!
//! Detection walks `/dev/i2c-0` through `/dev/i2c-31`, probing each bus for
//! an EDID EEPROM at `0x50` and a DDC/CI responder at `0x37`. The resulting
//! [`Registry`] resolves a [`DisplayIdentifier`] to a [`DisplayRef`], which
//! can then be opened as a [`DisplayHandle`].

use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, warn};
use crate::edid::{Edid, EDID_LENGTH};
use crate::error::{Error, Result};
use crate::transport::{IoOptions, Transport, TransportKind};
use crate::version::VersionSpec;
use crate::{Ddc, I2C_ADDRESS_DDC_CI, I2C_ADDRESS_EDID};

/// Highest bus number considered, exclusive.
pub const MAX_BUSES: u32 = 32;

/// Adapters that never carry a monitor.
pub const IGNORABLE_ADAPTER_PREFIXES: &[&str] = &[
    "SMBus",
    "soc:i2cdsi",
    "smu",
    "mac-io",
    "u4",
];

/// Whether an adapter with this sysfs name can be skipped during detection.
pub fn is_ignorable_adapter(name: &str) -> bool {
    IGNORABLE_ADAPTER_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Adapter name from `/sys/bus/i2c/devices/i2c-N/name`.
pub fn sysfs_adapter_name(busno: u32) -> Option<String> {
    std::fs::read_to_string(format!("/sys/bus/i2c/devices/i2c-{}/name", busno))
        .ok()
        .map(|s| s.trim().to_string())
}

/// What detection learned about one bus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusInfo {
    pub busno: u32,
    pub adapter_name: Option<String>,
    pub exists: bool,
    pub accessible: bool,
    pub probed: bool,
    /// Something answered a one-byte read at `0x50`.
    pub has_edid_addr: bool,
    /// Something answered a one-byte read at `0x37`.
    pub has_ddc_addr: bool,
    /// `I2C_FUNCS` bitmap.
    pub functionality: u64,
    pub edid: Option<Edid>,
    /// A VCP request was answered.
    pub ddc_ok: bool,
    /// MCCS version reported by a responsive monitor.
    pub version: Option<VersionSpec>,
    /// Why the bus could not be opened or probed.
    pub error: Option<String>,
}

impl BusInfo {
    /// A bus that exists but could not be opened.
    pub fn inaccessible(busno: u32, error: &Error) -> Self {
        BusInfo {
            busno,
            exists: true,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// Whether a monitor was found on this bus.
    pub fn is_display(&self) -> bool {
        self.edid.is_some()
    }
}

fn probe_address<T: Transport>(transport: &mut T, address: u16) -> bool {
    let mut byte = [0u8; 1];
    transport.set_slave_address(address)
        .and_then(|_| transport.read(&mut byte))
        .is_ok()
}

/// Probes one open bus.
pub fn probe_bus<T: Transport>(busno: u32, transport: T) -> BusInfo {
    let mut ddc = Ddc::new(transport);
    let mut info = BusInfo {
        busno,
        exists: true,
        accessible: true,
        probed: true,
        ..Default::default()
    };

    info.functionality = ddc.inner_mut().functionality().unwrap_or(0);
    info.has_edid_addr = probe_address(ddc.inner_mut(), I2C_ADDRESS_EDID);
    if info.has_edid_addr {
        match ddc.read_edid() {
            Ok(edid) => info.edid = Some(edid),
            Err(e) => {
                warn!(bus = busno, error = %e, "unreadable EDID");
                info.error = Some(e.to_string());
            },
        }
    }

    info.has_ddc_addr = probe_address(ddc.inner_mut(), I2C_ADDRESS_DDC_CI);
    if info.has_ddc_addr && info.edid.is_some() {
        match ddc.get_vcp_reply(0x10) {
            Ok(_) => info.ddc_ok = true,
            Err(e) => debug!(bus = busno, error = %e, "DDC/CI not responding"),
        }
    }
    if info.ddc_ok {
        ddc.mccs_version();
        info.version = ddc.cached_version();
    }

    debug!(bus = busno, edid = info.edid.is_some(), ddc = info.ddc_ok, "probed");
    info
}

/// Detection knobs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectOptions {
    pub io: IoOptions,
    /// Probe every bus on its own thread.
    pub async_probe: bool,
    /// Read adapter names through libudev rather than sysfs.
    pub use_udev: bool,
}

#[cfg(feature = "i2c-linux")]
fn probe_linux_bus(busno: u32, adapter_name: Option<String>, io: IoOptions) -> BusInfo {
    let mut info = match Ddc::open_bus(busno, io) {
        Ok(ddc) => probe_bus(busno, ddc.into_inner()),
        Err(e) => {
            debug!(bus = busno, error = %e, "cannot open");
            BusInfo::inaccessible(busno, &e)
        },
    };
    info.adapter_name = adapter_name;
    info
}

#[cfg(feature = "i2c-linux")]
fn adapter_names(options: &DetectOptions) -> Vec<(u32, Option<String>)> {
    #[cfg(all(feature = "udev", feature = "i2c-linux"))]
    {
        if options.use_udev {
            match crate::enumerate::adapter_names() {
                Ok(names) => return names.into_iter().map(|(busno, name)| (busno, Some(name))).collect(),
                Err(e) => warn!(error = %e, "udev enumeration failed, falling back to sysfs"),
            }
        }
    }
    #[cfg(not(all(feature = "udev", feature = "i2c-linux")))]
    {
        if options.use_udev {
            debug!("udev support not built");
        }
    }

    (0..MAX_BUSES)
        .filter(|&busno| crate::i2c::bus_path(busno).exists())
        .map(|busno| (busno, sysfs_adapter_name(busno)))
        .collect()
}

/// A display found by detection, or named directly by bus number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRef {
    pub transport: TransportKind,
    pub busno: u32,
    /// 1-based display number among buses with an EDID.
    pub dispno: Option<u32>,
    pub edid: Option<Edid>,
    pub version: Option<VersionSpec>,
    pub ddc_ok: bool,
}

impl DisplayRef {
    /// Refers to a bus without detection.
    pub fn for_bus(busno: u32) -> Self {
        DisplayRef {
            transport: TransportKind::I2c,
            busno,
            dispno: None,
            edid: None,
            version: None,
            ddc_ok: false,
        }
    }
}

impl fmt::Display for DisplayRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.dispno {
            Some(n) => write!(f, "display {} (/dev/i2c-{})", n, self.busno),
            None => write!(f, "/dev/i2c-{}", self.busno),
        }
    }
}

/// How the user selects a display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayIdentifier {
    ByBus(u32),
    ByDisplayNumber(u32),
    ByEdid([u8; EDID_LENGTH]),
    /// Omitted fields match anything.
    ByMfgModelSerial {
        mfg: Option<String>,
        model: Option<String>,
        serial: Option<String>,
    },
    ByUsb(u32, u32),
    ByHiddev(u32),
}

impl fmt::Display for DisplayIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayIdentifier::ByBus(n) => write!(f, "bus /dev/i2c-{}", n),
            DisplayIdentifier::ByDisplayNumber(n) => write!(f, "display {}", n),
            DisplayIdentifier::ByEdid(block) => write!(f, "EDID {}...", hex::encode(&block[..8])),
            DisplayIdentifier::ByMfgModelSerial { mfg, model, serial } => write!(f, "mfg={} model={} sn={}",
                mfg.as_deref().unwrap_or("*"),
                model.as_deref().unwrap_or("*"),
                serial.as_deref().unwrap_or("*"),
            ),
            DisplayIdentifier::ByUsb(bus, dev) => write!(f, "USB {}.{}", bus, dev),
            DisplayIdentifier::ByHiddev(n) => write!(f, "/dev/usb/hiddev{}", n),
        }
    }
}

fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
    wanted.as_ref().map(|w| w == actual).unwrap_or(true)
}

impl DisplayIdentifier {
    fn matches(&self, display: &DisplayRef) -> bool {
        match (self, &display.edid) {
            (DisplayIdentifier::ByBus(n), _) => display.busno == *n,
            (DisplayIdentifier::ByDisplayNumber(n), _) => display.dispno == Some(*n),
            (DisplayIdentifier::ByEdid(block), Some(edid)) => edid.bytes() == block,
            (DisplayIdentifier::ByMfgModelSerial { mfg, model, serial }, Some(edid)) =>
                field_matches(mfg, &edid.mfg_id)
                && field_matches(model, &edid.model())
                && field_matches(serial, &edid.serial()),
            _ => false,
        }
    }
}

/// The displays found by one detection pass.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    buses: Vec<BusInfo>,
}

impl Registry {
    /// Builds a registry from already probed buses.
    pub fn from_bus_infos(mut buses: Vec<BusInfo>) -> Self {
        buses.sort_by_key(|b| b.busno);
        Registry { buses }
    }

    /// Probes every candidate `/dev/i2c-N`.
    #[cfg(feature = "i2c-linux")]
    pub fn detect(options: &DetectOptions) -> Self {
        let candidates: Vec<_> = adapter_names(options).into_iter()
            .filter(|(busno, name)| match name {
                Some(name) if is_ignorable_adapter(name) => {
                    debug!(bus = busno, adapter = %name, "skipping adapter");
                    false
                },
                _ => true,
            })
            .collect();

        let io = options.io;
        let buses = if options.async_probe {
            let handles: Vec<_> = candidates.into_iter().map(|(busno, name)| {
                let spawned = std::thread::Builder::new()
                    .name(format!("probe-i2c-{}", busno))
                    .spawn(move || {
                        crate::thread_data::set_thread_description(format!("probe /dev/i2c-{}", busno));
                        probe_linux_bus(busno, name, io)
                    });
                (busno, spawned)
            }).collect();

            handles.into_iter().map(|(busno, spawned)| {
                match spawned.map(|handle| handle.join()) {
                    Ok(Ok(info)) => info,
                    _ => BusInfo::inaccessible(busno, &Error::InvalidOperation("probe thread failed".into())),
                }
            }).collect()
        } else {
            candidates.into_iter().map(|(busno, name)| probe_linux_bus(busno, name, io)).collect()
        };

        let registry = Registry::from_bus_infos(buses);
        info!(buses = registry.buses.len(), displays = registry.displays().len(), "detection complete");
        registry
    }

    /// Every probed bus, by bus number.
    pub fn buses(&self) -> &[BusInfo] {
        &self.buses
    }

    /// Buses with an EDID, numbered from 1 in bus order.
    pub fn displays(&self) -> Vec<DisplayRef> {
        self.buses.iter()
            .filter(|b| b.is_display())
            .enumerate()
            .map(|(i, b)| DisplayRef {
                transport: TransportKind::I2c,
                busno: b.busno,
                dispno: Some(i as u32 + 1),
                edid: b.edid.clone(),
                version: b.version,
                ddc_ok: b.ddc_ok,
            })
            .collect()
    }

    /// Finds the single display matching `id`.
    pub fn resolve(&self, id: &DisplayIdentifier) -> Result<DisplayRef> {
        match id {
            DisplayIdentifier::ByUsb(..) | DisplayIdentifier::ByHiddev(_) =>
                return Err(Error::DisplayNotFound(format!("{}: USB transport not supported", id))),
            _ => (),
        }

        let mut matches = self.displays().into_iter().filter(|d| id.matches(d));
        match (matches.next(), matches.next()) {
            (Some(found), None) => {
                debug!(%id, display = %found, "resolved");
                Ok(found)
            },
            (Some(_), Some(_)) => Err(Error::AmbiguousDisplay(id.to_string())),
            (None, _) => match id {
                // a bus without an EDID may still be addressed directly
                DisplayIdentifier::ByBus(n) if self.buses.iter().any(|b| b.busno == *n && b.accessible) =>
                    Ok(DisplayRef::for_bus(*n)),
                _ => Err(Error::DisplayNotFound(id.to_string())),
            },
        }
    }

    /// Opens a display through `open`, which maps a bus number to a
    /// transport.
    pub fn open_with<T, F>(display: &DisplayRef, options: crate::DdcOptions, open: F) -> Result<DisplayHandle<T>>
    where
        F: FnOnce(u32) -> Result<T>,
    {
        let mut ddc = Ddc::with_options(open(display.busno)?, options);
        if let Some(version) = display.version {
            ddc.set_cached_version(version);
        }
        Ok(DisplayHandle { display: display.clone(), ddc })
    }

    /// Opens `/dev/i2c-N` for a display.
    #[cfg(feature = "i2c-linux")]
    pub fn open(display: &DisplayRef, io: IoOptions, options: crate::DdcOptions) -> Result<DisplayHandle<crate::i2c::LinuxI2cBus>> {
        Registry::open_with(display, options, |busno| Ddc::open_bus(busno, io).map(Ddc::into_inner))
    }
}

/// An open display. Dropping it closes the device.
#[derive(Debug)]
pub struct DisplayHandle<T> {
    display: DisplayRef,
    ddc: Ddc<T>,
}

impl<T> DisplayHandle<T> {
    pub fn new(display: DisplayRef, ddc: Ddc<T>) -> Self {
        DisplayHandle { display, ddc }
    }

    pub fn display(&self) -> &DisplayRef {
        &self.display
    }

    pub fn into_inner(self) -> Ddc<T> {
        self.ddc
    }
}

impl<T> Deref for DisplayHandle<T> {
    type Target = Ddc<T>;

    fn deref(&self) -> &Self::Target {
        &self.ddc
    }
}

impl<T> DerefMut for DisplayHandle<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ddc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_bus(busno: u32, mfg: &str, model: &str, serial: &str) -> BusInfo {
        let block = Edid::synthesize(mfg, model, serial, busno as u16).unwrap();
        BusInfo {
            busno,
            exists: true,
            accessible: true,
            probed: true,
            has_edid_addr: true,
            has_ddc_addr: true,
            edid: Some(Edid::parse(&block).unwrap()),
            ddc_ok: true,
            ..Default::default()
        }
    }

    fn registry() -> Registry {
        Registry::from_bus_infos(vec![
            display_bus(6, "GSM", "LG HDR 4K", "101"),
            BusInfo { busno: 0, exists: true, accessible: true, probed: true, ..Default::default() },
            display_bus(3, "DEL", "DELL U2415", "7MT0186"),
        ])
    }

    #[test]
    fn numbering_follows_bus_order() {
        let displays = registry().displays();
        assert_eq!(displays.len(), 2);
        assert_eq!((displays[0].busno, displays[0].dispno), (3, Some(1)));
        assert_eq!((displays[1].busno, displays[1].dispno), (6, Some(2)));
    }

    #[test]
    fn resolve_by_fields() {
        let reg = registry();
        assert_eq!(reg.resolve(&DisplayIdentifier::ByDisplayNumber(2)).unwrap().busno, 6);
        assert_eq!(reg.resolve(&DisplayIdentifier::ByBus(3)).unwrap().dispno, Some(1));
        assert_eq!(reg.resolve(&DisplayIdentifier::ByBus(0)).unwrap().dispno, None);

        let by_mfg = DisplayIdentifier::ByMfgModelSerial { mfg: Some("DEL".into()), model: None, serial: None };
        assert_eq!(reg.resolve(&by_mfg).unwrap().busno, 3);

        let any = DisplayIdentifier::ByMfgModelSerial { mfg: None, model: None, serial: None };
        match reg.resolve(&any) {
            Err(Error::AmbiguousDisplay(_)) => (),
            other => panic!("unexpected {:?}", other),
        }

        match reg.resolve(&DisplayIdentifier::ByDisplayNumber(3)) {
            Err(Error::DisplayNotFound(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match reg.resolve(&DisplayIdentifier::ByUsb(1, 2)) {
            Err(Error::DisplayNotFound(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ignorable_adapters() {
        assert!(is_ignorable_adapter("SMBus I801 adapter at f040"));
        assert!(!is_ignorable_adapter("AMDGPU DM i2c hw bus 1"));
    }
}
