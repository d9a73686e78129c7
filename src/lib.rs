//! Query and control displays using the DDC/CI protocol and the MCCS feature
//! set.
//!
//! A [`Ddc`] handle wraps any [`Transport`] and runs every exchange through
//! the timing governor and the retry engine. The [`registry`] module finds
//! monitors on `/dev/i2c-*` and opens handles to them.
//!
//! # Example
//!
//! ```rust,no_run
//! use ddcci::{Ddc, i2c, transport::IoOptions};
//!
//! # #[cfg(feature = "i2c-linux")] fn ddc() -> ddcci::Result<()> {
//! let mut ddc = Ddc::new(i2c::open_bus(4, IoOptions::default())?);
//! let brightness = ddc.get_vcp_feature(0x10)?;
//! println!("brightness: {} / {}", brightness.value(), brightness.maximum());
//! # Ok(())
//! # }
//! ```

use tracing::{debug, instrument, trace};

/// EDID EEPROM I2C address
pub const I2C_ADDRESS_EDID: u16 = 0x50;

/// DDC/CI command and control I2C address
pub const I2C_ADDRESS_DDC_CI: u16 = 0x37;

/// DDC sub-address command prefix
pub const SUB_ADDRESS_DDC_CI: u8 = 0x51;

pub mod error;
pub use error::{Error, ErrorKind, IoError, IoErrorKind, ProtocolError, Result};

pub mod transport;
pub use transport::{IoOptions, IoStrategy, Transport, TransportKind};

/// DDC/CI command request and response types.
pub mod commands;
pub use commands::{Command, CommandResult, FeatureCode, NonTableValue, TableValue, VcpReply, VcpValue};

pub mod packet;
pub mod hexfmt;
pub mod delay;
pub use delay::SleepEvent;
pub mod retry;
pub use retry::{AllZeroPolicy, RetryClass, RetryPolicy};
pub mod thread_data;
pub mod stats;
pub mod i2c;
pub mod version;
pub use version::VersionSpec;
pub mod edid;
pub use self::edid::Edid;
pub mod caps;
pub use caps::Capabilities;
pub mod features;
pub mod registry;
pub mod dumpload;
pub mod sim;

mod multi_part;
pub use multi_part::{MAX_CAPABILITIES_LEN, MAX_TABLE_LEN};
mod vcp;
pub use vcp::NewValue;

#[cfg(all(feature = "udev", feature = "i2c-linux"))]
mod enumerate;

/// Behaviour knobs for a [`Ddc`] handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DdcOptions {
    /// Re-read features after setting them and compare.
    pub verify: bool,
    pub retry: RetryPolicy,
}

impl Default for DdcOptions {
    fn default() -> Self {
        DdcOptions {
            verify: true,
            retry: Default::default(),
        }
    }
}

/// A handle to provide DDC/CI operations on a transport.
#[derive(Debug)]
pub struct Ddc<T> {
    inner: T,
    options: DdcOptions,
    version: Option<VersionSpec>,
}

#[cfg(feature = "i2c-linux")]
impl Ddc<i2c::LinuxI2cBus> {
    /// Opens `/dev/i2c-N` and waits out the post-open delay.
    pub fn open_bus(busno: u32, io: IoOptions) -> Result<Self> {
        let ddc = Ddc::new(i2c::open_bus(busno, io)?);
        ddc.sleep(SleepEvent::PostOpen);
        Ok(ddc)
    }
}

impl<T> Ddc<T> {
    /// Create a new DDC/CI handle with an existing open transport.
    pub fn new(inner: T) -> Self {
        Self::with_options(inner, Default::default())
    }

    pub fn with_options(inner: T, options: DdcOptions) -> Self {
        Ddc {
            inner,
            options,
            version: None,
        }
    }

    pub fn options(&self) -> DdcOptions {
        self.options
    }

    pub fn set_options(&mut self, options: DdcOptions) {
        self.options = options;
    }

    /// The MCCS version, if it has been queried or assigned.
    pub fn cached_version(&self) -> Option<VersionSpec> {
        self.version
    }

    /// Assigns the MCCS version without querying the monitor.
    pub fn set_cached_version(&mut self, version: VersionSpec) {
        self.version = Some(version);
    }

    /// Consume the handle to return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Borrow the inner transport.
    pub fn inner_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the inner transport.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Transport> Ddc<T> {
    /// Sleeps for a protocol event as scaled by the calling thread's tuning.
    pub fn sleep(&self, event: SleepEvent) -> u32 {
        delay::tuned_sleep(self.inner.kind(), event)
    }

    fn write_packet(&mut self, payload: &[u8]) -> Result<()> {
        let packet = packet::encode_request(payload)?;
        self.inner.set_slave_address(I2C_ADDRESS_DDC_CI)?;
        trace!(packet = ?packet, "sending");
        self.inner.write(&packet[1..])?;
        Ok(())
    }

    /// Writes one request and sleeps `post_write`. A single try.
    pub fn write_only(&mut self, payload: &[u8], post_write: SleepEvent) -> Result<()> {
        self.write_packet(payload)?;
        self.sleep(post_write);
        Ok(())
    }

    /// Writes one request, reads a reply of up to `read_len` bytes and
    /// returns its validated payload. A single try.
    pub fn write_read(&mut self, payload: &[u8], read_len: usize, post_write: SleepEvent, post_read: SleepEvent) -> Result<Vec<u8>> {
        self.write_packet(payload)?;
        self.sleep(post_write);

        let mut buf = vec![0u8; read_len];
        self.inner.read(&mut buf)?;
        trace!(bytes = ?buf, "received");
        self.sleep(post_read);

        match packet::decode_response(&buf) {
            Ok(payload) => Ok(payload.to_vec()),
            Err(ProtocolError::DdcNullResponse) => {
                debug!("DDC null response");
                self.sleep(SleepEvent::DdcNull);
                Err(ProtocolError::DdcNullResponse.into())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Execute a DDC/CI command once. See the `commands` module for all
    /// available commands. The return type is dependent on the executed
    /// command.
    pub fn execute<C: Command>(&mut self, command: C) -> Result<C::Ok> {
        let mut data = [0u8; 4 + commands::MAX_FRAGMENT_LEN];
        let len = command.encode(&mut data)?;

        if C::Ok::MAX_LEN == 0 {
            self.write_only(&data[..len], C::POST_WRITE)?;
            Ok(C::Ok::decode(&[])?)
        } else {
            let payload = self.write_read(&data[..len], C::Ok::MAX_LEN + 3, C::POST_WRITE, C::POST_READ)?;
            Ok(C::Ok::decode(&payload)?)
        }
    }

    /// Execute a command under the retry discipline of its class.
    pub fn execute_with_retry<C: Command>(&mut self, command: C) -> Result<C::Ok> {
        let policy = self.options.retry;
        retry::with_retry(C::RETRY_CLASS, &policy, |_| self.execute(&command))
    }

    /// Reads the raw VCP reply for a non-table feature, retrying transient
    /// failures. The reply may report the feature unsupported.
    #[instrument(level = "debug", skip(self))]
    pub fn get_vcp_reply(&mut self, code: FeatureCode) -> Result<VcpReply> {
        let policy = self.options.retry;
        retry::with_retry(RetryClass::WriteRead, &policy, |_| {
            let reply = self.execute(commands::GetVcpFeature::new(code))?;
            if reply.supported && reply.code != code {
                debug!(requested = code, echoed = reply.code, "feature code mismatch");
                return Err(ProtocolError::OpcodeMismatch.into())
            }
            Ok(reply)
        })
    }

    /// Reads a non-table feature value.
    ///
    /// A monitor reporting the code unsupported yields
    /// `FeatureUnsupportedByMonitor` without further tries.
    pub fn get_vcp_feature(&mut self, code: FeatureCode) -> Result<NonTableValue> {
        let reply = self.get_vcp_reply(code)?;
        if !reply.supported {
            let e = Error::FeatureUnsupportedByMonitor(code);
            stats::record_status(&e);
            return Err(e)
        }
        Ok(reply.value)
    }

    /// Sets a non-table feature value.
    #[instrument(level = "debug", skip(self))]
    pub fn set_vcp_feature(&mut self, code: FeatureCode, value: u16) -> Result<()> {
        self.execute_with_retry(commands::SetVcpFeature::new(code, value))
    }

    /// Instructs the monitor to save its current settings.
    pub fn save_current_settings(&mut self) -> Result<()> {
        self.execute_with_retry(commands::SaveCurrentSettings)
    }

    /// Reads the 128-byte EDID block from address `0x50`.
    ///
    /// The EDID read itself is not retried.
    pub fn read_edid_block(&mut self) -> Result<[u8; edid::EDID_LENGTH]> {
        self.sleep(SleepEvent::PreEdid);

        let mut block = [0u8; edid::EDID_LENGTH];
        let inner = &mut self.inner;
        stats::timed(stats::IoEvent::EdidRead, || -> Result<()> {
            inner.set_slave_address(I2C_ADDRESS_EDID)?;
            inner.write(&[0x00])?;
            inner.read(&mut block)?;
            Ok(())
        })?;

        trace!(edid = ?&block[..], "read EDID");
        Ok(block)
    }

    /// Reads and parses the monitor's EDID.
    pub fn read_edid(&mut self) -> Result<Edid> {
        let block = self.read_edid_block()?;
        Edid::parse(&block)
    }

    /// The monitor's MCCS version.
    ///
    /// Feature `0xDF` is queried on first use and cached. When the monitor
    /// does not support it, the `mccs_ver` of the capabilities string is
    /// used; failing both the version is `UNKNOWN`.
    pub fn mccs_version(&mut self) -> VersionSpec {
        if let Some(version) = self.version {
            return version
        }

        let version = match self.get_vcp_feature(0xdf) {
            Ok(value) => VersionSpec::new(value.sh, value.sl),
            Err(e) => {
                debug!(error = %e, "VCP version unavailable, trying capabilities");
                self.capabilities()
                    .ok()
                    .and_then(|caps| caps.mccs_version)
                    .unwrap_or(VersionSpec::UNKNOWN)
            },
        };

        debug!(%version, "MCCS version");
        self.version = Some(version);
        version
    }
}
