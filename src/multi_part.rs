//! Segmented reads and writes for capabilities strings and table features.

use tracing::{debug, instrument, trace};
use crate::commands::{self, Command, FeatureCode, Fragment, MAX_FRAGMENT_LEN};
use crate::delay::SleepEvent;
use crate::error::{Error, ProtocolError, Result};
use crate::retry::{self, RetryClass};
use crate::caps::Capabilities;
use crate::transport::Transport;
use crate::Ddc;

/// Largest capabilities string accepted.
pub const MAX_CAPABILITIES_LEN: usize = 32 * 1024;

/// Largest table value accepted for most features.
pub const MAX_TABLE_LEN: usize = 256;

/// LUT transfers may be much larger than other tables.
const MAX_LUT_TABLE_LEN: usize = 8 * 1024;

fn table_ceiling(code: FeatureCode) -> usize {
    match code {
        0x74 | 0x75 => MAX_LUT_TABLE_LEN,
        _ => MAX_TABLE_LEN,
    }
}

impl<T: Transport> Ddc<T> {
    /// One complete multi-part read, without retries.
    ///
    /// `request` builds the fragment request for an offset. Reading stops at
    /// the first empty fragment.
    fn read_fragments<C, F>(&mut self, code: Option<FeatureCode>, ceiling: usize, request: F) -> Result<Vec<u8>>
    where
        C: Command,
        C::Ok: Fragment,
        F: Fn(u16) -> C,
    {
        self.sleep(SleepEvent::PreMultiPartRead);

        let mut buf = Vec::new();
        loop {
            let offset = buf.len() as u16;
            let fragment = self.execute(request(offset))?;

            if fragment.offset() != offset {
                debug!(expected = offset, actual = fragment.offset(), "fragment offset mismatch");
                return Err(ProtocolError::MultiPartOffsetMismatch.into())
            }
            if let (Some(expected), Some(actual)) = (code, fragment.feature_code()) {
                if expected != actual {
                    return Err(ProtocolError::OpcodeMismatch.into())
                }
            }

            let bytes = fragment.bytes();
            trace!(offset, len = bytes.len(), "fragment");
            if bytes.is_empty() {
                break
            }
            if buf.len() + bytes.len() > ceiling {
                return Err(ProtocolError::MultiPartOverflow(ceiling).into())
            }

            buf.extend_from_slice(bytes);
        }

        Ok(buf)
    }

    /// Retrieve the capability string from the device.
    ///
    /// This executes multiple `CapabilitiesRequest` commands to construct
    /// the entire string, restarting from offset 0 on a transient failure.
    #[instrument(level = "debug", skip(self))]
    pub fn capabilities_string(&mut self) -> Result<Vec<u8>> {
        let policy = self.options.retry;
        retry::with_retry(RetryClass::MultiPartRead, &policy, |_| {
            self.read_fragments(None, MAX_CAPABILITIES_LEN, commands::CapabilitiesRequest::new)
        })
    }

    /// Reads and parses the capabilities string.
    pub fn capabilities(&mut self) -> Result<Capabilities> {
        let raw = self.capabilities_string()?;
        Ok(Capabilities::parse(&String::from_utf8_lossy(&raw)))
    }

    /// Read a table value from the device.
    #[instrument(level = "debug", skip(self))]
    pub fn table_read(&mut self, code: FeatureCode) -> Result<Vec<u8>> {
        let policy = self.options.retry;
        let ceiling = table_ceiling(code);
        retry::with_retry(RetryClass::MultiPartRead, &policy, |_| {
            self.read_fragments(Some(code), ceiling, |offset| commands::TableRead::new(code, offset))
        })
    }

    /// Write a table value to the device.
    ///
    /// The value is sent in fragments of at most 32 bytes followed by a
    /// zero-length fragment at the final offset.
    #[instrument(level = "debug", skip(self, value), fields(len = value.len()))]
    pub fn table_write(&mut self, code: FeatureCode, value: &[u8]) -> Result<()> {
        if value.len() > u16::MAX as usize {
            return Err(Error::InvalidArgument(format!("table value of {} bytes is too long", value.len())))
        }

        let policy = self.options.retry;
        retry::with_retry(RetryClass::MultiPartWrite, &policy, |_| {
            let mut offset = 0u16;
            for chunk in value.chunks(MAX_FRAGMENT_LEN) {
                self.execute(commands::TableWrite::new(code, offset, chunk))?;
                offset += chunk.len() as u16;
            }
            self.execute(commands::TableWrite::new(code, offset, &[]))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use crate::sim::SimulatedMonitor;
    use crate::thread_data;
    use super::*;

    fn quietly<F: FnOnce() + Send + 'static>(f: F) {
        thread::spawn(move || {
            thread_data::set_thread_sleep_multiplier(0.0);
            f()
        }).join().unwrap();
    }

    #[test]
    fn empty_first_fragment() {
        quietly(|| {
            let mut monitor = SimulatedMonitor::new().with_capabilities("");
            let mut ddc = Ddc::new(&mut monitor);
            assert_eq!(ddc.capabilities_string().unwrap(), Vec::<u8>::new());
            assert_eq!(monitor.requests().len(), 1);
        });
    }

    #[test]
    fn table_size_limit() {
        quietly(|| {
            let mut monitor = SimulatedMonitor::new()
                .with_table(0x73, &[0x5a; MAX_TABLE_LEN])
                .with_table(0x7e, &[0x5a; MAX_TABLE_LEN + 44]);
            let mut ddc = Ddc::new(&mut monitor);

            assert_eq!(ddc.table_read(0x73).unwrap().len(), MAX_TABLE_LEN);
            assert_eq!(ddc.table_read(0x7e), Err(Error::Protocol(ProtocolError::MultiPartOverflow(MAX_TABLE_LEN))));
        });
    }

    #[test]
    fn capabilities_ceiling() {
        quietly(|| {
            let oversized = "x".repeat(MAX_CAPABILITIES_LEN + 1);
            let mut monitor = SimulatedMonitor::new().with_capabilities(&oversized);
            let mut ddc = Ddc::new(&mut monitor);

            assert_eq!(ddc.capabilities_string(), Err(Error::Protocol(ProtocolError::MultiPartOverflow(MAX_CAPABILITIES_LEN))));
        });
    }
}
