//! Linux `i2c-dev` transport.

use std::os::unix::io::RawFd;
use std::path::PathBuf;
use std::io;
use resize_slice::ResizeSlice;
use tracing::{debug, trace};
use crate::error::{IoError, IoErrorKind};
use crate::stats::{self, IoEvent};
use crate::transport::{IoOptions, IoStrategy, Transport, TransportKind};

/// `ioctl` request returning the adapter functionality bitmap.
pub const I2C_FUNCS: libc::c_ulong = 0x0705;

/// Milliseconds to wait for readable data when the read timeout is on.
pub const READ_POLL_TIMEOUT_MS: libc::c_int = 100;

/// Names of the `I2C_FUNC_*` bits, as reported by `environment`.
pub const FUNCTIONALITY_NAMES: &[(u64, &str)] = &[
    (0x0000_0001, "I2C_FUNC_I2C"),
    (0x0000_0002, "I2C_FUNC_10BIT_ADDR"),
    (0x0000_0004, "I2C_FUNC_PROTOCOL_MANGLING"),
    (0x0000_0008, "I2C_FUNC_SMBUS_PEC"),
    (0x0000_0010, "I2C_FUNC_NOSTART"),
    (0x0000_0020, "I2C_FUNC_SLAVE"),
    (0x0000_8000, "I2C_FUNC_SMBUS_BLOCK_PROC_CALL"),
    (0x0001_0000, "I2C_FUNC_SMBUS_QUICK"),
    (0x0002_0000, "I2C_FUNC_SMBUS_READ_BYTE"),
    (0x0004_0000, "I2C_FUNC_SMBUS_WRITE_BYTE"),
    (0x0008_0000, "I2C_FUNC_SMBUS_READ_BYTE_DATA"),
    (0x0010_0000, "I2C_FUNC_SMBUS_WRITE_BYTE_DATA"),
    (0x0020_0000, "I2C_FUNC_SMBUS_READ_WORD_DATA"),
    (0x0040_0000, "I2C_FUNC_SMBUS_WRITE_WORD_DATA"),
    (0x0080_0000, "I2C_FUNC_SMBUS_PROC_CALL"),
    (0x0100_0000, "I2C_FUNC_SMBUS_READ_BLOCK_DATA"),
    (0x0200_0000, "I2C_FUNC_SMBUS_WRITE_BLOCK_DATA"),
    (0x0400_0000, "I2C_FUNC_SMBUS_READ_I2C_BLOCK"),
    (0x0800_0000, "I2C_FUNC_SMBUS_WRITE_I2C_BLOCK"),
    (0x1000_0000, "I2C_FUNC_SMBUS_HOST_NOTIFY"),
];

/// Device node of an I2C bus.
pub fn bus_path(busno: u32) -> PathBuf {
    PathBuf::from(format!("/dev/i2c-{}", busno))
}

/// Names of every functionality bit set in `funcs`.
pub fn functionality_names(funcs: u64) -> Vec<&'static str> {
    FUNCTIONALITY_NAMES.iter().filter(|&&(bit, _)| funcs & bit != 0).map(|&(_, name)| name).collect()
}

fn last_os_error() -> IoError {
    IoError::from(io::Error::last_os_error())
}

/// A DDC transport over an `i2c` crate master device.
#[derive(Debug)]
pub struct I2cBus<I> {
    inner: I,
    busno: u32,
    fd: Option<RawFd>,
    address: u16,
    options: IoOptions,
}

/// A `/dev/i2c-N` device opened through `i2c-linux`.
#[cfg(feature = "i2c-linux")]
pub type LinuxI2cBus = I2cBus<i2c_linux::I2c<std::fs::File>>;

/// Opens `/dev/i2c-N` for reading and writing.
#[cfg(feature = "i2c-linux")]
pub fn open_bus(busno: u32, options: IoOptions) -> Result<LinuxI2cBus, IoError> {
    use std::os::unix::io::AsRawFd;

    let path = bus_path(busno);
    let file = stats::timed(IoEvent::Open, || {
        std::fs::OpenOptions::new().read(true).write(true).open(&path)
    }).map_err(IoError::from)?;
    let fd = file.as_raw_fd();
    debug!(bus = busno, fd, "opened {}", path.display());

    Ok(I2cBus::new(i2c_linux::I2c::new(file), busno, options).with_fd(fd))
}

impl<I> I2cBus<I> {
    /// Wraps an already open device.
    pub fn new(inner: I, busno: u32, options: IoOptions) -> Self {
        I2cBus {
            inner,
            busno,
            fd: None,
            address: 0,
            options,
        }
    }

    /// Supplies the raw descriptor used for `I2C_FUNCS` and read polling.
    pub fn with_fd(mut self, fd: RawFd) -> Self {
        self.fd = Some(fd);
        self
    }

    pub fn busno(&self) -> u32 {
        self.busno
    }

    pub fn options(&self) -> IoOptions {
        self.options
    }

    pub fn set_options(&mut self, options: IoOptions) {
        self.options = options;
    }

    /// Borrow the inner device.
    pub fn inner_ref(&self) -> &I {
        &self.inner
    }

    /// Mutably borrow the inner device.
    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.inner
    }

    fn poll_readable(&self) -> Result<(), IoError> {
        let fd = match self.fd {
            Some(fd) => fd,
            None => return Ok(()),
        };

        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = stats::timed(IoEvent::Poll, || unsafe { libc::poll(&mut pfd, 1, READ_POLL_TIMEOUT_MS) });
        match rc {
            rc if rc < 0 => Err(last_os_error()),
            0 => {
                debug!(bus = self.busno, "read poll timed out");
                Err(IoError::new(IoErrorKind::Timeout))
            },
            _ => Ok(()),
        }
    }
}

impl<I> I2cBus<I>
where
    I: i2c::Master<Error = io::Error> + i2c::Address + i2c::ReadWrite + i2c::BulkTransfer,
{
    fn read_once(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let requested = buf.len();
        let transferred = match self.options.strategy {
            IoStrategy::FileIo => stats::timed(IoEvent::Read, || self.inner.i2c_read(buf))?,
            IoStrategy::Ioctl => {
                let address = self.address;
                let inner = &mut self.inner;
                stats::timed(IoEvent::IoctlRead, || {
                    let mut msgs = [
                        i2c::Message::Read {
                            address,
                            data: buf,
                            flags: Default::default(),
                        },
                    ];
                    inner.i2c_transfer(&mut msgs).map(|_| msgs[0].len())
                })?
            },
        };

        if transferred != requested {
            debug!(bus = self.busno, requested, transferred, "short read");
            return Err(IoError::new(IoErrorKind::ShortTransfer))
        }

        Ok(())
    }
}

impl<I> Transport for I2cBus<I>
where
    I: i2c::Master<Error = io::Error> + i2c::Address + i2c::ReadWrite + i2c::BulkTransfer,
{
    fn kind(&self) -> TransportKind {
        TransportKind::I2c
    }

    fn set_slave_address(&mut self, address: u16) -> Result<(), IoError> {
        if self.options.strategy == IoStrategy::FileIo && self.address != address {
            let inner = &mut self.inner;
            stats::timed(IoEvent::SetAddress, || inner.set_slave_address(address, false))?;
        }
        self.address = address;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        trace!(bus = self.busno, address = self.address, ?bytes, "write");
        match self.options.strategy {
            IoStrategy::FileIo => {
                let inner = &mut self.inner;
                stats::timed(IoEvent::Write, || inner.i2c_write(bytes))?;
            },
            IoStrategy::Ioctl => {
                let address = self.address;
                let inner = &mut self.inner;
                stats::timed(IoEvent::IoctlWrite, || {
                    let mut msgs = [
                        i2c::Message::Write {
                            address,
                            data: bytes,
                            flags: Default::default(),
                        },
                    ];
                    inner.i2c_transfer(&mut msgs)
                })?;
            },
        }

        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        if self.options.read_timeout {
            self.poll_readable()?;
        }

        if self.options.bytewise {
            let mut data = &mut buf[..];
            while !data.is_empty() {
                self.read_once(&mut data[..1])?;
                data.resize_from(1);
            }
        } else {
            self.read_once(buf)?;
        }

        trace!(bus = self.busno, address = self.address, bytes = ?&buf[..], "read");
        Ok(())
    }

    fn functionality(&mut self) -> Result<u64, IoError> {
        let fd = match self.fd {
            Some(fd) => fd,
            None => return Ok(0),
        };

        let mut funcs: libc::c_ulong = 0;
        let rc = unsafe { libc::ioctl(fd, I2C_FUNCS as _, &mut funcs as *mut libc::c_ulong) };
        if rc < 0 {
            return Err(last_os_error())
        }

        Ok(funcs as u64)
    }
}

impl<I> Drop for I2cBus<I> {
    fn drop(&mut self) {
        debug!(bus = self.busno, "closing");
        stats::record_io_event(IoEvent::Close, Default::default());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{Read, Write};
    use super::*;

    /// A device answering reads from a byte queue, at most `limit` bytes per
    /// transfer.
    #[derive(Default)]
    struct Wire {
        pending: VecDeque<u8>,
        limit: Option<usize>,
        reads: Vec<usize>,
        written: Vec<u8>,
    }

    impl Wire {
        fn with_reply(bytes: &[u8]) -> Self {
            Wire {
                pending: bytes.iter().cloned().collect(),
                ..Default::default()
            }
        }

        fn fill(&mut self, buf: &mut [u8]) -> usize {
            self.reads.push(buf.len());
            let n = buf.len().min(self.limit.unwrap_or(usize::MAX)).min(self.pending.len());
            for b in &mut buf[..n] {
                *b = self.pending.pop_front().unwrap_or(0);
            }
            n
        }
    }

    impl i2c::Master for Wire {
        type Error = io::Error;
    }

    impl i2c::Address for Wire {
        fn set_slave_address(&mut self, _addr: u16, _tenbit: bool) -> io::Result<()> {
            Ok(())
        }
    }

    impl Read for Wire {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            Ok(self.fill(buf))
        }
    }

    impl Write for Wire {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl i2c::BulkTransfer for Wire {
        fn i2c_transfer_support(&mut self) -> io::Result<(i2c::ReadFlags, i2c::WriteFlags)> {
            Ok(Default::default())
        }

        fn i2c_transfer(&mut self, messages: &mut [i2c::Message]) -> io::Result<()> {
            for msg in messages.iter_mut() {
                match msg {
                    i2c::Message::Read { data, .. } => {
                        self.fill(data);
                    },
                    i2c::Message::Write { data, .. } => self.written.extend_from_slice(data),
                }
            }
            Ok(())
        }
    }

    fn wired(wire: Wire, bytewise: bool, strategy: IoStrategy) -> I2cBus<Wire> {
        I2cBus::new(wire, 4, IoOptions { strategy, bytewise, read_timeout: true })
    }

    #[test]
    fn reads_whole_buffer() {
        let mut bus = wired(Wire::with_reply(&[1, 2, 3, 4]), false, IoStrategy::FileIo);
        let mut buf = [0u8; 4];
        bus.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(bus.inner_ref().reads, vec![4]);
    }

    #[test]
    fn bytewise_reads() {
        let mut bus = wired(Wire::with_reply(&[0x6e, 0x88, 0x02]), true, IoStrategy::FileIo);
        let mut buf = [0u8; 3];
        bus.read(&mut buf).unwrap();
        assert_eq!(buf, [0x6e, 0x88, 0x02]);
        assert_eq!(bus.inner_ref().reads, vec![1, 1, 1]);
    }

    #[test]
    fn short_reads_are_errors() {
        let mut wire = Wire::with_reply(&[1, 2, 3, 4]);
        wire.limit = Some(2);
        let mut bus = wired(wire, false, IoStrategy::FileIo);
        let mut buf = [0u8; 4];
        let e = bus.read(&mut buf).unwrap_err();
        assert_eq!(e.kind, IoErrorKind::ShortTransfer);
        assert_eq!(e.errno, 0);

        let mut bus = wired(Wire::with_reply(&[1]), true, IoStrategy::FileIo);
        let e = bus.read(&mut buf).unwrap_err();
        assert_eq!(e.kind, IoErrorKind::ShortTransfer);
        assert_eq!(bus.inner_ref().reads, vec![1, 1]);
    }

    #[test]
    fn ioctl_transfers() {
        let mut bus = wired(Wire::with_reply(&[9, 8]), false, IoStrategy::Ioctl);
        bus.set_slave_address(0x37).unwrap();
        bus.write(&[0x51, 0x82, 0x01, 0x10, 0xac]).unwrap();
        let mut buf = [0u8; 2];
        bus.read(&mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
        assert_eq!(bus.inner_ref().written, vec![0x51, 0x82, 0x01, 0x10, 0xac]);
        assert_eq!(bus.functionality().unwrap(), 0);
    }

    #[test]
    fn functionality_bits() {
        let names = functionality_names(0x0000_0001 | 0x0800_0000);
        assert_eq!(names, vec!["I2C_FUNC_I2C", "I2C_FUNC_SMBUS_WRITE_I2C_BLOCK"]);
    }

    #[test]
    fn node_paths() {
        assert_eq!(bus_path(7), PathBuf::from("/dev/i2c-7"));
    }
}
