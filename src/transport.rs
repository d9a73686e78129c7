use std::fmt;
use crate::error::IoError;

/// Which kind of physical link a transport drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// `/dev/i2c-N`
    I2c,
    /// USB HID monitor control class.
    Usb,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TransportKind::I2c => "I2C",
            TransportKind::Usb => "USB",
        })
    }
}

/// How bytes are moved to and from the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IoStrategy {
    /// Plain `read(2)` / `write(2)` on the device node.
    FileIo,
    /// A single `I2C_RDWR` message per operation.
    Ioctl,
}

impl Default for IoStrategy {
    fn default() -> Self {
        IoStrategy::FileIo
    }
}

/// Bus I/O knobs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IoOptions {
    /// Read/write mechanism.
    pub strategy: IoStrategy,
    /// Issue reads one byte at a time.
    pub bytewise: bool,
    /// Poll the descriptor for 100ms before each read and fail with
    /// `Timeout` if nothing is ready.
    pub read_timeout: bool,
}

/// The byte-level capability set the DDC/CI layers are written against.
///
/// An implementation owns an open device; dropping it closes the device.
pub trait Transport {
    /// The kind of link, which selects the base sleep times.
    fn kind(&self) -> TransportKind;

    /// Selects the 7-bit slave address for subsequent reads and writes.
    fn set_slave_address(&mut self, address: u16) -> Result<(), IoError>;

    /// Writes every byte or fails.
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError>;

    /// Fills `buf` completely or fails with `ShortTransfer`.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), IoError>;

    /// Adapter functionality bits (`I2C_FUNCS`), or 0 when not applicable.
    fn functionality(&mut self) -> Result<u64, IoError> {
        Ok(0)
    }
}

impl<'a, T: Transport + ?Sized> Transport for &'a mut T {
    fn kind(&self) -> TransportKind {
        (**self).kind()
    }

    fn set_slave_address(&mut self, address: u16) -> Result<(), IoError> {
        (**self).set_slave_address(address)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        (**self).read(buf)
    }

    fn functionality(&mut self) -> Result<u64, IoError> {
        (**self).functionality()
    }
}
