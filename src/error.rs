use std::{fmt, io};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failed bus operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IoErrorKind {
    /// The device node does not exist.
    NotFound,
    /// The device node exists but cannot be opened by this user.
    PermissionDenied,
    /// The bus or device is in use.
    Busy,
    /// Nothing arrived within the poll-before-read window.
    Timeout,
    /// Fewer (or more) bytes were transferred than requested.
    ShortTransfer,
    /// Any other errno.
    Other,
}

impl IoErrorKind {
    fn name(self) -> &'static str {
        match self {
            IoErrorKind::NotFound => "not found",
            IoErrorKind::PermissionDenied => "permission denied",
            IoErrorKind::Busy => "busy",
            IoErrorKind::Timeout => "timeout",
            IoErrorKind::ShortTransfer => "short transfer",
            IoErrorKind::Other => "I/O error",
        }
    }
}

/// A failed `open`, `read`, `write` or `ioctl` on an I2C device.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IoError {
    /// What went wrong.
    pub kind: IoErrorKind,
    /// The underlying errno, or 0 when there is none (e.g. a short transfer).
    pub errno: i32,
}

impl IoError {
    /// Builds an error from a kind, choosing a representative errno.
    pub fn new(kind: IoErrorKind) -> Self {
        let errno = match kind {
            IoErrorKind::NotFound => libc::ENOENT,
            IoErrorKind::PermissionDenied => libc::EACCES,
            IoErrorKind::Busy => libc::EBUSY,
            IoErrorKind::Timeout => libc::ETIMEDOUT,
            IoErrorKind::ShortTransfer => 0,
            IoErrorKind::Other => libc::EIO,
        };
        IoError { kind, errno }
    }

    /// Classifies a raw errno value.
    pub fn from_errno(errno: i32) -> Self {
        let kind = match errno {
            libc::ENOENT | libc::ENODEV => IoErrorKind::NotFound,
            libc::EACCES | libc::EPERM => IoErrorKind::PermissionDenied,
            libc::EBUSY => IoErrorKind::Busy,
            libc::ETIMEDOUT => IoErrorKind::Timeout,
            _ => IoErrorKind::Other,
        };
        IoError { kind, errno }
    }

    /// Whether retrying the same exchange may succeed.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            IoErrorKind::Timeout | IoErrorKind::ShortTransfer => true,
            IoErrorKind::Other => self.errno == libc::EIO || self.errno == libc::ENXIO,
            _ => false,
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.errno == 0 {
            f.write_str(self.kind.name())
        } else {
            write!(f, "{} ({})", self.kind.name(), io::Error::from_raw_os_error(self.errno))
        }
    }
}

impl std::error::Error for IoError {}

impl From<io::Error> for IoError {
    fn from(e: io::Error) -> Self {
        match e.raw_os_error() {
            Some(errno) => IoError::from_errno(errno),
            None => match e.kind() {
                io::ErrorKind::NotFound => IoError::new(IoErrorKind::NotFound),
                io::ErrorKind::PermissionDenied => IoError::new(IoErrorKind::PermissionDenied),
                io::ErrorKind::TimedOut => IoError::new(IoErrorKind::Timeout),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => IoError::new(IoErrorKind::ShortTransfer),
                _ => IoError::new(IoErrorKind::Other),
            },
        }
    }
}

/// DDC/CI framing and content errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ProtocolError {
    /// Response checksum mismatch.
    #[error("DDC/CI checksum mismatch")]
    Checksum,
    /// Length byte missing its high bit or inconsistent with the bytes received.
    #[error("invalid DDC/CI packet length")]
    BadLength,
    /// The response echoed a different feature code than was requested.
    #[error("DDC/CI feature code mismatch")]
    OpcodeMismatch,
    /// The response is a different packet type than expected.
    #[error("unexpected DDC/CI response type")]
    UnexpectedResponseOpcode,
    /// The monitor answered with the null message.
    #[error("DDC/CI null response")]
    DdcNullResponse,
    /// Every byte read was zero.
    #[error("read returned all zero bytes")]
    ReadAllZero,
    /// A multi-part fragment carried an offset other than the one requested.
    #[error("multi-part fragment offset mismatch")]
    MultiPartOffsetMismatch,
    /// A multi-part transfer grew past its size ceiling.
    #[error("multi-part transfer exceeds {0} bytes")]
    MultiPartOverflow(usize),
    /// EDID header or checksum invalid.
    #[error("invalid EDID")]
    EdidInvalid,
}

impl ProtocolError {
    fn ordinal(self) -> i32 {
        match self {
            ProtocolError::Checksum => 1,
            ProtocolError::BadLength => 2,
            ProtocolError::OpcodeMismatch => 3,
            ProtocolError::UnexpectedResponseOpcode => 4,
            ProtocolError::DdcNullResponse => 5,
            ProtocolError::ReadAllZero => 6,
            ProtocolError::MultiPartOffsetMismatch => 7,
            ProtocolError::MultiPartOverflow(_) => 8,
            ProtocolError::EdidInvalid => 9,
        }
    }

    /// Whether retrying the same exchange may succeed.
    ///
    /// `ReadAllZero` reports `true` here; the retry engine applies its own
    /// promotion policy on repeated occurrences.
    pub fn is_transient(self) -> bool {
        match self {
            ProtocolError::MultiPartOverflow(_) | ProtocolError::EdidInvalid => false,
            _ => true,
        }
    }

    /// Short symbolic name, used by the statistics reporter.
    pub fn name(self) -> &'static str {
        match self {
            ProtocolError::Checksum => "Checksum",
            ProtocolError::BadLength => "BadLength",
            ProtocolError::OpcodeMismatch => "OpcodeMismatch",
            ProtocolError::UnexpectedResponseOpcode => "UnexpectedResponseOpcode",
            ProtocolError::DdcNullResponse => "DdcNullResponse",
            ProtocolError::ReadAllZero => "ReadAllZero",
            ProtocolError::MultiPartOffsetMismatch => "MultiPartOffsetMismatch",
            ProtocolError::MultiPartOverflow(_) => "MultiPartOverflow",
            ProtocolError::EdidInvalid => "EdidInvalid",
        }
    }
}

/// The error type for every fallible operation in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// OS-level bus failure.
    #[error("I2C error: {0}")]
    Io(#[from] IoError),

    /// Malformed or unexpected DDC/CI traffic.
    #[error("DDC/CI error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The feature code is not in the feature table and `force` was not given.
    #[error("unrecognized VCP feature code 0x{0:02x}")]
    UnknownFeature(u8),

    /// The operation is not permitted on this feature (e.g. reading a
    /// write-only feature).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The monitor answered that it does not implement the feature.
    #[error("feature 0x{0:02x} unsupported by monitor")]
    FeatureUnsupportedByMonitor(u8),

    /// A value written with verification read back differently.
    #[error("verification failed for feature 0x{code:02x}: wrote {expected}, read {actual}")]
    VerifyFailed {
        /// Feature code.
        code: u8,
        /// Value written.
        expected: String,
        /// Value read back.
        actual: String,
    },

    /// A caller-supplied argument is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No probed display matches the identifier.
    #[error("display not found: {0}")]
    DisplayNotFound(String),

    /// More than one probed display matches the identifier.
    #[error("ambiguous display selection: {0}")]
    AmbiguousDisplay(String),

    /// The retry engine ran out of tries.
    #[error("maximum retries exceeded after {attempts} tries, last error: {last}")]
    Retries {
        /// Number of tries made.
        attempts: u8,
        /// Error from the final try.
        last: Box<Error>,
    },

    /// Every try returned an all-zero buffer.
    #[error("all {attempts} tries returned all zero bytes")]
    AllTriesZero {
        /// Number of tries made.
        attempts: u8,
    },
}

/// The error kinds, each with a disjoint range of numeric codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// errno-style failures; code is `-errno`.
    OsIo,
    /// Wire protocol failures.
    Protocol,
    /// Refused or failed feature operations.
    Operation,
    /// Display lookup and retry exhaustion.
    Resource,
}

const PROTOCOL_BASE: i32 = 3000;
const OPERATION_BASE: i32 = 3100;
const RESOURCE_BASE: i32 = 3200;
const RANGE_WIDTH: i32 = 100;

impl ErrorKind {
    /// Name shown in the one-line failure report.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::OsIo => "OS I/O",
            ErrorKind::Protocol => "Protocol",
            ErrorKind::Operation => "Operation",
            ErrorKind::Resource => "Resource",
        }
    }

    /// Determines which range a status code belongs to.
    pub fn of_code(code: i32) -> Option<ErrorKind> {
        if code >= 0 {
            return None
        }
        let abs = -code;
        if abs < PROTOCOL_BASE {
            Some(ErrorKind::OsIo)
        } else if abs < PROTOCOL_BASE + RANGE_WIDTH {
            Some(ErrorKind::Protocol)
        } else if abs < OPERATION_BASE + RANGE_WIDTH {
            Some(ErrorKind::Operation)
        } else if abs < RESOURCE_BASE + RANGE_WIDTH {
            Some(ErrorKind::Resource)
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Error {
    /// The kind this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::OsIo,
            Error::Protocol(_) => ErrorKind::Protocol,
            Error::UnknownFeature(_)
            | Error::InvalidOperation(_)
            | Error::FeatureUnsupportedByMonitor(_)
            | Error::VerifyFailed { .. }
            | Error::InvalidArgument(_) => ErrorKind::Operation,
            Error::DisplayNotFound(_)
            | Error::AmbiguousDisplay(_)
            | Error::Retries { .. }
            | Error::AllTriesZero { .. } => ErrorKind::Resource,
        }
    }

    /// Stable numeric status code, always negative.
    pub fn code(&self) -> i32 {
        match self {
            Error::Io(e) => -if e.errno > 0 { e.errno } else { libc::EIO },
            Error::Protocol(e) => -(PROTOCOL_BASE + e.ordinal()),
            Error::UnknownFeature(_) => -(OPERATION_BASE + 1),
            Error::InvalidOperation(_) => -(OPERATION_BASE + 2),
            Error::FeatureUnsupportedByMonitor(_) => -(OPERATION_BASE + 3),
            Error::VerifyFailed { .. } => -(OPERATION_BASE + 4),
            Error::InvalidArgument(_) => -(OPERATION_BASE + 5),
            Error::DisplayNotFound(_) => -(RESOURCE_BASE + 1),
            Error::AmbiguousDisplay(_) => -(RESOURCE_BASE + 2),
            Error::Retries { .. } => -(RESOURCE_BASE + 3),
            Error::AllTriesZero { .. } => -(RESOURCE_BASE + 4),
        }
    }

    /// Short symbolic name of the status code.
    pub fn name(&self) -> &'static str {
        match self {
            Error::Io(e) => match e.kind {
                IoErrorKind::NotFound => "NotFound",
                IoErrorKind::PermissionDenied => "PermissionDenied",
                IoErrorKind::Busy => "Busy",
                IoErrorKind::Timeout => "Timeout",
                IoErrorKind::ShortTransfer => "ShortTransfer",
                IoErrorKind::Other => "OsError",
            },
            Error::Protocol(e) => e.name(),
            Error::UnknownFeature(_) => "UnknownFeature",
            Error::InvalidOperation(_) => "InvalidOperation",
            Error::FeatureUnsupportedByMonitor(_) => "FeatureUnsupportedByMonitor",
            Error::VerifyFailed { .. } => "VerifyFailed",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::DisplayNotFound(_) => "DisplayNotFound",
            Error::AmbiguousDisplay(_) => "AmbiguousDisplay",
            Error::Retries { .. } => "Retries",
            Error::AllTriesZero { .. } => "AllTriesZero",
        }
    }

    /// Whether the retry engine may try the exchange again.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Io(e) => e.is_transient(),
            Error::Protocol(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether this is a `ReadAllZero` protocol error.
    pub fn is_read_all_zero(&self) -> bool {
        *self == Error::Protocol(ProtocolError::ReadAllZero)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_land_in_their_kind_range() {
        let errors = vec![
            Error::Io(IoError::new(IoErrorKind::PermissionDenied)),
            Error::Protocol(ProtocolError::Checksum),
            Error::Protocol(ProtocolError::EdidInvalid),
            Error::UnknownFeature(0xe5),
            Error::VerifyFailed { code: 0x10, expected: "75".into(), actual: "70".into() },
            Error::DisplayNotFound("bus 9".into()),
            Error::Retries { attempts: 3, last: Box::new(ProtocolError::DdcNullResponse.into()) },
            Error::AllTriesZero { attempts: 10 },
        ];
        for e in errors {
            assert_eq!(ErrorKind::of_code(e.code()), Some(e.kind()), "{:?}", e);
        }
    }

    #[test]
    fn errno_classification() {
        assert_eq!(IoError::from_errno(libc::EACCES).kind, IoErrorKind::PermissionDenied);
        assert_eq!(IoError::from_errno(libc::EBUSY).kind, IoErrorKind::Busy);
        assert!(IoError::from_errno(libc::EIO).is_transient());
        assert!(!IoError::from_errno(libc::EINTR).is_transient());
        assert!(!IoError::from_errno(libc::EACCES).is_transient());
        assert!(IoError::new(IoErrorKind::ShortTransfer).is_transient());
    }

    #[test]
    fn protocol_transience() {
        assert!(Error::from(ProtocolError::DdcNullResponse).is_transient());
        assert!(Error::from(ProtocolError::Checksum).is_transient());
        assert!(!Error::from(ProtocolError::MultiPartOverflow(256)).is_transient());
        assert!(!Error::FeatureUnsupportedByMonitor(0x14).is_transient());
    }
}
