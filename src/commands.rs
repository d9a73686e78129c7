//! DDC/CI request and response payloads.
//!
//! Every request implements [`Command`], naming its reply type, the retry
//! class it runs under, and the sleep that must follow it. Replies implement
//! [`CommandResult`] and decode the payload of a validated response packet.

use std::fmt;
use crate::delay::SleepEvent;
use crate::error::{Error, ProtocolError};
use crate::retry::RetryClass;

/// A VCP feature code.
pub type FeatureCode = u8;

/// Largest fragment carried by one multi-part packet.
pub const MAX_FRAGMENT_LEN: usize = 32;

/// Opcodes of the DDC/CI packets this crate speaks.
pub mod opcode {
    pub const VCP_REQUEST: u8 = 0x01;
    pub const VCP_RESPONSE: u8 = 0x02;
    pub const VCP_SET: u8 = 0x03;
    pub const SAVE_SETTINGS: u8 = 0x0c;
    pub const TABLE_READ_REQUEST: u8 = 0xe2;
    pub const CAPABILITIES_REPLY: u8 = 0xe3;
    pub const TABLE_READ_REPLY: u8 = 0xe4;
    pub const TABLE_WRITE: u8 = 0xe7;
    pub const CAPABILITIES_REQUEST: u8 = 0xf3;
}

/// A request that can be encoded into a DDC/CI payload.
pub trait Command {
    /// The decoded reply; `()` for write-only commands.
    type Ok: CommandResult;

    /// The retry class a full exchange of this command runs under.
    const RETRY_CLASS: RetryClass;

    /// Sleep issued after the request has been written.
    const POST_WRITE: SleepEvent;

    /// Sleep issued after a reply has been read.
    const POST_READ: SleepEvent = SleepEvent::PostRead;

    /// Encoded payload length.
    fn len(&self) -> usize;

    /// Writes the payload into `data`, returning its length.
    fn encode(&self, data: &mut [u8]) -> Result<usize, Error>;
}

/// A decodable reply payload.
pub trait CommandResult: Sized {
    /// Largest payload this reply can have.
    const MAX_LEN: usize;

    /// Decodes a payload already stripped of its framing.
    fn decode(data: &[u8]) -> Result<Self, ProtocolError>;
}

fn check_space(data: &[u8], len: usize) -> Result<(), Error> {
    if data.len() < len {
        Err(Error::InvalidArgument(format!("payload buffer too small: {} < {}", data.len(), len)))
    } else {
        Ok(())
    }
}

/// VCP Request (`0x01`).
#[derive(Copy, Clone, Debug)]
pub struct GetVcpFeature {
    pub code: FeatureCode,
}

impl GetVcpFeature {
    pub fn new(code: FeatureCode) -> Self {
        GetVcpFeature { code }
    }
}

impl Command for GetVcpFeature {
    type Ok = VcpReply;
    const RETRY_CLASS: RetryClass = RetryClass::WriteRead;
    const POST_WRITE: SleepEvent = SleepEvent::WriteToRead;

    fn len(&self) -> usize { 2 }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        check_space(data, 2)?;
        data[0] = opcode::VCP_REQUEST;
        data[1] = self.code;

        Ok(2)
    }
}

/// VCP Set (`0x03`).
#[derive(Copy, Clone, Debug)]
pub struct SetVcpFeature {
    pub code: FeatureCode,
    pub value: u16,
}

impl SetVcpFeature {
    pub fn new(code: FeatureCode, value: u16) -> Self {
        SetVcpFeature { code, value }
    }
}

impl Command for SetVcpFeature {
    type Ok = ();
    const RETRY_CLASS: RetryClass = RetryClass::WriteOnly;
    const POST_WRITE: SleepEvent = SleepEvent::PostWrite;

    fn len(&self) -> usize { 4 }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        check_space(data, 4)?;
        data[0] = opcode::VCP_SET;
        data[1] = self.code;
        data[2] = (self.value >> 8) as _;
        data[3] = self.value as _;

        Ok(4)
    }
}

/// Save Current Settings (`0x0C`).
#[derive(Copy, Clone, Debug)]
pub struct SaveCurrentSettings;

impl Command for SaveCurrentSettings {
    type Ok = ();
    const RETRY_CLASS: RetryClass = RetryClass::WriteOnly;
    const POST_WRITE: SleepEvent = SleepEvent::PostSaveSettings;

    fn len(&self) -> usize { 1 }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        check_space(data, 1)?;
        data[0] = opcode::SAVE_SETTINGS;

        Ok(1)
    }
}

/// One fragment of a Table Write (`0xE7`).
#[derive(Copy, Clone, Debug)]
pub struct TableWrite<'a> {
    pub code: FeatureCode,
    pub offset: u16,
    pub data: &'a [u8],
}

impl<'a> TableWrite<'a> {
    pub fn new(code: FeatureCode, offset: u16, data: &'a [u8]) -> Self {
        TableWrite { code, offset, data }
    }
}

impl<'a> Command for TableWrite<'a> {
    type Ok = ();
    const RETRY_CLASS: RetryClass = RetryClass::MultiPartWrite;
    const POST_WRITE: SleepEvent = SleepEvent::PostWrite;

    fn len(&self) -> usize { 4 + self.data.len() }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        if self.data.len() > MAX_FRAGMENT_LEN {
            return Err(Error::InvalidArgument(format!("table fragment of {} bytes exceeds {}", self.data.len(), MAX_FRAGMENT_LEN)))
        }
        check_space(data, self.len())?;

        data[0] = opcode::TABLE_WRITE;
        data[1] = self.code;
        data[2] = (self.offset >> 8) as _;
        data[3] = self.offset as _;
        data[4..4 + self.data.len()].copy_from_slice(self.data);

        Ok(self.len())
    }
}

/// Table Read Request (`0xE2`) for one fragment.
#[derive(Copy, Clone, Debug)]
pub struct TableRead {
    pub code: FeatureCode,
    pub offset: u16,
}

impl TableRead {
    pub fn new(code: FeatureCode, offset: u16) -> Self {
        TableRead { code, offset }
    }
}

impl Command for TableRead {
    type Ok = TableResponse;
    const RETRY_CLASS: RetryClass = RetryClass::MultiPartRead;
    const POST_WRITE: SleepEvent = SleepEvent::WriteToRead;
    const POST_READ: SleepEvent = SleepEvent::MultiPartReadToWrite;

    fn len(&self) -> usize { 4 }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        check_space(data, 4)?;
        data[0] = opcode::TABLE_READ_REQUEST;
        data[1] = self.code;
        data[2] = (self.offset >> 8) as _;
        data[3] = self.offset as _;

        Ok(4)
    }
}

/// Capabilities Request (`0xF3`) for one fragment.
#[derive(Copy, Clone, Debug)]
pub struct CapabilitiesRequest {
    pub offset: u16,
}

impl CapabilitiesRequest {
    pub fn new(offset: u16) -> Self {
        CapabilitiesRequest { offset }
    }
}

impl Command for CapabilitiesRequest {
    type Ok = CapabilitiesReply;
    const RETRY_CLASS: RetryClass = RetryClass::MultiPartRead;
    const POST_WRITE: SleepEvent = SleepEvent::WriteToRead;
    const POST_READ: SleepEvent = SleepEvent::MultiPartReadToWrite;

    fn len(&self) -> usize { 3 }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        check_space(data, 3)?;
        data[0] = opcode::CAPABILITIES_REQUEST;
        data[1] = (self.offset >> 8) as _;
        data[2] = self.offset as _;

        Ok(3)
    }
}

impl<'a, C: Command> Command for &'a C {
    type Ok = C::Ok;
    const RETRY_CLASS: RetryClass = C::RETRY_CLASS;
    const POST_WRITE: SleepEvent = C::POST_WRITE;
    const POST_READ: SleepEvent = C::POST_READ;

    fn len(&self) -> usize { (*self).len() }

    fn encode(&self, data: &mut [u8]) -> Result<usize, Error> {
        (*self).encode(data)
    }
}

/// A non-table VCP value: maximum in `mh:ml`, current in `sh:sl`.
///
/// For non-continuous features `sl` alone carries the enumerated value and
/// the other bytes carry flag bits.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTableValue {
    pub code: FeatureCode,
    pub mh: u8,
    pub ml: u8,
    pub sh: u8,
    pub sl: u8,
}

impl NonTableValue {
    /// Builds a value from its current and maximum halves.
    pub fn new(code: FeatureCode, maximum: u16, value: u16) -> Self {
        NonTableValue {
            code,
            mh: (maximum >> 8) as u8,
            ml: maximum as u8,
            sh: (value >> 8) as u8,
            sl: value as u8,
        }
    }

    /// Current value, `sh << 8 | sl`.
    pub fn value(&self) -> u16 {
        ((self.sh as u16) << 8) | self.sl as u16
    }

    /// Maximum value, `mh << 8 | ml`.
    pub fn maximum(&self) -> u16 {
        ((self.mh as u16) << 8) | self.ml as u16
    }
}

impl fmt::Debug for NonTableValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NonTableValue")
            .field("code", &format_args!("0x{:02x}", self.code))
            .field("maximum", &self.maximum())
            .field("value", &self.value())
            .finish()
    }
}

/// A table VCP value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TableValue {
    pub code: FeatureCode,
    pub bytes: Vec<u8>,
}

/// A VCP value of either shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VcpValue {
    NonTable(NonTableValue),
    Table(TableValue),
}

impl VcpValue {
    pub fn code(&self) -> FeatureCode {
        match self {
            VcpValue::NonTable(v) => v.code,
            VcpValue::Table(v) => v.code,
        }
    }
}

impl From<NonTableValue> for VcpValue {
    fn from(v: NonTableValue) -> Self {
        VcpValue::NonTable(v)
    }
}

impl From<TableValue> for VcpValue {
    fn from(v: TableValue) -> Self {
        VcpValue::Table(v)
    }
}

/// A decoded VCP Response (`0x02`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VcpReply {
    /// Feature code echoed by the monitor.
    pub code: FeatureCode,
    /// `false` when the monitor reported the code unsupported.
    pub supported: bool,
    /// The type byte: `0x00` continuous, `0x01` non-continuous.
    pub type_code: u8,
    pub value: NonTableValue,
}

impl VcpReply {
    pub fn is_continuous(&self) -> bool {
        self.type_code == 0x00
    }
}

impl CommandResult for VcpReply {
    const MAX_LEN: usize = 8;

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.first() != Some(&opcode::VCP_RESPONSE) {
            return Err(ProtocolError::UnexpectedResponseOpcode)
        }

        if data.len() != 8 {
            return Err(ProtocolError::BadLength)
        }

        let supported = match data[1] {
            0x00 => true,
            0x01 => false,
            _ => return Err(ProtocolError::UnexpectedResponseOpcode),
        };

        Ok(VcpReply {
            code: data[2],
            supported,
            type_code: data[3],
            value: NonTableValue {
                code: data[2],
                mh: data[4],
                ml: data[5],
                sh: data[6],
                sl: data[7],
            },
        })
    }
}

/// One fragment of a multi-part reply.
pub trait Fragment {
    fn offset(&self) -> u16;
    fn bytes(&self) -> &[u8];

    /// The feature code echoed by the fragment, if it carries one.
    fn feature_code(&self) -> Option<FeatureCode> { None }
}

/// Table Read Reply (`0xE4`): `[0xE4, code, offset_hi, offset_lo, data...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableResponse {
    pub code: FeatureCode,
    pub offset: u16,
    pub data: Vec<u8>,
}

impl Fragment for TableResponse {
    fn offset(&self) -> u16 { self.offset }
    fn bytes(&self) -> &[u8] { &self.data }
    fn feature_code(&self) -> Option<FeatureCode> { Some(self.code) }
}

impl CommandResult for TableResponse {
    const MAX_LEN: usize = 4 + MAX_FRAGMENT_LEN;

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.first() != Some(&opcode::TABLE_READ_REPLY) {
            return Err(ProtocolError::UnexpectedResponseOpcode)
        }

        if data.len() < 4 || data.len() > Self::MAX_LEN {
            return Err(ProtocolError::BadLength)
        }

        Ok(TableResponse {
            code: data[1],
            offset: ((data[2] as u16) << 8) | data[3] as u16,
            data: data[4..].to_vec(),
        })
    }
}

/// Capabilities Reply (`0xE3`): `[0xE3, offset_hi, offset_lo, data...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilitiesReply {
    pub offset: u16,
    pub data: Vec<u8>,
}

impl Fragment for CapabilitiesReply {
    fn offset(&self) -> u16 { self.offset }
    fn bytes(&self) -> &[u8] { &self.data }
}

impl CommandResult for CapabilitiesReply {
    const MAX_LEN: usize = 3 + MAX_FRAGMENT_LEN;

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.first() != Some(&opcode::CAPABILITIES_REPLY) {
            return Err(ProtocolError::UnexpectedResponseOpcode)
        }

        if data.len() < 3 || data.len() > Self::MAX_LEN {
            return Err(ProtocolError::BadLength)
        }

        Ok(CapabilitiesReply {
            offset: ((data[1] as u16) << 8) | data[2] as u16,
            data: data[3..].to_vec(),
        })
    }
}

impl CommandResult for () {
    const MAX_LEN: usize = 0;

    fn decode(_data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcp_reply_luminance() {
        let reply = VcpReply::decode(&[0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32]).unwrap();
        assert!(reply.supported);
        assert!(reply.is_continuous());
        assert_eq!(reply.code, 0x10);
        assert_eq!(reply.value.maximum(), 100);
        assert_eq!(reply.value.value(), 50);
    }

    #[test]
    fn vcp_reply_unsupported() {
        let reply = VcpReply::decode(&[0x02, 0x01, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert!(!reply.supported);
    }

    #[test]
    fn vcp_reply_errors() {
        assert_eq!(VcpReply::decode(&[0xe4, 0x00]), Err(ProtocolError::UnexpectedResponseOpcode));
        assert_eq!(VcpReply::decode(&[0x02, 0x00, 0x10]), Err(ProtocolError::BadLength));
    }

    #[test]
    fn non_table_value_halves() {
        for &(max, cur) in &[(0u16, 0u16), (100, 50), (0xffff, 0x1234), (0x0100, 0x00ff)] {
            let v = NonTableValue::new(0x12, max, cur);
            assert_eq!(((v.sh as u16) << 8) | v.sl as u16, cur);
            assert_eq!(((v.mh as u16) << 8) | v.ml as u16, max);
            assert_eq!(v.value(), cur);
            assert_eq!(v.maximum(), max);
        }
    }

    #[test]
    fn encode_requests() {
        let mut buf = [0u8; 40];
        let n = SetVcpFeature::new(0x10, 75).encode(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x03, 0x10, 0x00, 0x4b]);

        let n = TableRead::new(0x73, 0x0120).encode(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xe2, 0x73, 0x01, 0x20]);

        let n = CapabilitiesRequest::new(32).encode(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xf3, 0x00, 0x20]);

        let n = TableWrite::new(0x74, 4, &[1, 2, 3]).encode(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xe7, 0x74, 0x00, 0x04, 1, 2, 3]);

        assert!(TableWrite::new(0x74, 0, &[0u8; 33]).encode(&mut buf).is_err());
    }

    #[test]
    fn fragment_replies() {
        let table = TableResponse::decode(&[0xe4, 0x73, 0x00, 0x20, 9, 8]).unwrap();
        assert_eq!((table.code, table.offset(), table.bytes()), (0x73, 32, &[9u8, 8][..]));

        let caps = CapabilitiesReply::decode(&[0xe3, 0x00, 0x00]).unwrap();
        assert!(caps.bytes().is_empty());
    }
}
