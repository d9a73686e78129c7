//! An in-memory monitor that speaks DDC/CI through the [`Transport`] trait.
//!
//! Used by the test suite and by `ddcci testcase` to exercise the protocol
//! layers without hardware. Replies are produced by decoding the request
//! packets exactly as a monitor would, so every byte still passes through
//! the real codec.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::trace;
use crate::commands::{opcode, FeatureCode, MAX_FRAGMENT_LEN};
use crate::edid::EDID_LENGTH;
use crate::error::{IoError, IoErrorKind};
use crate::packet;
use crate::transport::{Transport, TransportKind};
use crate::{I2C_ADDRESS_DDC_CI, I2C_ADDRESS_EDID};

/// A malfunction injected into the next read from the DDC/CI address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Answer with the null message.
    Null,
    /// Corrupt the reply checksum.
    BadChecksum,
    /// Return a buffer of zero bytes.
    AllZero,
    /// Fail the read itself.
    Io(IoErrorKind),
    /// Report a multi-part fragment at the wrong offset.
    WrongOffset,
    /// Echo a different feature code than was requested.
    WrongCode,
}

/// A non-table feature held by the monitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimFeature {
    /// `0x00` continuous, `0x01` non-continuous.
    pub type_code: u8,
    pub maximum: u16,
    pub value: u16,
}

/// A simulated DDC/CI monitor.
#[derive(Clone, Debug)]
pub struct SimulatedMonitor {
    kind: TransportKind,
    address: u16,
    ddc: bool,
    edid: Option<[u8; EDID_LENGTH]>,
    edid_offset: usize,
    capabilities: Vec<u8>,
    features: BTreeMap<FeatureCode, SimFeature>,
    tables: BTreeMap<FeatureCode, Vec<u8>>,
    table_writes: BTreeMap<FeatureCode, Vec<u8>>,
    ignored: BTreeSet<FeatureCode>,
    changes: VecDeque<FeatureCode>,
    faults: VecDeque<Fault>,
    write_faults: VecDeque<IoErrorKind>,
    reply: Option<Vec<u8>>,
    raw_writes: Vec<Vec<u8>>,
    requests: Vec<Vec<u8>>,
    reads: usize,
}

impl Default for SimulatedMonitor {
    fn default() -> Self {
        SimulatedMonitor {
            kind: TransportKind::I2c,
            address: 0,
            ddc: true,
            edid: None,
            edid_offset: 0,
            capabilities: Vec::new(),
            features: BTreeMap::new(),
            tables: BTreeMap::new(),
            table_writes: BTreeMap::new(),
            ignored: BTreeSet::new(),
            changes: VecDeque::new(),
            faults: VecDeque::new(),
            write_faults: VecDeque::new(),
            reply: None,
            raw_writes: Vec::new(),
            requests: Vec::new(),
            reads: 0,
        }
    }
}

fn no_device() -> IoError {
    IoError::from_errno(libc::ENXIO)
}

impl SimulatedMonitor {
    /// A monitor with DDC/CI enabled and no features.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_kind(mut self, kind: TransportKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a continuous feature.
    pub fn with_feature(mut self, code: FeatureCode, maximum: u16, value: u16) -> Self {
        self.features.insert(code, SimFeature { type_code: 0x00, maximum, value });
        self
    }

    /// Adds a non-continuous feature.
    pub fn with_nc_feature(mut self, code: FeatureCode, maximum: u16, value: u16) -> Self {
        self.features.insert(code, SimFeature { type_code: 0x01, maximum, value });
        self
    }

    pub fn with_table(mut self, code: FeatureCode, bytes: &[u8]) -> Self {
        self.tables.insert(code, bytes.to_vec());
        self
    }

    pub fn with_capabilities(mut self, caps: &str) -> Self {
        self.capabilities = caps.as_bytes().to_vec();
        self
    }

    pub fn with_edid(mut self, block: [u8; EDID_LENGTH]) -> Self {
        self.edid = Some(block);
        self
    }

    /// Nothing answers at the DDC/CI address.
    pub fn without_ddc(mut self) -> Self {
        self.ddc = false;
        self
    }

    /// Accepts writes to `code` but keeps its value unchanged.
    pub fn ignore_writes_to(mut self, code: FeatureCode) -> Self {
        self.ignored.insert(code);
        self
    }

    /// Queues a fault for an upcoming DDC/CI read.
    pub fn push_fault(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    /// Queues a failure for an upcoming write.
    pub fn push_write_fault(&mut self, kind: IoErrorKind) {
        self.write_faults.push_back(kind);
    }

    /// Reports `code` as changed through `0x02`/`0x52`.
    pub fn push_change(&mut self, code: FeatureCode) {
        self.changes.push_back(code);
    }

    pub fn feature(&self, code: FeatureCode) -> Option<SimFeature> {
        self.features.get(&code).cloned()
    }

    pub fn set_feature_value(&mut self, code: FeatureCode, value: u16) {
        if let Some(f) = self.features.get_mut(&code) {
            f.value = value;
        }
    }

    pub fn table(&self, code: FeatureCode) -> Option<&[u8]> {
        self.tables.get(&code).map(|t| &t[..])
    }

    /// Every byte sequence written to the DDC/CI address.
    pub fn raw_writes(&self) -> &[Vec<u8>] {
        &self.raw_writes
    }

    /// Payloads of every valid request received.
    pub fn requests(&self) -> &[Vec<u8>] {
        &self.requests
    }

    /// Number of VCP Set requests received for `code`.
    pub fn set_count(&self, code: FeatureCode) -> usize {
        self.requests.iter().filter(|r| r.len() == 4 && r[0] == opcode::VCP_SET && r[1] == code).count()
    }

    /// Number of reads from the DDC/CI address.
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn vcp_reply(&mut self, code: FeatureCode) -> Vec<u8> {
        let feature = match code {
            0x02 => Some(SimFeature {
                type_code: 0x01,
                maximum: 2,
                value: if self.changes.is_empty() { 1 } else { 2 },
            }),
            0x52 if self.features.get(&0x52).is_none() => Some(SimFeature {
                type_code: 0x01,
                maximum: 0xff,
                value: self.changes.pop_front().unwrap_or(0) as u16,
            }),
            _ => self.features.get(&code).cloned(),
        };

        match feature {
            Some(f) => vec![
                opcode::VCP_RESPONSE, 0x00, code, f.type_code,
                (f.maximum >> 8) as u8, f.maximum as u8,
                (f.value >> 8) as u8, f.value as u8,
            ],
            None => vec![opcode::VCP_RESPONSE, 0x01, code, 0x00, 0x00, 0x00, 0x00, 0x00],
        }
    }

    fn handle_request(&mut self, payload: &[u8]) {
        self.reply = None;
        let op = match payload.first() {
            Some(&op) => op,
            None => return,
        };

        match (op, payload.len()) {
            (opcode::VCP_REQUEST, 2) => {
                self.reply = Some(self.vcp_reply(payload[1]));
            },
            (opcode::VCP_SET, 4) => {
                let code = payload[1];
                let value = ((payload[2] as u16) << 8) | payload[3] as u16;
                if code == 0x02 && value == 1 {
                    self.changes.clear();
                } else if !self.ignored.contains(&code) {
                    if let Some(f) = self.features.get_mut(&code) {
                        f.value = value;
                    }
                }
            },
            (opcode::SAVE_SETTINGS, 1) => (),
            (opcode::CAPABILITIES_REQUEST, 3) => {
                let offset = ((payload[1] as usize) << 8) | payload[2] as usize;
                let mut reply = vec![opcode::CAPABILITIES_REPLY, payload[1], payload[2]];
                reply.extend_from_slice(fragment(&self.capabilities, offset));
                self.reply = Some(reply);
            },
            (opcode::TABLE_READ_REQUEST, 4) => {
                let code = payload[1];
                let offset = ((payload[2] as usize) << 8) | payload[3] as usize;
                let mut reply = vec![opcode::TABLE_READ_REPLY, code, payload[2], payload[3]];
                if let Some(table) = self.tables.get(&code) {
                    reply.extend_from_slice(fragment(table, offset));
                }
                self.reply = Some(reply);
            },
            (opcode::TABLE_WRITE, len) if len >= 4 => {
                let code = payload[1];
                let offset = ((payload[2] as usize) << 8) | payload[3] as usize;
                let data = &payload[4..];
                let pending = self.table_writes.entry(code).or_insert_with(Vec::new);
                pending.truncate(offset);
                if data.is_empty() {
                    let value = std::mem::replace(pending, Vec::new());
                    if !self.ignored.contains(&code) {
                        self.tables.insert(code, value);
                    }
                } else {
                    pending.extend_from_slice(data);
                }
            },
            _ => trace!(payload = ?payload, "unhandled request"),
        }
    }

    fn ddc_read(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        self.reads += 1;
        let mut reply = self.reply.take().unwrap_or_default();
        let fault = self.faults.pop_front();

        match fault {
            Some(Fault::Io(kind)) => return Err(IoError::new(kind)),
            Some(Fault::AllZero) => {
                buf.iter_mut().for_each(|b| *b = 0);
                return Ok(())
            },
            Some(Fault::Null) => reply.clear(),
            Some(Fault::WrongOffset) if reply.len() >= 3 => {
                let i = if reply[0] == opcode::TABLE_READ_REPLY { 3 } else { 2 };
                if let Some(b) = reply.get_mut(i) {
                    *b = b.wrapping_add(1);
                }
            },
            Some(Fault::WrongCode) if reply.len() >= 3 => {
                let i = if reply[0] == opcode::VCP_RESPONSE { 2 } else { 1 };
                reply[i] = reply[i].wrapping_add(1);
            },
            _ => (),
        }

        let mut packet = packet::encode_response(&reply).map_err(|_| IoError::new(IoErrorKind::Other))?;
        if fault == Some(Fault::BadChecksum) {
            if let Some(last) = packet.last_mut() {
                *last ^= 0xff;
            }
        }

        for (i, b) in buf.iter_mut().enumerate() {
            *b = packet.get(i).cloned().unwrap_or(0);
        }
        Ok(())
    }
}

fn fragment(data: &[u8], offset: usize) -> &[u8] {
    if offset >= data.len() {
        &[]
    } else {
        &data[offset..data.len().min(offset + MAX_FRAGMENT_LEN)]
    }
}

impl Transport for SimulatedMonitor {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn set_slave_address(&mut self, address: u16) -> Result<(), IoError> {
        self.address = address;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        if let Some(kind) = self.write_faults.pop_front() {
            return Err(IoError::new(kind))
        }

        match self.address {
            I2C_ADDRESS_EDID => {
                if self.edid.is_none() {
                    return Err(no_device())
                }
                self.edid_offset = bytes.first().cloned().unwrap_or(0) as usize;
                Ok(())
            },
            I2C_ADDRESS_DDC_CI if self.ddc => {
                self.raw_writes.push(bytes.to_vec());
                match packet::decode_request(bytes) {
                    Ok(payload) => {
                        let payload = payload.to_vec();
                        self.requests.push(payload.clone());
                        self.handle_request(&payload);
                    },
                    Err(e) => {
                        trace!(error = %e, "ignoring malformed request");
                        self.reply = None;
                    },
                }
                Ok(())
            },
            _ => Err(no_device()),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        match self.address {
            I2C_ADDRESS_EDID => {
                let edid = self.edid.ok_or_else(no_device)?;
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = edid[(self.edid_offset + i) % EDID_LENGTH];
                }
                Ok(())
            },
            I2C_ADDRESS_DDC_CI if self.ddc => self.ddc_read(buf),
            _ => Err(no_device()),
        }
    }

    fn functionality(&mut self) -> Result<u64, IoError> {
        Ok(0x0eff_0001)
    }
}
