//! The base 128-byte EDID block.
//!
//! Field parsing is left to the `edid` crate; the raw block, its checksum
//! and synthetic blocks for simulated monitors are handled here.

use std::fmt;
use ::edid::Descriptor;
use crate::error::{Error, ProtocolError, Result};
use crate::hexfmt;

/// Length of the base EDID block.
pub const EDID_LENGTH: usize = 128;

/// Fixed header of every EDID block.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];

const DESCRIPTOR_OFFSETS: [usize; 4] = [54, 72, 90, 108];
const TAG_SERIAL: u8 = 0xff;
const TAG_TEXT: u8 = 0xfe;
const TAG_NAME: u8 = 0xfc;

/// A parsed EDID block.
///
/// The original bytes are retained and returned unchanged by [`Edid::bytes`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Edid {
    bytes: [u8; EDID_LENGTH],
    /// Three letter PNP manufacturer id.
    pub mfg_id: String,
    pub product_code: u16,
    /// The binary serial number.
    pub serial_number: u32,
    pub week: u8,
    pub year: u16,
    pub version: u8,
    pub revision: u8,
    /// Display product name descriptor.
    pub model_name: Option<String>,
    /// Display product serial number descriptor.
    pub serial_ascii: Option<String>,
    /// Unspecified text descriptor.
    pub extra_text: Option<String>,
}

/// Byte checksum: every byte of a valid block sums to 0 modulo 256.
pub fn checksum_ok(block: &[u8]) -> bool {
    block.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == 0
}

fn encode_mfg_id(id: &str) -> Result<[u8; 2]> {
    let letters = id.as_bytes();
    if letters.len() != 3 || !letters.iter().all(|c| c.is_ascii_uppercase()) {
        return Err(Error::InvalidArgument(format!("manufacturer id {:?} is not three upper-case letters", id)))
    }

    let packed = letters.iter().fold(0u16, |acc, &c| (acc << 5) | (c - b'A' + 1) as u16);
    Ok([(packed >> 8) as u8, packed as u8])
}

fn descriptor_text(text: &str) -> String {
    text.trim_end_matches(|c: char| c == '\n' || c == '\0' || c.is_whitespace()).to_string()
}

impl Edid {
    /// Parses a base EDID block.
    ///
    /// Only the first 128 bytes are considered; extension blocks are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < EDID_LENGTH {
            return Err(ProtocolError::EdidInvalid.into())
        }

        let block = &data[..EDID_LENGTH];
        if block[..8] != EDID_HEADER || !checksum_ok(block) {
            return Err(ProtocolError::EdidInvalid.into())
        }

        let parsed = ::edid::parse(block).to_result()
            .map_err(|_| Error::Protocol(ProtocolError::EdidInvalid))?;

        let mut bytes = [0u8; EDID_LENGTH];
        bytes.copy_from_slice(block);

        let header = &parsed.header;
        let mut edid = Edid {
            bytes,
            mfg_id: header.vendor.iter().collect(),
            product_code: header.product,
            serial_number: header.serial,
            week: header.week,
            year: 1990 + header.year as u16,
            version: header.version,
            revision: header.revision,
            model_name: None,
            serial_ascii: None,
            extra_text: None,
        };

        for desc in &parsed.descriptors {
            match desc {
                Descriptor::ProductName(text) => edid.model_name = Some(descriptor_text(text)),
                Descriptor::SerialNumber(text) => edid.serial_ascii = Some(descriptor_text(text)),
                Descriptor::UnspecifiedText(text) => edid.extra_text = Some(descriptor_text(text)),
                _ => (),
            }
        }

        Ok(edid)
    }

    /// Parses 256 hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hexfmt::decode(s)?;
        if bytes.len() != EDID_LENGTH {
            return Err(Error::InvalidArgument(format!("EDID must be {} hex digits, got {}", EDID_LENGTH * 2, bytes.len() * 2)))
        }
        Edid::parse(&bytes)
    }

    /// The block exactly as read.
    pub fn bytes(&self) -> &[u8; EDID_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// The model name, or the product code when the block has none.
    pub fn model(&self) -> String {
        match &self.model_name {
            Some(name) => name.clone(),
            None => format!("{}", self.product_code),
        }
    }

    /// The ASCII serial, or the binary one when the block has none.
    pub fn serial(&self) -> String {
        match &self.serial_ascii {
            Some(sn) => sn.clone(),
            None => format!("{}", self.serial_number),
        }
    }

    /// Builds a valid block carrying the given identification.
    ///
    /// Used for simulated monitors and tests.
    pub fn synthesize(mfg_id: &str, model: &str, serial: &str, product_code: u16) -> Result<[u8; EDID_LENGTH]> {
        let mut b = [0u8; EDID_LENGTH];
        b[..8].copy_from_slice(&EDID_HEADER);
        b[8..10].copy_from_slice(&encode_mfg_id(mfg_id)?);
        b[10..12].copy_from_slice(&product_code.to_le_bytes());
        b[16] = 1;
        b[17] = 30;
        b[18] = 1;
        b[19] = 4;

        for (&offset, &(tag, text)) in DESCRIPTOR_OFFSETS.iter().zip([(TAG_NAME, model), (TAG_SERIAL, serial)].iter()) {
            let desc = &mut b[offset..offset + 18];
            desc[3] = tag;
            let text = text.as_bytes();
            let len = text.len().min(13);
            desc[5..5 + len].copy_from_slice(&text[..len]);
            if len < 13 {
                desc[5 + len] = 0x0a;
                for pad in desc[6 + len..].iter_mut() {
                    *pad = b' ';
                }
            }
        }

        let sum = b[..EDID_LENGTH - 1].iter().fold(0u8, |sum, &v| sum.wrapping_add(v));
        b[EDID_LENGTH - 1] = 0u8.wrapping_sub(sum);
        Ok(b)
    }
}

impl fmt::Debug for Edid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Edid")
            .field("mfg_id", &self.mfg_id)
            .field("model", &self.model_name)
            .field("product_code", &self.product_code)
            .field("serial", &self.serial_ascii)
            .field("serial_number", &self.serial_number)
            .field("year", &self.year)
            .field("version", &format_args!("{}.{}", self.version, self.revision))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_block_parses() {
        let block = Edid::synthesize("DEL", "DELL U2415", "7MT0186", 0xa0bb).unwrap();
        assert!(checksum_ok(&block));

        let edid = Edid::parse(&block).unwrap();
        assert_eq!(edid.mfg_id, "DEL");
        assert_eq!(edid.product_code, 0xa0bb);
        assert_eq!(edid.model_name.as_deref(), Some("DELL U2415"));
        assert_eq!(edid.serial(), "7MT0186");
        assert_eq!(edid.year, 2020);
        assert_eq!(&edid.bytes()[..], &block[..]);
    }

    #[test]
    fn falls_back_to_binary_ids() {
        let mut block = Edid::synthesize("ACR", "X", "Y", 0x0123).unwrap();
        for b in block[54..90].iter_mut() {
            *b = 0;
        }
        block[12] = 42;
        let sum = block[..EDID_LENGTH - 1].iter().fold(0u8, |sum, &v| sum.wrapping_add(v));
        block[EDID_LENGTH - 1] = 0u8.wrapping_sub(sum);

        let edid = Edid::parse(&block).unwrap();
        assert_eq!(edid.model_name, None);
        assert_eq!(edid.model(), "291");
        assert_eq!(edid.serial(), "42");
    }

    #[test]
    fn hex_round_trip() {
        let block = Edid::synthesize("GSM", "LG HDR 4K", "ABC123", 1).unwrap();
        let edid = Edid::parse(&block).unwrap();
        assert_eq!(Edid::from_hex(&edid.to_hex()).unwrap(), edid);
        assert!(Edid::from_hex("00ff").is_err());
    }

    #[test]
    fn rejects_corrupt_blocks() {
        let mut block = Edid::synthesize("DEL", "X", "Y", 0).unwrap();
        block[20] ^= 0x01;
        assert_eq!(Edid::parse(&block), Err(Error::Protocol(ProtocolError::EdidInvalid)));

        let mut block = Edid::synthesize("DEL", "X", "Y", 0).unwrap();
        block[0] = 0x01;
        block[127] = block[127].wrapping_sub(1);
        assert_eq!(Edid::parse(&block), Err(Error::Protocol(ProtocolError::EdidInvalid)));

        assert!(Edid::parse(&[0u8; 64]).is_err());
        assert!(Edid::synthesize("dell", "X", "Y", 0).is_err());
    }
}
