//! DDC/CI packet framing.
//!
//! A request on the wire is `[0x51] [0x80 | len] [payload...] [chk]`, sent to
//! slave address `0x37`. The checksum additionally covers the destination
//! byte `0x6E`, which the I2C layer transmits as the address phase.
//!
//! A response read back is `[0x6E] [0x80 | len] [payload...] [chk]`, and its
//! checksum is seeded with the virtual host address `0x50`.

use std::iter;
use crate::error::ProtocolError;
use crate::{I2C_ADDRESS_DDC_CI, SUB_ADDRESS_DDC_CI};

/// Destination byte of a request, `0x37 << 1`.
pub const DDC_DEST_ADDRESS: u8 = (I2C_ADDRESS_DDC_CI as u8) << 1;

/// Source byte of a response, as seen by the host.
pub const DDC_RESPONSE_SOURCE: u8 = 0x6e;

/// Seed for response checksums.
pub const HOST_CHECKSUM_SEED: u8 = 0x50;

/// Largest payload a length byte can describe.
pub const MAX_PAYLOAD_LEN: usize = 0x7f;

/// Opcode of the null message payload some monitors send while busy.
pub const NULL_MESSAGE_OPCODE: u8 = 0x7e;

/// XOR of every byte.
pub fn checksum<I: IntoIterator<Item=u8>>(iter: I) -> u8 {
    iter.into_iter().fold(0u8, |sum, v| sum ^ v)
}

/// Builds the full request packet including the leading `0x6E`.
///
/// The bytes to write to the device are `&packet[1..]`.
pub fn encode_request(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::BadLength)
    }

    let mut packet = Vec::with_capacity(payload.len() + 4);
    packet.push(DDC_DEST_ADDRESS);
    packet.push(SUB_ADDRESS_DDC_CI);
    packet.push(0x80 | payload.len() as u8);
    packet.extend_from_slice(payload);
    packet.push(checksum(packet.iter().cloned()));

    Ok(packet)
}

/// Builds a response packet as a monitor would send it.
pub fn encode_response(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::BadLength)
    }

    let mut packet = Vec::with_capacity(payload.len() + 3);
    packet.push(DDC_RESPONSE_SOURCE);
    packet.push(0x80 | payload.len() as u8);
    packet.extend_from_slice(payload);
    packet.push(checksum(iter::once(HOST_CHECKSUM_SEED).chain(packet.iter().cloned())));

    Ok(packet)
}

/// Parses the payload out of a request packet (with or without the leading
/// destination byte).
pub fn decode_request(bytes: &[u8]) -> Result<&[u8], ProtocolError> {
    let bytes = match bytes.first() {
        Some(&DDC_DEST_ADDRESS) => &bytes[1..],
        _ => bytes,
    };

    if bytes.len() < 3 || bytes[0] != SUB_ADDRESS_DDC_CI {
        return Err(ProtocolError::BadLength)
    }
    if bytes[1] & 0x80 == 0 {
        return Err(ProtocolError::BadLength)
    }
    let len = (bytes[1] & 0x7f) as usize;
    if bytes.len() < len + 3 {
        return Err(ProtocolError::BadLength)
    }

    let expected = checksum(iter::once(DDC_DEST_ADDRESS).chain(bytes[..2 + len].iter().cloned()));
    if bytes[2 + len] != expected {
        return Err(ProtocolError::Checksum)
    }

    Ok(&bytes[2..2 + len])
}

/// Validates a buffer read from the monitor and returns its payload.
///
/// Trailing bytes beyond the declared length are ignored.
pub fn decode_response(bytes: &[u8]) -> Result<&[u8], ProtocolError> {
    if bytes.iter().all(|&b| b == 0) {
        return Err(ProtocolError::ReadAllZero)
    }

    if bytes.len() < 3 {
        return Err(ProtocolError::BadLength)
    }

    if bytes[1] & 0x80 == 0 {
        return Err(ProtocolError::BadLength)
    }

    let len = (bytes[1] & 0x7f) as usize;
    if bytes.len() < len + 3 {
        return Err(ProtocolError::BadLength)
    }

    let expected = checksum(iter::once(HOST_CHECKSUM_SEED).chain(bytes[..2 + len].iter().cloned()));
    if bytes[2 + len] != expected {
        return Err(ProtocolError::Checksum)
    }

    let payload = &bytes[2..2 + len];
    if payload.is_empty() || payload[0] == NULL_MESSAGE_OPCODE {
        return Err(ProtocolError::DdcNullResponse)
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_brightness_request() {
        let packet = encode_request(&[0x03, 0x10, 0x00, 0x4b]).unwrap();
        let chk = 0x6e ^ 0x51 ^ 0x84 ^ 0x03 ^ 0x10 ^ 0x00 ^ 0x4b;
        assert_eq!(packet, vec![0x6e, 0x51, 0x84, 0x03, 0x10, 0x00, 0x4b, chk]);
        assert_eq!(decode_request(&packet).unwrap(), &[0x03, 0x10, 0x00, 0x4b]);
    }

    #[test]
    fn brightness_response() {
        let raw = [0x6e, 0x88, 0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32, 0xf2];
        assert_eq!(decode_response(&raw).unwrap(), &raw[2..10]);
    }

    #[test]
    fn response_round_trip() {
        let payload = [0xe3, 0x00, 0x20, b'(', b'p', b'r', b'o', b't'];
        let packet = encode_response(&payload).unwrap();
        assert_eq!(decode_response(&packet).unwrap(), &payload[..]);

        let mut padded = packet.clone();
        padded.resize(39, 0);
        assert_eq!(decode_response(&padded).unwrap(), &payload[..]);
    }

    #[test]
    fn response_errors() {
        assert_eq!(decode_response(&[0u8; 11]), Err(ProtocolError::ReadAllZero));

        let mut packet = encode_response(&[0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32]).unwrap();
        packet[9] ^= 0x01;
        assert_eq!(decode_response(&packet), Err(ProtocolError::Checksum));

        let packet = encode_response(&[0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32]).unwrap();
        assert_eq!(decode_response(&packet[..6]), Err(ProtocolError::BadLength));

        let mut packet = packet;
        packet[1] &= 0x7f;
        assert_eq!(decode_response(&packet), Err(ProtocolError::BadLength));
    }

    #[test]
    fn null_message() {
        assert_eq!(decode_response(&[0x6e, 0x80, 0xbe]), Err(ProtocolError::DdcNullResponse));
        let packet = encode_response(&[0x7e, 0x00]).unwrap();
        assert_eq!(decode_response(&packet), Err(ProtocolError::DdcNullResponse));
    }
}
