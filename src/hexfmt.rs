//! Hex strings for EDID blocks, table values and dump files.

use crate::error::{Error, Result};

/// Parses hex digits, ignoring whitespace and an optional `0x` prefix.
pub fn decode(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let digits: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(&digits)
        .map_err(|e| Error::InvalidArgument(format!("invalid hex {:?}: {}", s, e)))
}

/// Space-separated rows of 16 bytes, for table values.
pub fn dump(bytes: &[u8]) -> String {
    bytes.chunks(16)
        .map(|row| row.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_loosely() {
        assert_eq!(decode("00FF4b").unwrap(), vec![0x00, 0xff, 0x4b]);
        assert_eq!(decode("0x01 02").unwrap(), vec![1, 2]);
        assert!(decode("abc").is_err());
        match decode("zz") {
            Err(Error::InvalidArgument(msg)) => assert!(msg.contains("zz")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rows() {
        let bytes: Vec<u8> = (0..18).collect();
        let text = dump(&bytes);
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("10 11"));
    }
}
