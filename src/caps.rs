//! Capabilities string parsing.
//!
//! A capabilities string is a parenthesised list of `name(value)` segments,
//! for example `(prot(monitor)type(LCD)model(XYZ)cmds(01 02 03)vcp(10 14(05
//! 08) 60(0f 11))mccs_ver(2.1))`. Monitors are frequently sloppy about the
//! outer parentheses and whitespace, so parsing is lenient and never fails;
//! segments that cannot be understood are recorded in `errors`.

use std::collections::BTreeMap;
use tracing::debug;
use crate::commands::FeatureCode;
use crate::version::VersionSpec;

/// A parsed capabilities string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub raw: String,
    pub protocol: Option<String>,
    pub ty: Option<String>,
    pub model: Option<String>,
    pub commands: Vec<u8>,
    /// Supported feature codes, with the permitted values of NC features
    /// when the monitor lists them.
    pub vcp: BTreeMap<FeatureCode, Option<Vec<u8>>>,
    pub mccs_version: Option<VersionSpec>,
    /// Segments not interpreted above, in order.
    pub other: Vec<(String, String)>,
    pub errors: Vec<String>,
}

/// Splits `s` into top-level `name(value)` pairs.
fn segments(s: &str) -> (Vec<(String, String)>, Vec<String>) {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && (chars[i].is_whitespace() || chars[i] == ')') {
            i += 1;
        }
        let start = i;
        while i < chars.len() && chars[i] != '(' {
            i += 1;
        }
        let name: String = chars[start..i].iter().collect::<String>().trim().to_string();
        if i >= chars.len() {
            if !name.is_empty() {
                errors.push(format!("trailing text {:?}", name));
            }
            break
        }

        i += 1;
        let value_start = i;
        let mut depth = 1;
        while i < chars.len() && depth > 0 {
            match chars[i] {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => (),
            }
            i += 1;
        }

        let value_end = if depth == 0 { i - 1 } else { i };
        if depth != 0 {
            errors.push(format!("unterminated segment {:?}", name));
        }
        out.push((name, chars[value_start..value_end].iter().collect()));
    }

    (out, errors)
}

fn hex_tokens(s: &str, errors: &mut Vec<String>) -> Vec<u8> {
    // some monitors run codes together without separators
    let mut out = Vec::new();
    for token in s.split_whitespace() {
        let mut t = token;
        while !t.is_empty() {
            let (head, rest) = t.split_at(t.len().min(2));
            match u8::from_str_radix(head, 16) {
                Ok(b) => out.push(b),
                Err(_) => errors.push(format!("invalid hex {:?}", head)),
            }
            t = rest;
        }
    }
    out
}

fn parse_vcp(s: &str, errors: &mut Vec<String>) -> BTreeMap<FeatureCode, Option<Vec<u8>>> {
    let mut vcp = BTreeMap::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    let mut last = None;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' {
            let start = i + 1;
            let mut depth = 1;
            i += 1;
            while i < chars.len() && depth > 0 {
                match chars[i] {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => (),
                }
                i += 1;
            }
            let end = if depth == 0 { i - 1 } else { i };
            let inner: String = chars[start..end].iter().collect();
            match last {
                Some(code) => {
                    vcp.insert(code, Some(hex_tokens(&inner, errors)));
                },
                None => errors.push(format!("value list without feature code: {:?}", inner)),
            }
        } else {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_hexdigit() && i - start < 2 {
                i += 1;
            }
            if i == start {
                errors.push(format!("unexpected {:?} in vcp segment", c));
                i += 1;
                continue
            }
            let token: String = chars[start..i].iter().collect();
            match u8::from_str_radix(&token, 16) {
                Ok(code) => {
                    vcp.insert(code, None);
                    last = Some(code);
                },
                Err(_) => errors.push(format!("invalid feature code {:?}", token)),
            }
        }
    }

    vcp
}

impl Capabilities {
    pub fn parse(s: &str) -> Self {
        let raw = s.trim_end_matches('\0').to_string();
        let mut body = raw.trim();
        if body.starts_with('(') {
            body = &body[1..];
            if body.ends_with(')') {
                body = &body[..body.len() - 1];
            }
        }

        let (segments, errors) = segments(body);
        let mut caps = Capabilities {
            raw: raw.clone(),
            errors,
            ..Default::default()
        };

        for (name, value) in segments {
            match &name.to_ascii_lowercase()[..] {
                "prot" => caps.protocol = Some(value),
                "type" => caps.ty = Some(value),
                "model" => caps.model = Some(value),
                "cmds" => caps.commands = hex_tokens(&value, &mut caps.errors),
                "vcp" => caps.vcp = parse_vcp(&value, &mut caps.errors),
                "mccs_ver" => match value.parse() {
                    Ok(v) => caps.mccs_version = Some(v),
                    Err(_) => caps.errors.push(format!("invalid mccs_ver {:?}", value)),
                },
                _ => caps.other.push((name, value)),
            }
        }

        if !caps.errors.is_empty() {
            debug!(errors = ?caps.errors, "capabilities string parsed with errors");
        }

        caps
    }

    /// Supported feature codes in ascending order.
    pub fn feature_codes(&self) -> Vec<FeatureCode> {
        self.vcp.keys().cloned().collect()
    }

    /// Values the monitor lists for an NC feature.
    pub fn feature_values(&self, code: FeatureCode) -> Option<&[u8]> {
        self.vcp.get(&code).and_then(|v| v.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_string() {
        let caps = Capabilities::parse("(prot(monitor)type(LCD)model(XYZ)vcp(10 14 16))");
        assert_eq!(caps.protocol.as_deref(), Some("monitor"));
        assert_eq!(caps.ty.as_deref(), Some("LCD"));
        assert_eq!(caps.model.as_deref(), Some("XYZ"));
        assert_eq!(caps.feature_codes(), vec![0x10, 0x14, 0x16]);
        assert!(caps.errors.is_empty());
    }

    #[test]
    fn nested_values_and_version() {
        let caps = Capabilities::parse("(prot(monitor)cmds(01 02 03 0C E3 F3)vcp(02 04 14(05 08 0B) 60( 0F 11 )DF)mccs_ver(2.1)mswhql(1))\0\0");
        assert_eq!(caps.commands, vec![0x01, 0x02, 0x03, 0x0c, 0xe3, 0xf3]);
        assert_eq!(caps.feature_values(0x14), Some(&[0x05, 0x08, 0x0b][..]));
        assert_eq!(caps.feature_values(0x60), Some(&[0x0f, 0x11][..]));
        assert_eq!(caps.feature_values(0x02), None);
        assert!(caps.vcp.contains_key(&0xdf));
        assert_eq!(caps.mccs_version, Some(VersionSpec::V21));
        assert_eq!(caps.other, vec![("mswhql".to_string(), "1".to_string())]);
    }

    #[test]
    fn sloppy_strings() {
        let caps = Capabilities::parse("prot(monitor) vcp(101214)");
        assert_eq!(caps.feature_codes(), vec![0x10, 0x12, 0x14]);

        let caps = Capabilities::parse("(vcp(10 12");
        assert_eq!(caps.feature_codes(), vec![0x10, 0x12]);
        assert!(!caps.errors.is_empty());
    }
}
