//! Parsers for the individual `$`-separated fields of an encoded hash.

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};

use crate::error::{HashError, Result};

/// Parses the version field, `v=<n>`.
///
/// Any run of digits is a version number; one too wide for `u64` saturates
/// to `u64::MAX` so it still reads as an unknown version.
pub(super) fn parse_version(field: &str) -> Result<u64> {
    let digits = field
        .strip_prefix("v=")
        .filter(|s| is_decimal(s))
        .ok_or(HashError::Malformed("invalid version field"))?;
    Ok(digits.parse().unwrap_or(u64::MAX))
}

/// Parses the cost field, `m=<n>,t=<n>,p=<n>`, in exactly that order.
pub(super) fn parse_costs(field: &str) -> Result<(u32, u32, u32)> {
    let mut parts = field.split(',');
    let mut next = |key: &str| -> Result<u32> {
        let value = parts
            .next()
            .and_then(|part| part.strip_prefix(key))
            .and_then(parse_decimal)
            .ok_or(HashError::Malformed("invalid parameter field"))?;
        if value == 0 {
            return Err(HashError::Malformed("parameters must be positive"));
        }
        Ok(value)
    };

    let memory = next("m=")?;
    let iterations = next("t=")?;
    let parallelism = next("p=")?;

    if parts.next().is_some() {
        return Err(HashError::Malformed("invalid parameter field"));
    }

    Ok((memory, iterations, parallelism))
}

/// Decodes a strict, unpadded standard base64 field into at least one byte.
pub(super) fn decode_bytes(field: &str, what: &'static str) -> Result<Vec<u8>> {
    let bytes = STANDARD_NO_PAD
        .decode(field)
        .map_err(|_| HashError::Malformed(what))?;
    if bytes.is_empty() {
        return Err(HashError::Malformed(what));
    }
    Ok(bytes)
}

pub(super) fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Plain decimal digits only: no sign, no whitespace, fits in a `u32`.
fn parse_decimal(s: &str) -> Option<u32> {
    if !is_decimal(s) {
        return None;
    }
    s.parse().ok()
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
