//! Named character-set presets and secret generation.
//! Secret directives reference presets by name and may combine several with
//! `+`, e.g. `<secret:32:hex+special>`.

use crate::constants::DEFAULT_CHARSET;
use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUM: &str = "0123456789";
const HEX_LOWER: &str = "0123456789abcdef";
const HEX_UPPER: &str = "0123456789ABCDEF";
// No quotes or backticks so generated values stay paste-safe in env files.
const SPECIAL: &str = "!@#$%^&*()-_=+[]{}:,.?";

fn preset(name: &str) -> Option<String> {
    match name {
        "lower" => Some(LOWER.to_string()),
        "upper" => Some(UPPER.to_string()),
        "num" => Some(NUM.to_string()),
        "alpha" => Some(format!("{}{}", LOWER, UPPER)),
        "alnum" => Some(format!("{}{}{}", LOWER, UPPER, NUM)),
        "hex" => Some(HEX_LOWER.to_string()),
        "HEX" => Some(HEX_UPPER.to_string()),
        "special" => Some(SPECIAL.to_string()),
        _ => None,
    }
}

/// Expands a `preset[+preset...]` spec into a concrete character set.
///
/// Parts are concatenated in order and duplicate characters are dropped,
/// keeping the first occurrence. An empty or missing spec means `alnum`.
///
/// # Errors
/// * `Error::UnknownCharset` if any part is not a known preset name
pub fn expand(spec: Option<&str>) -> Result<String> {
    let spec = match spec {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => DEFAULT_CHARSET,
    };

    let mut charset = String::new();
    for part in spec.split('+') {
        let part = part.trim();
        let chars =
            preset(part).ok_or_else(|| Error::UnknownCharset(part.to_string()))?;
        for c in chars.chars() {
            if !charset.contains(c) {
                charset.push(c);
            }
        }
    }
    Ok(charset)
}

/// Generates `length` characters drawn from `charset` using the operating
/// system's cryptographic random source.
///
/// One random byte is consumed per output character and mapped with
/// `byte % charset.len()`. The modulo bias for charset lengths that do not
/// divide 256 is a known, accepted approximation.
pub fn generate(length: usize, charset: &str) -> String {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() || length == 0 {
        return String::new();
    }

    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);

    bytes.iter().map(|b| chars[*b as usize % chars.len()]).collect()
}
