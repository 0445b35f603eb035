//! Ordered text transforms applied to user-entered values.
//!
//! Transforms thread left to right: the output of one becomes the input of
//! the next. They never touch resolved defaults.

use crate::directive::{compile_regex, Transform};
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercase, collapse every run of non-alphanumerics to a single `-`, then
/// strip leading and trailing dashes.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let dashed = NON_SLUG_RE.replace_all(&lowered, "-");
    dashed.trim_matches('-').to_string()
}

fn replace(value: &str, pattern: &str, replacement: &str, flags: &str) -> String {
    // Compiled fresh per application; patterns were checked at parse time.
    let re = match compile_regex(pattern, if flags.contains('i') { "i" } else { "" }) {
        Ok(re) => re,
        Err(e) => {
            warn!("Skipping replace transform: {}", e);
            return value.to_string();
        }
    };
    if flags.contains('g') {
        re.replace_all(value, replacement).into_owned()
    } else {
        re.replace(value, replacement).into_owned()
    }
}

/// Applies each transform in order to `value`.
pub fn apply(value: &str, transforms: &[Transform]) -> String {
    let mut out = value.to_string();
    for transform in transforms {
        out = match transform {
            Transform::Lowercase => out.to_lowercase(),
            Transform::Uppercase => out.to_uppercase(),
            Transform::Slugify => slugify(&out),
            Transform::Trim(chars) => {
                out.trim_matches(|c| chars.contains(c)).to_string()
            }
            Transform::Replace { pattern, replacement, flags } => {
                replace(&out, pattern, replacement, flags)
            }
        };
    }
    out
}
