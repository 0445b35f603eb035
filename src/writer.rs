//! Output regeneration and `.env` escaping rules.
//!
//! Rendering replays the block AST verbatim; only the last line of each
//! variable node is rewritten to `NAME=<escaped value>`. Values carried over
//! from a previous output file but absent from the template are appended
//! under a clearly marked section.

use crate::constants::PRESERVED_SECTION;
use crate::template::{section_line, Node, ParsedTemplate};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static ENV_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z_][A-Z0-9_]*)=(.*)$").unwrap());

/// Escapes a value for a `NAME=value` line.
///
/// Values stay bare unless they contain a space, `#`, a quote character,
/// `$`, or a newline; those are wrapped in double quotes with `\`, `"` and
/// `$` backslash-escaped.
pub fn escape_value(value: &str) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| matches!(c, ' ' | '#' | '"' | '\'' | '$' | '\n'));
    if !needs_quoting {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

fn unquote(raw: &str) -> String {
    if raw.len() >= 2 {
        if raw.starts_with('"') && raw.ends_with('"') {
            return unescape(&raw[1..raw.len() - 1]);
        }
        if raw.starts_with('\'') && raw.ends_with('\'') {
            return raw[1..raw.len() - 1].to_string();
        }
    }
    raw.to_string()
}

/// Reads an existing output file into a name to value map.
///
/// Lines matching `NAME=value` are kept, quote-stripped and
/// backslash-unescaped; blank and comment lines are skipped.
pub fn parse_env_content(content: &str) -> IndexMap<String, String> {
    let mut values = IndexMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(caps) = ENV_LINE_RE.captures(line) {
            values.insert(caps[1].to_string(), unquote(caps[2].trim()));
        }
    }
    values
}

/// Regenerates the document from the block AST and the final value map.
///
/// Every node renders verbatim except variable nodes, whose last line
/// becomes `NAME=<escaped value>`. `extras` are appended under the
/// preserved-values section.
pub fn render(
    template: &ParsedTemplate,
    values: &IndexMap<String, String>,
    extras: &[(String, String)],
) -> String {
    let mut lines: Vec<String> = Vec::new();

    for node in &template.nodes {
        match node {
            Node::Whitespace { count } => {
                for _ in 0..*count {
                    lines.push(String::new());
                }
            }
            Node::Section { line, .. } => lines.push(line.clone()),
            Node::Content { lines: content } => {
                lines.extend(content.iter().cloned())
            }
            Node::Variable { lines: block, variable } => {
                lines.extend(block[..block.len() - 1].iter().cloned());
                let value = values
                    .get(&variable.name)
                    .cloned()
                    .unwrap_or_default();
                lines.push(format!(
                    "{}={}",
                    variable.name,
                    escape_value(&value)
                ));
            }
        }
    }

    if !extras.is_empty() {
        if lines.last().map(|l| !l.is_empty()).unwrap_or(false) {
            lines.push(String::new());
        }
        lines.push(section_line(PRESERVED_SECTION));
        for (name, value) in extras {
            lines.push(format!("{}={}", name, escape_value(value)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
