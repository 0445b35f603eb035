//! Template parsing into the block AST.
//!
//! The parser consumes the raw template line by line and assembles an ordered
//! node sequence preserving everything needed to regenerate the file exactly:
//! blank-line runs, section headers, stray comments, and each variable
//! together with its preceding description lines.

use crate::directive::{
    self, ConditionDirective, DefaultValue, DirectiveType, RegexDirective, Transform,
};
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Deliberately not end-anchored: text after the closing `#` does not stop a
// line from being a section header. The raw line round-trips either way.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*---\s*(.+?)\s*---\s*#").unwrap());
static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z_][A-Z0-9_]*)=(.*)$").unwrap());

/// One declared variable with everything parsed off its value position.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvVariable {
    pub name: String,
    /// 1-based position of the `NAME=` line; diagnostics only
    pub line_number: usize,
    /// Joined text of the comment lines immediately preceding the variable
    pub description: Option<String>,
    pub default: Option<DefaultValue>,
    pub directives: Vec<DirectiveType>,
    pub condition: Option<ConditionDirective>,
    pub regex: Option<RegexDirective>,
    pub transforms: Vec<Transform>,
    /// Name of the most recent preceding section header
    pub section: Option<String>,
}

/// One node of the block AST. The ordered node sequence is the sole source
/// of truth for regenerating the template's formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A run of blank lines, preserved by count
    Whitespace { count: usize },
    /// A `# --- Name --- #` header; `line` is the original rendered form
    Section { name: String, line: String },
    /// Raw preceding lines plus the `NAME=value` line (always last)
    Variable { lines: Vec<String>, variable: EnvVariable },
    /// Stray comment lines not attached to any variable
    Content { lines: Vec<String> },
}

/// A parsed template document. Built once per input file; only the merger
/// ever produces a new one from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedTemplate {
    pub nodes: Vec<Node>,
}

impl ParsedTemplate {
    /// Variables in document order. This is the evaluation and prompt order;
    /// conditions and interpolation may only reference earlier entries.
    pub fn variables(&self) -> impl Iterator<Item = &EnvVariable> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Variable { variable, .. } => Some(variable),
            _ => None,
        })
    }
}

/// Renders a section header line the way the parser recognizes it.
pub fn section_line(name: &str) -> String {
    format!("# --- {} --- #", name)
}

fn description_from(lines: &[String]) -> Option<String> {
    let joined = lines
        .iter()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Parses raw template text into the block AST.
///
/// Duplicate names within one file are rejected outright; reusing a name is
/// only meaningful across files, where the merger gives later files override
/// semantics.
///
/// # Errors
/// * `Error::ParseError` on malformed directive syntax or duplicate
///   variable names
pub fn parse(content: &str) -> Result<ParsedTemplate> {
    let mut nodes = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut current_section: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();
    let mut blank_run = 0usize;

    let flush_pending = |nodes: &mut Vec<Node>, pending: &mut Vec<String>| {
        if !pending.is_empty() {
            nodes.push(Node::Content { lines: std::mem::take(pending) });
        }
    };

    // Splitting on '\n' keeps a trailing newline visible as a final empty
    // line, which a trailing Whitespace node then owns; rendering the node
    // list therefore reproduces the input byte for byte.
    for (idx, line) in content.split('\n').enumerate() {
        let line_number = idx + 1;

        if line.trim().is_empty() {
            flush_pending(&mut nodes, &mut pending);
            blank_run += 1;
            continue;
        }
        if blank_run > 0 {
            nodes.push(Node::Whitespace { count: blank_run });
            blank_run = 0;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            flush_pending(&mut nodes, &mut pending);
            let name = caps[1].trim().to_string();
            current_section = Some(name.clone());
            nodes.push(Node::Section { name, line: line.to_string() });
            continue;
        }

        if let Some(caps) = VARIABLE_RE.captures(line) {
            let name = caps[1].to_string();
            if !seen.insert(name.clone()) {
                return Err(Error::ParseError(format!(
                    "Line {}: duplicate variable {}",
                    line_number, name
                )));
            }
            let spec = directive::parse_value(&caps[2]).map_err(|e| match e {
                Error::ParseError(msg) => Error::ParseError(format!(
                    "Line {} ({}): {}",
                    line_number, name, msg
                )),
                other => other,
            })?;
            let variable = EnvVariable {
                name,
                line_number,
                description: description_from(&pending),
                default: spec.default,
                directives: spec.directives,
                condition: spec.condition,
                regex: spec.regex,
                transforms: spec.transforms,
                section: current_section.clone(),
            };
            let mut lines = std::mem::take(&mut pending);
            lines.push(line.to_string());
            nodes.push(Node::Variable { lines, variable });
            continue;
        }

        pending.push(line.to_string());
    }

    flush_pending(&mut nodes, &mut pending);
    if blank_run > 0 {
        nodes.push(Node::Whitespace { count: blank_run });
    }

    Ok(ParsedTemplate { nodes })
}
