//! Directive and default-value parsing.
//!
//! Everything to the right of `=` in a variable line is parsed here: backtick
//! shell commands, `<secret:N:spec>` generators, `<a|b|*c>` choice lists, and
//! the bracketed directive string mixing validation tags, `if:` conditions,
//! `regex:` checks and text transforms.

use crate::charset;
use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static SECRET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<secret:(\d+)(?::([^>]+))?>$").unwrap());
static VAR_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").unwrap());

/// Validation directive tags attachable to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveType {
    Required,
    Url,
    Email,
    Port,
    Number,
    Boolean,
}

impl DirectiveType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "required" => Some(Self::Required),
            "url" => Some(Self::Url),
            "email" => Some(Self::Email),
            "port" => Some(Self::Port),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for DirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Required => "required",
            Self::Url => "url",
            Self::Email => "email",
            Self::Port => "port",
            Self::Number => "number",
            Self::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

/// A variable's default value description, resolved later by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Literal text after `=`; may contain `${VAR}` references
    Static(String),
    /// Backtick-wrapped command executed at resolution time
    Shell(String),
    /// `<secret:N[:preset[+preset...]]>`
    Secret { length: usize, charset: Option<String> },
    /// `<a|b|*c>`; at most one choice marked as the default
    Options { choices: Vec<String>, default_choice: Option<String> },
}

/// `<if:VAR>` conditional visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionDirective {
    pub variable: String,
}

/// `<regex:/pattern/flags:message>` stored as plain strings and compiled on
/// demand, keeping the structural model independent of the regex engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexDirective {
    pub pattern: String,
    pub flags: String,
    pub error_message: Option<String>,
}

impl RegexDirective {
    pub fn compile(&self) -> Result<Regex> {
        compile_regex(&self.pattern, &self.flags)
    }
}

/// One step of the user-input transform pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Lowercase,
    Uppercase,
    Slugify,
    /// Strips any of the given characters from both ends
    Trim(String),
    /// `replace:/pattern/replacement/flags`; `g` replaces all occurrences,
    /// `i` matches case-insensitively
    Replace { pattern: String, replacement: String, flags: String },
}

/// Everything the value position of one variable line can carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSpec {
    pub default: Option<DefaultValue>,
    pub directives: Vec<DirectiveType>,
    pub condition: Option<ConditionDirective>,
    pub regex: Option<RegexDirective>,
    pub transforms: Vec<Transform>,
}

/// Compiles a slash-literal pattern with its flag set as inline regex flags.
pub fn compile_regex(pattern: &str, flags: &str) -> Result<Regex> {
    let expr = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{}){}", flags, pattern)
    };
    Regex::new(&expr).map_err(|e| {
        Error::ParseError(format!("Invalid regex /{}/{}: {}", pattern, flags, e))
    })
}

/// Parses the raw text to the right of `=`.
///
/// Dispatch order, first match wins:
/// 1. backtick-wrapped shell command
/// 2. `<secret:N[:spec]>`
/// 3. bracketed choice list containing a top-level `|`
/// 4. bracketed directive string
/// 5. static literal (empty text means a bare prompt)
pub fn parse_value(raw: &str) -> Result<ValueSpec> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(ValueSpec::default());
    }

    if text.len() >= 2 && text.starts_with('`') && text.ends_with('`') {
        let command = text[1..text.len() - 1].to_string();
        return Ok(ValueSpec {
            default: Some(DefaultValue::Shell(command)),
            ..Default::default()
        });
    }

    if let Some(caps) = SECRET_RE.captures(text) {
        let length: usize = caps[1].parse().map_err(|_| {
            Error::ParseError(format!("Invalid secret length in '{}'", text))
        })?;
        let spec = caps.get(2).map(|m| m.as_str().to_string());
        // Unknown presets are rejected at parse time.
        charset::expand(spec.as_deref())?;
        return Ok(ValueSpec {
            default: Some(DefaultValue::Secret { length, charset: spec }),
            ..Default::default()
        });
    }

    if text.len() >= 2 && text.starts_with('<') && text.ends_with('>') {
        let inner = &text[1..text.len() - 1];
        if has_top_level_pipe(inner) {
            // A pipe-bearing bracket that still parses as directives (for
            // example a regex literal containing `|`) is a directive string.
            return match parse_directive_string(inner) {
                Ok(spec) => Ok(spec),
                Err(_) => Ok(parse_options(inner)),
            };
        }
        return parse_directive_string(inner);
    }

    Ok(ValueSpec {
        default: Some(DefaultValue::Static(text.to_string())),
        ..Default::default()
    })
}

/// Reports whether `inner` contains a `|` outside any slash-delimited
/// literal. Literal state toggles on each unescaped `/`.
fn has_top_level_pipe(inner: &str) -> bool {
    let mut in_literal = false;
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '/' => in_literal = !in_literal,
            '|' if !in_literal => return true,
            _ => {}
        }
    }
    false
}

/// Parses `a|b|*c` into an options default. A `*` prefix marks the default
/// choice; when several are marked, the last one wins.
fn parse_options(inner: &str) -> ValueSpec {
    let mut choices = Vec::new();
    let mut default_choice = None;
    for part in inner.split('|') {
        let part = part.trim();
        if let Some(stripped) = part.strip_prefix('*') {
            let choice = stripped.trim().to_string();
            default_choice = Some(choice.clone());
            choices.push(choice);
        } else {
            choices.push(part.to_string());
        }
    }
    ValueSpec {
        default: Some(DefaultValue::Options { choices, default_choice }),
        ..Default::default()
    }
}

/// Splits at the next comma; the comma itself is consumed.
fn split_at_comma(s: &str) -> (&str, &str) {
    match s.find(',') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

/// Scans up to the next unescaped `/`, unescaping `\/` (the only recognized
/// escape) and returning the remainder after the delimiter.
fn scan_until_slash(s: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            if c == '/' {
                out.push('/');
            } else {
                out.push('\\');
                out.push(c);
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '/' {
            return Some((out, &s[i + 1..]));
        } else {
            out.push(c);
        }
    }
    None
}

fn check_flags(flags: &str, allowed: &str, context: &str) -> Result<()> {
    for c in flags.chars() {
        if !allowed.contains(c) {
            return Err(Error::ParseError(format!(
                "Invalid {} flag: {}",
                context, c
            )));
        }
    }
    Ok(())
}

/// Parses the content of one `<...>` directive string, scanning left to
/// right. Terms are comma-separated except where slash literals or regex
/// error messages internally contain commas.
fn parse_directive_string(inner: &str) -> Result<ValueSpec> {
    let mut spec = ValueSpec::default();
    let mut rest = inner;

    while !rest.trim().is_empty() {
        rest = rest.trim_start();

        if let Some(r) = rest.strip_prefix("replace:") {
            let r = r.strip_prefix('/').ok_or_else(|| {
                Error::ParseError("Expected '/' after 'replace:'".to_string())
            })?;
            let (pattern, r) = scan_until_slash(r).ok_or_else(|| {
                Error::ParseError(format!(
                    "Unterminated replace pattern in '{}'",
                    inner
                ))
            })?;
            let (replacement, r) = scan_until_slash(r).ok_or_else(|| {
                Error::ParseError(format!(
                    "Unterminated replace replacement in '{}'",
                    inner
                ))
            })?;
            let (flags, r) = split_at_comma(r);
            let flags = flags.trim();
            check_flags(flags, "gi", "replace")?;
            // Malformed patterns fail here rather than mid-prompt.
            compile_regex(&pattern, if flags.contains('i') { "i" } else { "" })?;
            spec.transforms.push(Transform::Replace {
                pattern,
                replacement,
                flags: flags.to_string(),
            });
            rest = r;
        } else if let Some(r) = rest.strip_prefix("regex:") {
            let r = r.strip_prefix('/').ok_or_else(|| {
                Error::ParseError("Expected '/' after 'regex:'".to_string())
            })?;
            let (pattern, r) = scan_until_slash(r).ok_or_else(|| {
                Error::ParseError(format!(
                    "Unterminated regex pattern in '{}'",
                    inner
                ))
            })?;
            let end = r.find([':', ',']).unwrap_or(r.len());
            let flags = r[..end].trim().to_string();
            check_flags(&flags, "imus", "regex")?;
            let mut r = &r[end..];
            let mut error_message = None;
            if let Some(after) = r.strip_prefix(':') {
                let (msg, rnext) = split_at_comma(after);
                error_message = Some(msg.trim().to_string());
                r = rnext;
            } else if let Some(after) = r.strip_prefix(',') {
                r = after;
            }
            compile_regex(&pattern, &flags)?;
            // Last regex: term wins when several are present.
            spec.regex = Some(RegexDirective { pattern, flags, error_message });
            rest = r;
        } else if let Some(r) = rest.strip_prefix("if:") {
            let (name, r) = split_at_comma(r);
            let name = name.trim();
            if !VAR_NAME_RE.is_match(name) {
                return Err(Error::ParseError(format!(
                    "Invalid condition variable name: '{}'",
                    name
                )));
            }
            if spec.condition.is_some() {
                return Err(Error::ParseError(
                    "Multiple if conditions not allowed".to_string(),
                ));
            }
            spec.condition = Some(ConditionDirective { variable: name.to_string() });
            rest = r;
        } else if let Some(r) = rest.strip_prefix("trim:") {
            let (chars, r) = split_at_comma(r);
            let chars = chars.trim();
            if chars.is_empty() {
                return Err(Error::ParseError(
                    "trim directive requires characters to strip".to_string(),
                ));
            }
            spec.transforms.push(Transform::Trim(chars.to_string()));
            rest = r;
        } else {
            let (token, r) = split_at_comma(rest);
            let token = token.trim();
            if token.is_empty() {
                rest = r;
                continue;
            }
            if let Some(directive) = DirectiveType::from_token(token) {
                spec.directives.push(directive);
            } else {
                match token {
                    "lowercase" => spec.transforms.push(Transform::Lowercase),
                    "uppercase" => spec.transforms.push(Transform::Uppercase),
                    "slugify" => spec.transforms.push(Transform::Slugify),
                    _ => {
                        return Err(Error::ParseError(format!(
                            "Unknown directive: {}",
                            token
                        )))
                    }
                }
            }
            rest = r;
        }
    }

    // `<>` and `<,,>` carry nothing; treat them as typos rather than a
    // bare prompt.
    if spec == ValueSpec::default() {
        return Err(Error::ParseError(format!(
            "Empty directive: '<{}>'",
            inner
        )));
    }

    Ok(spec)
}
