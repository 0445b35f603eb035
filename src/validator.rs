//! Semantic validation of parsed templates.
//!
//! Walks variables in document order, accumulating the set of names defined
//! so far, and collects every violation before the caller aborts. Also hosts
//! the per-value checks handed to the interactive prompt.

use crate::directive::{DefaultValue, DirectiveType};
use crate::resolver;
use crate::template::{EnvVariable, ParsedTemplate};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

const BOOLEAN_WORDS: [&str; 8] =
    ["true", "false", "yes", "no", "y", "n", "1", "0"];

/// Directives whose built-in checks a `regex:` directive replaces.
const REGEX_CONFLICTS: [DirectiveType; 5] = [
    DirectiveType::Url,
    DirectiveType::Email,
    DirectiveType::Port,
    DirectiveType::Number,
    DirectiveType::Boolean,
];

/// Validates cross-directive and cross-variable consistency.
///
/// Returns every violation as one message including line number and variable
/// name; an empty result means the template is valid. Never stops early.
pub fn validate(template: &ParsedTemplate) -> Vec<String> {
    let mut errors = Vec::new();
    let mut defined: IndexMap<&str, &EnvVariable> = IndexMap::new();

    for variable in template.variables() {
        let loc = format!("Line {} ({})", variable.line_number, variable.name);
        let has = |d: DirectiveType| variable.directives.contains(&d);

        if has(DirectiveType::Boolean) && variable.directives.len() > 1 {
            errors.push(format!(
                "{}: <boolean> directive cannot be combined with other directives",
                loc
            ));
        }
        if has(DirectiveType::Url) && has(DirectiveType::Email) {
            errors.push(format!(
                "{}: <url> and <email> directives cannot be combined",
                loc
            ));
        }
        if has(DirectiveType::Port) && has(DirectiveType::Number) {
            errors.push(format!(
                "{}: <port> and <number> directives are redundant; use one",
                loc
            ));
        }

        match &variable.default {
            Some(DefaultValue::Options { .. }) => {
                if variable
                    .directives
                    .iter()
                    .any(|d| *d != DirectiveType::Required)
                {
                    errors.push(format!(
                        "{}: an options default can only be combined with <required>",
                        loc
                    ));
                }
            }
            Some(DefaultValue::Secret { .. }) => {
                if !variable.directives.is_empty() {
                    errors.push(format!(
                        "{}: a secret default cannot be combined with directives",
                        loc
                    ));
                }
            }
            _ => {}
        }

        if variable.regex.is_some() {
            for conflict in REGEX_CONFLICTS {
                if has(conflict) {
                    errors.push(format!(
                        "{}: <regex> cannot be combined with <{}>",
                        loc, conflict
                    ));
                }
            }
        }

        if let Some(condition) = &variable.condition {
            match defined.get(condition.variable.as_str()) {
                None => errors.push(format!(
                    "{}: condition variable {} must be defined before this variable",
                    loc, condition.variable
                )),
                Some(dep) => {
                    if !dep.directives.contains(&DirectiveType::Boolean) {
                        errors.push(format!(
                            "{}: condition variable {} should have <boolean> directive",
                            loc, condition.variable
                        ));
                    }
                }
            }
        }

        if let Some(DefaultValue::Static(value)) = &variable.default {
            for name in resolver::references(value) {
                if name == variable.name {
                    errors.push(format!(
                        "{}: default value references itself",
                        loc
                    ));
                } else if !defined.contains_key(name.as_str()) {
                    errors.push(format!(
                        "{}: default value references undefined variable ${{{}}}",
                        loc, name
                    ));
                }
            }
        }

        defined.insert(variable.name.as_str(), variable);
    }

    errors
}

/// Checks one user-entered value against a variable's directives and regex.
///
/// An empty value passes unless the variable is `required`; every other
/// check only applies to non-empty input.
pub fn check_value(
    variable: &EnvVariable,
    value: &str,
) -> std::result::Result<(), String> {
    if value.is_empty() {
        if variable.directives.contains(&DirectiveType::Required) {
            return Err(format!("{} is required", variable.name));
        }
        return Ok(());
    }

    for directive in &variable.directives {
        match directive {
            DirectiveType::Required => {}
            DirectiveType::Url => {
                if !URL_RE.is_match(value) {
                    return Err("must be a valid URL".to_string());
                }
            }
            DirectiveType::Email => {
                if !EMAIL_RE.is_match(value) {
                    return Err("must be a valid email address".to_string());
                }
            }
            DirectiveType::Port => {
                let port: Option<u32> = value.parse().ok();
                if !matches!(port, Some(1..=65535)) {
                    return Err("must be a port number (1-65535)".to_string());
                }
            }
            DirectiveType::Number => {
                if !NUMBER_RE.is_match(value) {
                    return Err("must be a number".to_string());
                }
            }
            DirectiveType::Boolean => {
                if !BOOLEAN_WORDS.contains(&value.to_lowercase().as_str()) {
                    return Err("must be a yes/no value".to_string());
                }
            }
        }
    }

    if let Some(regex) = &variable.regex {
        let re = regex.compile().map_err(|e| e.to_string())?;
        if !re.is_match(value) {
            return Err(regex.error_message.clone().unwrap_or_else(|| {
                format!("must match /{}/{}", regex.pattern, regex.flags)
            }));
        }
    }

    Ok(())
}
