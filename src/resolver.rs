//! Default-value resolution.
//!
//! Turns a parsed [`DefaultValue`] into a concrete string: shell commands run
//! through `sh -c` under a wall-clock timeout, secrets come from the charset
//! generator, option lists fall back to their marked or first choice, and
//! static text goes through `${VAR}` interpolation against already-resolved
//! variables.

use crate::charset;
use crate::constants::SHELL_TIMEOUT_MS;
use crate::directive::DefaultValue;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;
use std::time::{Duration, Instant};

static VAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Outcome of resolving one default value. Shell failures degrade to an
/// empty value plus a message instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedDefault {
    pub value: String,
    pub error: Option<String>,
}

impl ResolvedDefault {
    fn ok(value: String) -> Self {
        Self { value, error: None }
    }

    fn failed(error: String) -> Self {
        Self { value: String::new(), error: Some(error) }
    }
}

/// Resolves a default-value description into a concrete string.
///
/// # Errors
/// * `Error::UnknownCharset` for a secret spec naming an unknown preset
///   (normally already rejected at parse time)
pub fn resolve(default: Option<&DefaultValue>) -> Result<ResolvedDefault> {
    match default {
        None => Ok(ResolvedDefault::ok(String::new())),
        Some(DefaultValue::Static(text)) => Ok(ResolvedDefault::ok(text.clone())),
        Some(DefaultValue::Shell(command)) => Ok(run_shell(command)),
        Some(DefaultValue::Secret { length, charset: spec }) => {
            let chars = charset::expand(spec.as_deref())?;
            Ok(ResolvedDefault::ok(charset::generate(*length, &chars)))
        }
        Some(DefaultValue::Options { choices, default_choice }) => {
            let value = default_choice
                .clone()
                .or_else(|| choices.first().cloned())
                .unwrap_or_default();
            Ok(ResolvedDefault::ok(value))
        }
    }
}

fn drain<R: Read>(stream: Option<R>) -> String {
    let mut text = String::new();
    if let Some(mut stream) = stream {
        let _ = stream.read_to_string(&mut text);
    }
    text
}

/// Runs a backtick command through `sh -c` with captured output.
///
/// Never fails the run: non-zero exit, spawn failure, and exceeding the
/// timeout all come back as an empty value plus a message.
pub fn run_shell(command: &str) -> ResolvedDefault {
    debug!("Running shell default: {}", command);

    let spawned = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            return ResolvedDefault::failed(format!(
                "Failed to run '{}': {}",
                command, e
            ))
        }
    };

    // Dedicated reader threads keep the pipes drained so a chatty command
    // cannot block itself on a full pipe buffer.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + Duration::from_millis(SHELL_TIMEOUT_MS);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ResolvedDefault::failed(format!(
                        "Command timed out after {} ms: {}",
                        SHELL_TIMEOUT_MS, command
                    ));
                }
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => {
                return ResolvedDefault::failed(format!(
                    "Failed to wait for '{}': {}",
                    command, e
                ))
            }
        }
    };

    let stdout_text = stdout_reader.join().unwrap_or_default();
    let stderr_text = stderr_reader.join().unwrap_or_default();

    if status.success() {
        ResolvedDefault::ok(stdout_text.trim().to_string())
    } else {
        let detail = stderr_text.trim();
        if detail.is_empty() {
            ResolvedDefault::failed(format!(
                "Command failed ({}): {}",
                status, command
            ))
        } else {
            ResolvedDefault::failed(format!(
                "Command failed ({}): {}: {}",
                status, command, detail
            ))
        }
    }
}

/// Names referenced as `${NAME}` inside a static default, in order.
pub fn references(value: &str) -> Vec<String> {
    VAR_REF_RE
        .captures_iter(value)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Substitutes every `${NAME}` reference with its already-resolved value.
///
/// The available names grow strictly in document order, so a reference may
/// only point at variables resolved earlier.
///
/// # Errors
/// * `Error::UndefinedVariable` if any referenced name is absent; no partial
///   value is produced
pub fn interpolate(
    value: &str,
    resolved: &IndexMap<String, String>,
) -> Result<String> {
    let mut out = String::new();
    let mut last = 0;
    for caps in VAR_REF_RE.captures_iter(value) {
        let (whole, name) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(name)) => (whole, name.as_str()),
            _ => continue,
        };
        match resolved.get(name) {
            Some(replacement) => {
                out.push_str(&value[last..whole.start()]);
                out.push_str(replacement);
                last = whole.end();
            }
            None => return Err(Error::UndefinedVariable(name.to_string())),
        }
    }
    out.push_str(&value[last..]);
    Ok(out)
}
