//! Per-variable resolution orchestration.
//!
//! Walks the merged template's variables strictly in document order, since
//! `if:` conditions and `${VAR}` interpolation may only reference variables
//! resolved earlier. The growing resolved map is append-only; entries are
//! never rewritten once inserted.

use crate::directive::{DefaultValue, DirectiveType};
use crate::error::Result;
use crate::prompt::Prompter;
use crate::resolver;
use crate::template::{EnvVariable, ParsedTemplate};
use crate::transform;
use crate::validator;
use indexmap::IndexMap;
use log::{debug, warn};

/// A string counts as false when empty or one of the usual negatives.
pub fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "false" | "no" | "n" | "0" | "off"
    )
}

/// Drives prompting and default resolution for every variable of a template.
pub struct Processor<'a> {
    prompter: &'a dyn Prompter,
    use_defaults: bool,
}

impl<'a> Processor<'a> {
    pub fn new(prompter: &'a dyn Prompter, use_defaults: bool) -> Self {
        Self { prompter, use_defaults }
    }

    /// Resolves every variable in document order and returns the final
    /// name to value map used for regeneration.
    ///
    /// `existing` holds values read from a previous output file; when
    /// present they take priority as the offered default.
    pub fn resolve_all(
        &self,
        template: &ParsedTemplate,
        existing: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let mut resolved: IndexMap<String, String> = IndexMap::new();

        for variable in template.variables() {
            if let Some(condition) = &variable.condition {
                let active = resolved
                    .get(&condition.variable)
                    .map(|value| is_truthy(value))
                    .unwrap_or(false);
                if !active {
                    debug!(
                        "Skipping {}: condition {} is false",
                        variable.name, condition.variable
                    );
                    resolved.insert(variable.name.clone(), String::new());
                    continue;
                }
            }

            let default = self.resolve_default(variable, &resolved)?;
            let offered =
                existing.get(&variable.name).cloned().unwrap_or(default);
            let value = self.obtain(variable, offered)?;
            resolved.insert(variable.name.clone(), value);
        }

        Ok(resolved)
    }

    fn resolve_default(
        &self,
        variable: &EnvVariable,
        resolved: &IndexMap<String, String>,
    ) -> Result<String> {
        match &variable.default {
            // An undefined reference here is fatal: validation is supposed
            // to have caught it already.
            Some(DefaultValue::Static(text)) => {
                resolver::interpolate(text, resolved)
            }
            Some(other) => {
                let outcome = resolver::resolve(Some(other))?;
                if let Some(message) = outcome.error {
                    warn!("{}: {}", variable.name, message);
                }
                Ok(outcome.value)
            }
            None => Ok(String::new()),
        }
    }

    fn obtain(&self, variable: &EnvVariable, offered: String) -> Result<String> {
        if self.use_defaults {
            return Ok(offered);
        }

        let label = variable
            .description
            .clone()
            .unwrap_or_else(|| variable.name.clone());

        if variable.directives.contains(&DirectiveType::Boolean) {
            let answer = self.prompter.confirm(&label, is_truthy(&offered))?;
            return Ok(if answer { "true" } else { "false" }.to_string());
        }

        if let Some(DefaultValue::Options { choices, .. }) = &variable.default {
            if !choices.is_empty() {
                let default_index =
                    choices.iter().position(|c| *c == offered).unwrap_or(0);
                let selected =
                    self.prompter.select(&label, choices, default_index)?;
                return Ok(choices.get(selected).cloned().unwrap_or_default());
            }
        }

        let check = |value: &str| validator::check_value(variable, value);
        let entered = self.prompter.input(&label, &offered, &check)?;

        // Transforms apply to user-entered text only, never to an accepted
        // default.
        if entered != offered && !variable.transforms.is_empty() {
            return Ok(transform::apply(&entered, &variable.transforms));
        }
        Ok(entered)
    }
}
