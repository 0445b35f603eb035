//! User input and interaction handling.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};
use std::io::ErrorKind;

/// Per-value check run against text input before it is accepted.
pub type ValueCheck<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Trait abstracting the interactive prompt backend so the resolution loop
/// can be driven by a scripted implementation in tests.
pub trait Prompter {
    /// Free-text input with a pre-filled default and a validity check.
    fn input(&self, prompt: &str, default: &str, check: ValueCheck) -> Result<String>;

    /// Yes/no confirmation.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Single-choice selection; returns the chosen index.
    fn select(&self, prompt: &str, choices: &[String], default: usize) -> Result<usize>;
}

fn map_prompt_err(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => {
            Error::Cancelled
        }
        other => Error::PromptError(other.to_string()),
    }
}

/// Production prompter backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: &str, check: ValueCheck) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|text: &String| check(text));
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(map_prompt_err)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(map_prompt_err)
    }

    fn select(&self, prompt: &str, choices: &[String], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(choices)
            .default(default)
            .interact()
            .map_err(map_prompt_err)
    }
}
