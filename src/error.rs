//! Error handling for the envgen application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for envgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents malformed template syntax: directives, regex literals,
    /// secret specs, duplicate variable names
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Represents the batch of semantic validation failures; all violations
    /// are collected before aborting
    #[error("Template validation failed:\n{0}")]
    ValidationError(String),

    /// Represents one or more missing input template files
    #[error("Template file(s) not found:\n{0}")]
    TemplateNotFound(String),

    /// An interpolation reference that survived validation but cannot be
    /// satisfied at resolution time
    #[error("Undefined variable: {0}.")]
    UndefinedVariable(String),

    /// An unknown character-set preset in a secret spec
    #[error("Unknown charset preset: {0}.")]
    UnknownCharset(String),

    /// Represents errors raised by the interactive prompt backend
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// The user aborted an interactive prompt; treated as a clean exit,
    /// never printed as an error
    #[error("Cancelled.")]
    Cancelled,
}

/// Convenience type alias for Results with envgen's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1.
/// Cancellation exits quietly: no output has been written at that point.
pub fn default_error_handler(err: Error) {
    match err {
        Error::Cancelled => {
            eprintln!("Aborted. No file was written.");
        }
        err => eprintln!("{}", err),
    }
    std::process::exit(1);
}
