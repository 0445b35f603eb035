//! Envgen generates populated `.env` files from annotated `.env.template`
//! documents. Templates declare variables with default values (static text,
//! shell commands, generated secrets, choice lists) and bracketed directives
//! controlling validation, conditional visibility, and input transforms.

/// Named character-set presets and secret generation
pub mod charset;

/// Command-line interface module for the envgen application
pub mod cli;

/// Common constants used throughout the application
pub mod constants;

/// Directive and default-value parsing
/// Handles the bracketed `<...>` mini-grammar embedded in value positions
pub mod directive;

/// Error types and handling for the envgen application
pub mod error;

/// Multi-template merging
/// Later templates override same-named variables in place and contribute
/// new ones under per-file section headers
pub mod merge;

/// Per-variable resolution orchestration
/// Combines the resolver, prompting, validation and transforms in document
/// order
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Default-value resolution
/// Shell execution, secret generation, option defaults and `${VAR}`
/// interpolation
pub mod resolver;

/// Template parsing into the block AST
pub mod template;

/// Ordered text transforms applied to user-entered values
pub mod transform;

/// Semantic validation of parsed templates
pub mod validator;

/// Output regeneration and `.env` escaping rules
pub mod writer;
