//! Common constants used throughout the envgen application.

/// Wall-clock limit for shell-derived default values, in milliseconds
pub const SHELL_TIMEOUT_MS: u64 = 5000;

/// Output file written when no `--output` override is given
pub const DEFAULT_OUTPUT_FILE: &str = ".env";

/// Charset spec assumed when a secret directive names none
pub const DEFAULT_CHARSET: &str = "alnum";

/// Header of the section appended for values carried over from a previous
/// output file but absent from the template
pub const PRESERVED_SECTION: &str = "Preserved from previous output";
