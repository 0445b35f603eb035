//! Command-line interface implementation for envgen.
//! Provides argument parsing and help text formatting using clap.

use crate::constants::DEFAULT_OUTPUT_FILE;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for envgen.
#[derive(Parser, Debug)]
#[command(author, version, about = "envgen: interactive .env file generator", long_about = None)]
pub struct Args {
    /// Paths to one or more template files.
    /// Later files override same-named variables from earlier ones.
    #[arg(value_name = "TEMPLATE", required = true)]
    pub templates: Vec<PathBuf>,

    /// Path of the .env file to write
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Accept every resolved default without prompting
    #[arg(short = 'y', long)]
    pub use_defaults: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                    .unwrap();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
