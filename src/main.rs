//! envgen's main application entry point and orchestration logic.
//! Handles command-line argument parsing, template processing flow,
//! and coordinates interactions between different modules.

use envgen::{
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    merge::{merge, TemplateInput},
    processor::Processor,
    prompt::DialoguerPrompter,
    template, validator, writer,
};
use indexmap::IndexMap;
use std::fs;

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Verifies every template path exists, reporting all missing ones
/// 2. Parses each file into its block AST
/// 3. Merges the templates (later files override earlier ones)
/// 4. Validates the merged template, reporting all violations together
/// 5. Reads a previous output file, when present, as offered defaults
/// 6. Resolves every variable in document order
/// 7. Regenerates the document and writes the output file
fn run(args: Args) -> Result<()> {
    let missing: Vec<String> = args
        .templates
        .iter()
        .filter(|path| !path.exists())
        .map(|path| path.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::TemplateNotFound(missing.join("\n")));
    }

    let mut inputs = Vec::new();
    for path in &args.templates {
        let content = fs::read_to_string(path).map_err(Error::IoError)?;
        let parsed = template::parse(&content)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        inputs.push(TemplateInput { template: parsed, filename });
    }
    let merged = merge(inputs);

    let errors = validator::validate(&merged);
    if !errors.is_empty() {
        return Err(Error::ValidationError(errors.join("\n")));
    }

    let existing = if args.output.exists() {
        let content = fs::read_to_string(&args.output).map_err(Error::IoError)?;
        writer::parse_env_content(&content)
    } else {
        IndexMap::new()
    };

    let prompter = DialoguerPrompter::new();
    let processor = Processor::new(&prompter, args.use_defaults);
    let values = processor.resolve_all(&merged, &existing)?;

    // Values present in the previous output but gone from the template are
    // kept under a marked section rather than silently dropped.
    let extras: Vec<(String, String)> = existing
        .iter()
        .filter(|(name, _)| !values.contains_key(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let content = writer::render(&merged, &values, &extras);
    fs::write(&args.output, content).map_err(Error::IoError)?;

    println!(
        "Wrote {} variable(s) to {}.",
        values.len(),
        args.output.display()
    );
    Ok(())
}
