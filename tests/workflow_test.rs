//! File-level flows: template files on disk, merged, resolved with defaults,
//! written out and read back.

use envgen::error::Result;
use envgen::merge::{merge, TemplateInput};
use envgen::processor::Processor;
use envgen::prompt::{Prompter, ValueCheck};
use envgen::template::parse;
use envgen::validator::validate;
use envgen::writer::{parse_env_content, render};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Accepts every offered default, like running with --use-defaults.
struct AcceptingPrompter;

impl Prompter for AcceptingPrompter {
    fn input(&self, _prompt: &str, default: &str, check: ValueCheck) -> Result<String> {
        check(default).map_err(envgen::error::Error::PromptError)?;
        Ok(default.to_string())
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _prompt: &str, _choices: &[String], default: usize) -> Result<usize> {
        Ok(default)
    }
}

fn load(path: &Path) -> TemplateInput {
    let content = fs::read_to_string(path).unwrap();
    TemplateInput {
        template: parse(&content).unwrap(),
        filename: path.file_name().unwrap().to_string_lossy().into_owned(),
    }
}

#[test_log::test]
fn test_merge_resolve_and_write_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.env.template");
    let override_path = dir.path().join("override.env.template");
    let output_path = dir.path().join(".env");

    fs::write(
        &base_path,
        "# --- Server --- #\n\n# Port to listen on\nPORT=3000\nHOST=localhost\n",
    )
    .unwrap();
    fs::write(&override_path, "PORT=8080\nAPP_NAME=demo\n").unwrap();

    let merged = merge(vec![load(&base_path), load(&override_path)]);
    assert!(validate(&merged).is_empty());

    let prompter = AcceptingPrompter;
    let processor = Processor::new(&prompter, true);
    let values = processor.resolve_all(&merged, &IndexMap::new()).unwrap();

    fs::write(&output_path, render(&merged, &values, &[])).unwrap();

    let written = parse_env_content(&fs::read_to_string(&output_path).unwrap());
    assert_eq!(written.get("PORT").unwrap(), "8080");
    assert_eq!(written.get("HOST").unwrap(), "localhost");
    assert_eq!(written.get("APP_NAME").unwrap(), "demo");
}

#[test_log::test]
fn test_previous_output_values_are_offered_and_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("app.env.template");
    let output_path = dir.path().join(".env");

    fs::write(&template_path, "PORT=3000\n").unwrap();
    fs::write(&output_path, "PORT=9999\nOLD_KEY=still here\n").unwrap();

    let parsed = parse(&fs::read_to_string(&template_path).unwrap()).unwrap();
    let existing = parse_env_content(&fs::read_to_string(&output_path).unwrap());

    let prompter = AcceptingPrompter;
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&parsed, &existing).unwrap();
    assert_eq!(values.get("PORT").unwrap(), "9999");

    let extras: Vec<(String, String)> = existing
        .iter()
        .filter(|(name, _)| !values.contains_key(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    fs::write(&output_path, render(&parsed, &values, &extras)).unwrap();

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.contains("PORT=9999"));
    assert!(content.contains("# --- Preserved from previous output --- #"));
    assert!(content.contains("OLD_KEY=\"still here\""));
}
