use envgen::error::{Error, Result};
use envgen::processor::{is_truthy, Processor};
use envgen::prompt::{Prompter, ValueCheck};
use envgen::template::parse;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Scripted prompter: pops pre-recorded answers, falling back to the
/// offered default when the script runs dry.
#[derive(Default)]
struct ScriptedPrompter {
    inputs: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    selects: RefCell<VecDeque<usize>>,
}

impl ScriptedPrompter {
    fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: RefCell::new(
                inputs.iter().map(|s| s.to_string()).collect(),
            ),
            ..Default::default()
        }
    }

    fn with_confirms(confirms: &[bool]) -> Self {
        Self {
            confirms: RefCell::new(confirms.iter().copied().collect()),
            ..Default::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, _prompt: &str, default: &str, check: ValueCheck) -> Result<String> {
        let value = self
            .inputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| default.to_string());
        check(&value).map_err(Error::PromptError)?;
        Ok(value)
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(default))
    }

    fn select(&self, _prompt: &str, _choices: &[String], default: usize) -> Result<usize> {
        Ok(self.selects.borrow_mut().pop_front().unwrap_or(default))
    }
}

fn no_existing() -> IndexMap<String, String> {
    IndexMap::new()
}

#[test]
fn test_is_truthy() {
    assert!(is_truthy("true"));
    assert!(is_truthy("anything"));
    assert!(!is_truthy(""));
    assert!(!is_truthy("False"));
    assert!(!is_truthy("no"));
    assert!(!is_truthy("0"));
    assert!(!is_truthy("off"));
}

#[test]
fn test_defaults_mode_resolves_without_prompting() {
    let template = parse("A=hello\nB=${A}_world\n").unwrap();
    let prompter = ScriptedPrompter::default();
    let processor = Processor::new(&prompter, true);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("A").unwrap(), "hello");
    assert_eq!(values.get("B").unwrap(), "hello_world");
}

#[test]
fn test_interpolation_sees_entered_values() {
    let template = parse("NAME=app\nSLUG=${NAME}-prod\n").unwrap();
    let prompter = ScriptedPrompter::with_inputs(&["myservice"]);
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("NAME").unwrap(), "myservice");
    assert_eq!(values.get("SLUG").unwrap(), "myservice-prod");
}

#[test]
fn test_false_condition_skips_prompting() {
    let template = parse("FLAG=<boolean>\nTOKEN=<if:FLAG>\n").unwrap();
    let prompter = ScriptedPrompter::with_confirms(&[false]);
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("FLAG").unwrap(), "false");
    assert_eq!(values.get("TOKEN").unwrap(), "");
}

#[test]
fn test_true_condition_prompts_normally() {
    let template = parse("FLAG=<boolean>\nTOKEN=<if:FLAG>\n").unwrap();
    let prompter = ScriptedPrompter {
        confirms: RefCell::new([true].into_iter().collect()),
        inputs: RefCell::new(
            ["sekrit".to_string()].into_iter().collect(),
        ),
        ..Default::default()
    };
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("FLAG").unwrap(), "true");
    assert_eq!(values.get("TOKEN").unwrap(), "sekrit");
}

#[test]
fn test_options_prompt_as_selection() {
    let template = parse("ENV=<dev|staging|*production>\n").unwrap();
    let prompter = ScriptedPrompter {
        selects: RefCell::new([1].into_iter().collect()),
        ..Default::default()
    };
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("ENV").unwrap(), "staging");
}

#[test]
fn test_transforms_apply_to_entered_text_only() {
    let template =
        parse("APP=<lowercase,replace:/[^a-z0-9]+/-/g,trim:->\n").unwrap();
    let prompter = ScriptedPrompter::with_inputs(&["  My App!  "]);
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("APP").unwrap(), "my-app");
}

#[test]
fn test_accepted_default_is_not_transformed() {
    let template = parse("NAME=<lowercase>\n").unwrap();
    let existing: IndexMap<String, String> =
        [("NAME".to_string(), "Kept As Is".to_string())].into_iter().collect();
    let prompter = ScriptedPrompter::default();
    let processor = Processor::new(&prompter, false);
    let values = processor.resolve_all(&template, &existing).unwrap();
    assert_eq!(values.get("NAME").unwrap(), "Kept As Is");
}

#[test]
fn test_existing_value_becomes_offered_default() {
    let template = parse("PORT=3000\n").unwrap();
    let existing: IndexMap<String, String> =
        [("PORT".to_string(), "8080".to_string())].into_iter().collect();
    let prompter = ScriptedPrompter::default();
    let processor = Processor::new(&prompter, true);
    let values = processor.resolve_all(&template, &existing).unwrap();
    assert_eq!(values.get("PORT").unwrap(), "8080");
}

#[test]
fn test_invalid_scripted_input_is_rejected() {
    let template = parse("PORT=<port>\n").unwrap();
    let prompter = ScriptedPrompter::with_inputs(&["not-a-port"]);
    let processor = Processor::new(&prompter, false);
    assert!(processor.resolve_all(&template, &no_existing()).is_err());
}

#[test]
fn test_shell_failure_degrades_to_empty_default() {
    let template = parse("SHA=`exit 7`\n").unwrap();
    let prompter = ScriptedPrompter::default();
    let processor = Processor::new(&prompter, true);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("SHA").unwrap(), "");
}

#[test]
fn test_secret_default_is_offered_with_requested_length() {
    let template = parse("TOKEN=<secret:24>\n").unwrap();
    let prompter = ScriptedPrompter::default();
    let processor = Processor::new(&prompter, true);
    let values = processor.resolve_all(&template, &no_existing()).unwrap();
    assert_eq!(values.get("TOKEN").unwrap().len(), 24);
}
