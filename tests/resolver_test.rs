use envgen::charset;
use envgen::directive::DefaultValue;
use envgen::error::Error;
use envgen::resolver::{interpolate, references, resolve, run_shell};
use indexmap::IndexMap;

#[test]
fn test_static_default_is_verbatim() {
    let default = DefaultValue::Static("hello".to_string());
    let outcome = resolve(Some(&default)).unwrap();
    assert_eq!(outcome.value, "hello");
    assert_eq!(outcome.error, None);
}

#[test]
fn test_no_default_resolves_to_empty() {
    let outcome = resolve(None).unwrap();
    assert_eq!(outcome.value, "");
}

#[test]
fn test_shell_success_trims_stdout() {
    let outcome = run_shell("echo '  hello  '");
    assert_eq!(outcome.value, "hello");
    assert_eq!(outcome.error, None);
}

#[test]
fn test_shell_failure_degrades_to_empty_value() {
    let outcome = run_shell("echo oops >&2; exit 3");
    assert_eq!(outcome.value, "");
    let message = outcome.error.unwrap();
    assert!(message.contains("oops"), "{}", message);
}

#[test]
fn test_shell_missing_command_reports_error() {
    let outcome = run_shell("definitely-not-a-command-xyz");
    assert_eq!(outcome.value, "");
    assert!(outcome.error.is_some());
}

#[test]
fn test_shell_timeout_is_a_command_failure() {
    let outcome = run_shell("sleep 30");
    assert_eq!(outcome.value, "");
    assert!(outcome.error.unwrap().contains("timed out"));
}

#[test]
fn test_secret_has_requested_length_and_charset() {
    let default =
        DefaultValue::Secret { length: 48, charset: Some("hex".to_string()) };
    let outcome = resolve(Some(&default)).unwrap();
    assert_eq!(outcome.value.len(), 48);
    assert!(outcome.value.chars().all(|c| "0123456789abcdef".contains(c)));
}

#[test]
fn test_successive_secrets_differ() {
    let default = DefaultValue::Secret { length: 32, charset: None };
    let first = resolve(Some(&default)).unwrap().value;
    let second = resolve(Some(&default)).unwrap().value;
    assert_ne!(first, second);
}

#[test]
fn test_options_default_choice_wins() {
    let default = DefaultValue::Options {
        choices: vec!["a".to_string(), "b".to_string()],
        default_choice: Some("b".to_string()),
    };
    assert_eq!(resolve(Some(&default)).unwrap().value, "b");
}

#[test]
fn test_options_fall_back_to_first_choice() {
    let default = DefaultValue::Options {
        choices: vec!["a".to_string(), "b".to_string()],
        default_choice: None,
    };
    assert_eq!(resolve(Some(&default)).unwrap().value, "a");
}

#[test]
fn test_interpolation_replaces_references() {
    let mut resolved = IndexMap::new();
    resolved.insert("A".to_string(), "hello".to_string());
    assert_eq!(interpolate("${A}_world", &resolved).unwrap(), "hello_world");
}

#[test]
fn test_interpolation_multiple_references() {
    let mut resolved = IndexMap::new();
    resolved.insert("HOST".to_string(), "localhost".to_string());
    resolved.insert("PORT".to_string(), "5432".to_string());
    assert_eq!(
        interpolate("postgres://${HOST}:${PORT}/app", &resolved).unwrap(),
        "postgres://localhost:5432/app"
    );
}

#[test]
fn test_interpolation_undefined_reference_is_fatal() {
    let resolved = IndexMap::new();
    let err = interpolate("${MISSING}", &resolved).unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable(name) if name == "MISSING"));
}

#[test]
fn test_references_are_extracted_in_order() {
    assert_eq!(references("${B} and ${A}"), vec!["B", "A"]);
    assert!(references("no refs here, not even ${lower}").is_empty());
}

#[test]
fn test_charset_expansion_default_is_alnum() {
    let charset = charset::expand(None).unwrap();
    assert_eq!(charset.len(), 62);
}

#[test]
fn test_charset_expansion_deduplicates_preserving_order() {
    assert_eq!(charset::expand(Some("num+hex")).unwrap(), "0123456789abcdef");
}

#[test]
fn test_charset_unknown_preset_is_rejected() {
    assert!(matches!(
        charset::expand(Some("alnum+bogus")),
        Err(Error::UnknownCharset(name)) if name == "bogus"
    ));
}

#[test]
fn test_generate_empty_charset_yields_empty() {
    assert_eq!(charset::generate(10, ""), "");
}
