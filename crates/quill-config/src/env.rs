use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Failure while expanding placeholders in the raw config text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder names an unset variable and carries no default
    #[error("environment variable not found: `{0}` (line {1})")]
    MissingVar(String, usize),

    /// Placeholder is not scoped with `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}` (line {1})")]
    UnsupportedScope(String, usize),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// Commented lines pass through untouched so that disabled settings never
/// require their variables to be present.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for (index, line) in input.split_inclusive('\n').enumerate() {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut failure = None;
        let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
            match lookup(caps, index + 1) {
                Ok(value) => value,
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }
        output.push_str(&expanded);
    }

    Ok(output)
}

/// Resolve one placeholder capture to its replacement text
fn lookup(caps: &Captures<'_>, line: usize) -> Result<String, ExpandError> {
    let key = &caps[1];
    let Some(var) = key.strip_prefix("env.").filter(|v| !v.is_empty() && !v.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned(), line));
    };

    match std::env::var(var) {
        Ok(value) => Ok(value),
        Err(_) => caps
            .get(2)
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| ExpandError::MissingVar(var.to_owned(), line)),
    }
}
