use std::sync::OnceLock;

use quill_config::PromptConfig;
use regex::{Captures, Regex};

/// System instruction and user template for commit-message prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// System instruction sent alongside every prompt
    pub system: String,
    /// User prompt with `${files}` and `${diff}` placeholders
    pub template: String,
}

impl From<&PromptConfig> for PromptTemplate {
    fn from(config: &PromptConfig) -> Self {
        Self {
            system: config.system().to_owned(),
            template: config.template().to_owned(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::from(&PromptConfig::default())
    }
}

impl PromptTemplate {
    /// Substitute every placeholder in one pass
    ///
    /// Placeholder text inside the substituted diff is left untouched.
    pub fn render<S: AsRef<str>>(&self, files: &[S], diff: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let placeholder = PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{(files|diff)\}").expect("must be valid regex"));

        let files = files.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        placeholder
            .replace_all(&self.template, |caps: &Captures<'_>| match &caps[1] {
                "files" => files.clone(),
                _ => diff.to_owned(),
            })
            .into_owned()
    }
}
