use serde::Deserialize;

/// Built-in system instruction
pub const DEFAULT_SYSTEM: &str = "You are an assistant that writes Git commit messages following Conventional Commits 1.0.0. \
Use this structure: <type>[optional scope][!]: <description>. Types must be one of: feat, fix, docs, style, refactor, \
perf, test, build, ci, chore, revert. Keep the subject concise and imperative. Use lowercase type and scope. \
Add body and footer only when needed by the changes.";

/// Built-in user prompt template; `${files}` and `${diff}` are substituted
pub const DEFAULT_TEMPLATE: &str = "Generate a commit message from the following changes using the Conventional \
Commits 1.0.0 specification.\nFiles:\n${files}\nDiff:\n${diff}";

/// Prompt text configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// System instruction override
    #[serde(default)]
    pub system: Option<String>,
    /// User prompt template override
    #[serde(default)]
    pub template: Option<String>,
}

impl PromptConfig {
    /// Effective system instruction
    pub fn system(&self) -> &str {
        self.system.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SYSTEM)
    }

    /// Effective user prompt template
    pub fn template(&self) -> &str {
        self.template.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_TEMPLATE)
    }
}
