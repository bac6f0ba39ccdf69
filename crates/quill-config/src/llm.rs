use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level LLM configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Name of the active provider
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-provider overrides keyed by provider name
    #[serde(default)]
    pub providers: IndexMap<String, ProviderOverride>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            providers: IndexMap::new(),
        }
    }
}

impl LlmConfig {
    /// Override block for the active provider, if any
    pub fn active_override(&self) -> Option<&ProviderOverride> {
        self.providers.get(&self.provider)
    }
}

/// User-supplied settings layered over a provider preset
///
/// For the `custom` provider these fields are the entire definition.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderOverride {
    /// Endpoint URL; host, port and path are all honoured
    #[serde(default)]
    pub url: Option<String>,
    /// Model identifier
    #[serde(default)]
    pub model: Option<String>,
    /// Protocol family (`openai`, `ollama`, `gemini`, `anthropic`)
    #[serde(default)]
    pub protocol: Option<String>,
    /// Credential sent in the provider's credential header
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Extra headers merged into the preset header template
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Header that receives the credential
    #[serde(default)]
    pub credential_header: Option<String>,
}

fn default_provider() -> String {
    "aliyun".to_owned()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_top_p() -> f64 {
    1.0
}

const fn default_max_tokens() -> u32 {
    2048
}
