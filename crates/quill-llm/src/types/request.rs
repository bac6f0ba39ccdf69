use quill_config::LlmConfig;

/// Parameters controlling text generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl From<&LlmConfig> for SamplingParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

/// Vendor-neutral completion request, built once per invocation
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    /// Model identifier
    pub model: String,
    /// System instruction
    pub system_text: String,
    /// User prompt
    pub user_text: String,
    /// Sampling parameters
    pub sampling: SamplingParams,
    /// Ask the vendor to stream
    pub streaming: bool,
}
