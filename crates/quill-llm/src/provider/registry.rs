use std::str::FromStr;

use indexmap::IndexMap;
use quill_config::{LlmConfig, ProviderOverride};
use serde_json::json;

use super::{ProviderProfile, Scheme};
use crate::error::LlmError;
use crate::protocol::ProtocolFamily;

/// Name of the provider whose fields are entirely user-supplied
pub const CUSTOM_PROVIDER: &str = "custom";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider profiles keyed by unique name
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    profiles: IndexMap<String, ProviderProfile>,
}

impl ProviderRegistry {
    /// Built-in presets
    pub fn builtin() -> Self {
        let openai_chat = |name: &str, host: &str, base_path: &str, model: &str| {
            ProviderProfile::new(name, ProtocolFamily::OpenAiChat)
                .host(host)
                .base_path(base_path)
                .suffix("/chat/completions")
                .model(model)
                .credential("Authorization", "Bearer ")
        };

        let presets = [
            openai_chat("openai", "api.openai.com", "/v1", "gpt-4o-mini"),
            openai_chat(
                "aliyun",
                "dashscope.aliyuncs.com",
                "/compatible-mode/v1",
                "deepseek-r1-distill-llama-70b",
            ),
            openai_chat("tencent", "api.hunyuan.cloud.tencent.com", "/v1", "hunyuan-lite")
                .body_field("enable_enhancement", json!(false)),
            openai_chat("deepseek", "api.deepseek.com", "", "deepseek-chat"),
            openai_chat("siliconflow", "api.siliconflow.cn", "/v1", "deepseek-ai/DeepSeek-V3"),
            openai_chat("volcengine", "ark.cn-beijing.volces.com", "/api/v3", "deepseek-v3-250324"),
            ProviderProfile::new("ollama", ProtocolFamily::OllamaGenerate)
                .host("localhost")
                .plain_http(11434)
                .suffix("/api/generate")
                .model("deepseek-r1:7b"),
            ProviderProfile::new("gemini", ProtocolFamily::GeminiGenerate)
                .host("generativelanguage.googleapis.com")
                .suffix("/v1beta/models/{model}:generateContent")
                .model("gemini-2.5-flash")
                .credential("x-goog-api-key", ""),
            ProviderProfile::new("anthropic", ProtocolFamily::AnthropicMessages)
                .host("api.anthropic.com")
                .suffix("/v1/messages")
                .model("claude-3-haiku-20240307")
                .header("anthropic-version", ANTHROPIC_VERSION)
                .credential("x-api-key", ""),
        ];

        let mut registry = Self {
            profiles: presets.into_iter().map(|p| (p.name.clone(), p)).collect(),
        };
        let custom = registry.user_defined(CUSTOM_PROVIDER, ProtocolFamily::OpenAiChat);
        registry.profiles.insert(custom.name.clone(), custom);
        registry
    }

    /// Built-in presets with configured overrides applied
    ///
    /// Unknown provider names become user-defined entries with the same
    /// semantics as `custom`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Resolution` if an override names an unknown protocol
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut registry = Self::builtin();

        for (name, settings) in &config.providers {
            let mut profile = if name == CUSTOM_PROVIDER || !registry.profiles.contains_key(name) {
                let family = match settings.protocol.as_deref() {
                    Some(protocol) => parse_family(name, protocol)?,
                    None => ProtocolFamily::OpenAiChat,
                };
                registry.user_defined(name, family)
            } else {
                registry.profiles[name].clone()
            };

            apply_override(&mut profile, settings);
            registry.profiles.insert(name.clone(), profile);
        }

        Ok(registry)
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&ProviderProfile> {
        self.profiles.get(name)
    }

    /// Registered provider names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Profile whose default host equals `host`
    pub fn find_by_host(&self, host: &str) -> Option<&ProviderProfile> {
        self.profiles
            .values()
            .find(|p| p.default_host.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(host)))
    }

    /// Profile speaking `family`
    ///
    /// `preferred` wins when it speaks the family; otherwise the family's
    /// canonical preset is used.
    pub fn find_by_family<'a>(
        &'a self,
        family: ProtocolFamily,
        preferred: &'a ProviderProfile,
    ) -> Option<&'a ProviderProfile> {
        if preferred.family == family {
            return Some(preferred);
        }
        self.get(canonical_name(family)).filter(|p| p.family == family)
    }

    /// Profile carrying only the family's wire conventions
    fn user_defined(&self, name: &str, family: ProtocolFamily) -> ProviderProfile {
        let mut profile = self
            .get(canonical_name(family))
            .filter(|p| p.family == family)
            .cloned()
            .unwrap_or_else(|| ProviderProfile::new(name, family));

        name.clone_into(&mut profile.name);
        profile.default_host = None;
        profile.default_port = None;
        profile.default_base_path.clear();
        profile.default_model = None;
        profile.extra_body.clear();
        if family != ProtocolFamily::OllamaGenerate {
            profile.default_scheme = Scheme::Https;
        }
        profile
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Preset that represents a family when matching by protocol
const fn canonical_name(family: ProtocolFamily) -> &'static str {
    match family {
        ProtocolFamily::OpenAiChat => "openai",
        ProtocolFamily::OllamaGenerate => "ollama",
        ProtocolFamily::GeminiGenerate => "gemini",
        ProtocolFamily::AnthropicMessages => "anthropic",
    }
}

/// Parse a configured protocol name
pub(crate) fn parse_family(provider: &str, protocol: &str) -> Result<ProtocolFamily, LlmError> {
    ProtocolFamily::from_str(protocol.trim())
        .map_err(|_| LlmError::Resolution(format!("unknown protocol '{protocol}' for provider '{provider}'")))
}

/// Layer header settings from configuration over a profile
fn apply_override(profile: &mut ProviderProfile, settings: &ProviderOverride) {
    for (name, value) in &settings.headers {
        profile.headers.insert(name.clone(), value.clone());
    }

    if let Some(header) = &settings.credential_header {
        profile.credential_header = Some(header.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> LlmConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn builtin_covers_every_named_vendor() {
        let registry = ProviderRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        for expected in [
            "openai",
            "aliyun",
            "tencent",
            "deepseek",
            "siliconflow",
            "volcengine",
            "ollama",
            "gemini",
            "anthropic",
            "custom",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn ollama_is_local_and_unauthenticated() {
        let registry = ProviderRegistry::builtin();
        let ollama = registry.get("ollama").unwrap();
        assert_eq!(ollama.default_scheme, Scheme::Http);
        assert_eq!(ollama.default_port, Some(11434));
        assert!(ollama.credential_header.is_none());
    }

    #[test]
    fn tencent_adds_enhancement_toggle() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.get("tencent").unwrap().extra_body["enable_enhancement"], json!(false));
        assert!(registry.get("deepseek").unwrap().extra_body.is_empty());
    }

    #[test]
    fn find_by_host_ignores_case() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.find_by_host("API.DeepSeek.com").unwrap().name, "deepseek");
        assert!(registry.find_by_host("example.com").is_none());
    }

    #[test]
    fn find_by_family_prefers_selected_provider() {
        let registry = ProviderRegistry::builtin();
        let deepseek = registry.get("deepseek").unwrap();

        let same = registry.find_by_family(ProtocolFamily::OpenAiChat, deepseek).unwrap();
        assert_eq!(same.name, "deepseek");

        let other = registry.find_by_family(ProtocolFamily::OllamaGenerate, deepseek).unwrap();
        assert_eq!(other.name, "ollama");
    }

    #[test]
    fn custom_inherits_family_conventions_without_addressing() {
        let registry = ProviderRegistry::from_config(&config(
            r#"
            [providers.custom]
            url = "https://llm.internal/v1"
            protocol = "anthropic"
            "#,
        ))
        .unwrap();

        let custom = registry.get("custom").unwrap();
        assert_eq!(custom.family, ProtocolFamily::AnthropicMessages);
        assert_eq!(custom.default_host, None);
        assert_eq!(custom.default_model, None);
        assert_eq!(custom.path_suffix, "/v1/messages");
        assert_eq!(custom.credential_header.as_deref(), Some("x-api-key"));
    }

    #[test]
    fn overrides_add_headers_to_presets() {
        let registry = ProviderRegistry::from_config(&config(
            r#"
            [providers.openai]
            headers = { "OpenAI-Organization" = "org-1" }
            "#,
        ))
        .unwrap();

        let openai = registry.get("openai").unwrap();
        assert_eq!(openai.headers["OpenAI-Organization"], "org-1");
        assert_eq!(openai.headers["Authorization"], "Bearer ");
        assert_eq!(openai.default_host.as_deref(), Some("api.openai.com"));
    }

    #[test]
    fn unknown_names_become_user_defined() {
        let registry = ProviderRegistry::from_config(&config(
            r#"
            [providers.lab]
            url = "http://gpu-box:11434"
            protocol = "ollama"
            "#,
        ))
        .unwrap();

        let lab = registry.get("lab").unwrap();
        assert_eq!(lab.family, ProtocolFamily::OllamaGenerate);
        assert_eq!(lab.default_scheme, Scheme::Http);
        assert_eq!(lab.path_suffix, "/api/generate");
    }

    #[test]
    fn unknown_protocol_is_a_resolution_error() {
        let err = ProviderRegistry::from_config(&config(
            r#"
            [providers.custom]
            protocol = "soap"
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, LlmError::Resolution(msg) if msg.contains("soap")));
    }
}
