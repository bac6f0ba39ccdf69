//! Provider profiles and the preset registry

mod registry;

use indexmap::IndexMap;

pub(crate) use registry::parse_family;
pub use registry::{CUSTOM_PROVIDER, ProviderRegistry};

use crate::protocol::ProtocolFamily;

/// URL scheme understood by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    /// Port used when none is given
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

/// Addressing, header and body conventions of one named provider
///
/// Profiles are immutable once the registry is built.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Unique registry name
    pub name: String,
    /// Wire contract
    pub family: ProtocolFamily,
    /// Host used when the endpoint names none
    pub default_host: Option<String>,
    /// Scheme used when the endpoint names none
    pub default_scheme: Scheme,
    /// Port used with `default_host` when the endpoint names none
    pub default_port: Option<u16>,
    /// Path prefix used with `default_host` when the endpoint names none
    pub default_base_path: String,
    /// Required path suffix; `{model}` is replaced by the request model
    pub path_suffix: String,
    /// Model used when neither caller nor config names one
    pub default_model: Option<String>,
    /// Header name to template value, always including `Content-Type`
    pub headers: IndexMap<String, String>,
    /// Header whose template value is prefixed to the credential
    pub credential_header: Option<String>,
    /// Fixed top-level body fields layered over the family shape
    pub extra_body: serde_json::Map<String, serde_json::Value>,
}

impl ProviderProfile {
    /// Profile with family defaults and no addressing
    pub(crate) fn new(name: &str, family: ProtocolFamily) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());

        Self {
            name: name.to_owned(),
            family,
            default_host: None,
            default_scheme: Scheme::Https,
            default_port: None,
            default_base_path: String::new(),
            path_suffix: String::new(),
            default_model: None,
            headers,
            credential_header: None,
            extra_body: serde_json::Map::new(),
        }
    }

    /// Path suffix with the model substituted
    pub fn suffix_for(&self, model: &str) -> String {
        self.path_suffix.replace("{model}", model)
    }

    pub(crate) fn host(mut self, host: &str) -> Self {
        self.default_host = Some(host.to_owned());
        self
    }

    pub(crate) fn base_path(mut self, path: &str) -> Self {
        path.clone_into(&mut self.default_base_path);
        self
    }

    pub(crate) fn suffix(mut self, suffix: &str) -> Self {
        suffix.clone_into(&mut self.path_suffix);
        self
    }

    pub(crate) fn model(mut self, model: &str) -> Self {
        self.default_model = Some(model.to_owned());
        self
    }

    pub(crate) fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    pub(crate) fn credential(mut self, header: &str, prefix: &str) -> Self {
        self.headers.insert(header.to_owned(), prefix.to_owned());
        self.credential_header = Some(header.to_owned());
        self
    }

    pub(crate) fn plain_http(mut self, port: u16) -> Self {
        self.default_scheme = Scheme::Http;
        self.default_port = Some(port);
        self
    }

    pub(crate) fn body_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extra_body.insert(key.to_owned(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_placeholder_is_substituted() {
        let profile = ProviderProfile::new("gemini", ProtocolFamily::GeminiGenerate)
            .suffix("/v1beta/models/{model}:generateContent");
        assert_eq!(
            profile.suffix_for("gemini-2.5-pro"),
            "/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn credential_header_keeps_template_prefix() {
        let profile = ProviderProfile::new("openai", ProtocolFamily::OpenAiChat).credential("Authorization", "Bearer ");
        assert_eq!(profile.headers["Authorization"], "Bearer ");
        assert_eq!(profile.credential_header.as_deref(), Some("Authorization"));
        assert_eq!(profile.headers["Content-Type"], "application/json");
    }
}
