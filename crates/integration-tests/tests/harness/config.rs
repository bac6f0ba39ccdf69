//! Configuration helpers pointing quill at a mock vendor

use std::sync::Arc;

use quill_config::Config;
use quill_llm::{CompletionAdapter, HttpTransport};

/// Configuration selecting a `custom` provider at `url`
pub fn custom_provider(url: &str, protocol: &str, model: &str) -> Config {
    Config::parse(&format!(
        r#"
        [llm]
        provider = "custom"

        [llm.providers.custom]
        url = "{url}"
        protocol = "{protocol}"
        model = "{model}"
        api_key = "sk-integration"
        "#
    ))
    .expect("test config must parse")
}

/// Adapter over the real HTTP transport
pub fn http_adapter(config: &Config) -> CompletionAdapter {
    let transport = HttpTransport::new().expect("HTTP client must build");
    CompletionAdapter::from_config(config, Arc::new(transport)).expect("adapter must build")
}
