use std::path::Path;

use crate::{Config, KNOWN_PROTOCOLS};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load the file when it exists, otherwise fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file fails to load
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending key
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_sampling()?;
        self.validate_providers()?;
        Ok(())
    }

    /// Ensure sampling parameters are within the ranges vendors accept
    fn validate_sampling(&self) -> anyhow::Result<()> {
        let llm = &self.llm;

        if !(0.0..=2.0).contains(&llm.temperature) {
            anyhow::bail!("llm.temperature must be between 0 and 2, got {}", llm.temperature);
        }

        if llm.top_p <= 0.0 || llm.top_p > 1.0 {
            anyhow::bail!("llm.top_p must be in (0, 1], got {}", llm.top_p);
        }

        if llm.max_tokens == 0 {
            anyhow::bail!("llm.max_tokens must be greater than 0");
        }

        Ok(())
    }

    /// Validate provider override blocks
    fn validate_providers(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.llm.providers {
            if let Some(protocol) = &provider.protocol
                && !KNOWN_PROTOCOLS.contains(&protocol.as_str())
            {
                anyhow::bail!(
                    "llm.providers.{name}.protocol: unknown protocol '{protocol}' (expected one of {})",
                    KNOWN_PROTOCOLS.join(", ")
                );
            }
        }

        if self.llm.provider == "custom"
            && self
                .llm
                .active_override()
                .and_then(|p| p.url.as_deref())
                .is_none_or(str::is_empty)
        {
            anyhow::bail!("llm.providers.custom.url is required when the custom provider is active");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::LogFormat;

    #[test]
    fn full_config_round_trips_through_loader() {
        let toml = r#"
            [llm]
            provider = "deepseek"
            temperature = 0.2
            max_tokens = 512

            [llm.providers.deepseek]
            api_key = "sk-deepseek"

            [prompt]
            system = "Be brief."

            [telemetry]
            filter = "quill_llm=debug"
            format = "json"
        "#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.llm.provider, "deepseek");
        assert_eq!(config.llm.max_tokens, 512);
        assert_eq!(
            config.llm.active_override().unwrap().api_key.as_ref().unwrap().expose_secret(),
            "sk-deepseek"
        );
        assert_eq!(config.prompt.system(), "Be brief.");
        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.filter, "quill_llm=debug");
        assert_eq!(telemetry.format, LogFormat::Json);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.llm.provider, "aliyun");
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn env_placeholders_are_expanded_before_parsing() {
        temp_env::with_var("QUILL_LOADER_KEY", Some("sk-env"), || {
            let config = Config::parse(
                r#"
                [llm.providers.openai]
                api_key = "{{ env.QUILL_LOADER_KEY }}"
                "#,
            )
            .unwrap();
            assert_eq!(config.llm.providers["openai"].api_key.as_ref().unwrap().expose_secret(), "sk-env");
        });
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let err = Config::parse("[llm]\ntemperature = 3.5").unwrap_err();
        assert!(err.to_string().contains("llm.temperature"));
    }

    #[test]
    fn rejects_zero_top_p() {
        let err = Config::parse("[llm]\ntop_p = 0.0").unwrap_err();
        assert!(err.to_string().contains("llm.top_p"));
    }

    #[test]
    fn rejects_unknown_protocol() {
        let err = Config::parse("[llm.providers.custom]\nprotocol = \"grpc\"\nurl = \"http://x\"").unwrap_err();
        assert!(err.to_string().contains("unknown protocol 'grpc'"));
    }

    #[test]
    fn active_custom_provider_requires_url() {
        let err = Config::parse("[llm]\nprovider = \"custom\"\n[llm.providers.custom]\nmodel = \"m\"").unwrap_err();
        assert!(err.to_string().contains("llm.providers.custom.url"));

        let ok = Config::parse(
            "[llm]\nprovider = \"custom\"\n[llm.providers.custom]\nurl = \"http://127.0.0.1:8000\"\nprotocol = \"ollama\"",
        );
        assert!(ok.is_ok());
    }
}
