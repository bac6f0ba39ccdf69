use std::path::PathBuf;

use clap::Parser;

/// Quill commit message generator
#[derive(Debug, Parser)]
#[command(name = "quill", about = "Generate Conventional Commits messages from a diff with an LLM")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "quill.toml", env = "QUILL_CONFIG")]
    pub config: PathBuf,

    /// Provider name (e.g. deepseek, ollama, custom)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Endpoint URL, overriding the provider preset
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Protocol family (openai, ollama, gemini, anthropic)
    #[arg(long)]
    pub protocol: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Credential sent in the provider's credential header
    #[arg(long, env = "QUILL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Changed file path listed in the prompt; repeatable
    #[arg(short, long = "file")]
    pub files: Vec<String>,

    /// File holding the diff; `-` or absent reads stdin
    #[arg(short, long)]
    pub diff: Option<PathBuf>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Log filter directive, overriding the configured one
    #[arg(long)]
    pub log_filter: Option<String>,
}
