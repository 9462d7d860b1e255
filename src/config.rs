//! Runtime configuration.
//!
//! Every flag falls back to an environment variable, so the server can be
//! configured purely through the environment (or a `.env` file loaded with
//! `dotenvy` before parsing).

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::model::{GeminiSettings, DEFAULT_LOCATION, DEFAULT_MODEL};
use crate::parser::ParsePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Google Cloud project hosting the Gemini model
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project: Option<String>,

    /// Vertex AI region
    #[arg(long, env = "GOOGLE_CLOUD_LOCATION", default_value = DEFAULT_LOCATION)]
    pub location: String,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OAuth bearer token for Vertex AI
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Base URL replacing https://{location}-aiplatform.googleapis.com
    #[arg(long, env = "VERTEX_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    /// HTTP listening port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "articles.db")]
    pub database: PathBuf,

    /// What to do when the model reply lacks sections
    #[arg(long, env = "PARSE_POLICY", value_enum, default_value_t = ParsePolicy::Lenient)]
    pub parse_policy: ParsePolicy,

    /// Base log level (RUST_LOG overrides)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            project: self.project.clone(),
            location: self.location.clone(),
            model: self.model.clone(),
            access_token: self.access_token.clone(),
            endpoint: self.api_endpoint.clone(),
        }
    }
}
