// News Law Explainer - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod analyzer;
pub mod article;
pub mod citations;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repository;
pub mod service;

#[cfg(feature = "server")]
pub mod http;

// Re-export commonly used types
pub use analyzer::{build_prompt, Analyzer};
pub use article::{
    AnalysisRequest, AnalysisResult, CaseCitation, NewArticle, StatuteCitation, StoredArticle,
};
pub use citations::{CaseRule, CitationRule, StatuteRule};
pub use config::{Config, LogFormat};
pub use db::{Document, DocumentStore, SqliteStore, StoredDocument};
pub use error::{AppError, MalformedReason, ModelError, ParseError, StorageError};
pub use model::{GeminiClient, GeminiSettings, ModelClient};
pub use parser::{parse_response, ParsePolicy, ParsedResponse, Section};
pub use repository::Repository;
pub use service::ArticleService;

#[cfg(feature = "server")]
pub use http::{build_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
