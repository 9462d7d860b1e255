// Article data model
// Request input, extracted citations, analysis output, and the persisted record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST
// ============================================================================

/// AnalysisRequest - a news article submitted for analysis (never persisted as-is)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub content: String,
}

// ============================================================================
// CITATIONS
// ============================================================================

/// A named law plus an article reference, e.g. 道路交通法 / 第75条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatuteCitation {
    pub name: String,

    /// Keeps the leading 第 marker
    pub article: String,

    /// Lookup link derived from the name; not guaranteed to resolve
    #[serde(rename = "url")]
    pub reference_url: String,
}

/// A judicial precedent plus a one-line description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCitation {
    pub name: String,
    pub summary: String,

    /// Search link derived from the name; not guaranteed to resolve
    #[serde(rename = "url")]
    pub reference_url: String,
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// Structured output of the analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub analysis: String,

    #[serde(rename = "relatedLaws", default)]
    pub statutes: Vec<StatuteCitation>,

    #[serde(rename = "relatedCases", default)]
    pub cases: Vec<CaseCitation>,
}

/// An analysed article ready to be saved (no id, no timestamp yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub result: AnalysisResult,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            title: title.into(),
            result,
        }
    }
}

// ============================================================================
// PERSISTED RECORD
// ============================================================================

/// StoredArticle - created once by the repository, read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub analysis: String,
    pub related_laws: Vec<StatuteCitation>,
    pub related_cases: Vec<CaseCitation>,
    pub created_at: DateTime<Utc>,
}

impl StoredArticle {
    pub fn from_parts(id: String, article: NewArticle, created_at: DateTime<Utc>) -> Self {
        let NewArticle { title, result } = article;
        Self {
            id,
            title,
            summary: result.summary,
            analysis: result.analysis,
            related_laws: result.statutes,
            related_cases: result.cases,
            created_at,
        }
    }
}
