// Article Repository
// Maps StoredArticle records onto the `articles` document collection

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::article::{CaseCitation, NewArticle, StatuteCitation, StoredArticle};
use crate::db::{Document, DocumentStore, StoredDocument};
use crate::error::StorageError;

pub const ARTICLES_COLLECTION: &str = "articles";

/// Field the article list is sorted on
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Document body as written to the store. `createdAt` is a fixed-width
/// RFC 3339 string (microseconds, `Z`) so lexical order is chronological.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDocument {
    title: String,
    summary: String,
    analysis: String,
    #[serde(default)]
    related_laws: Vec<StatuteCitation>,
    #[serde(default)]
    related_cases: Vec<CaseCitation>,
    created_at: String,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn into_document(article: &NewArticle, created_at: DateTime<Utc>) -> Result<Document, StorageError> {
    let body = ArticleDocument {
        title: article.title.clone(),
        summary: article.result.summary.clone(),
        analysis: article.result.analysis.clone(),
        related_laws: article.result.statutes.clone(),
        related_cases: article.result.cases.clone(),
        created_at: format_timestamp(created_at),
    };

    Ok(serde_json::from_value(serde_json::to_value(body)?)?)
}

fn from_document(doc: StoredDocument) -> Result<StoredArticle, StorageError> {
    let body: ArticleDocument = serde_json::from_value(serde_json::Value::Object(doc.data))?;

    let created_at = DateTime::parse_from_rfc3339(&body.created_at)
        .map_err(|_| StorageError::Timestamp {
            id: doc.id.clone(),
            value: body.created_at.clone(),
        })?
        .with_timezone(&Utc);

    Ok(StoredArticle {
        id: doc.id,
        title: body.title,
        summary: body.summary,
        analysis: body.analysis,
        related_laws: body.related_laws,
        related_cases: body.related_cases,
        created_at,
    })
}

/// Repository - save once, read many; no update or delete
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert a new record. `createdAt` is the server clock (UTC, microsecond
    /// precision); the id comes from the store. Duplicates are not detected.
    pub async fn save(&self, article: &NewArticle) -> Result<String, StorageError> {
        let created_at = Utc::now().trunc_subsecs(6);
        let doc = into_document(article, created_at)?;

        let id = self.store.insert(ARTICLES_COLLECTION, doc).await?;
        tracing::info!(id = %id, title = %article.title, "article saved");
        Ok(id)
    }

    /// `Ok(None)` when no article has this id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<StoredArticle>, StorageError> {
        self.store
            .get(ARTICLES_COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Every article, most recent first
    pub async fn list_all(&self) -> Result<Vec<StoredArticle>, StorageError> {
        let docs = self
            .store
            .list_desc(ARTICLES_COLLECTION, CREATED_AT_FIELD)
            .await?;
        tracing::debug!(count = docs.len(), "listing articles");

        docs.into_iter().map(from_document).collect()
    }
}
