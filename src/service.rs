// Request pipeline: analyze → save → re-read

use crate::analyzer::Analyzer;
use crate::article::{AnalysisRequest, NewArticle, StoredArticle};
use crate::error::{AppError, StorageError};
use crate::repository::Repository;

/// ArticleService - the whole per-request flow, shared by the HTTP layer and the CLI
///
/// Holds no per-request state; each call owns its own result until the store has it.
#[derive(Clone)]
pub struct ArticleService {
    analyzer: Analyzer,
    repository: Repository,
}

impl ArticleService {
    pub fn new(analyzer: Analyzer, repository: Repository) -> Self {
        Self {
            analyzer,
            repository,
        }
    }

    /// Analyze the article, persist it, and return the record as stored
    #[tracing::instrument(skip_all, fields(title = %request.title))]
    pub async fn generate_article(&self, request: AnalysisRequest) -> Result<StoredArticle, AppError> {
        let AnalysisRequest { title, content } = request;

        let result = self.analyzer.analyze(&content).await?;
        tracing::info!(
            statutes = result.statutes.len(),
            cases = result.cases.len(),
            "article analysed"
        );

        let id = self.repository.save(&NewArticle::new(title, result)).await?;

        self.repository
            .get_by_id(&id)
            .await?
            .ok_or_else(|| StorageError::MissingAfterInsert(id).into())
    }

    pub async fn get_article(&self, id: &str) -> Result<StoredArticle, AppError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_articles(&self) -> Result<Vec<StoredArticle>, AppError> {
        Ok(self.repository.list_all().await?)
    }
}
