//! End-to-end tests through the axum router with a canned model and in-memory SQLite.

#![cfg(feature = "server")]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use news_law_explainer::{
    build_router, Analyzer, AppState, ArticleService, ModelClient, ModelError, ParsePolicy,
    Repository, SqliteStore,
};

const WELL_FORMED: &str = "要約：スマホを操作しながら運転した男が事故を起こした。\n\n\
    法的解説：運転中の携帯電話の使用は道路交通法で禁止されている。\n\n\
    関連法令：\n道路交通法第71条\n\n\
    関連判例：\n最高裁判決：運転中のスマホ使用は重過失にあたる";

enum Reply {
    Text(&'static str),
    Fail,
}

struct StubModel(Reply);

#[async_trait]
impl ModelClient for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        match self.0 {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(ModelError::Api {
                status: 429,
                body: "Resource exhausted".to_string(),
            }),
        }
    }
}

fn test_app(reply: Reply) -> axum::Router {
    let service = ArticleService::new(
        Analyzer::new(Arc::new(StubModel(reply)), ParsePolicy::Lenient),
        Repository::new(Arc::new(SqliteStore::open_in_memory().unwrap())),
    );
    build_router(AppState::new(service))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn generate_request(title: &str, content: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate-article")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "title": title, "content": content }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_generate_then_fetch_and_list() {
    let app = test_app(Reply::Text(WELL_FORMED));

    // 1. Generate
    let response = app.clone().oneshot(generate_request("T", "C")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "T");
    assert_eq!(created["summary"], "スマホを操作しながら運転した男が事故を起こした。");
    assert_eq!(created["relatedLaws"][0]["name"], "道路交通法");
    assert_eq!(created["relatedLaws"][0]["article"], "第71条");
    assert_eq!(created["relatedCases"][0]["name"], "最高裁判決");
    assert_eq!(
        created["relatedCases"][0]["summary"],
        "運転中のスマホ使用は重過失にあたる"
    );
    assert!(created["createdAt"].is_string());

    // 2. Fetch by id
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/articles/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    // 3. Present in the list
    let response = app
        .oneshot(Request::builder().uri("/articles").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_list_is_most_recent_first() {
    let app = test_app(Reply::Text(WELL_FORMED));

    let first = body_json(app.clone().oneshot(generate_request("A", "a")).await.unwrap()).await;
    let second = body_json(app.clone().oneshot(generate_request("B", "b")).await.unwrap()).await;

    let response = app
        .oneshot(Request::builder().uri("/articles").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listed = body_json(response).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, vec!["B", "A"]);
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_unknown_article_is_404() {
    let app = test_app(Reply::Text(WELL_FORMED));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/articles/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Article not found");
}

#[tokio::test]
async fn test_model_failure_is_500_with_message() {
    let app = test_app(Reply::Fail);

    let response = app.clone().oneshot(generate_request("T", "C")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("429"));
    assert!(detail.contains("Resource exhausted"));

    // nothing was stored
    let response = app
        .oneshot(Request::builder().uri("/articles").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_malformed_reply_degrades_to_empty_lists() {
    let app = test_app(Reply::Text("要約：短い返答のみ"));

    let response = app.oneshot(generate_request("T", "C")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["summary"], "短い返答のみ");
    assert_eq!(created["analysis"], "");
    assert_eq!(created["relatedLaws"], serde_json::json!([]));
    assert_eq!(created["relatedCases"], serde_json::json!([]));
}

#[tokio::test]
async fn test_health() {
    let app = test_app(Reply::Text(WELL_FORMED));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
