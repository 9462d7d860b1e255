// Analyzer
// Fixed-template prompt → one model call → positional section parse

use std::sync::Arc;

use crate::article::AnalysisResult;
use crate::error::AppError;
use crate::model::ModelClient;
use crate::parser::{parse_response, ParsePolicy, Section};

/// Build the analysis prompt for one article body.
///
/// Sections are requested in [`Section::ORDERED`] order, each starting with its
/// label and separated by one blank line, which is what [`parse_response`]
/// relies on.
pub fn build_prompt(content: &str) -> String {
    let [summary, analysis, statutes, cases] = Section::ORDERED.map(|s| s.label());

    format!(
        "以下のニュース記事を分析し、次の4つのセクションをこの順番で出力してください。\n\
         各セクションは指定の見出しで始め、セクションの間には空行を1行だけ入れてください。\n\
         セクションの内部には空行を入れないでください。\n\
         \n\
         {summary}：記事の要点を簡潔にまとめてください。\n\
         {analysis}：このニュースに関連する法的な観点からの解説を、専門用語を避けてわかりやすく説明してください。\n\
         {statutes}：関連する法令名と条文番号を「法令名第○条」の形式で1行に1件ずつ列挙してください。\n\
         {cases}：関連する重要な判例があれば「判例名：簡単な説明」の形式で1行に1件ずつ記載してください。\n\
         \n\
         ニュース記事：\n\
         {content}\n"
    )
}

/// Analyzer - owns the model collaborator and the malformed-reply policy
#[derive(Clone)]
pub struct Analyzer {
    model: Arc<dyn ModelClient>,
    policy: ParsePolicy,
}

impl Analyzer {
    pub fn new(model: Arc<dyn ModelClient>, policy: ParsePolicy) -> Self {
        Self { model, policy }
    }

    /// Model errors propagate unchanged; there is no retry.
    pub async fn analyze(&self, content: &str) -> Result<AnalysisResult, AppError> {
        let prompt = build_prompt(content);
        let raw = self.model.generate(&prompt).await?;

        let parsed = parse_response(&raw);
        tracing::debug!(
            model = self.model.name(),
            complete = parsed.is_complete(),
            "model reply parsed"
        );

        Ok(self.policy.apply(parsed)?)
    }
}
