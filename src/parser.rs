// 🏗️ Response Parser
// Splits a free-text model reply into summary / analysis / statutes / cases

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::article::AnalysisResult;
use crate::citations::{CaseRule, CitationRule, StatuteRule};
use crate::error::{MalformedReason, ParseError};

// ============================================================================
// SECTIONS
// ============================================================================

/// The four sections a reply is expected to contain, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Analysis,
    Statutes,
    Cases,
}

impl Section {
    pub const ORDERED: [Section; 4] = [
        Section::Summary,
        Section::Analysis,
        Section::Statutes,
        Section::Cases,
    ];

    /// Label the prompt asks the model to start the section with
    pub fn label(&self) -> &'static str {
        match self {
            Section::Summary => "要約",
            Section::Analysis => "法的解説",
            Section::Statutes => "関連法令",
            Section::Cases => "関連判例",
        }
    }
}

/// A blank line, possibly holding spaces, tabs or ideographic spaces
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t\x{3000}]*\n\s*").expect("blank line pattern is valid")
});

/// "1. ", "２．", "3、" in front of a label
static SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9０-９]+[.．、)]\s*").expect("section number pattern is valid"));

/// Split on blank lines; empty sections (leading/trailing blank runs) are dropped
pub fn split_sections(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n");
    BLANK_LINE
        .split(&normalized)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip `要約：` (optionally numbered or bolded) when the section starts with it.
/// Anything else is returned trimmed but otherwise untouched.
pub fn strip_label(text: &str, section: Section) -> String {
    let trimmed = text.trim();

    let rest = match SECTION_NUMBER.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let rest = rest.trim_start_matches('*').trim_start_matches('#').trim_start();

    let Some(after) = rest.strip_prefix(section.label()) else {
        return trimmed.to_string();
    };

    // the label only counts when a separator, a line break or nothing follows
    let after = after
        .trim_start_matches('*')
        .trim_start_matches([' ', '\t', '\u{3000}']);
    match after.chars().next() {
        None | Some('\n') | Some('：') | Some(':') => after
            .trim_start_matches(['：', ':'])
            .trim_start_matches('*')
            .trim()
            .to_string(),
        Some(_) => trimmed.to_string(),
    }
}

// ============================================================================
// PARSE OUTCOME
// ============================================================================

/// Result of parsing one reply. Malformed still carries whatever could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    Complete(AnalysisResult),
    Malformed {
        partial: AnalysisResult,
        reason: MalformedReason,
    },
}

impl ParsedResponse {
    pub fn is_complete(&self) -> bool {
        matches!(self, ParsedResponse::Complete(_))
    }
}

/// Parse a raw reply positionally: section 1 summary, 2 analysis, 3 statutes, 4 cases.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let sections = split_sections(raw);

    if sections.len() > Section::ORDERED.len() {
        tracing::warn!(
            found = sections.len(),
            "reply has extra sections, ignoring everything after the fourth"
        );
    }

    let text_of = |section: Section| -> String {
        let idx = section as usize;
        sections
            .get(idx)
            .map(|s| strip_label(s, section))
            .unwrap_or_default()
    };

    let result = AnalysisResult {
        summary: text_of(Section::Summary),
        analysis: text_of(Section::Analysis),
        statutes: StatuteRule.parse_block(&text_of(Section::Statutes)),
        cases: CaseRule.parse_block(&text_of(Section::Cases)),
    };

    if sections.is_empty() {
        ParsedResponse::Malformed {
            partial: result,
            reason: MalformedReason::EmptyResponse,
        }
    } else if sections.len() < Section::ORDERED.len() {
        ParsedResponse::Malformed {
            partial: result,
            reason: MalformedReason::MissingSections {
                found: sections.len(),
            },
        }
    } else {
        ParsedResponse::Complete(result)
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// What to do with a malformed reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Keep the readable sections, leave the rest empty
    #[default]
    Lenient,
    /// Fail with ParseError::Malformed
    Strict,
}

impl ParsePolicy {
    pub fn apply(self, parsed: ParsedResponse) -> Result<AnalysisResult, ParseError> {
        match (parsed, self) {
            (ParsedResponse::Complete(result), _) => Ok(result),
            (ParsedResponse::Malformed { partial, reason }, ParsePolicy::Lenient) => {
                tracing::warn!(%reason, "malformed model reply, degrading to partial result");
                Ok(partial)
            }
            (ParsedResponse::Malformed { reason, .. }, ParsePolicy::Strict) => {
                Err(ParseError::Malformed(reason))
            }
        }
    }
}
