// Citation grammar
// One explicit line rule per citation kind, testable without calling the model

use regex::Regex;
use std::sync::LazyLock;

use crate::article::{CaseCitation, StatuteCitation};

// ============================================================================
// MARKERS & TEMPLATES
// ============================================================================

/// Section marker that separates a statute name from its article number
pub const SECTION_MARKER: char = '第';

/// Full-width colon separating a case name from its description
pub const CASE_SEPARATOR: char = '：';

const STATUTE_LOOKUP_URL: &str = "https://elaws.e-gov.go.jp/document?lawid=";
const CASE_SEARCH_URL: &str = "https://www.courts.go.jp/app/hanrei_jp/list1?filter=1&keyword=";

/// Leading bullet or list number a model may put in front of a line
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-・•]|\*+|\d+[.．)])\s*").expect("list marker pattern is valid")
});

/// name 第 article, with exactly one marker on the line
static STATUTE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^第]*)第([^第]*)$").expect("statute pattern is valid"));

/// name ： summary, with exactly one full-width colon on the line
static CASE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^：]*)：([^：]*)$").expect("case pattern is valid"));

/// Statute lookup link. Cosmetic only: e-Gov expects a law id, not a name.
pub fn statute_url(name: &str) -> String {
    format!("{}{}", STATUTE_LOOKUP_URL, urlencoding::encode(name))
}

/// Court precedent keyword search link
pub fn case_url(name: &str) -> String {
    format!("{}{}", CASE_SEARCH_URL, urlencoding::encode(name))
}

/// Drop a leading "- ", "・", "1. ", "**" etc. from a list line
pub fn strip_list_marker(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Trim whitespace and markdown `*` emphasis around one side of a citation
fn trim_emphasis(part: &str) -> &str {
    part.trim().trim_matches('*').trim()
}

// ============================================================================
// RULES
// ============================================================================

/// CitationRule - turns one line of a list block into a citation, or rejects it
///
/// Rejected lines are dropped silently. Block parsing keeps the order of
/// appearance and skips blank lines.
pub trait CitationRule {
    type Citation;

    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// Parse a single non-blank line
    fn parse_line(&self, line: &str) -> Option<Self::Citation>;

    /// Parse every non-blank line of a block
    fn parse_block(&self, block: &str) -> Vec<Self::Citation> {
        let mut citations = Vec::new();
        let mut rejected = 0usize;

        for line in block.lines().filter(|l| !l.trim().is_empty()) {
            match self.parse_line(line) {
                Some(citation) => citations.push(citation),
                None => rejected += 1,
            }
        }

        if rejected > 0 {
            tracing::debug!(
                kind = self.kind(),
                accepted = citations.len(),
                rejected,
                "dropped malformed citation lines"
            );
        }

        citations
    }
}

/// `道路交通法第75条` → name `道路交通法`, article `第75条`
///
/// Rejects lines with zero or several 第 markers, and lines where either side
/// of the marker is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatuteRule;

impl CitationRule for StatuteRule {
    type Citation = StatuteCitation;

    fn kind(&self) -> &'static str {
        "statute"
    }

    fn parse_line(&self, line: &str) -> Option<StatuteCitation> {
        let line = strip_list_marker(line.trim());
        let caps = STATUTE_LINE.captures(line)?;

        let name = trim_emphasis(caps.get(1)?.as_str());
        let number = trim_emphasis(caps.get(2)?.as_str());
        if name.is_empty() || number.is_empty() {
            return None;
        }

        Some(StatuteCitation {
            name: name.to_string(),
            article: format!("{}{}", SECTION_MARKER, number),
            reference_url: statute_url(name),
        })
    }
}

/// `最高裁判決：運転中のスマホ使用は重過失にあたる` → name + summary
///
/// Rejects lines without exactly one full-width colon, and lines with an empty
/// name or summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseRule;

impl CitationRule for CaseRule {
    type Citation = CaseCitation;

    fn kind(&self) -> &'static str {
        "case"
    }

    fn parse_line(&self, line: &str) -> Option<CaseCitation> {
        let line = strip_list_marker(line.trim());
        let caps = CASE_LINE.captures(line)?;

        let name = trim_emphasis(caps.get(1)?.as_str());
        let summary = trim_emphasis(caps.get(2)?.as_str());
        if name.is_empty() || summary.is_empty() {
            return None;
        }

        Some(CaseCitation {
            name: name.to_string(),
            summary: summary.to_string(),
            reference_url: case_url(name),
        })
    }
}
