//! Keyword relevance ranking and excerpt selection.
//!
//! Scoring is plain term frequency: for each distinct query term, count the exact
//! token matches in the document (case-insensitive) and sum. Optionally the sum is
//! divided by `sqrt(token_count)` so long papers do not win on length alone.
//! Ordering is score descending, then `source_path` ascending.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::corpus::Document;

/// Words dropped from queries when stop-word removal is on.
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for",
    "from", "how", "i", "in", "into", "is", "it", "its", "me", "my", "of", "on", "or",
    "that", "the", "their", "this", "to", "was", "we", "what", "when", "where", "which",
    "with", "you",
];

/// Ellipsis marking a truncated excerpt edge.
const ELLIPSIS: char = '…';

/// One ranked document.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub excerpt: String,
    pub score: f64,
    pub source_path: String,
    pub content_hash: String,
    pub modified: String,
}

/// Split into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    token_spans(text).into_iter().map(|t| t.text).collect()
}

/// Distinct query terms in first-seen order.
pub fn query_terms(query: &str, remove_stop_words: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|t| !(remove_stop_words && STOP_WORDS.contains(&t.as_str())))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Term-frequency score of `content` against `terms`.
pub fn score_document(content: &str, terms: &[String], normalize_by_length: bool) -> f64 {
    let tokens = tokenize(content);
    if tokens.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *counts.entry(token.as_str()).or_default() += 1;
    }

    let hits: usize = terms
        .iter()
        .map(|t| counts.get(t.as_str()).copied().unwrap_or(0))
        .sum();

    if normalize_by_length {
        hits as f64 / (tokens.len() as f64).sqrt()
    } else {
        hits as f64
    }
}

/// Score every document, drop zero scores, sort, and truncate.
pub fn rank(
    documents: &[Document],
    terms: &[String],
    max_results: usize,
    excerpt_chars: usize,
    normalize_by_length: bool,
) -> Vec<SearchHit> {
    let mut scored: Vec<(&Document, f64)> = documents
        .iter()
        .map(|doc| (doc, score_document(&doc.content, terms, normalize_by_length)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    scored.sort_by(|(a_doc, a), (b_doc, b)| {
        b.total_cmp(a)
            .then_with(|| a_doc.source_path.cmp(&b_doc.source_path))
    });
    scored.truncate(max_results);

    scored
        .into_iter()
        .map(|(doc, score)| SearchHit {
            title: doc.title.clone(),
            excerpt: excerpt(&doc.content, terms, excerpt_chars),
            score,
            source_path: doc.source_path.clone(),
            content_hash: doc.content_hash.clone(),
            modified: doc.modified.to_rfc3339(),
        })
        .collect()
}

/// A window of at most `budget` characters around the densest cluster of matches.
///
/// Whitespace is collapsed, and `…` marks an edge where text was cut.
pub fn excerpt(content: &str, terms: &[String], budget: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= budget {
        return collapse_whitespace(content);
    }

    let term_set: HashSet<&str> = terms.iter().map(String::as_str).collect();
    let matches: Vec<TokenSpan> = token_spans(content)
        .into_iter()
        .filter(|t| term_set.contains(t.text.as_str()))
        .collect();

    let anchor = densest_window_start(&matches, budget);
    let lead = budget / 5;
    let mut start = anchor.saturating_sub(lead);
    let mut end = (start + budget).min(chars.len());
    if end == chars.len() {
        start = end.saturating_sub(budget);
    }

    let marks = budget >= 3;
    let cut_front = marks && start > 0;
    let cut_back = marks && end < chars.len();
    if cut_front {
        start += 1;
    }
    if cut_back {
        end -= 1;
    }

    // Do not open or close on half a word
    if cut_front {
        start = snap_forward(&chars, start, end);
    }
    if cut_back {
        end = snap_backward(&chars, start, end);
    }

    let body = collapse_whitespace(&chars[start..end].iter().collect::<String>());
    let mut out = String::with_capacity(body.len() + 6);
    if cut_front {
        out.push(ELLIPSIS);
    }
    out.push_str(&body);
    if cut_back {
        out.push(ELLIPSIS);
    }
    out
}

// ── Internal ──────────────────────────────────────────────────────────────────

/// Longest partial word trimmed from an excerpt edge.
const MAX_SNAP: usize = 30;

struct TokenSpan {
    /// Offset in characters, not bytes.
    start: usize,
    len: usize,
    text: String,
}

fn token_spans(text: &str) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut len = 0;

    for (i, c) in text.chars().enumerate() {
        if c.is_alphanumeric() {
            if len == 0 {
                start = i;
            }
            current.extend(c.to_lowercase());
            len += 1;
        } else if len > 0 {
            spans.push(TokenSpan {
                start,
                len,
                text: std::mem::take(&mut current),
            });
            len = 0;
        }
    }
    if len > 0 {
        spans.push(TokenSpan {
            start,
            len,
            text: current,
        });
    }
    spans
}

/// Start of the match whose following `budget` characters hold the most matches.
/// Earliest wins ties; `0` when there are no matches.
fn densest_window_start(matches: &[TokenSpan], budget: usize) -> usize {
    let mut best_start = matches.first().map(|m| m.start).unwrap_or(0);
    let mut best_count = 0;
    let mut j = 0;

    for (i, m) in matches.iter().enumerate() {
        let limit = m.start + budget;
        if j < i {
            j = i;
        }
        while j < matches.len() && matches[j].start + matches[j].len <= limit {
            j += 1;
        }
        let count = j - i;
        if count > best_count {
            best_count = count;
            best_start = m.start;
        }
    }
    best_start
}

fn snap_forward(chars: &[char], start: usize, end: usize) -> usize {
    if start == 0 || !chars[start - 1].is_alphanumeric() {
        return start;
    }
    (start..end.min(start + MAX_SNAP))
        .find(|&i| !chars[i].is_alphanumeric())
        .unwrap_or(start)
}

fn snap_backward(chars: &[char], start: usize, end: usize) -> usize {
    if end >= chars.len() || !chars[end].is_alphanumeric() {
        return end;
    }
    (start.max(end.saturating_sub(MAX_SNAP))..end)
        .rev()
        .find(|&i| !chars[i].is_alphanumeric())
        .map(|i| i + 1)
        .unwrap_or(end)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Mean-Reversion, in 2024: RSI(14)!"),
            vec!["mean", "reversion", "in", "2024", "rsi", "14"]
        );
    }

    #[test]
    fn query_terms_drop_stop_words_and_duplicates() {
        assert_eq!(
            query_terms("What is the momentum of Momentum?", true),
            vec!["momentum"]
        );
        assert_eq!(
            query_terms("the momentum", false),
            vec!["the", "momentum"]
        );
        assert!(query_terms("the of and", true).is_empty());
    }

    #[test]
    fn score_counts_whole_token_matches() {
        let content = "Momentum works. momentum persists; momentary blips do not count.";
        assert_eq!(score_document(content, &terms(&["momentum"]), false), 2.0);
        assert_eq!(score_document(content, &terms(&["momentum", "blips"]), false), 3.0);
        assert_eq!(score_document(content, &terms(&["volatility"]), false), 0.0);
    }

    #[test]
    fn normalized_score_penalizes_length() {
        let short = "momentum momentum";
        let long = format!("momentum momentum {}", "filler ".repeat(98));
        let t = terms(&["momentum"]);
        assert_eq!(score_document(short, &t, false), score_document(&long, &t, false));
        assert!(score_document(short, &t, true) > score_document(&long, &t, true));
    }

    #[test]
    fn short_content_is_returned_whole() {
        let text = "Pairs   trading\nexploits cointegration.";
        assert_eq!(
            excerpt(text, &terms(&["pairs"]), 500),
            "Pairs trading exploits cointegration."
        );
    }

    #[test]
    fn excerpt_is_bounded_and_contains_dense_region() {
        let filler = "lorem ipsum dolor sit amet ".repeat(60);
        let content = format!(
            "{filler} volatility once. {filler} carry carry carry trade carry returns {filler}"
        );
        let out = excerpt(&content, &terms(&["carry"]), 200);

        assert!(out.chars().count() <= 200, "len {}", out.chars().count());
        assert!(out.contains("carry carry carry"), "excerpt: {out}");
        assert!(out.starts_with(ELLIPSIS));
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn excerpt_near_document_end_keeps_full_budget() {
        let content = format!("{} final signal", "word ".repeat(200));
        let out = excerpt(&content, &terms(&["signal"]), 100);
        assert!(out.ends_with("final signal"), "excerpt: {out}");
        assert!(out.chars().count() <= 100);
    }

    #[test]
    fn excerpt_handles_multibyte_text() {
        let content = format!("{} élan momentum ünïcode {}", "é".repeat(300), "ß".repeat(300));
        let out = excerpt(&content, &terms(&["momentum"]), 50);
        assert!(out.chars().count() <= 50);
        assert!(out.contains("momentum"));
    }

    #[test]
    fn densest_window_prefers_clusters() {
        let spans = token_spans("x hit x x x x x x x x x x x x x x x x x hit hit hit");
        let matches: Vec<TokenSpan> = spans.into_iter().filter(|t| t.text == "hit").collect();
        let start = densest_window_start(&matches, 12);
        assert_eq!(start, matches[1].start);
    }
}
