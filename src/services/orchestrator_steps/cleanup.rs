//! Normalization of model answers that are supposed to be JSON.
//!
//! The model is not bound to omit conversational wrapping, so answers are
//! stripped of code fences and sliced to the outermost braces before parsing.
//! This is a heuristic: a payload whose strings contain unbalanced braces can
//! be mis-sliced. Anything that still fails to parse is replaced by a
//! deterministic verdict built from the enrichment candidates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{CandidateSource, MatchedSource, PlagiarismVerdict};

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("LEADING_FENCE is a valid regex pattern"));

static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?\s*```\s*$").expect("TRAILING_FENCE is a valid regex pattern"));

/// Fallback scores handed to the first candidates, in candidate order.
pub const FALLBACK_SIMILARITIES: [f64; 5] = [50.0, 40.0, 30.0, 20.0, 10.0];

pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(found) = LEADING_FENCE.find(text) {
        text = &text[found.end()..];
    }
    if let Some(found) = TRAILING_FENCE.find(text) {
        text = &text[..found.start()];
    }

    text.trim()
}

pub fn clean_json_payload(raw: &str) -> &str {
    let text = strip_code_fences(raw);

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

pub fn fallback_verdict(candidates: &[CandidateSource]) -> PlagiarismVerdict {
    let sources: Vec<MatchedSource> = candidates
        .iter()
        .zip(FALLBACK_SIMILARITIES)
        .map(|(candidate, similarity)| MatchedSource {
            text: candidate.text.clone(),
            source: candidate.source.clone(),
            similarity,
            url: candidate.url.clone(),
        })
        .collect();

    PlagiarismVerdict {
        overall_similarity: sources.first().map(|s| s.similarity).unwrap_or(0.0),
        sources,
    }
}

pub fn parse_verdict(raw: &str, candidates: &[CandidateSource]) -> PlagiarismVerdict {
    match serde_json::from_str::<PlagiarismVerdict>(clean_json_payload(raw)) {
        Ok(verdict) => verdict.normalized(),
        Err(e) => {
            log::warn!(
                "Model verdict is not valid JSON ({}); falling back to {} candidate(s)",
                e,
                candidates.len().min(FALLBACK_SIMILARITIES.len())
            );
            fallback_verdict(candidates)
        }
    }
}
