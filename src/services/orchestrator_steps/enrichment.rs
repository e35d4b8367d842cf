use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::PipelineLimits,
    constants::prompts::QUERY_GENERATION_PROMPT,
    models::domain::CandidateSource,
    services::{
        model_service::{GenerationRequest, GenerativeModel},
        orchestrator_steps::truncate_chars,
        repository_search_service::CodeRepositorySearch,
        web_search_service::WebSearch,
    },
};

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:[-*•]\s+|\d+[.)]\s*|["'])"#).expect("LIST_MARKER is a valid regex pattern")
});

/// Candidates gathered for one document, kept per collaborator so the
/// analysis prompt can present them separately.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enrichment {
    pub web: Vec<CandidateSource>,
    pub repositories: Vec<CandidateSource>,
    pub failed_calls: usize,
}

impl Enrichment {
    /// Web results first, then repositories, each in query order.
    pub fn candidates(&self) -> Vec<CandidateSource> {
        self.web
            .iter()
            .chain(self.repositories.iter())
            .cloned()
            .collect()
    }

    pub fn is_partial(&self) -> bool {
        self.failed_calls > 0
    }
}

pub fn parse_queries(raw: &str, limits: &PipelineLimits) -> Vec<String> {
    raw.lines()
        .map(|line| LIST_MARKER.replace(line.trim(), "").trim().trim_matches('"').trim().to_string())
        .filter(|query| !query.is_empty())
        .map(|query| truncate_chars(&query, limits.max_query_chars).to_string())
        .take(limits.query_count)
        .collect()
}

/// One model call turning the head of the document into search queries.
/// A failed call yields no queries rather than failing the request.
pub async fn derive_queries(
    model: &dyn GenerativeModel,
    text: &str,
    limits: &PipelineLimits,
) -> Vec<String> {
    let prompt = QUERY_GENERATION_PROMPT
        .replace("{count}", &limits.query_count.to_string())
        .replace("{text}", truncate_chars(text, limits.query_source_chars));

    match model.generate(GenerationRequest::new().with_text(prompt)).await {
        Ok(raw) => {
            let queries = parse_queries(&raw, limits);
            log::info!("Generated search queries: {:?}", queries);
            queries
        }
        Err(e) => {
            log::warn!("Search query generation failed, skipping enrichment: {}", e);
            Vec::new()
        }
    }
}

async fn search_web(
    web: &dyn WebSearch,
    queries: &[String],
    limits: &PipelineLimits,
) -> (Vec<CandidateSource>, usize) {
    let mut candidates = Vec::new();
    let mut failed = 0;

    for query in queries.iter().take(limits.web_query_cap) {
        match web.search(query, limits.results_per_query).await {
            Ok(hits) => candidates.extend(
                hits.into_iter()
                    .take(limits.results_per_query)
                    .enumerate()
                    .map(|(i, hit)| CandidateSource::from_web_hit(hit, i)),
            ),
            Err(e) => {
                failed += 1;
                log::warn!("Web search failed for '{}': {}", query, e);
            }
        }
    }

    (candidates, failed)
}

async fn search_repositories(
    repositories: &dyn CodeRepositorySearch,
    queries: &[String],
    limits: &PipelineLimits,
) -> (Vec<CandidateSource>, usize) {
    let mut candidates = Vec::new();
    let mut failed = 0;

    for query in queries.iter().take(limits.repository_query_cap) {
        match repositories.search(query, limits.results_per_query).await {
            Ok(hits) => candidates.extend(
                hits.into_iter()
                    .take(limits.results_per_query)
                    .enumerate()
                    .map(|(i, hit)| CandidateSource::from_repository_hit(hit, i)),
            ),
            Err(e) => {
                failed += 1;
                log::warn!("Repository search failed for '{}': {}", query, e);
            }
        }
    }

    (candidates, failed)
}

/// Runs both search legs concurrently under the per-collaborator caps.
pub async fn gather_candidates(
    web: &dyn WebSearch,
    repositories: &dyn CodeRepositorySearch,
    queries: &[String],
    limits: &PipelineLimits,
) -> Enrichment {
    let ((web_candidates, web_failed), (repo_candidates, repo_failed)) = futures::join!(
        search_web(web, queries, limits),
        search_repositories(repositories, queries, limits)
    );

    let enrichment = Enrichment {
        web: web_candidates,
        repositories: repo_candidates,
        failed_calls: web_failed + repo_failed,
    };

    log::info!(
        "Found {} web results and {} repositories",
        enrichment.web.len(),
        enrichment.repositories.len()
    );
    if enrichment.is_partial() {
        log::warn!(
            "Enrichment is partial: {} search call(s) failed",
            enrichment.failed_calls
        );
    }

    enrichment
}
