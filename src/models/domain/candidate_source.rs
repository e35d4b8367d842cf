use serde::{Deserialize, Serialize};

/// One organic result from the web-search provider.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WebSearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// One repository from the code-repository search provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryHit {
    pub name: String,
    pub url: String,
    pub owner: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Web,
    CodeRepository,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CandidateSource {
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub origin: SourceOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl CandidateSource {
    /// `rank` falls back to the hit's index in the provider answer when the
    /// provider did not send a position.
    pub fn from_web_hit(hit: WebSearchHit, index: usize) -> Self {
        CandidateSource {
            text: hit.snippet,
            source: hit.title,
            url: non_empty(hit.link),
            origin: SourceOrigin::Web,
            rank: hit.position.or(Some(index as u32 + 1)),
            score: None,
        }
    }

    pub fn from_repository_hit(hit: RepositoryHit, index: usize) -> Self {
        CandidateSource {
            text: hit.description,
            source: format!("{}/{}", hit.owner, hit.name),
            url: non_empty(hit.url),
            origin: SourceOrigin::CodeRepository,
            rank: Some(index as u32 + 1),
            score: hit.stars.map(f64::from),
        }
    }
}
