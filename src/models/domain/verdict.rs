use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MIN_SIMILARITY: f64 = 0.0;
pub const MAX_SIMILARITY: f64 = 100.0;

/// A passage of the analyzed document and the source it appears to match.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct MatchedSource {
    /// The exact text from the document that appears to be plagiarized.
    #[serde(default)]
    pub text: String,
    /// Name of the source website, document or repository.
    #[serde(default)]
    pub source: String,
    /// Match percentage between 0 and 100.
    #[serde(default)]
    pub similarity: f64,
    /// URL of the source if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismVerdict {
    /// Overall similarity percentage between 0 and 100.
    pub overall_similarity: f64,
    #[serde(default)]
    pub sources: Vec<MatchedSource>,
}

pub fn clamp_similarity(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_SIMILARITY, MAX_SIMILARITY)
    } else {
        MIN_SIMILARITY
    }
}

impl PlagiarismVerdict {
    pub fn empty() -> Self {
        PlagiarismVerdict {
            overall_similarity: 0.0,
            sources: Vec::new(),
        }
    }

    /// Forces every score into [0, 100].
    pub fn normalized(mut self) -> Self {
        self.overall_similarity = clamp_similarity(self.overall_similarity);
        for source in &mut self.sources {
            source.similarity = clamp_similarity(source.similarity);
            if source.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                source.url = None;
            }
        }
        self
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(PlagiarismVerdict))
            .unwrap_or_else(|_| serde_json::json!({}))
    }
}
