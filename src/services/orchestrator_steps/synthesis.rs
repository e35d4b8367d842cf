use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    config::PipelineLimits,
    constants::prompts::{
        CUSTOM_PROMPT_PREAMBLE, PAPER_TITLE_PROMPT, PLAGIARISM_ANALYSIS_PROMPT,
        QUESTION_PAPER_PROMPT,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{question_paper::DEFAULT_PAPER_TITLE, CandidateSource, PlagiarismVerdict},
        dto::request::QuestionPaperUpload,
    },
    services::{
        model_service::{GenerationRequest, GenerativeModel},
        orchestrator_steps::{
            cleanup::{fallback_verdict, parse_verdict, strip_code_fences},
            enrichment::Enrichment,
            truncate_chars,
        },
    },
};

const MAX_TITLE_WORDS: usize = 3;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("PLACEHOLDER is a valid regex pattern"));

/// Fills `{name}` placeholders in a single pass over the template. Inserted
/// values are never rescanned; unknown placeholders are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Generates the paper text from both attachments in a single call.
pub async fn generate_question_paper_body(
    model: &dyn GenerativeModel,
    upload: &QuestionPaperUpload,
) -> AppResult<String> {
    let mut request = GenerationRequest::new()
        .with_document(&upload.pyq)
        .with_document(&upload.syllabus)
        .with_text(QUESTION_PAPER_PROMPT);

    if let Some(custom) = upload.custom_prompt.as_deref() {
        request = request.with_text(format!("{}\n\n{}", CUSTOM_PROMPT_PREAMBLE, custom));
    }

    // The documents are read in this same call, so a transport failure is
    // an extraction failure from the caller's point of view.
    let raw = model.generate(request).await.map_err(|e| {
        log::error!("Question paper generation call failed: {}", e);
        AppError::ExtractionFailed(format!("Failed to generate question paper: {}", e))
    })?;
    let body = strip_code_fences(&raw);

    if body.is_empty() {
        log::error!("Model returned an empty question paper");
        return Err(AppError::ExtractionFailed(
            "Failed to generate question paper.".to_string(),
        ));
    }

    Ok(body.to_string())
}

pub fn sanitize_title(raw: &str) -> String {
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let title = first_line
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '`' || c.is_whitespace())
        .split_whitespace()
        .take(MAX_TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        DEFAULT_PAPER_TITLE.to_string()
    } else {
        title
    }
}

/// Best-effort title from the uploaded file names.
pub async fn generate_paper_title(model: &dyn GenerativeModel, file_names: &[&str]) -> String {
    let prompt = PAPER_TITLE_PROMPT.replace("{files}", &file_names.join("\n"));

    match model.generate(GenerationRequest::new().with_text(prompt)).await {
        Ok(raw) => sanitize_title(&raw),
        Err(e) => {
            log::warn!("Title generation failed, using default: {}", e);
            DEFAULT_PAPER_TITLE.to_string()
        }
    }
}

fn candidates_json(candidates: &[CandidateSource]) -> String {
    serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string())
}

pub fn plagiarism_prompt(
    text: &str,
    enrichment: &Enrichment,
    custom_prompt: Option<&str>,
    limits: &PipelineLimits,
) -> String {
    let additional_context = custom_prompt
        .map(|custom| format!("\n## ADDITIONAL CONTEXT\n\n{}\n", custom))
        .unwrap_or_default();
    let schema = serde_json::to_string_pretty(&PlagiarismVerdict::json_schema())
        .unwrap_or_else(|_| "{}".to_string());

    let web_results = candidates_json(&enrichment.web);
    let repository_results = candidates_json(&enrichment.repositories);

    fill_template(
        PLAGIARISM_ANALYSIS_PROMPT,
        &[
            ("text", truncate_chars(text, limits.analysis_source_chars)),
            ("web_results", web_results.as_str()),
            ("repository_results", repository_results.as_str()),
            ("additional_context", additional_context.as_str()),
            ("schema", schema.as_str()),
        ],
    )
}

/// Asks the model for a verdict. Transport failures and malformed answers
/// both resolve to the deterministic fallback.
pub async fn analyze_plagiarism(
    model: &dyn GenerativeModel,
    text: &str,
    enrichment: &Enrichment,
    custom_prompt: Option<&str>,
    limits: &PipelineLimits,
) -> PlagiarismVerdict {
    let prompt = plagiarism_prompt(text, enrichment, custom_prompt, limits);
    let candidates = enrichment.candidates();

    match model.generate(GenerationRequest::new().with_text(prompt)).await {
        Ok(raw) => parse_verdict(&raw, &candidates),
        Err(e) => {
            log::warn!("Plagiarism analysis call failed, using fallback verdict: {}", e);
            fallback_verdict(&candidates)
        }
    }
}
