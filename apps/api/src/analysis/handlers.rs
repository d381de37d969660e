//! Axum route handlers for the CV analysis API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::models::{Analysis, BatchResult, CandidateProfile, RequirementProfile, ScoreResult};
use crate::analysis::ranking::{BatchDocument, BatchRanker, CancelFlag};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_experience_years: u32,
    pub required_education: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub candidate_info: CandidateProfile,
    pub score: ScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub advice: String,
}

impl AnalyzeResponse {
    fn new(analysis: Analysis, filename: Option<String>) -> Self {
        let advice = format!(
            "{} - {}",
            analysis.score.recommendation.label(),
            analysis.score.recommendation.advice()
        );
        Self {
            candidate_info: analysis.candidate_info,
            score: analysis.score,
            filename,
            advice,
        }
    }
}

/// Parsed multipart upload: file parts plus the requirement fields.
#[derive(Debug)]
struct UploadForm {
    files: Vec<(String, Bytes)>,
    requirements: RequirementProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv-analysis/analyze
///
/// Multipart: exactly one `file` part, optional `required_skills`, `min_experience_years`,
/// `required_education`. Unsupported extensions fail with 400, undecodable files with 422.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart, &state.config.default_required_education).await?;
    if form.files.len() > 1 {
        return Err(AppError::Validation(format!(
            "Exactly one 'file' part is allowed, got {}; use batch-analyze for several CVs",
            form.files.len()
        )));
    }
    let (filename, bytes) = form
        .files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("A 'file' part is required".to_string()))?;

    let analyzer = Arc::clone(&state.analyzer);
    let requirements = form.requirements;
    let name = filename.clone();
    // PDF decoding is CPU-bound; spawn_blocking to keep the executor free.
    let analysis = tokio::task::spawn_blocking(move || {
        analyzer.analyze_document(&name, &bytes, &requirements)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))??;

    info!(
        filename = %filename,
        score = analysis.score.overall_score,
        recommendation = %analysis.score.recommendation,
        "CV analyzed"
    );

    Ok(Json(AnalyzeResponse::new(analysis, Some(filename))))
}

/// POST /api/v1/cv-analysis/batch-analyze
///
/// Multipart: any number of `files` parts plus the requirement fields. Per-file
/// failures are reported in `errors`; the rest are ranked by score.
pub async fn handle_batch_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResult>, AppError> {
    let form = read_upload_form(multipart, &state.config.default_required_education).await?;
    if form.files.is_empty() {
        return Err(AppError::Validation(
            "At least one 'files' part is required".to_string(),
        ));
    }

    let documents = form
        .files
        .into_iter()
        .map(|(filename, bytes)| BatchDocument::file(filename, bytes))
        .collect();

    let ranker = BatchRanker::new(Arc::clone(&state.analyzer), state.config.batch_concurrency);
    let result = ranker
        .rank_concurrent(documents, Arc::new(form.requirements), &CancelFlag::default())
        .await;

    Ok(Json(result))
}

/// POST /api/v1/cv-analysis/analyze-text
///
/// Scores already-extracted text. Handy for callers that decode documents themselves.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let requirements = RequirementProfile {
        required_skills: clean_skills(request.required_skills),
        min_experience_years: request.min_experience_years,
        required_education: request
            .required_education
            .unwrap_or_else(|| state.config.default_required_education.clone()),
    };

    let analysis = state.analyzer.analyze(&request.text, &requirements);
    Ok(Json(AnalyzeResponse::new(analysis, None)))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(
    mut multipart: Multipart,
    default_education: &str,
) -> Result<UploadForm, AppError> {
    let mut files = Vec::new();
    let mut required_skills = Vec::new();
    let mut min_experience_years = 0u32;
    let mut required_education = default_education.to_string();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" | "files" => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let data = field.bytes().await?;
                files.push((filename, data));
            }
            "required_skills" => {
                let text = field.text().await?;
                required_skills.extend(split_skills(&text));
            }
            "min_experience_years" => {
                let text = field.text().await?;
                min_experience_years = text.trim().parse().map_err(|_| {
                    AppError::Validation(format!(
                        "min_experience_years must be a non-negative integer, got '{}'",
                        text.trim()
                    ))
                })?;
            }
            "required_education" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    required_education = text.trim().to_string();
                }
            }
            _ => {
                // Drain unknown parts so the stream can advance.
                let _ = field.bytes().await?;
            }
        }
    }

    Ok(UploadForm {
        files,
        requirements: RequirementProfile {
            required_skills,
            min_experience_years,
            required_education,
        },
    })
}

/// Accepts `python, react` as well as a JSON array `["python","react"]`.
fn split_skills(raw: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
        return clean_skills(list);
    }
    clean_skills(raw.split(',').map(str::to_string).collect())
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skills_comma_separated() {
        assert_eq!(
            split_skills(" Python, react ,,Docker "),
            vec!["Python", "react", "Docker"]
        );
    }

    #[test]
    fn test_split_skills_json_array() {
        assert_eq!(
            split_skills(r#"["Python", " React "]"#),
            vec!["Python", "React"]
        );
    }

    #[test]
    fn test_split_skills_blank() {
        assert!(split_skills("   ").is_empty());
    }
}
