//! Analyzer: the single-document entry point: decode → extract → score.

use std::sync::Arc;

use tracing::debug;

use crate::analysis::document::{DocumentDecoder, DocumentError, DocumentFormat, PdfTextDecoder};
use crate::analysis::extractor::FieldExtractor;
use crate::analysis::models::{Analysis, BatchResult, CandidateProfile, RequirementProfile};
use crate::analysis::normalize::NormalizedText;
use crate::analysis::ranking::{BatchDocument, BatchRanker};
use crate::analysis::scoring::ScoreEngine;

/// Owns the extractor, the score engine and the decoder capability.
/// Shared across requests as `Arc<Analyzer>`; holds no mutable state.
#[derive(Clone)]
pub struct Analyzer {
    extractor: FieldExtractor,
    engine: ScoreEngine,
    decoder: Arc<dyn DocumentDecoder>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(FieldExtractor::default(), Arc::new(PdfTextDecoder))
    }
}

impl Analyzer {
    pub fn new(extractor: FieldExtractor, decoder: Arc<dyn DocumentDecoder>) -> Self {
        Self {
            extractor,
            engine: ScoreEngine,
            decoder,
        }
    }

    /// Extracts and scores already-decoded text. Never fails.
    pub fn analyze(&self, text: &str, requirements: &RequirementProfile) -> Analysis {
        let normalized = NormalizedText::new(text);
        let candidate_info = if normalized.is_blank() {
            debug!("Document has no text content, skipping extraction");
            CandidateProfile::default()
        } else {
            self.extractor.extract(&normalized)
        };
        let score = self.engine.score(&candidate_info, requirements);
        Analysis {
            candidate_info,
            score,
        }
    }

    /// Resolves the format from `filename` and decodes `bytes` to text.
    pub fn decode(&self, filename: &str, bytes: &[u8]) -> Result<String, DocumentError> {
        let format = DocumentFormat::from_filename(filename)?;
        self.decoder.decode(bytes, format)
    }

    /// Decodes an uploaded file and analyzes it. Blocking: PDF decoding is CPU-bound.
    pub fn analyze_document(
        &self,
        filename: &str,
        bytes: &[u8],
        requirements: &RequirementProfile,
    ) -> Result<Analysis, DocumentError> {
        let text = self.decode(filename, bytes)?;
        Ok(self.analyze(&text, requirements))
    }

    /// Sequentially analyzes `(document_id, text)` pairs and ranks them.
    pub fn analyze_batch(
        self: &Arc<Self>,
        documents: Vec<(String, String)>,
        requirements: &RequirementProfile,
    ) -> BatchResult {
        let documents = documents
            .into_iter()
            .map(|(id, text)| BatchDocument::text(id, text))
            .collect();
        BatchRanker::new(Arc::clone(self), 1).rank(documents, requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Recommendation;

    const FIXTURE: &str = "Contact: a@b.com, phone 555-123-4567. 5 years experience in Python and React. Bachelor degree.";

    fn fixture_requirements() -> RequirementProfile {
        RequirementProfile {
            required_skills: vec!["python".into(), "react".into(), "docker".into()],
            min_experience_years: 3,
            required_education: "bachelor".into(),
        }
    }

    #[test]
    fn test_end_to_end_fixture() {
        let analysis = Analyzer::default().analyze(FIXTURE, &fixture_requirements());
        let info = &analysis.candidate_info;
        assert_eq!(info.email.as_deref(), Some("a@b.com"));
        assert_eq!(info.phone.as_deref(), Some("555-123-4567"));
        assert!(info.has_skill("python") && info.has_skill("react"));
        assert_eq!(info.experience_years, 5);
        assert!(info.has_degree("BACHELOR"));

        let b = analysis.score.breakdown;
        assert!((b.skills_match - 66.67).abs() < 1e-9);
        assert_eq!(b.experience_match, 100.0);
        assert_eq!(b.education_match, 100.0);
        assert_eq!(b.cv_completeness, 100.0);
        assert!((analysis.score.overall_score - 86.67).abs() < 1e-9);
        assert_eq!(analysis.score.recommendation, Recommendation::StrongMatch);
    }

    #[test]
    fn test_blank_text_scores_empty_profile() {
        let analysis = Analyzer::default().analyze(" \n\t ", &fixture_requirements());
        assert_eq!(analysis.candidate_info, CandidateProfile::default());
        assert_eq!(analysis.score.breakdown.cv_completeness, 0.0);
        assert_eq!(analysis.score.recommendation, Recommendation::WeakMatch);
    }

    #[test]
    fn test_analyze_document_plain_text() {
        let analysis = Analyzer::default()
            .analyze_document("cv.txt", FIXTURE.as_bytes(), &fixture_requirements())
            .unwrap();
        assert!((analysis.score.overall_score - 86.67).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_document_unsupported_format() {
        let err = Analyzer::default()
            .analyze_document("cv.odt", FIXTURE.as_bytes(), &fixture_requirements())
            .unwrap_err();
        assert_eq!(err, DocumentError::UnsupportedFormat("cv.odt".to_string()));
    }

    #[test]
    fn test_analyze_batch_from_text_pairs() {
        let analyzer = Arc::new(Analyzer::default());
        let result = analyzer.analyze_batch(
            vec![
                ("empty".to_string(), String::new()),
                ("fixture".to_string(), FIXTURE.to_string()),
            ],
            &fixture_requirements(),
        );
        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.successfully_analyzed, 2);
        assert_eq!(result.ranked_candidates[0].document_id, "fixture");
        assert!(result.errors.is_empty());
    }
}
