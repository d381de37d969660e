use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Extraction output
// ────────────────────────────────────────────────────────────────────────────

/// Structured fields extracted from one résumé.
///
/// Skills are stored in title case and degree codes in upper case, so every
/// downstream comparison can lower-case both sides without surprises.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub education: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn has_skill(&self, skill: &str) -> bool {
        let wanted = skill.to_lowercase();
        self.skills.iter().any(|s| s.to_lowercase() == wanted)
    }

    pub fn has_degree(&self, code: &str) -> bool {
        self.education.contains(code)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring input / output
// ────────────────────────────────────────────────────────────────────────────

/// Job requirements a candidate is scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_experience_years: u32,
    #[serde(default = "default_required_education")]
    pub required_education: String,
}

pub fn default_required_education() -> String {
    "bachelor".to_string()
}

impl Default for RequirementProfile {
    fn default() -> Self {
        Self {
            required_skills: Vec::new(),
            min_experience_years: 0,
            required_education: default_required_education(),
        }
    }
}

/// Per-component scores, each in [0, 100] before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    pub cv_completeness: f64,
}

/// Hiring recommendation tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Match")]
    StrongMatch,
    #[serde(rename = "Good Match")]
    GoodMatch,
    #[serde(rename = "Moderate Match")]
    ModerateMatch,
    #[serde(rename = "Weak Match")]
    WeakMatch,
}

impl Recommendation {
    /// Inclusive lower bounds: a score sitting exactly on a boundary takes the higher tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Recommendation::StrongMatch
        } else if score >= 65.0 {
            Recommendation::GoodMatch
        } else if score >= 50.0 {
            Recommendation::ModerateMatch
        } else {
            Recommendation::WeakMatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongMatch => "Strong Match",
            Recommendation::GoodMatch => "Good Match",
            Recommendation::ModerateMatch => "Moderate Match",
            Recommendation::WeakMatch => "Weak Match",
        }
    }

    /// Interview advice shown next to the label.
    pub fn advice(&self) -> &'static str {
        match self {
            Recommendation::StrongMatch => "Highly Recommended for Interview",
            Recommendation::GoodMatch => "Recommended for Interview",
            Recommendation::ModerateMatch => "Consider for Interview",
            Recommendation::WeakMatch => "Not Recommended",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub recommendation: Recommendation,
}

/// Extraction plus scoring for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub candidate_info: CandidateProfile,
    pub score: ScoreResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Batch output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub document_id: String,
    pub candidate_info: CandidateProfile,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    pub document_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub total_candidates: usize,
    pub successfully_analyzed: usize,
    /// Highest score first; equal scores keep their submission order.
    pub ranked_candidates: Vec<RankedCandidate>,
    pub errors: Vec<BatchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_boundaries_belong_to_higher_tier() {
        assert_eq!(Recommendation::from_score(80.0), Recommendation::StrongMatch);
        assert_eq!(Recommendation::from_score(79.99), Recommendation::GoodMatch);
        assert_eq!(Recommendation::from_score(65.0), Recommendation::GoodMatch);
        assert_eq!(Recommendation::from_score(50.0), Recommendation::ModerateMatch);
        assert_eq!(Recommendation::from_score(49.99), Recommendation::WeakMatch);
        assert_eq!(Recommendation::from_score(0.0), Recommendation::WeakMatch);
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        let json = serde_json::to_string(&Recommendation::ModerateMatch).unwrap();
        assert_eq!(json, r#""Moderate Match""#);
        let back: Recommendation = serde_json::from_str(r#""Strong Match""#).unwrap();
        assert_eq!(back, Recommendation::StrongMatch);
    }

    #[test]
    fn test_requirement_profile_defaults_when_fields_missing() {
        let req: RequirementProfile = serde_json::from_str("{}").unwrap();
        assert!(req.required_skills.is_empty());
        assert_eq!(req.min_experience_years, 0);
        assert_eq!(req.required_education, "bachelor");
    }

    #[test]
    fn test_has_skill_is_case_insensitive() {
        let mut profile = CandidateProfile::default();
        profile.skills.insert("Python".to_string());
        assert!(profile.has_skill("PYTHON"));
        assert!(profile.has_skill("python"));
        assert!(!profile.has_skill("rust"));
    }
}
