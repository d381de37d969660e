//! Score Engine: turns an extracted `CandidateProfile` plus a `RequirementProfile`
//! into a weighted 0–100 score, a per-component breakdown and a recommendation.
//!
//! Pure arithmetic: no I/O, no hidden state, same inputs always give the same result.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{
    CandidateProfile, Recommendation, RequirementProfile, ScoreBreakdown, ScoreResult,
};
use crate::analysis::vocabulary::{BACHELOR_LEVEL, MASTER_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub completeness: f64,
}

/// Fixed weighting policy. Callers cannot override it per request.
pub const SCORING_WEIGHTS: ScoringWeights = ScoringWeights {
    skills: 0.4,
    experience: 0.3,
    education: 0.2,
    completeness: 0.1,
};

/// Multiplier applied when a candidate has fewer years than required.
const UNDER_EXPERIENCE_FACTOR: f64 = 70.0;
/// Partial credit for having some degree that does not meet the named tier.
const PARTIAL_EDUCATION_SCORE: f64 = 80.0;
const COMPLETENESS_STEP: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn weights(&self) -> ScoringWeights {
        SCORING_WEIGHTS
    }

    pub fn score(
        &self,
        candidate: &CandidateProfile,
        requirements: &RequirementProfile,
    ) -> ScoreResult {
        // Skills are rounded before weighting; the other components are weighted raw.
        let raw = ScoreBreakdown {
            skills_match: round2(skills_match(candidate, &requirements.required_skills)),
            experience_match: experience_match(
                candidate.experience_years,
                requirements.min_experience_years,
            ),
            education_match: education_match(candidate, &requirements.required_education),
            cv_completeness: completeness(candidate),
        };

        // The tier comes from the unrounded total, so 49.9987 is still a weak match.
        let total = weighted_total(&raw, &SCORING_WEIGHTS);

        ScoreResult {
            overall_score: round2(total),
            breakdown: ScoreBreakdown {
                skills_match: raw.skills_match,
                experience_match: round2(raw.experience_match),
                education_match: round2(raw.education_match),
                cv_completeness: round2(raw.cv_completeness),
            },
            recommendation: Recommendation::from_score(total),
        }
    }
}

/// Σ(component × weight), each component clamped to [0, 100] first.
fn weighted_total(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    let clamp = |v: f64| v.clamp(0.0, 100.0);
    clamp(breakdown.skills_match) * weights.skills
        + clamp(breakdown.experience_match) * weights.experience
        + clamp(breakdown.education_match) * weights.education
        + clamp(breakdown.cv_completeness) * weights.completeness
}

/// Share of required skills the candidate has, ×100. No requirements → 100.
/// Duplicated requirements count once per occurrence.
fn skills_match(candidate: &CandidateProfile, required: &[String]) -> f64 {
    if required.is_empty() {
        return 100.0;
    }
    let matched = required.iter().filter(|s| candidate.has_skill(s)).count();
    matched as f64 / required.len() as f64 * 100.0
}

fn experience_match(candidate_years: u32, required_years: u32) -> f64 {
    let c = f64::from(candidate_years);
    let denominator = f64::from(required_years.max(1));
    if candidate_years >= required_years {
        (c / denominator * 100.0).min(100.0)
    } else {
        c / denominator * UNDER_EXPERIENCE_FACTOR
    }
}

/// Tiers are checked phd → master → bachelor; the first satisfied tier wins.
fn education_match(candidate: &CandidateProfile, required_education: &str) -> f64 {
    let required = required_education.to_lowercase();
    let has_any = |codes: &[&str]| codes.iter().any(|c| candidate.has_degree(c));

    if required.contains("phd") && candidate.has_degree("PHD") {
        100.0
    } else if required.contains("master") && has_any(MASTER_LEVEL) {
        100.0
    } else if required.contains("bachelor") && has_any(BACHELOR_LEVEL) {
        100.0
    } else if !candidate.education.is_empty() {
        PARTIAL_EDUCATION_SCORE
    } else {
        0.0
    }
}

fn completeness(candidate: &CandidateProfile) -> f64 {
    let present = [
        candidate.email.is_some(),
        candidate.phone.is_some(),
        !candidate.skills.is_empty(),
        candidate.experience_years > 0,
    ];
    present.iter().filter(|p| **p).count() as f64 * COMPLETENESS_STEP
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
