//! Field Extractor: pulls contact details, skills, experience and education out of
//! résumé text with fixed lexical patterns.
//!
//! Matching is substring/regex based, not linguistic: "ba" matches inside "database"
//! and "ai" inside "maintain". That is a known limitation of the approach.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::analysis::models::CandidateProfile;
use crate::analysis::normalize::{title_case, NormalizedText};
use crate::analysis::vocabulary::Vocabulary;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern")
});

/// Experience patterns in priority order. Only the first pattern that matches
/// anywhere is consulted, and only its first match.
static EXPERIENCE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(\d+)\+?\s*years?\s+(?:of\s+)?experience").expect("experience pattern"),
        Regex::new(r"experience[:\s]+(\d+)\+?\s*years?").expect("experience pattern"),
        Regex::new(r"(\d+)\+?\s*years?\s+in").expect("experience pattern"),
    ]
});

static DECIMAL_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("digit pattern"));

/// Applies the pattern rules to one document. Never fails; every field falls back
/// to absent/zero/empty.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    vocabulary: Vocabulary,
}

impl FieldExtractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn extract(&self, text: &NormalizedText<'_>) -> CandidateProfile {
        let profile = CandidateProfile {
            email: extract_email(text.raw()),
            phone: extract_phone(text.raw()),
            skills: self.extract_skills(text.lowered()),
            experience_years: extract_experience_years(text.lowered()),
            education: self.extract_education(text.lowered()),
        };

        debug!(
            has_email = profile.email.is_some(),
            has_phone = profile.phone.is_some(),
            skills = profile.skills.len(),
            experience_years = profile.experience_years,
            degrees = profile.education.len(),
            "Extracted candidate fields"
        );

        profile
    }

    fn extract_skills(&self, lowered: &str) -> BTreeSet<String> {
        self.vocabulary
            .skills()
            .iter()
            .filter(|skill| lowered.contains(skill.as_str()))
            .map(|skill| title_case(skill))
            .collect()
    }

    fn extract_education(&self, lowered: &str) -> BTreeSet<String> {
        self.vocabulary
            .degrees()
            .iter()
            .filter(|degree| lowered.contains(degree.as_str()))
            .map(|degree| degree.to_uppercase())
            .collect()
    }
}

fn extract_email(raw: &str) -> Option<String> {
    EMAIL_RE.find(raw).map(|m| m.as_str().to_string())
}

fn extract_phone(raw: &str) -> Option<String> {
    PHONE_RE.find(raw).map(|m| m.as_str().trim().to_string())
}

fn extract_experience_years(lowered: &str) -> u32 {
    for pattern in EXPERIENCE_RES.iter() {
        if let Some(caps) = pattern.captures(lowered) {
            return parse_decimal(&caps[1]);
        }
    }
    0
}

/// Parses a run of `\d` characters from any script (`٥`, `５`, `5`).
/// Values beyond `u32::MAX` saturate.
fn parse_decimal(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(decimal_value)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

/// Unicode decimal digits come in contiguous ascending runs of ten starting at zero,
/// so a digit's value is its offset from the start of its run, modulo ten.
fn decimal_value(ch: char) -> Option<u32> {
    if let Some(d) = ch.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(ch) {
        return None;
    }
    let mut start = ch as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((ch as u32 - start) % 10)
}

fn is_decimal_digit(ch: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT_RE.is_match(ch.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> CandidateProfile {
        FieldExtractor::default().extract(&NormalizedText::new(text))
    }

    #[test]
    fn test_email_first_match_keeps_case() {
        let p = extract("Reach me at Jane.Doe@Example.com or jd@backup.io");
        assert_eq!(p.email.as_deref(), Some("Jane.Doe@Example.com"));
    }

    #[test]
    fn test_email_absent() {
        assert_eq!(extract("no contact details here @ all").email, None);
    }

    #[test]
    fn test_phone_dashes() {
        let p = extract("phone 555-123-4567.");
        assert_eq!(p.phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn test_phone_country_code_and_parens() {
        let p = extract("Tel: +1 (555) 123-4567");
        assert_eq!(p.phone.as_deref(), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn test_phone_dots() {
        let p = extract("call 555.123.4567 after 5pm");
        assert_eq!(p.phone.as_deref(), Some("555.123.4567"));
    }

    #[test]
    fn test_phone_absent_for_short_numbers() {
        assert_eq!(extract("room 12, floor 3").phone, None);
    }

    #[test]
    fn test_skills_collapse_duplicates_in_any_case() {
        let p = extract("PYTHON, python, Python and more pYtHoN");
        assert_eq!(p.skills.iter().filter(|s| *s == "Python").count(), 1);
        assert!(p.skills.contains("Python"));
    }

    #[test]
    fn test_skills_empty_without_vocabulary_terms() {
        let vocab = Vocabulary::new(["rust", "tokio"], ["phd"]);
        let extractor = FieldExtractor::new(vocab);
        let p = extractor.extract(&NormalizedText::new("Gardening, cooking, hiking"));
        assert!(p.skills.is_empty());
    }

    #[test]
    fn test_custom_vocabulary_substitution() {
        let extractor = FieldExtractor::new(Vocabulary::new(["rust", "tokio"], ["phd"]));
        let p = extractor.extract(&NormalizedText::new("RUST with Tokio; PhD in CS; Python"));
        let skills: Vec<_> = p.skills.iter().cloned().collect();
        assert_eq!(skills, vec!["Rust".to_string(), "Tokio".to_string()]);
        assert!(p.has_degree("PHD"));
    }

    #[test]
    fn test_multi_word_and_symbol_skills() {
        let p = extract("Worked on Machine Learning pipelines with CI/CD and C++");
        assert!(p.skills.contains("Machine Learning"));
        assert!(p.skills.contains("Ci/Cd"));
        assert!(p.skills.contains("C++"));
    }

    #[test]
    fn test_experience_first_pattern() {
        assert_eq!(extract("7+ years of experience building APIs").experience_years, 7);
        assert_eq!(extract("5 years experience in Python").experience_years, 5);
    }

    #[test]
    fn test_experience_second_pattern() {
        assert_eq!(extract("Experience: 4 years").experience_years, 4);
    }

    #[test]
    fn test_experience_third_pattern() {
        assert_eq!(extract("Spent 3 years in banking").experience_years, 3);
    }

    #[test]
    fn test_experience_priority_beats_position() {
        // The "in" mention comes first in the text but the first pattern wins.
        let text = "2 years in retail, then 6 years of experience in software";
        assert_eq!(extract(text).experience_years, 6);
    }

    #[test]
    fn test_experience_first_match_of_pattern_only() {
        let text = "3 years experience at A. 10 years experience overall.";
        assert_eq!(extract(text).experience_years, 3);
    }

    #[test]
    fn test_experience_non_ascii_digits() {
        assert_eq!(extract("٥ years experience in Python").experience_years, 5);
        assert_eq!(extract("١٢ years of experience").experience_years, 12);
        assert_eq!(extract("Spent ３ years in banking").experience_years, 3);
    }

    #[test]
    fn test_experience_huge_number_saturates() {
        let text = "99999999999 years experience";
        assert_eq!(extract(text).experience_years, u32::MAX);
    }

    #[test]
    fn test_experience_defaults_to_zero() {
        assert_eq!(extract("Fresh graduate").experience_years, 0);
    }

    #[test]
    fn test_education_set_upper_cased() {
        let p = extract("PhD in Physics, MSc in Maths");
        assert!(p.has_degree("PHD"));
        assert!(p.has_degree("MSC"));
        assert!(p.has_degree("MA"));
    }

    #[test]
    fn test_bachelor_also_matches_ba() {
        let p = extract("Bachelor degree");
        assert!(p.has_degree("BACHELOR"));
        assert!(p.has_degree("BA"));
    }

    #[test]
    fn test_empty_text_gives_default_profile() {
        assert_eq!(extract(""), CandidateProfile::default());
    }

    #[test]
    fn test_garbage_text_never_panics() {
        let p = extract("\u{0}\u{FFFD}%%%@@@...+++((()))");
        assert_eq!(p.email, None);
        assert_eq!(p.experience_years, 0);
    }
}
