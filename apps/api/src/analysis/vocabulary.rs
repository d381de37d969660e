//! Keyword lists the extractor matches against.
//!
//! The lists are plain configuration values handed to `FieldExtractor::new`.
//! Nothing here is mutable process state.

const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "c++",
    "react",
    "nodejs",
    "angular",
    "vue",
    "django",
    "flask",
    "fastapi",
    "sql",
    "postgresql",
    "mongodb",
    "redis",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "machine learning",
    "ai",
    "data science",
    "deep learning",
    "nlp",
    "git",
    "agile",
    "scrum",
    "jenkins",
    "ci/cd",
    "microservices",
];

const DEGREE_KEYWORDS: &[&str] = &["phd", "master", "bachelor", "mba", "msc", "bsc", "ba", "ma"];

/// Degree codes that satisfy a "master" requirement.
pub const MASTER_LEVEL: &[&str] = &["MASTER", "MBA", "MSC", "MA"];
/// Degree codes that satisfy a "bachelor" requirement.
pub const BACHELOR_LEVEL: &[&str] = &["BACHELOR", "BSC", "BA"];

/// Immutable keyword configuration for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    skills: Vec<String>,
    degrees: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from arbitrary lists. Terms are lower-cased and
    /// duplicates dropped; empty terms are ignored.
    pub fn new<S, D>(skills: S, degrees: D) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            skills: normalize_terms(skills),
            degrees: normalize_terms(degrees),
        }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn degrees(&self) -> &[String] {
        &self.degrees
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(SKILL_KEYWORDS, DEGREE_KEYWORDS)
    }
}

fn normalize_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_sizes() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.skills().len(), SKILL_KEYWORDS.len());
        assert_eq!(vocab.degrees().len(), 8);
    }

    #[test]
    fn test_custom_vocabulary_is_normalized() {
        let vocab = Vocabulary::new(["Rust", " rust ", "", "Tokio"], ["PhD"]);
        assert_eq!(vocab.skills(), ["rust".to_string(), "tokio".to_string()]);
        assert_eq!(vocab.degrees(), ["phd".to_string()]);
    }
}
