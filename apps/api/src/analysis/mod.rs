// CV analysis core.
// Pipeline: decode → normalize → extract fields → score → rank.
// Everything below `handlers` is synchronous and free of I/O apart from the decoder.

pub mod analyzer;
pub mod document;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod vocabulary;

// Re-export the public API consumed by routes and callers embedding the core.
pub use analyzer::Analyzer;
pub use document::{DocumentDecoder, DocumentError, DocumentFormat, PdfTextDecoder};
pub use models::{
    Analysis, BatchResult, CandidateProfile, Recommendation, RequirementProfile, ScoreBreakdown,
    ScoreResult,
};
pub use ranking::{BatchDocument, BatchRanker, CancelFlag};
