//! Batch Ranker: analyzes many documents against one requirement profile and
//! orders the successes by score.
//!
//! Each document is independent: a decode failure becomes an entry in `errors`
//! and the rest of the batch carries on. Concurrent runs write into one result
//! slot per input index, so the final ordering never depends on completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::document::DocumentError;
use crate::analysis::models::{
    Analysis, BatchError, BatchResult, RankedCandidate, RequirementProfile,
};

const CANCELLED_MESSAGE: &str = "Analysis cancelled before this document was processed";
const ABORTED_MESSAGE: &str = "Analysis task aborted unexpectedly";

#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Already-decoded text.
    Text(String),
    /// Raw upload; the format comes from the document id (its filename).
    File(Bytes),
}

#[derive(Debug, Clone)]
pub struct BatchDocument {
    pub id: String,
    pub source: DocumentSource,
}

impl BatchDocument {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: DocumentSource::Text(text.into()),
        }
    }

    pub fn file(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            id: filename.into(),
            source: DocumentSource::File(bytes.into()),
        }
    }
}

/// Stops a concurrent batch from scheduling further documents once set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type Outcome = Result<Analysis, DocumentError>;

pub struct BatchRanker {
    analyzer: Arc<Analyzer>,
    concurrency: usize,
}

impl BatchRanker {
    /// `concurrency` is clamped to at least 1.
    pub fn new(analyzer: Arc<Analyzer>, concurrency: usize) -> Self {
        Self {
            analyzer,
            concurrency: concurrency.max(1),
        }
    }

    /// Processes documents one after another on the calling thread.
    pub fn rank(&self, documents: Vec<BatchDocument>, requirements: &RequirementProfile) -> BatchResult {
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let slots = documents
            .into_iter()
            .map(|doc| Slot::Done(analyze_one(&self.analyzer, doc, requirements)))
            .collect();
        assemble(ids, slots)
    }

    /// Processes up to `concurrency` documents at a time on the blocking pool.
    ///
    /// Once `cancel` is set no further documents are scheduled; documents already
    /// in flight finish and are reported normally, the rest are reported as cancelled.
    pub async fn rank_concurrent(
        &self,
        documents: Vec<BatchDocument>,
        requirements: Arc<RequirementProfile>,
        cancel: &CancelFlag,
    ) -> BatchResult {
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let mut slots: Vec<Slot> = ids.iter().map(|_| Slot::Cancelled).collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, doc) in documents.into_iter().enumerate() {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            if cancel.is_cancelled() {
                break;
            }
            slots[index] = Slot::Aborted;

            let analyzer = Arc::clone(&self.analyzer);
            let requirements = Arc::clone(&requirements);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, analyze_one(&analyzer, doc, &requirements))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Slot::Done(outcome),
                Err(e) => warn!("Batch analysis task failed: {e}"),
            }
        }

        assemble(ids, slots)
    }
}

enum Slot {
    Done(Outcome),
    /// Scheduled but the task never reported back.
    Aborted,
    /// Never scheduled.
    Cancelled,
}

fn analyze_one(
    analyzer: &Analyzer,
    doc: BatchDocument,
    requirements: &RequirementProfile,
) -> Outcome {
    match doc.source {
        DocumentSource::Text(text) => Ok(analyzer.analyze(&text, requirements)),
        DocumentSource::File(bytes) => analyzer.analyze_document(&doc.id, &bytes, requirements),
    }
}

/// Splits outcomes into ranked successes and errors, both keyed by document id.
fn assemble(ids: Vec<String>, slots: Vec<Slot>) -> BatchResult {
    let batch_id = Uuid::new_v4();
    let total_candidates = ids.len();
    let mut ranked_candidates = Vec::new();
    let mut errors = Vec::new();

    for (document_id, slot) in ids.into_iter().zip(slots) {
        let message = match slot {
            Slot::Done(Ok(analysis)) => {
                ranked_candidates.push(RankedCandidate {
                    document_id,
                    candidate_info: analysis.candidate_info,
                    score: analysis.score,
                });
                continue;
            }
            Slot::Done(Err(e)) => e.to_string(),
            Slot::Aborted => ABORTED_MESSAGE.to_string(),
            Slot::Cancelled => CANCELLED_MESSAGE.to_string(),
        };
        warn!(%batch_id, document_id = %document_id, "Document not analyzed: {message}");
        errors.push(BatchError {
            document_id,
            error: message,
        });
    }

    // `sort_by` is stable: equal scores keep their submission order.
    ranked_candidates.sort_by(|a, b| b.score.overall_score.total_cmp(&a.score.overall_score));

    let successfully_analyzed = ranked_candidates.len();
    info!(
        %batch_id,
        total = total_candidates,
        analyzed = successfully_analyzed,
        failed = errors.len(),
        "Batch analysis complete"
    );

    BatchResult {
        batch_id,
        total_candidates,
        successfully_analyzed,
        ranked_candidates,
        errors,
    }
}
