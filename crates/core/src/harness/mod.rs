//! Experiment harness: sweeps aligners over a corpus and ranks them.
//!
//! Documents are independent, so a batch is spread over a rayon pool keyed by
//! document. Each completed document is written to the sink immediately; a
//! failing document is logged, counted and skipped without stopping the rest.
//! Metrics are aggregated micro-style: TP/FP/FN are summed per configuration
//! across documents before precision, recall and F1 are derived.

mod io;
mod report;
mod sweep;

use std::sync::Mutex;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{AlignError, Result};
use crate::metrics::{ClassCounts, Metrics};
use crate::model::Document;

pub use io::{DocumentSource, JsonDocumentSource, JsonlSink, NullSink, ResultSink};
pub use report::{BatchReport, ComparisonRow, ComparisonTable, FailedDocument};
pub use sweep::{DocumentRecord, RunRecord, RunSpec, Sweep, run_document};

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compares every configuration of `sweep` on a single document.
pub fn compare_document(document: &Document, sweep: &Sweep) -> Result<ComparisonTable> {
    let runs = sweep.plan()?;
    let record = run_document(document, &runs)?;
    let rows = record
        .runs
        .iter()
        .map(|run| ComparisonRow::new(run.algorithm, run.threshold, &run.metrics))
        .collect();
    Ok(ComparisonTable::ranked(rows))
}

type Outcome = (usize, String, Result<Vec<[ClassCounts; 2]>>);

/// Runs `sweep` over every document of `source`.
///
/// `threads` defaults to the available parallelism. Configuration errors
/// fail the call before any document is touched; per-document errors are
/// reported in [`BatchReport::failed`].
pub fn run_batch<S>(
    source: &S,
    sweep: &Sweep,
    sink: &mut dyn ResultSink,
    threads: Option<usize>,
) -> Result<BatchReport>
where
    S: DocumentSource + ?Sized,
{
    let runs = sweep.plan()?;
    let ids = source.ids();
    let thread_count = threads.unwrap_or_else(default_thread_count).max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| AlignError::ThreadPool(e.to_string()))?;

    let sink = Mutex::new(sink);
    let mut outcomes: Vec<Outcome> = pool.install(|| {
        ids.into_par_iter()
            .enumerate()
            .map(|(idx, key)| {
                let (id, outcome) = process(source, &key, &runs, &sink);
                let outcome = outcome.map_err(|e| {
                    warn!(document = %id, error = %e, "skipping document");
                    AlignError::Document {
                        id: id.clone(),
                        source: Box::new(e),
                    }
                });
                (idx, id, outcome)
            })
            .collect()
    });
    outcomes.sort_by_key(|(idx, _, _)| *idx);

    let mut totals = vec![[ClassCounts::default(); 2]; runs.len()];
    let mut report = BatchReport::default();
    for (_, id, outcome) in outcomes {
        match outcome {
            Ok(counts) => {
                for (total, doc) in totals.iter_mut().zip(counts) {
                    total[0] += doc[0];
                    total[1] += doc[1];
                }
                report.processed += 1;
            }
            Err(AlignError::Document { source, .. }) => report.failed.push(FailedDocument {
                id,
                error: source.to_string(),
            }),
            Err(e) => report.failed.push(FailedDocument {
                id,
                error: e.to_string(),
            }),
        }
    }

    let rows = runs
        .iter()
        .zip(&totals)
        .map(|(run, counts)| {
            ComparisonRow::new(
                run.algorithm,
                run.threshold,
                &Metrics::from_counts(counts[0], counts[1]),
            )
        })
        .collect();
    report.table = ComparisonTable::ranked(rows);

    info!(
        processed = report.processed,
        failed = report.failed_count(),
        runs = runs.len(),
        threads = thread_count,
        "batch complete"
    );
    Ok(report)
}

/// Loads and aligns one document, returning the name it is reported under:
/// the document's own id once loaded, the source key otherwise.
fn process<S>(
    source: &S,
    key: &str,
    runs: &[RunSpec],
    sink: &Mutex<&mut dyn ResultSink>,
) -> (String, Result<Vec<[ClassCounts; 2]>>)
where
    S: DocumentSource + ?Sized,
{
    let document = match source.load(key) {
        Ok(document) => document,
        Err(e) => return (key.to_string(), Err(e)),
    };
    let id = if document.id.is_empty() {
        key.to_string()
    } else {
        document.id.clone()
    };
    (id, run_and_write(&document, runs, sink))
}

fn run_and_write(
    document: &Document,
    runs: &[RunSpec],
    sink: &Mutex<&mut dyn ResultSink>,
) -> Result<Vec<[ClassCounts; 2]>> {
    let record = run_document(document, runs)?;
    let counts = record.runs.iter().map(|run| run.counts).collect();

    let mut sink = sink
        .lock()
        .map_err(|_| AlignError::ThreadPool("result sink lock poisoned".to_string()))?;
    sink.write(&record)?;
    Ok(counts)
}
