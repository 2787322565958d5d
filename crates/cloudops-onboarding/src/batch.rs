//! Serial batch execution.

use std::time::Instant;

use tracing::{info, instrument};

use crate::orchestrator::Orchestrator;
use crate::record::OnboardingRecord;
use crate::result::{BatchSummary, ProcessedRecord};

/// Onboards every record in order, one at a time.
///
/// Records never run concurrently; the inter-record delay separates
/// consecutive records. A failed record does not stop the batch.
#[instrument(skip_all, fields(records = records.len()))]
pub async fn run_batch(
    orchestrator: &Orchestrator,
    records: Vec<OnboardingRecord>,
) -> BatchSummary {
    let started = Instant::now();
    let total = records.len();
    let delay = orchestrator.config().inter_record_delay;
    let mut summary = BatchSummary::default();

    for (index, record) in records.into_iter().enumerate() {
        info!(
            record = index + 1,
            total,
            principal_name = %record.principal_name,
            "Processing record"
        );

        let result = orchestrator.onboard(&record).await;
        let processed = ProcessedRecord { record, result };
        if processed.result.success {
            summary.successes.push(processed);
        } else {
            summary.failures.push(processed);
        }

        if index + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }

    summary.duration = started.elapsed();
    info!(
        succeeded = summary.successes.len(),
        failed = summary.failures.len(),
        "Batch complete"
    );
    summary
}
