use crate::DistmatError;
use common::types::config::OutputConfig;
use common::util::logging;
use harvester::step1_load::load_coordinates_file;
use harvester::step2_resolve::{resolve_distances, RoutingBackend};
use harvester::step3_write::ResultSink;
use log::{debug, info, warn};
use std::path::PathBuf;

pub struct MatrixJob {
    pub start: PathBuf,
    pub end: PathBuf,
    pub output: OutputConfig,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MatrixSummary {
    pub starts: usize,
    pub ends: usize,
    pub written: usize,
    pub dropped: usize,
}

/// Resolves every (start, end) pair of `job` and appends each start's batch to the output.
///
/// Both coordinate tables are loaded before the output is opened, so a bad input
/// leaves an existing output file untouched. Batches written before a fatal error stay on disk.
pub async fn compute_matrix<B: RoutingBackend + ?Sized>(
    job: &MatrixJob,
    backend: &B,
) -> Result<MatrixSummary, DistmatError> {
    let starts = load_coordinates_file(&job.start)?;
    let ends = load_coordinates_file(&job.end)?;
    info!(target: "matrix", "Loaded {} start and {} end locations", starts.len(), ends.len());

    let mut sink = ResultSink::open(&job.output.path, job.output.mode)?;

    let mut summary = MatrixSummary {
        starts: starts.len(),
        ends: ends.len(),
        written: 0,
        dropped: 0,
    };

    for (idx, start) in starts.iter().enumerate() {
        let task_desc = format!("Processing starting location {}/{} ({})", idx + 1, starts.len(), start.name);
        info!(target: "matrix", "{}...", task_desc);

        let end_set = ends.as_slice();
        let distances = logging::run_with_pb_async("matrix", &task_desc, ends.len() as u64, false, |pb| async move {
            resolve_distances(backend, start, end_set, &pb).await
        })
        .await?;

        let dropped = ends.len() - distances.len();
        if dropped > 0 {
            warn!(target: "matrix", "{} pairs from '{}' were dropped", dropped, start.name);
        }

        sink.append(&distances)?;
        debug!(target: "matrix", "Appended {} rows for '{}'", distances.len(), start.name);

        summary.written += distances.len();
        summary.dropped += dropped;
    }

    Ok(summary)
}
