//! Snapshot sources.
//!
//! A tick asks a [`SnapshotSource`] for the next fleet snapshot. The two
//! implementations are interchangeable: [`FileSource`] re-reads the
//! snapshot resource (the live ingestion path) and [`SimulatedSource`]
//! advances the current fleet with simulated drift.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use phm_core::error::CoreError;
use phm_core::ingest::{parse_fleet_with, IngestReport};
use phm_core::machine::MachineSnapshot;
use phm_core::simulation::TelemetrySimulator;
use phm_core::status::StatusThresholds;

/// Why a source could not supply a snapshot. Any of these fails the tick.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Snapshot resource {path} could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot resource is malformed: {0}")]
    Malformed(#[from] CoreError),
}

/// Supplies the next fleet snapshot for a tick.
#[async_trait]
pub trait SnapshotSource: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether snapshots from this source come from ingesting a document.
    /// Only those replace the rejected-entry report.
    fn ingests(&self) -> bool {
        true
    }

    /// Produce the candidate snapshot. `current` is the fleet as of the last
    /// successful tick.
    async fn next_snapshot(&mut self, current: &[MachineSnapshot]) -> Result<IngestReport, SourceError>;
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// Reads and ingests the snapshot resource on every call.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    thresholds: StatusThresholds,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, thresholds: StatusThresholds) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            thresholds,
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn next_snapshot(&mut self, _current: &[MachineSnapshot]) -> Result<IngestReport, SourceError> {
        let document = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), bytes = document.len(), "Read snapshot resource");
        Ok(parse_fleet_with(&document, &self.thresholds)?)
    }
}

// ---------------------------------------------------------------------------
// SimulatedSource
// ---------------------------------------------------------------------------

/// Advances a copy of the current fleet by one simulated step.
pub struct SimulatedSource {
    simulator: TelemetrySimulator,
}

impl SimulatedSource {
    pub fn new(simulator: TelemetrySimulator) -> Self {
        Self { simulator }
    }

    /// Seeded from `seed` when given, from the OS otherwise.
    pub fn from_seed(seed: Option<u64>, thresholds: StatusThresholds) -> Self {
        let simulator = match seed {
            Some(seed) => TelemetrySimulator::seeded(seed),
            None => TelemetrySimulator::from_os_rng(),
        };
        Self::new(simulator.with_thresholds(thresholds))
    }
}

#[async_trait]
impl SnapshotSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn ingests(&self) -> bool {
        false
    }

    async fn next_snapshot(&mut self, current: &[MachineSnapshot]) -> Result<IngestReport, SourceError> {
        Ok(IngestReport {
            fleet: self.simulator.advanced(current),
            rejected: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;

    const DOC: &str = r#"{
        "machines": [
            {
                "id": "M001",
                "name": "CNC-01",
                "healthIndex": 0.72,
                "rul": { "value": 180, "unit": "小時" },
                "parameters": { "temperature": 61.0, "vibration": 0.22, "pressure": 198.0 }
            }
        ]
    }"#;

    fn write_doc(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[tokio::test]
    async fn file_source_reads_and_ingests() {
        let file = write_doc(DOC);
        let mut source = FileSource::new(file.path(), StatusThresholds::default());

        let report = source.next_snapshot(&[]).await.unwrap();
        assert_eq!(report.fleet.len(), 1);
        assert_eq!(report.fleet[0].id, "M001");
        assert_eq!(source.name(), "file");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let mut source = FileSource::new("/nonexistent/machines.json", StatusThresholds::default());
        assert_matches!(source.next_snapshot(&[]).await, Err(SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_document_is_rejected() {
        let file = write_doc("{ \"machines\": 12 }");
        let mut source = FileSource::new(file.path(), StatusThresholds::default());
        assert_matches!(source.next_snapshot(&[]).await, Err(SourceError::Malformed(_)));
    }

    #[tokio::test]
    async fn simulated_source_advances_a_copy() {
        let file = write_doc(DOC);
        let fleet = FileSource::new(file.path(), StatusThresholds::default())
            .next_snapshot(&[])
            .await
            .unwrap()
            .fleet;

        let mut source = SimulatedSource::from_seed(Some(9), StatusThresholds::default());
        let report = source.next_snapshot(&fleet).await.unwrap();

        assert_eq!(report.fleet.len(), 1);
        assert!(report.rejected.is_empty());
        assert!(!source.ingests());
        assert_ne!(report.fleet[0].parameters, fleet[0].parameters);
        assert_eq!(fleet[0].health_index, 0.72);
    }
}
