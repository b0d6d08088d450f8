//! core::report
//!
//! Per-step run report.
//!
//! # Design
//!
//! The executor appends one record per executed step and writes the report
//! as a JSON artifact next to the other CI outputs. A failed run still gets
//! a report: it ends at the failing step, with no records for the steps
//! that never ran (fail-fast, no partial-success semantics).

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::{RunId, UtcTimestamp};

/// Outcome of a single executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step completed successfully.
    Succeeded,
    /// The step failed; execution stopped here.
    Failed,
    /// The step was deliberately not performed (e.g. coverage upload on an
    /// excluded interpreter build) and the pipeline continued.
    Skipped,
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Human-readable step description.
    pub description: String,
    /// How the step ended.
    pub outcome: StepOutcome,
    /// Exit code of the spawned command, when one was spawned.
    pub exit_code: Option<i32>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// JSON artifact describing one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id for this run.
    pub run_id: RunId,
    /// Which branch of the pipeline ran ("docs" or "tests").
    pub command: String,
    /// Digest of the executed plan.
    pub plan_digest: String,
    /// When execution started.
    pub started_at: UtcTimestamp,
    /// When execution finished (success or failure).
    pub finished_at: Option<UtcTimestamp>,
    /// Whether every step succeeded or was skipped.
    pub success: bool,
    /// One record per step that ran, in execution order.
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    /// Start a new report for a plan.
    pub fn new(command: impl Into<String>, plan_digest: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            command: command.into(),
            plan_digest: plan_digest.into(),
            started_at: UtcTimestamp::now(),
            finished_at: None,
            success: false,
            steps: vec![],
        }
    }

    /// Append a step record.
    pub fn record(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// Mark the run finished.
    pub fn finish(&mut self, success: bool) {
        self.finished_at = Some(UtcTimestamp::now());
        self.success = success;
    }

    /// Write the report as pretty JSON.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(outcome: StepOutcome, exit_code: Option<i32>) -> StepRecord {
        StepRecord {
            description: "upgrade packaging tools".to_string(),
            outcome,
            exit_code,
            duration_ms: 12,
        }
    }

    #[test]
    fn records_accumulate_in_order() {
        let mut report = RunReport::new("tests", "sha256:abc");
        report.record(sample_record(StepOutcome::Succeeded, Some(0)));
        report.record(sample_record(StepOutcome::Failed, Some(3)));

        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.steps[1].outcome, StepOutcome::Failed);
        assert_eq!(report.steps[1].exit_code, Some(3));
    }

    #[test]
    fn finish_sets_timestamp_and_success() {
        let mut report = RunReport::new("docs", "sha256:abc");
        assert!(report.finished_at.is_none());

        report.finish(true);
        assert!(report.finished_at.is_some());
        assert!(report.success);
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&StepOutcome::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = RunReport::new("tests", "sha256:abc");
        report.record(sample_record(StepOutcome::Skipped, None));
        report.finish(true);
        report.write(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.steps, report.steps);
        assert!(parsed.success);
    }
}
