//! Result output: the JSON record array and the plain-text execution report.
//!
//! Records are written once, at the end of the batch or on interruption. A
//! file target is opened at startup in append mode so an unwritable path is
//! caught before any command runs. The summary always goes to stdout.

use super::batch::BatchAbort;
use crate::command::ExecutionRecord;
use crate::config::OutputTarget;
use crate::error::{BatchError, Result};
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

const REPORT_BANNER: &str = "---------------------- Execution Report ----------------------";
const REPORT_END_BANNER: &str = "-----------------------Execution Report End ---------------------";

#[derive(Debug)]
enum Sink {
    Stdout,
    File { path: PathBuf, file: File },
}

/// Writer for the JSON execution records
#[derive(Debug)]
pub struct ReportWriter {
    sink: Sink,
}

impl ReportWriter {
    /// Open `target`, creating a file target if needed
    pub fn open(target: OutputTarget) -> Result<Self> {
        let sink = match target {
            OutputTarget::Stdout => Sink::Stdout,
            OutputTarget::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| BatchError::OutputFile {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                Sink::File { path, file }
            }
        };
        Ok(Self { sink })
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self.sink, Sink::Stdout)
    }

    /// Write `records` as one pretty-printed JSON array; returns bytes written
    pub fn write_records(&mut self, records: &[ExecutionRecord]) -> Result<usize> {
        let json = serde_json::to_string_pretty(records)?;

        match &mut self.sink {
            Sink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
                stdout.flush()?;
                Ok(json.len() + 1)
            }
            Sink::File { path, file } => {
                file.write_all(json.as_bytes())?;
                file.flush()?;
                info!(
                    path = %path.display(),
                    bytes = json.len(),
                    records = records.len(),
                    "Wrote execution records"
                );
                Ok(json.len())
            }
        }
    }
}

/// Render the plain-text execution report.
///
/// A command stopped by its readiness check has no record; it is listed with
/// the failures and followed by a `Not run:` line naming what was skipped.
pub fn render_summary(records: &[ExecutionRecord], aborted: Option<&BatchAbort>) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{REPORT_BANNER}");
    let _ = writeln!(out);
    for record in records {
        let _ = writeln!(
            out,
            "{}: {} | Exited: {} | duration: {} ms",
            record.seq,
            record.command,
            record.exit_code,
            record.duration_ms()
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Failed Command List:");
    for record in records.iter().filter(|r| !r.succeeded()) {
        let _ = writeln!(out, "{}", record.command);
    }
    if let Some(abort) = aborted {
        let _ = writeln!(out, "{}", abort.command);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Not run: commands {}-{} of {} ({})",
            abort.seq, abort.total, abort.total, abort.reason
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{REPORT_END_BANNER}");
    let _ = writeln!(out);
    out
}

/// Print the execution report to stdout
pub fn print_summary(records: &[ExecutionRecord], aborted: Option<&BatchAbort>) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_summary(records, aborted).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(seq: usize, command: &str, exit_code: i32, ms: u64) -> ExecutionRecord {
        let mut record = ExecutionRecord::new(seq, command, "lb1");
        record.exit_code = exit_code;
        record.duration = Duration::from_millis(ms);
        record
    }

    #[test]
    fn test_summary_lists_failures() {
        let records = vec![
            record(1, "neutron lbaas-pool-delete pl-1", 0, 812),
            record(2, "neutron lbaas-pool-delete pl-2", 1, 40),
        ];
        let summary = render_summary(&records, None);

        assert!(summary.contains(REPORT_BANNER));
        assert!(summary.contains("1: neutron lbaas-pool-delete pl-1 | Exited: 0 | duration: 812 ms"));
        assert!(summary.contains("2: neutron lbaas-pool-delete pl-2 | Exited: 1 | duration: 40 ms"));

        let failed_section = summary.split("Failed Command List:").nth(1).unwrap();
        assert!(failed_section.contains("neutron lbaas-pool-delete pl-2"));
        assert!(!failed_section.contains("pl-1"));
        assert!(summary.trim_end().ends_with(REPORT_END_BANNER));
    }

    #[test]
    fn test_empty_summary() {
        let summary = render_summary(&[], None);
        assert!(summary.contains("Failed Command List:\n\n"));
    }

    #[test]
    fn test_summary_lists_aborted_command() {
        use crate::readiness::GateState;

        let records = vec![
            record(1, "neutron lbaas-pool-delete pl-1", 0, 10),
            record(2, "neutron lbaas-pool-delete pl-2", 0, 10),
        ];
        let abort = BatchAbort {
            seq: 3,
            total: 5,
            command: "neutron lbaas-pool-delete pl-3".to_string(),
            state: GateState::FailedPendingTimeout,
            reason: "Loadbalancer lb1 is still PENDING after 64 checks".to_string(),
        };
        let summary = render_summary(&records, Some(&abort));

        // no summary line for the command that never ran
        assert!(!summary.contains("3: neutron lbaas-pool-delete pl-3"));
        let failed_section = summary.split("Failed Command List:").nth(1).unwrap();
        assert!(failed_section.contains("neutron lbaas-pool-delete pl-3\n"));
        assert!(!failed_section.contains("pl-1"));
        assert!(summary.contains(
            "Not run: commands 3-5 of 5 (Loadbalancer lb1 is still PENDING after 64 checks)"
        ));
        assert!(summary.trim_end().ends_with(REPORT_END_BANNER));
    }

    #[test]
    fn test_open_unwritable_path_fails() {
        let err = ReportWriter::open(OutputTarget::File(PathBuf::from(
            "/nonexistent-dir/results.json",
        )))
        .unwrap_err();
        assert!(matches!(err, BatchError::OutputFile { .. }));
    }

    #[test]
    fn test_file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        for _ in 0..2 {
            let mut writer = ReportWriter::open(OutputTarget::File(path.clone())).unwrap();
            assert!(!writer.is_stdout());
            writer
                .write_records(&[record(1, "neutron lbaas-pool-list", 0, 1)])
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("\"seqnum\": 1").count(), 2);
    }
}
