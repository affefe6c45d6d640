use crate::report::Report;
use crate::upload::{FileStatus, SelectedFile, UploadResult, UploadStatus};
use std::sync::mpsc::Receiver;
use tracing::warn;

/// What the background batch sends back once it is done.
pub type BatchOutcome = Result<Vec<UploadResult>, String>;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ActionProgress {
    #[default]
    NotStarted,
    Processing {
        total: usize,
        current: usize,
        successful: usize,
        failed: usize,
    },
    Completed {
        total: usize,
        successful: usize,
        failed: usize,
    },
}

#[derive(Default)]
pub struct UploadState {
    pub selected_files: Vec<SelectedFile>,
    pub progress: ActionProgress,
    pub file_statuses: Vec<FileStatus>,
    pub report: Option<Report>,
    pub error_message: Option<String>,
    /// Blocking alert shown over the whole window until dismissed
    pub alert: Option<String>,
    pub show_details: bool,
    pub is_uploading: bool,
    pub status_receiver: Option<Receiver<FileStatus>>,
    pub outcome_receiver: Option<Receiver<BatchOutcome>>,
}

impl UploadState {
    pub fn clear(&mut self) {
        *self = UploadState::default();
    }

    /// Forget the previous batch but keep the selection.
    pub fn begin_batch(&mut self, total: usize) {
        self.progress = ActionProgress::Processing {
            total,
            current: 0,
            successful: 0,
            failed: 0,
        };
        self.file_statuses.clear();
        self.report = None;
        self.error_message = None;
        self.is_uploading = true;
    }

    pub fn apply_status(&mut self, status: FileStatus) {
        if let ActionProgress::Processing {
            current,
            successful,
            failed,
            ..
        } = &mut self.progress
        {
            match &status.status {
                UploadStatus::Processing => *current += 1,
                UploadStatus::Success => *successful += 1,
                UploadStatus::Error(_) => *failed += 1,
            }
        }
        self.file_statuses.push(status);
    }

    pub fn finish(&mut self, outcome: BatchOutcome) {
        self.is_uploading = false;
        match outcome {
            Ok(results) => {
                let successful = results.iter().filter(|r| r.is_success()).count();
                let failed = results.len() - successful;
                for result in results.iter().filter(|r| !r.is_success()) {
                    warn!(file = result.file_name(), "Invoice not processed");
                }
                self.progress = ActionProgress::Completed {
                    total: results.len(),
                    successful,
                    failed,
                };
                if failed > 0 {
                    self.error_message = Some(
                        "Some invoices could not be processed. Check the results below."
                            .to_string(),
                    );
                }
                self.report = Some(crate::report::render(&results));
            }
            Err(message) => {
                self.progress = ActionProgress::NotStarted;
                self.error_message = Some(message);
            }
        }
    }

    pub fn get_progress_percentage(&self) -> f32 {
        match &self.progress {
            ActionProgress::NotStarted => 0.0,
            ActionProgress::Processing {
                total,
                successful,
                failed,
                ..
            } => {
                if *total == 0 {
                    0.0
                } else {
                    (*successful + *failed) as f32 / *total as f32
                }
            }
            ActionProgress::Completed { .. } => 1.0,
        }
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Processing {
                total,
                current,
                successful,
                failed,
            } => format!(
                "Sent: {}/{} files | ✅ Done: {} | ❌ Failed: {}",
                current, total, successful, failed
            ),
            ActionProgress::Completed {
                total,
                successful,
                failed,
            } => format!(
                "Final Status: {} files | ✅ Done: {} | ❌ Failed: {}",
                total, successful, failed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, status: UploadStatus) -> FileStatus {
        FileStatus {
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_progress_counts_statuses() {
        let mut state = UploadState::default();
        state.begin_batch(2);
        state.apply_status(status("a.pdf", UploadStatus::Processing));
        state.apply_status(status("b.pdf", UploadStatus::Processing));
        state.apply_status(status("a.pdf", UploadStatus::Success));

        assert_eq!(
            state.progress,
            ActionProgress::Processing {
                total: 2,
                current: 2,
                successful: 1,
                failed: 0,
            }
        );
        assert_eq!(state.get_progress_percentage(), 0.5);
        assert_eq!(state.file_statuses.len(), 3);
    }

    #[test]
    fn test_finish_renders_report_and_flags_failures() {
        let mut state = UploadState::default();
        state.begin_batch(2);
        state.finish(Ok(vec![
            UploadResult::Failure {
                file_name: "a.pdf".to_string(),
                message: "boom".to_string(),
            },
            UploadResult::Success {
                file_name: "b.pdf".to_string(),
                fields: None,
            },
        ]));

        assert!(!state.is_uploading);
        assert_eq!(
            state.progress,
            ActionProgress::Completed {
                total: 2,
                successful: 1,
                failed: 1,
            }
        );
        assert!(state.error_message.is_some());
        assert!(state.report.as_ref().is_some_and(|r| !r.is_empty()));
    }

    #[test]
    fn test_finish_with_error_resets_progress() {
        let mut state = UploadState::default();
        state.begin_batch(1);
        state.finish(Err("runtime unavailable".to_string()));

        assert_eq!(state.progress, ActionProgress::NotStarted);
        assert_eq!(state.error_message.as_deref(), Some("runtime unavailable"));
        assert!(state.report.is_none());
    }
}
