mod state;
mod ui;

use crate::config::Config;
use crate::error::PipelineError;
use crate::upload::{collect_from_folder, BatchUploadPipeline, SelectedFile};
use eframe::{egui, App};
pub use state::{ActionProgress, BatchOutcome, UploadState};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, TryRecvError};
use tracing::{error, info};

pub struct InvoiceUploader {
    config: Config,
    pipeline: BatchUploadPipeline,
    state: UploadState,
}

impl InvoiceUploader {
    pub fn new(config: Config) -> Self {
        info!(endpoint = %config.endpoint, "Initializing invoice uploader");
        Self {
            pipeline: BatchUploadPipeline::new(config.endpoint.clone()),
            config,
            state: UploadState::default(),
        }
    }

    pub fn reset_upload_state(&mut self) {
        info!("Resetting application state");
        self.state.clear();
    }

    pub fn select_files(&mut self, paths: Vec<PathBuf>) {
        self.state.selected_files = paths.into_iter().map(SelectedFile::from_path).collect();
        info!(count = self.state.selected_files.len(), "Files selected");
    }

    pub fn select_folder(&mut self, folder: &Path) {
        self.state.selected_files = collect_from_folder(folder, &self.config.picker.extensions);
        info!(
            folder = %folder.display(),
            count = self.state.selected_files.len(),
            "Folder selected"
        );
    }

    pub fn start_upload(&mut self) {
        if self.state.selected_files.is_empty() {
            self.state.alert = Some(PipelineError::NoFilesSelected.to_string());
            return;
        }

        let files = self.state.selected_files.clone();
        info!(count = files.len(), "Starting upload process...");
        self.state.begin_batch(files.len());

        let (status_sender, status_receiver) = std_mpsc::channel();
        let (outcome_sender, outcome_receiver) = std_mpsc::channel();
        self.state.status_receiver = Some(status_receiver);
        self.state.outcome_receiver = Some(outcome_receiver);

        let pipeline = self.pipeline.clone();

        std::thread::spawn(move || {
            let outcome: BatchOutcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt
                    .block_on(pipeline.run(&files, &status_sender))
                    .map_err(|e| e.to_string()),
                Err(e) => {
                    error!(error = %e, "Failed to start async runtime");
                    Err(format!("Could not start the upload: {e}"))
                }
            };
            let _ = outcome_sender.send(outcome);
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let had_updates = self.poll_background();

        if self.state.is_uploading || had_updates {
            // keep polling the channels while the batch runs
            ctx.request_repaint();
        }
    }

    /// Drain status events and the batch outcome. Returns whether anything changed.
    fn poll_background(&mut self) -> bool {
        let mut had_updates = false;

        if let Some(receiver) = &self.state.status_receiver {
            let statuses: Vec<_> = receiver.try_iter().collect();
            had_updates |= !statuses.is_empty();
            for status in statuses {
                self.state.apply_status(status);
            }
        }

        let outcome = match &self.state.outcome_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    error!("Upload thread stopped without reporting an outcome");
                    Some(Err("The upload stopped unexpectedly.".to_string()))
                }
            },
            None => None,
        };

        if let Some(outcome) = outcome {
            // drain anything sent just before the outcome
            if let Some(statuses) = self.state.status_receiver.take() {
                for status in statuses.try_iter() {
                    self.state.apply_status(status);
                }
            }
            self.state.outcome_receiver = None;
            self.state.finish(outcome);
            had_updates = true;
        }

        had_updates
    }

    /// Plain-text copy of the rendered results, if any.
    pub fn results_text(&self) -> Option<String> {
        self.state.report.as_ref().map(|r| r.to_string())
    }
}

impl App for InvoiceUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadResult;

    fn uploader() -> InvoiceUploader {
        InvoiceUploader::new(Config {
            endpoint: "http://127.0.0.1:9/invoice".to_string(),
            ..Config::default()
        })
    }

    #[test]
    fn test_send_without_files_raises_alert() {
        let mut app = uploader();
        app.start_upload();

        assert_eq!(
            app.state.alert.as_deref(),
            Some("Select at least one file before sending!")
        );
        assert!(!app.state.is_uploading);
        assert_eq!(app.state.progress, ActionProgress::NotStarted);
        assert!(app.state.outcome_receiver.is_none());
    }

    #[test]
    fn test_vanished_upload_thread_ends_the_batch() {
        let mut app = uploader();
        app.state.begin_batch(1);
        let (sender, receiver) = std_mpsc::channel::<BatchOutcome>();
        app.state.outcome_receiver = Some(receiver);
        drop(sender);

        assert!(app.poll_background());
        assert!(!app.state.is_uploading);
        assert!(app.state.outcome_receiver.is_none());
        assert_eq!(
            app.state.error_message.as_deref(),
            Some("The upload stopped unexpectedly.")
        );
    }

    #[test]
    fn test_outcome_is_applied_once_received() {
        let mut app = uploader();
        app.state.begin_batch(1);
        let (sender, receiver) = std_mpsc::channel::<BatchOutcome>();
        app.state.outcome_receiver = Some(receiver);

        assert!(!app.poll_background());
        assert!(app.state.is_uploading);

        sender
            .send(Ok(vec![UploadResult::Success {
                file_name: "a.pdf".to_string(),
                fields: None,
            }]))
            .unwrap();

        assert!(app.poll_background());
        assert!(!app.state.is_uploading);
        assert!(app.results_text().is_some_and(|t| t.contains("File: a.pdf")));
    }
}
