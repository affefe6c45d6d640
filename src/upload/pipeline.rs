use crate::error::{PipelineError, UploadError};
use crate::upload::types::{
    ExtractedFields, FileStatus, InvoiceResponse, SelectedFile, UploadResult, UploadStatus,
};
use base64::Engine;
use futures::future::join_all;
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn, Instrument};

#[derive(Serialize)]
struct UploadPayload {
    file: String,
}

/// Uploads a batch of files to the invoice-extraction endpoint, one
/// concurrent task per file.
#[derive(Clone)]
pub struct BatchUploadPipeline {
    endpoint: Arc<str>,
    client: reqwest::Client,
}

impl BatchUploadPipeline {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Arc::from(endpoint.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Runs every file to settlement and returns one result per file, in
    /// input order. Individual failures never abort the batch.
    pub async fn run(
        &self,
        files: &[SelectedFile],
        status_sender: &Sender<FileStatus>,
    ) -> Result<Vec<UploadResult>, PipelineError> {
        if files.is_empty() {
            warn!("Upload requested with no files selected");
            return Err(PipelineError::NoFilesSelected);
        }

        info!(count = files.len(), endpoint = %self.endpoint, "Starting batch upload");

        let handles: Vec<_> = files
            .iter()
            .cloned()
            .map(|file| {
                let pipeline = self.clone();
                let sender = status_sender.clone();
                let span = tracing::info_span!("upload", file = %file.name);
                tokio::spawn(
                    async move { pipeline.process_file(file, sender).await }.instrument(span),
                )
            })
            .collect();

        let results: Vec<UploadResult> = join_all(handles)
            .await
            .into_iter()
            .map(settle)
            .collect();

        let successful = results.iter().filter(|r| r.is_success()).count();
        info!(
            total = results.len(),
            successful,
            failed = results.len() - successful,
            "Batch upload finished"
        );

        Ok(results)
    }

    async fn process_file(
        &self,
        file: SelectedFile,
        status_sender: Sender<FileStatus>,
    ) -> UploadResult {
        status_sender
            .send(FileStatus {
                name: file.name.clone(),
                status: UploadStatus::Processing,
            })
            .unwrap_or_default();

        match self.upload_file(&file).await {
            Ok(fields) => {
                status_sender
                    .send(FileStatus {
                        name: file.name.clone(),
                        status: UploadStatus::Success,
                    })
                    .unwrap_or_default();
                UploadResult::Success {
                    file_name: file.name,
                    fields,
                }
            }
            Err(e) => {
                error!(error = %e, "Upload failed");
                let message = format!("Error processing {}: {}", file.name, e);
                status_sender
                    .send(FileStatus {
                        name: file.name.clone(),
                        status: UploadStatus::Error(message.clone()),
                    })
                    .unwrap_or_default();
                UploadResult::Failure {
                    file_name: file.name,
                    message,
                }
            }
        }
    }

    async fn upload_file(
        &self,
        file: &SelectedFile,
    ) -> Result<Option<ExtractedFields>, UploadError> {
        let encoded = Self::encode_file(file).await?;
        debug!(encoded_len = encoded.len(), "File encoded");

        let response = self
            .client
            .post(&*self.endpoint)
            .json(&UploadPayload { file: encoded })
            .send()
            .await
            .map_err(|source| UploadError::Request {
                file_name: file.name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Transport {
                file_name: file.name.clone(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UploadError::Request {
                file_name: file.name.clone(),
                source,
            })?;
        debug!(body = %String::from_utf8_lossy(&body), "Endpoint response");

        let parsed: InvoiceResponse =
            serde_json::from_slice(&body).map_err(|source| UploadError::Parse {
                file_name: file.name.clone(),
                source,
            })?;

        let fields = parsed.into_fields();
        match &fields {
            Some(fields) => {
                let (filled, total) = fields.coverage();
                info!(
                    filled,
                    total,
                    issuer = ?fields.nome_emissor,
                    total_value = ?fields.valor_total,
                    "Invoice extracted"
                );
            }
            None => warn!("Response carried no invoice fields"),
        }

        Ok(fields)
    }

    async fn encode_file(file: &SelectedFile) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| UploadError::Encoding {
                file_name: file.name.clone(),
                source,
            })?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// Result of a joined per-file task; a task that panicked or was aborted
/// still fills its slot.
fn settle(joined: Result<UploadResult, JoinError>) -> UploadResult {
    match joined {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Upload task did not settle");
            UploadResult::Failure {
                file_name: "unknown".to_string(),
                message: "processing error".to_string(),
            }
        }
    }
}
