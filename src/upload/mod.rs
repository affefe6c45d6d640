mod pipeline;
mod selection;
mod types;

pub use pipeline::BatchUploadPipeline;
pub use selection::{collect_from_folder, selection_label};
pub use types::{ExtractedFields, FileStatus, SelectedFile, UploadResult, UploadStatus};
