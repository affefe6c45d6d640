use crate::upload::types::SelectedFile;
use ignore::Walk;
use std::path::Path;
use tracing::{debug, warn};

pub const NO_FILE_SELECTED: &str = "No file selected";

/// Text shown next to the picker for the current selection.
pub fn selection_label(files: &[SelectedFile]) -> String {
    if files.is_empty() {
        return NO_FILE_SELECTED.to_string();
    }
    files
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// All files under `folder` with one of `extensions`, honouring `.gitignore`.
pub fn collect_from_folder(folder: &Path, extensions: &[String]) -> Vec<SelectedFile> {
    let mut paths = Vec::new();

    for entry in Walk::new(folder) {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && has_extension(path, extensions) {
                    paths.push(path.to_path_buf());
                }
            }
            Err(e) => warn!(error = %e, "Skipping unreadable entry"),
        }
    }

    paths.sort();
    debug!(folder = %folder.display(), found = paths.len(), "Folder scanned");
    paths.into_iter().map(SelectedFile::from_path).collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}
