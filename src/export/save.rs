use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ExportConfig;
use crate::error::{AppError, AppResult};

use super::OutputDocument;

const FALLBACK_STEM: &str = "document";

/// `<output_dir or image dir>/<image stem><suffix>.pdf`
pub fn default_output_path(image_path: &Path, config: &ExportConfig) -> PathBuf {
    let stem = image_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_STEM);
    let file_name = format!("{stem}{}.pdf", config.file_suffix.trim());
    let directory = config.output_dir().unwrap_or_else(|| {
        image_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    directory.join(file_name)
}

pub fn save_document(document: &OutputDocument, path: &Path) -> AppResult<()> {
    if path.as_os_str().is_empty() {
        return Err(AppError::invalid_argument("output path must not be empty"));
    }
    if path.is_dir() {
        return Err(AppError::invalid_argument(format!(
            "output path is a directory: {}",
            path.display()
        )));
    }
    fs::write(path, document.bytes.as_slice()).map_err(|source| {
        AppError::io_with_context(source, format!("failed to write {}", path.display()))
    })?;
    info!(path = %path.display(), bytes = document.byte_len(), "pdf written");
    Ok(())
}
