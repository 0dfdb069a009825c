//! Save response payloads as pretty-printed JSON under the export directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// Where an export landed, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ExportInfo {
    pub filename: String,
    pub path: PathBuf,
}

/// Replace anything that is not alphanumeric so user-supplied search terms
/// are safe to embed in a filename.
pub fn sanitize_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write `payload` to `<dir>/<stem>-<timestamp>.json`, creating the
/// directory if needed.
pub fn write_export<T: Serialize>(dir: &Path, stem: &str, payload: &T) -> Result<ExportInfo> {
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    let filename = format!("{stem}-{timestamp}.json");

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(&filename);
    let body = serde_json::to_string_pretty(payload).context("failed to serialize export")?;
    fs::write(&path, body)
        .with_context(|| format!("failed to write export file {}", path.display()))?;

    info!(path = %path.display(), "export written");
    Ok(ExportInfo { filename, path })
}
