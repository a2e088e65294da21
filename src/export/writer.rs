//! Output file writing.

use std::path::Path;

use crate::export::ExportError;

/// Write `html` to `path`, creating parent directories first.
pub async fn write_document(path: &Path, html: &str) -> Result<(), ExportError> {
    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, html).await.map_err(write_err)?;

    tracing::debug!(path = %path.display(), bytes = html.len(), "Generated");
    Ok(())
}
