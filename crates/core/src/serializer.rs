//! JSON encoding of the import request and writing it to disk.

use std::path::Path;

use tracing::info;

use crate::document::ImportDataRequest;
use crate::errors::OutputError;

/// Encode `request` as compact JSON, or pretty-printed when `multi_line`.
pub fn encode(request: &ImportDataRequest, multi_line: bool) -> Result<Vec<u8>, OutputError> {
    let bytes = if multi_line {
        serde_json::to_vec_pretty(request)?
    } else {
        serde_json::to_vec(request)?
    };
    Ok(bytes)
}

/// Encode `request` completely in memory, then write it to `path` in one
/// operation, replacing any existing file.
pub fn write_document<P: AsRef<Path>>(
    path: P,
    request: &ImportDataRequest,
    multi_line: bool,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let bytes = encode(request, multi_line)?;

    std::fs::write(path, &bytes).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "import data written");
    Ok(())
}
