//! Output writing and default output naming

use super::reader::DocumentFormat;
use crate::domain::DocumentError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Kind of file an operation produces next to its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Anonymized,
    Deanonymized,
    Entities,
}

impl OutputKind {
    fn suffix(&self) -> &'static str {
        match self {
            Self::Anonymized => "_anonymized",
            Self::Deanonymized => "_deanonymized",
            Self::Entities => "_entities",
        }
    }
}

/// Derive `<stem><suffix>.<ext>` next to `input`
///
/// Text outputs keep `.md` for Markdown inputs and use `.txt` for everything
/// else, including `.docx` and `.odt`. Entity maps are always `.csv`.
pub fn default_output_path(input: &Path, kind: OutputKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let extension = match kind {
        OutputKind::Entities => "csv",
        _ if DocumentFormat::from_path(input).is_markdown() => "md",
        _ => "txt",
    };

    input.with_file_name(format!("{stem}{}.{extension}", kind.suffix()))
}

/// Replace `path` with `bytes` via a temp file in the same directory
///
/// Readers of `path` see either the old content or the new content, never a
/// partial write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write UTF-8 text output atomically
pub fn write_text(path: &Path, text: &str) -> Result<(), DocumentError> {
    write_atomic(path, text.as_bytes()).map_err(|e| DocumentError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Output written");
    Ok(())
}
