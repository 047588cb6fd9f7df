//! Two-column CSV mapping store
//!
//! A mapping file holds one `placeholder,real_entity` pair per row, in the
//! order they were assigned. The file may be edited by hand between
//! extraction and substitution, so loading is tolerant: malformed rows are
//! dropped with a [`RowWarning`] and only an unreadable file is an error.

use crate::document::output::write_atomic;
use crate::domain::{MappingEntry, MappingError, Placeholder};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Header row written and recognized by the mapping store
pub const MAPPING_HEADER: [&str; 2] = ["base_placeholder", "real_entity_name"];

/// A row dropped while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWarning {
    /// 1-based file row, header included; `None` for file-level warnings
    pub row: Option<u64>,
    pub reason: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// Entries read from a mapping file, with the rows that were dropped
#[derive(Debug, Clone, Default)]
pub struct LoadedMapping {
    pub entries: Vec<MappingEntry>,
    pub warnings: Vec<RowWarning>,
    /// Data rows read, header excluded
    pub rows_seen: usize,
}

impl LoadedMapping {
    /// Partial-success summary such as `12 of 14 rows loaded`
    pub fn summary(&self) -> String {
        format!("{} of {} rows loaded", self.entries.len(), self.rows_seen)
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Load a mapping file
///
/// Values are trimmed. Rows with fewer than two columns, or with an empty
/// column, are skipped with a warning; extra columns are ignored. Fails only
/// when the file cannot be read as UTF-8 text.
pub fn load(path: impl AsRef<Path>, has_header: bool) -> Result<LoadedMapping, MappingError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| MappingError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut loaded = LoadedMapping::default();
    for (index, record) in reader.records().enumerate() {
        let fallback_row = index as u64 + 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let row = e.position().map_or(fallback_row, |p| p.line());
                loaded.rows_seen += 1;
                push_warning(&mut loaded, row, format!("unreadable row ({e})"));
                continue;
            }
        };
        let row = record.position().map_or(fallback_row, |p| p.line());

        if index == 0 && has_header {
            tracing::debug!(path = %path.display(), "Mapping header row skipped");
            continue;
        }
        loaded.rows_seen += 1;

        if record.len() < 2 {
            push_warning(&mut loaded, row, "insufficient columns".to_string());
            continue;
        }

        let placeholder = record[0].trim();
        let real_entity = record[1].trim();
        if placeholder.is_empty() || real_entity.is_empty() {
            push_warning(&mut loaded, row, "empty placeholder or entity".to_string());
            continue;
        }

        match Placeholder::new(placeholder) {
            Ok(placeholder) => loaded.entries.push(MappingEntry {
                placeholder,
                real_entity: real_entity.to_string(),
            }),
            Err(reason) => push_warning(&mut loaded, row, reason),
        }
    }

    if loaded.entries.is_empty() {
        tracing::warn!(path = %path.display(), "No valid data rows found in mapping");
        loaded.warnings.push(RowWarning {
            row: None,
            reason: "no valid data rows".to_string(),
        });
    }

    tracing::info!(
        path = %path.display(),
        loaded = loaded.entries.len(),
        rows = loaded.rows_seen,
        "Mapping loaded"
    );

    Ok(loaded)
}

fn push_warning(loaded: &mut LoadedMapping, row: u64, reason: String) {
    tracing::warn!(row, %reason, "Skipping mapping row");
    loaded.warnings.push(RowWarning {
        row: Some(row),
        reason,
    });
}

/// Save entries in order, replacing `path` atomically
pub fn save(
    entries: &[MappingEntry],
    path: impl AsRef<Path>,
    write_header: bool,
) -> Result<(), MappingError> {
    let path = path.as_ref();
    let save_err = |reason: String| MappingError::Save {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = to_csv_bytes(entries, write_header).map_err(save_err)?;
    write_atomic(path, &bytes).map_err(|e| save_err(e.to_string()))?;

    tracing::info!(path = %path.display(), entries = entries.len(), "Mapping saved");
    Ok(())
}

fn to_csv_bytes(entries: &[MappingEntry], write_header: bool) -> Result<Vec<u8>, String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if write_header {
        writer
            .write_record(MAPPING_HEADER)
            .map_err(|e| e.to_string())?;
    }
    for entry in entries {
        writer
            .write_record([entry.placeholder.as_str(), entry.real_entity.as_str()])
            .map_err(|e| e.to_string())?;
    }

    writer.into_inner().map_err(|e| e.error().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let file = write_csv("person_001,Jane Doe\nlonely\norg_001,Acme\n");
        let loaded = load(file.path(), false).unwrap();

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].row, Some(2));
        assert_eq!(loaded.summary(), "2 of 3 rows loaded");
    }

    #[test]
    fn test_header_is_skipped_and_counted() {
        let file = write_csv("base_placeholder,real_entity_name\nperson_001,Jane\n , Acme\n");
        let loaded = load(file.path(), true).unwrap();

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.rows_seen, 2);
        assert_eq!(loaded.warnings[0].row, Some(3));
        assert_eq!(loaded.warnings[0].reason, "empty placeholder or entity");
    }

    #[test]
    fn test_values_trimmed_and_extra_columns_ignored() {
        let file = write_csv("  place_001 ,  Paris  ,extra,columns\n");
        let loaded = load(file.path(), false).unwrap();

        assert_eq!(loaded.entries[0].placeholder.as_str(), "place_001");
        assert_eq!(loaded.entries[0].real_entity, "Paris");
        assert!(loaded.is_complete());
    }

    #[test]
    fn test_empty_file_warns() {
        let file = write_csv("");
        let loaded = load(file.path(), false).unwrap();
        assert!(loaded.entries.is_empty());
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].row, None);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load("/nonexistent/map.csv", false).unwrap_err();
        assert!(matches!(err, MappingError::Load { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x70, 0x2c, 0xff, 0xfe, 0x0a]).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            load(file.path(), false),
            Err(MappingError::Load { .. })
        ));
    }

    #[test]
    fn test_save_quotes_and_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.csv");
        let entries = vec![
            MappingEntry::new("org_002", "Smith, Jones & Co").unwrap(),
            MappingEntry::new("org_001", "The \"Best\" Ltd").unwrap(),
        ];

        save(&entries, &path, true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "base_placeholder,real_entity_name\norg_002,\"Smith, Jones & Co\"\norg_001,\"The \"\"Best\"\" Ltd\"\n"
        );

        let loaded = load(&path, true).unwrap();
        assert_eq!(loaded.entries, entries);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("map.csv");
        let err = save(&[], &path, false).unwrap_err();
        assert!(matches!(err, MappingError::Save { .. }));
    }
}
