//! Document reader
//!
//! Plain text and Markdown are returned as-is. Word (`.docx`) and
//! OpenDocument (`.odt`) files are zip containers; their main XML part is
//! walked paragraph by paragraph and the paragraphs are joined with `\n`.

use crate::domain::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Document formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Docx,
    Odt,
    /// Legacy binary Word format, not supported
    LegacyDoc,
    /// Anything else, read as UTF-8 text when possible
    Other,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") | Some("text") => Self::PlainText,
            Some("md") | Some("markdown") => Self::Markdown,
            Some("docx") => Self::Docx,
            Some("odt") => Self::Odt,
            Some("doc") => Self::LegacyDoc,
            _ => Self::Other,
        }
    }

    /// Whether substitution output keeps the Markdown extension
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown)
    }
}

/// Read a document into text
pub fn read_document(path: impl AsRef<Path>) -> Result<String, DocumentError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let format = DocumentFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "Reading document");

    match format {
        DocumentFormat::PlainText | DocumentFormat::Markdown => {
            let bytes = read_bytes(path)?;
            String::from_utf8(bytes).map_err(|_| DocumentError::Read {
                path: path.to_path_buf(),
                reason: "file is not valid UTF-8".to_string(),
            })
        }
        DocumentFormat::Docx => read_zipped_xml(path, "word/document.xml", XmlDialect::Word),
        DocumentFormat::Odt => read_zipped_xml(path, "content.xml", XmlDialect::OpenDocument),
        DocumentFormat::LegacyDoc => Err(DocumentError::Unsupported {
            path: path.to_path_buf(),
            reason: "legacy .doc files are not supported, save the document as .docx".to_string(),
        }),
        DocumentFormat::Other => {
            let bytes = read_bytes(path)?;
            String::from_utf8(bytes).map_err(|_| DocumentError::Unsupported {
                path: path.to_path_buf(),
                reason: "binary content".to_string(),
            })
        }
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DocumentError> {
    std::fs::read(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_zipped_xml(path: &Path, part: &str, dialect: XmlDialect) -> Result<String, DocumentError> {
    let malformed = |reason: String| DocumentError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| malformed(e.to_string()))?;
    let mut entry = archive
        .by_name(part)
        .map_err(|e| malformed(format!("{part}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| malformed(format!("{part}: {e}")))?;

    extract_paragraphs(&xml, dialect).map_err(|e| malformed(format!("{part}: {e}")))
}

/// XML vocabulary of a rich document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum XmlDialect {
    /// WordprocessingML: `w:p` paragraphs, text only inside `w:t`
    Word,
    /// OpenDocument text: `text:p`/`text:h` paragraphs, `text:s` spaces
    OpenDocument,
}

impl XmlDialect {
    fn is_paragraph(&self, name: &[u8]) -> bool {
        match self {
            Self::Word => name == b"p",
            Self::OpenDocument => name == b"p" || name == b"h",
        }
    }

    fn is_line_break(&self, name: &[u8]) -> bool {
        match self {
            Self::Word => name == b"br" || name == b"cr",
            Self::OpenDocument => name == b"line-break",
        }
    }
}

#[derive(Default)]
struct ParagraphCollector {
    paragraphs: Vec<String>,
    current: String,
    depth: usize,
    in_word_text: bool,
}

impl ParagraphCollector {
    fn open_paragraph(&mut self) {
        self.depth += 1;
    }

    fn close_paragraph(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
    }

    fn accepts_text(&self, dialect: XmlDialect) -> bool {
        match dialect {
            XmlDialect::Word => self.in_word_text,
            XmlDialect::OpenDocument => self.depth > 0,
        }
    }
}

/// Walk a document XML part and join its paragraphs with `\n`
pub(crate) fn extract_paragraphs(xml: &str, dialect: XmlDialect) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut collector = ParagraphCollector::default();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let name = e.local_name();
                if dialect.is_paragraph(name.as_ref()) {
                    collector.open_paragraph();
                } else if dialect == XmlDialect::Word && name.as_ref() == b"t" {
                    collector.in_word_text = true;
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if dialect.is_paragraph(name) {
                    collector.open_paragraph();
                    collector.close_paragraph();
                } else if collector.depth > 0 {
                    if name == b"tab" {
                        collector.current.push('\t');
                    } else if dialect.is_line_break(name) {
                        collector.current.push('\n');
                    } else if dialect == XmlDialect::OpenDocument && name == b"s" {
                        let count = space_count(&e);
                        collector.current.extend(std::iter::repeat(' ').take(count));
                    }
                }
            }
            Event::Text(t) => {
                if collector.accepts_text(dialect) {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    collector.current.push_str(&text);
                }
            }
            Event::CData(t) => {
                if collector.accepts_text(dialect) {
                    collector
                        .current
                        .push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if dialect.is_paragraph(name.as_ref()) {
                    collector.close_paragraph();
                } else if dialect == XmlDialect::Word && name.as_ref() == b"t" {
                    collector.in_word_text = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(collector.paragraphs.join("\n"))
}

/// Value of the `text:c` attribute of `text:s`, defaulting to one space
fn space_count(element: &BytesStart<'_>) -> usize {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"c")
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse().ok())
        .unwrap_or(1)
}
