//! Document input and output
//!
//! - [`reader`] loads `.txt`, `.md`, `.docx` and `.odt` files as text
//! - [`normalize`] strips Markdown for entity detection
//! - [`output`] writes results atomically and derives default output names

pub mod normalize;
pub mod output;
pub mod reader;

pub use normalize::normalize_markdown;
pub use output::{default_output_path, write_atomic, write_text, OutputKind};
pub use reader::{read_document, DocumentFormat};
