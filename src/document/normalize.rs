//! Markdown to plain text normalization
//!
//! Recognizers work best on prose, so markup is stripped before detection:
//!
//! 1. HTML comments removed
//! 2. Images and links reduced to their text, autolinks to their target
//! 3. HTML tags removed, common entities unescaped
//! 4. Heading, blockquote and list markers removed
//! 5. Emphasis delimiters, code spans and strikethrough removed
//! 6. Runs of spaces/tabs collapsed, blank-line runs reduced to one blank line
//!
//! Normalized text is only fed to the recognizer, but every entity it finds
//! is later searched for in the original document. Characters inside words
//! (`jane_doe`, `2*3`) are never dropped for that reason.

use regex::Regex;
use std::sync::LazyLock;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static IMAGE_OR_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("Invalid link regex"));

static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*|[^\s<>@]+@[^\s<>@]+)>")
        .expect("Invalid autolink regex")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("Invalid tag regex"));

static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}|>|[*+-][ \t])[ \t]?").expect("Invalid marker regex")
});

/// `*text*`, `**text**`, `***text***`, also inside a word
static STAR_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*{1,3}([^*\s](?:[^\n]*?[^*\s])?)\*{1,3}").expect("Invalid emphasis regex")
});

/// `_text_` and `__text__`, only at word edges
static UNDERSCORE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\W)_{1,3}([^_\s](?:[^\n]*?[^_\s])?)_{1,3}(\W|$)")
        .expect("Invalid emphasis regex")
});

static CODE_OR_STRIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`+|~~").expect("Invalid code span regex"));

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("Invalid whitespace regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"));

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Normalize Markdown (or plain text) for entity detection
///
/// # Examples
///
/// ```
/// use anonymap::document::normalize::normalize_markdown;
///
/// let text = normalize_markdown("# Memo\n\nSee [Jane Doe](mailto:jd@example.com) **today**.");
/// assert_eq!(text, "Memo\n\nSee Jane Doe today.");
/// ```
pub fn normalize_markdown(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = IMAGE_OR_LINK.replace_all(&text, "$1");
    let text = AUTOLINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    let text = unescape_entities(&text);
    let text = BLOCK_MARKER.replace_all(&text, "");
    let text = CODE_OR_STRIKE.replace_all(&text, "");
    let text = replace_until_stable(&STAR_EMPHASIS, text.into_owned(), "$1");
    let text = replace_until_stable(&UNDERSCORE_EMPHASIS, text, "${1}${2}${3}");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n\n");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Adjacent spans share their boundary character, so one pass can miss the
/// second of two neighbors. Every replacement shortens the text.
fn replace_until_stable(pattern: &Regex, mut text: String, replacement: &str) -> String {
    while pattern.is_match(&text) {
        text = pattern.replace_all(&text, replacement).into_owned();
    }
    text
}

fn unescape_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}
