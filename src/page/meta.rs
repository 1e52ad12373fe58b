//! Front matter: the leading YAML block of a content file.
//!
//! ```text
//! title: Hello            ─┐
//! date: 2020-01-01         ├─ front matter (up to the first blank line)
//! tags: [rust, ssg]       ─┘
//!                          ── blank line
//! Markdown body...         ── body
//! ```
//!
//! A file without a blank line that is entirely a mapping is *data-only*: it
//! has front matter but no body. A first block that is not a mapping (prose,
//! a heading, a list) means the file has no front matter at all.

use serde_yaml::Value as YamlValue;

/// Ordered key/value mapping of a page's front matter.
pub type FrontMatter = serde_json::Map<String, serde_json::Value>;

/// A content file split into front matter and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub front_matter: FrontMatter,
    /// Markdown source. `None` for data-only files.
    pub body: Option<&'a str>,
}

/// Parse `text` as a YAML mapping.
///
/// Returns `Ok(None)` when the text is valid YAML but not a mapping.
pub fn parse_mapping(text: &str) -> Result<Option<FrontMatter>, serde_yaml::Error> {
    match serde_yaml::from_str::<YamlValue>(text)? {
        mapping @ YamlValue::Mapping(_) => serde_yaml::from_value(mapping).map(Some),
        _ => Ok(None),
    }
}

/// Split a content file into front matter and body.
///
/// Fails only when the block before the first blank line is malformed YAML.
pub fn split_document(text: &str) -> Result<Document<'_>, serde_yaml::Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some((head, rest)) = split_at_blank_line(text) else {
        return Ok(whole_file(text));
    };

    if head.trim().is_empty() {
        return Ok(Document {
            front_matter: FrontMatter::new(),
            body: Some(rest),
        });
    }

    let parsed = match parse_mapping(head) {
        Ok(parsed) => parsed,
        Err(err) if looks_like_mapping(head) => return Err(err),
        // markdown openings such as `* item` or `[link](/)` are not YAML
        Err(_) => None,
    };

    Ok(match parsed {
        Some(front_matter) => Document {
            front_matter,
            body: Some(rest),
        },
        None => Document {
            front_matter: FrontMatter::new(),
            body: Some(text),
        },
    })
}

/// Whether the first non-comment line reads as `key: ...`.
///
/// Decides if a YAML error in the leading block is a broken front matter or
/// just markdown that happens not to be YAML.
fn looks_like_mapping(head: &str) -> bool {
    let Some(line) = head
        .lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
    else {
        return false;
    };

    let key_len = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(line.len());
    key_len > 0
        && line[key_len..]
            .trim_start()
            .strip_prefix(':')
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// A file with no blank line: data-only if it is a mapping, body otherwise.
fn whole_file(text: &str) -> Document<'_> {
    match parse_mapping(text) {
        Ok(Some(front_matter)) if !text.trim().is_empty() => Document {
            front_matter,
            body: None,
        },
        _ => Document {
            front_matter: FrontMatter::new(),
            body: Some(text),
        },
    }
}

/// Split around the first whitespace-only line.
///
/// Returns the text before that line and the text after it.
fn split_at_blank_line(text: &str) -> Option<(&str, &str)> {
    let mut start = 0;
    while start < text.len() {
        let end = text[start..]
            .find('\n')
            .map_or(text.len(), |pos| start + pos + 1);
        if text[start..end].trim().is_empty() {
            return Some((&text[..start], &text[end..]));
        }
        start = end;
    }
    None
}
