//! Markdown to HTML.

use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
}

/// Render markdown source to an HTML fragment.
pub fn to_html(source: &str) -> String {
    // HTML output is never smaller than its markdown source.
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(source, options()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph() {
        assert_eq!(to_html("Hello"), "<p>Hello</p>\n");
    }

    #[test]
    fn test_heading_and_emphasis() {
        let html = to_html("# Title\n\nSome *emphasis* here.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_tables_enabled() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(to_html(""), "");
    }

    #[test]
    fn test_non_ascii_kept_as_text() {
        // escaping to entities happens at write time, not here
        assert_eq!(to_html("café"), "<p>café</p>\n");
    }
}
