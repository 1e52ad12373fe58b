//! Content pages.
//!
//! A `Page` is one content file that matched a known page type. It is read
//! and parsed eagerly when the site is scanned; everything else about it
//! (URL, directory, syndication tag) is derived on demand.
//!
//! - **kind**: type classification from file names
//! - **meta**: front matter splitting and parsing
//! - **markdown**: body rendering
//! - **route**: URL derivation

pub mod kind;
pub mod markdown;
pub mod meta;
pub mod route;

use crate::error::{BuildError, BuildResult};
use crate::utils::date::parse_date;
use chrono::NaiveDate;
use meta::{FrontMatter, split_document};
use serde_json::Value as JsonValue;
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

/// Attribute names computed from the page itself. They take precedence over
/// front-matter keys of the same name.
pub const DERIVED_ATTRIBUTES: &[&str] = &["source", "type", "file", "url", "directory", "body"];

#[derive(Debug, Clone)]
pub struct Page {
    /// Content file, relative to the site directory.
    source: PathBuf,
    /// Page type, e.g. `page` or `post`.
    kind: String,
    /// File name without type and markdown extensions.
    base_name: String,
    /// Output extension with its dot, e.g. `.html`.
    extension: String,
    front_matter: FrontMatter,
    /// Rendered HTML; `None` for data-only pages.
    body: Option<String>,
}

impl Page {
    /// Read and parse `root/source`.
    pub fn load(
        root: &Path,
        source: PathBuf,
        base_name: &str,
        kind: &str,
        extension: &str,
    ) -> BuildResult<Self> {
        let path = root.join(&source);
        let text = fs::read_to_string(&path).map_err(|err| BuildError::Io(path, err))?;
        Self::from_text(source, base_name, kind, extension, &text)
    }

    /// Build a page from file contents already in memory.
    pub fn from_text(
        source: PathBuf,
        base_name: &str,
        kind: &str,
        extension: &str,
        text: &str,
    ) -> BuildResult<Self> {
        let document =
            split_document(text).map_err(|err| BuildError::FrontMatter(source.clone(), err))?;

        Ok(Self {
            kind: kind.to_owned(),
            base_name: base_name.to_owned(),
            extension: extension.to_owned(),
            front_matter: document.front_matter,
            body: document.body.map(markdown::to_html),
            source,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Relative output path, e.g. `blog/index.html`.
    pub fn file(&self) -> String {
        route::output_file(self.source.parent(), &self.base_name, &self.extension)
    }

    /// Root-relative URL, e.g. `/blog/` for `blog/index.html`.
    pub fn url(&self) -> String {
        route::url_from_file(&self.file(), &self.extension)
    }

    /// Parent of `url`, e.g. `/blog`.
    pub fn directory(&self) -> String {
        route::directory_of(&self.url()).to_owned()
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.get("title").and_then(JsonValue::as_str)
    }

    /// The `date` front-matter key as a calendar date.
    pub fn date(&self) -> BuildResult<NaiveDate> {
        let value = self
            .front_matter
            .get("date")
            .ok_or_else(|| BuildError::missing(self.name(), "date"))?;

        value
            .as_str()
            .and_then(parse_date)
            .ok_or_else(|| BuildError::InvalidDate {
                page: self.source.clone(),
                value: value.to_string(),
            })
    }

    /// Syndication tag for this page under the given absolute URL.
    pub fn tag(&self, absolute_url: &str) -> BuildResult<String> {
        Ok(route::tag_uri(absolute_url, self.date()?))
    }

    /// Look up a derived attribute or a front-matter key.
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, JsonValue>> {
        let derived = match name {
            "source" => self.source.to_string_lossy().replace('\\', "/"),
            "type" => self.kind.clone(),
            "file" => self.file(),
            "url" => self.url(),
            "directory" => self.directory(),
            "body" => self.body.clone().unwrap_or_default(),
            _ => return self.front_matter.get(name).map(Cow::Borrowed),
        };
        Some(Cow::Owned(JsonValue::String(derived)))
    }

    /// Name used in error messages.
    pub fn name(&self) -> String {
        self.source.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn page(source: &str, text: &str) -> Page {
        let file_name = Path::new(source).file_name().unwrap().to_str().unwrap();
        let (base, kind) = kind::classify(file_name).unwrap();
        Page::from_text(PathBuf::from(source), base, kind, ".html", text).unwrap()
    }

    #[test]
    fn test_blog_post_url() {
        let page = page("blog/my-post.md", "title: Post\n\nBody");
        assert_eq!(page.kind(), "page");
        assert_eq!(page.file(), "blog/my-post.html");
        assert_eq!(page.url(), "/blog/my-post.html");
        assert_eq!(page.directory(), "/blog");
    }

    #[test]
    fn test_index_url_collapses_but_file_does_not() {
        let page = page("blog/index.md", "title: Blog\n\nBody");
        assert_eq!(page.url(), "/blog/");
        assert_eq!(page.file(), "blog/index.html");
        assert_eq!(page.directory(), "/blog");
    }

    #[test]
    fn test_typed_page_drops_type_from_file_name() {
        let page = page("posts/hello.post.md", "title: Hi\n\nBody");
        assert_eq!(page.kind(), "post");
        assert_eq!(page.file(), "posts/hello.html");
    }

    #[test]
    fn test_body_is_rendered_markdown() {
        let page = page("hello.md", "title: Hi\n\nHello *there*");
        assert_eq!(page.title(), Some("Hi"));
        assert_eq!(page.body(), Some("<p>Hello <em>there</em></p>\n"));
    }

    #[test]
    fn test_data_only_page_has_no_body() {
        let page = page("people/alice.person.md", "name: Alice\nrole: editor");
        assert_eq!(page.body(), None);
        assert_eq!(page.front_matter()["name"], "Alice");
        // still renderable: templates see an empty body
        assert_eq!(page.attribute("body").unwrap().as_ref(), &json!(""));
    }

    #[test]
    fn test_date_accessor() {
        let page = page("a.md", "date: 2020-06-01\n\nx");
        assert_eq!(page.date().unwrap(), NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
    }

    #[test]
    fn test_date_missing() {
        let page = page("a.md", "title: No date\n\nx");
        let err = page.date().unwrap_err();
        assert!(matches!(err, BuildError::MissingAttribute { ref attribute, .. } if attribute == "date"));
        assert!(format!("{err}").contains("a.md"));
    }

    #[test]
    fn test_date_not_date_like() {
        let worded = page("a.md", "date: soon\n\nx");
        assert!(matches!(worded.date(), Err(BuildError::InvalidDate { .. })));

        let numeric = page("b.md", "date: 42\n\nx");
        assert!(matches!(numeric.date(), Err(BuildError::InvalidDate { .. })));
    }

    #[test]
    fn test_tag() {
        let page = page("blog/post.md", "date: 2020-01-01\n\nx");
        assert_eq!(
            page.tag("https://example.com/blog/post.html").unwrap(),
            "tag:example.com,2020-01-01:/blog/post.html"
        );
    }

    #[test]
    fn test_attribute_lookup() {
        let page = page("blog/post.md", "title: T\nurl: ignored\n\nx");
        assert_eq!(page.attribute("title").unwrap().as_ref(), &json!("T"));
        // derived attributes win over front matter
        assert_eq!(page.attribute("url").unwrap().as_ref(), &json!("/blog/post.html"));
        assert_eq!(page.attribute("type").unwrap().as_ref(), &json!("page"));
        assert_eq!(page.attribute("source").unwrap().as_ref(), &json!("blog/post.md"));
        assert!(page.attribute("missing").is_none());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/post.md"), "title: From disk\n\nBody").unwrap();

        let page = Page::load(dir.path(), PathBuf::from("blog/post.md"), "post", "page", ".html")
            .unwrap();
        assert_eq!(page.title(), Some("From disk"));
        assert_eq!(page.url(), "/blog/post.html");
    }

    #[test]
    fn test_load_malformed_front_matter_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.md"), "title: [oops\n\nBody").unwrap();

        let err = Page::load(dir.path(), PathBuf::from("bad.md"), "bad", "page", ".html")
            .unwrap_err();
        assert!(format!("{err}").contains("bad.md"));
    }
}
