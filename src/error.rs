//! Build error types.
//!
//! Every variant is fatal: the build stops at the first error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk the site directory")]
    Walk(#[from] walkdir::Error),

    #[error("malformed front matter in `{0}`")]
    FrontMatter(PathBuf, #[source] serde_yaml::Error),

    #[error("no template for `{page}`: neither `{tried}` nor `{fallback}` exists")]
    TemplateNotFound {
        page: PathBuf,
        tried: String,
        fallback: String,
    },

    #[error("`{first}` and `{second}` would both be written to `{file}`")]
    DuplicateOutput {
        file: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("`{owner}` has no attribute `{attribute}`")]
    MissingAttribute { owner: String, attribute: String },

    #[error("`date` of `{page}` is not a date: `{value}`")]
    InvalidDate { page: PathBuf, value: String },

    #[error("failed to render `{0}`")]
    Render(PathBuf, #[source] minijinja::Error),
}

impl BuildError {
    pub fn missing(owner: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            owner: owner.into(),
            attribute: attribute.into(),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_names_owner() {
        let err = BuildError::missing("posts/hello.post.md", "date");
        let display = format!("{err}");
        assert!(display.contains("posts/hello.post.md"));
        assert!(display.contains("`date`"));
    }

    #[test]
    fn test_template_not_found_lists_candidates() {
        let err = BuildError::TemplateNotFound {
            page: PathBuf::from("notes/a.note.md"),
            tried: "note.html".into(),
            fallback: "page.html".into(),
        };
        let display = format!("{err}");
        assert!(display.contains("note.html"));
        assert!(display.contains("page.html"));
        assert!(display.contains("notes/a.note.md"));
    }
}
