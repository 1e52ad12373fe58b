//! Page types declared by the template directory.
//!
//! Every template file declares a page type and its output extension:
//!
//! | Template | Type | Extension | Role |
//! |----------|------|-----------|------|
//! | `page.html` | `page` | `.html` | top-level |
//! | `_post.html` | `post` | `.html` | partial, for embedding |
//! | `atom.xml` | `atom` | `.xml` | top-level |

use crate::error::{BuildError, BuildResult};
use crate::log;
use crate::page::kind::split_extension;
use std::{collections::BTreeMap, fs, path::Path};

/// Page type -> output extension (with its dot).
pub type TypeExtensions = BTreeMap<String, String>;

/// Marks partial templates.
pub const PARTIAL_PREFIX: char = '_';

/// Split a template file name into `(type, extension)`.
pub fn declared_type(file_name: &str) -> Option<(&str, &str)> {
    if file_name.starts_with('.') {
        return None;
    }
    let name = file_name.strip_prefix(PARTIAL_PREFIX).unwrap_or(file_name);
    let (kind, _) = split_extension(name)?;
    Some((kind, &name[kind.len()..]))
}

/// Read the immediate files of `template_dir` into a type table.
///
/// A missing template directory declares no types.
pub fn collect_type_extensions(template_dir: &Path) -> BuildResult<TypeExtensions> {
    let mut types = TypeExtensions::new();
    if !template_dir.is_dir() {
        return Ok(types);
    }

    let io_err = |err| BuildError::Io(template_dir.to_path_buf(), err);
    let mut names = Vec::new();
    for entry in fs::read_dir(template_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    for name in &names {
        let Some((kind, ext)) = declared_type(name) else {
            continue;
        };
        if let Some(previous) = types.insert(kind.to_owned(), ext.to_owned())
            && previous != ext
        {
            log!("warn"; "template `{name}` changes type `{kind}` from `{previous}` to `{ext}`");
        }
    }

    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type("page.html"), Some(("page", ".html")));
        assert_eq!(declared_type("_post.html"), Some(("post", ".html")));
        assert_eq!(declared_type("atom.xml"), Some(("atom", ".xml")));
        assert_eq!(declared_type("feed.atom.xml"), Some(("feed.atom", ".xml")));
    }

    #[test]
    fn test_declared_type_skips_untyped() {
        assert_eq!(declared_type("README"), None);
        assert_eq!(declared_type(".DS_Store"), None);
        assert_eq!(declared_type("_.html"), None);
    }

    #[test]
    fn test_collect_type_extensions() {
        let dir = TempDir::new().unwrap();
        for name in ["page.html", "_post.html", "atom.xml", ".hidden.html", "LICENSE"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("layouts.html")).unwrap();

        let types = collect_type_extensions(dir.path()).unwrap();

        let expected: TypeExtensions = [("atom", ".xml"), ("page", ".html"), ("post", ".html")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        assert_eq!(types, expected);
    }

    #[test]
    fn test_partial_and_full_template_share_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("post.html"), "").unwrap();
        fs::write(dir.path().join("_post.html"), "").unwrap();

        let types = collect_type_extensions(dir.path()).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types["post"], ".html");
    }

    #[test]
    fn test_missing_template_dir() {
        let dir = TempDir::new().unwrap();
        let types = collect_type_extensions(&dir.path().join("templates")).unwrap();
        assert!(types.is_empty());
    }
}
