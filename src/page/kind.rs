//! Page type classification from file names.
//!
//! | File name | Base name | Type |
//! |-----------|-----------|------|
//! | `hello.md` | `hello` | `page` |
//! | `hello.post.md` | `hello` | `post` |
//! | `feed.atom` | `feed` | `atom` |
//! | `logo.png` | `logo` | `png` |
//! | `README` | - | - |
//!
//! Whether the type is a page type or a static asset is decided by the site's
//! template table, not here.

/// Extensions rendered through the markdown renderer. Stripped before the type.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Type of a markdown file without an inner extension.
pub const DEFAULT_KIND: &str = "page";

/// Split a file name into `(base_name, type)`.
///
/// Returns `None` for names that cannot carry a type: no extension at all, or
/// hidden names such as `.htaccess`.
pub fn classify(file_name: &str) -> Option<(&str, &str)> {
    match split_extension(file_name) {
        Some((stem, ext)) if is_markdown(ext) => {
            Some(split_extension(stem).unwrap_or((stem, DEFAULT_KIND)))
        }
        other => other,
    }
}

/// Split off the last extension, without its dot.
///
/// A leading dot does not start an extension, matching how `os.path.splitext`
/// and `Path::extension` treat dotfiles.
pub fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext))
}

fn is_markdown(ext: &str) -> bool {
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|md| md.eq_ignore_ascii_case(ext))
}
