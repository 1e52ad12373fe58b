//! URL derivation for pages.
//!
//! | Source | `file` | `url` | `directory` |
//! |--------|--------|-------|-------------|
//! | `hello.md` | `hello.html` | `/hello.html` | `/` |
//! | `blog/my-post.md` | `blog/my-post.html` | `/blog/my-post.html` | `/blog` |
//! | `blog/index.md` | `blog/index.html` | `/blog/` | `/blog` |
//! | `index.md` | `index.html` | `/` | `/` |

use chrono::NaiveDate;
use std::path::Path;

/// Base name of files that collapse to their directory URL.
const INDEX: &str = "index";

/// Relative output file: `<source dir>/<base><ext>` with forward slashes.
pub fn output_file(source_dir: Option<&Path>, base: &str, extension: &str) -> String {
    let dir = source_dir
        .map(|dir| dir.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();
    let dir = dir.trim_matches('/');

    if dir.is_empty() {
        format!("{base}{extension}")
    } else {
        format!("{dir}/{base}{extension}")
    }
}

/// Root-relative URL of an output file. `index<ext>` collapses to its directory.
pub fn url_from_file(file: &str, extension: &str) -> String {
    let (dir, name) = file.rsplit_once('/').unwrap_or(("", file));
    let is_index = name
        .strip_suffix(extension)
        .is_some_and(|stem| stem == INDEX);

    match (is_index, dir.is_empty()) {
        (true, true) => "/".to_owned(),
        (true, false) => format!("/{dir}/"),
        (false, _) => format!("/{file}"),
    }
}

/// Parent of a URL, in the sense of `dirname`: `/blog/post.html` and `/blog/`
/// both give `/blog`; top-level URLs give `/`.
pub fn directory_of(url: &str) -> &str {
    match url.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((dir, _)) => dir,
    }
}

/// Join the site's base URL and a root-relative URL without doubling `/`.
pub fn absolute_url(base: &str, url: &str) -> String {
    let path = url.trim_start_matches('/');
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Atom `tag:` URI for an absolute URL published on `date`.
///
/// `https://example.com/blog/post.html` on 2020-01-01 becomes
/// `tag:example.com,2020-01-01:/blog/post.html`.
pub fn tag_uri(absolute_url: &str, date: NaiveDate) -> String {
    let without_scheme = absolute_url
        .split_once("://")
        .map_or(absolute_url, |(_, rest)| rest);
    let (domain, path) = without_scheme
        .find('/')
        .map_or((without_scheme, "/"), |pos| without_scheme.split_at(pos));

    format!(
        "tag:{domain},{}:{}",
        date.format("%Y-%m-%d"),
        path.replace('#', "/")
    )
}
