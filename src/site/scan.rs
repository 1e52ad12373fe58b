//! Single pass over the content tree.
//!
//! ```text
//! site/
//! ├── .fireproof          hidden: skipped
//! ├── templates/          template dir: skipped
//! ├── index.md            page (type `page`)
//! ├── blog/               subdirectory
//! │   ├── hello.post.md   page (type `post`)
//! │   └── photo.jpg       static file
//! └── .git/               hidden: pruned
//! ```

use super::templates::TypeExtensions;
use crate::error::{BuildError, BuildResult};
use crate::page::{Page, kind::classify};
use std::{
    collections::{BTreeMap, HashMap, hash_map::Entry},
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::{DirEntry, WalkDir};

/// Everything the content walk finds. All paths are relative to the site root.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub subdirectories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub pages_by_type: BTreeMap<String, Vec<Arc<Page>>>,
    pub static_files: Vec<PathBuf>,
}

/// Hidden names and the template directory are never part of the site.
fn is_ignored(entry: &DirEntry, template_dir: &Path) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
        || (entry.file_type().is_dir() && entry.path() == template_dir)
}

/// Walk `root` top-down in file-name order, reading every page eagerly.
pub fn scan(root: &Path, template_dir: &Path, types: &TypeExtensions) -> BuildResult<ScanResult> {
    let mut result = ScanResult::default();
    // output file -> content file that produces it
    let mut outputs = HashMap::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry, template_dir));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();

        if entry.file_type().is_dir() {
            result.subdirectories.push(relative);
            continue;
        }

        result.files.push(relative.clone());

        let file_name = entry.file_name().to_string_lossy();
        match classify(&file_name).and_then(|(base, kind)| Some((base, kind, types.get(kind)?))) {
            Some((base, kind, extension)) => {
                let page = Page::load(root, relative, base, kind, extension)?;
                claim_output(&mut outputs, page.file(), page.source())?;
                result
                    .pages_by_type
                    .entry(kind.to_owned())
                    .or_default()
                    .push(Arc::new(page));
            }
            None => {
                let file = relative.to_string_lossy().replace('\\', "/");
                claim_output(&mut outputs, file, &relative)?;
                result.static_files.push(relative);
            }
        }
    }

    Ok(result)
}

/// Fail when two content files map to the same output file.
fn claim_output(
    outputs: &mut HashMap<String, PathBuf>,
    file: String,
    source: &Path,
) -> BuildResult<()> {
    match outputs.entry(file) {
        Entry::Occupied(entry) => Err(BuildError::DuplicateOutput {
            file: entry.key().clone(),
            first: entry.get().clone(),
            second: source.to_path_buf(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(source.to_path_buf());
            Ok(())
        }
    }
}
