//! Site building orchestration.
//!
//! ```text
//! build_site()
//!     │
//!     ├── check_directories()     site dir exists, output dir empty or --force
//!     ├── Site::load()            config, template types, content scan
//!     └── render_to_directory()   static copies + rendered pages
//! ```

use crate::{log, render::render_to_directory, site::Site};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path, sync::Arc, time::Instant};

/// Build the site in `site_dir` into `output_dir`.
pub fn build_site(site_dir: &Path, output_dir: &Path, force: bool) -> Result<()> {
    check_directories(site_dir, output_dir, force)?;

    let started = Instant::now();
    log!("build"; "{} -> {}", site_dir.display(), output_dir.display());

    let site = Arc::new(Site::load(site_dir)?);
    render_to_directory(&site, output_dir)?;

    log_build_result(&site, started);
    Ok(())
}

/// Validate the input and output directories before anything is written.
fn check_directories(site_dir: &Path, output_dir: &Path, force: bool) -> Result<()> {
    if !site_dir.exists() {
        bail!("Site directory not found: {}", site_dir.display());
    }
    if !site_dir.is_dir() {
        bail!("Site path is not a directory: {}", site_dir.display());
    }

    if !output_dir.exists() {
        return Ok(());
    }
    if !output_dir.is_dir() {
        bail!("Output path is not a directory: {}", output_dir.display());
    }

    let is_empty = fs::read_dir(output_dir)
        .with_context(|| format!("Failed to read output directory: {}", output_dir.display()))?
        .next()
        .is_none();
    if !is_empty {
        if !force {
            bail!(
                "Output directory is not empty: {} (use --force to overwrite)",
                output_dir.display()
            );
        }
        log!("warn"; "writing into non-empty {}", output_dir.display());
    }

    Ok(())
}

fn log_build_result(site: &Site, started: Instant) {
    let pages = site.page_count();
    if pages == 0 {
        log!("warn"; "no pages rendered, check templates/ for page types");
    }
    log!(
        "build";
        "done: {} files, {} pages, {} static in {:.2?}",
        site.files().len(),
        pages,
        site.static_files().len(),
        started.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn minimal_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/page.html"), "{{ page.body }}").unwrap();
        fs::write(dir.path().join("index.md"), "title: Home\n\nHello").unwrap();
        dir
    }

    #[test]
    fn test_build_creates_output_dir() {
        let site = minimal_site();
        let out = TempDir::new().unwrap();
        let output = out.path().join("public");

        build_site(site.path(), &output, false).unwrap();
        assert_eq!(
            fs::read_to_string(output.join("index.html")).unwrap(),
            "<p>Hello</p>\n"
        );
    }

    #[test]
    fn test_missing_site_dir() {
        let out = TempDir::new().unwrap();
        let err = build_site(&out.path().join("nope"), out.path(), false).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_site_dir_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site.md");
        fs::write(&file, "x").unwrap();
        let err = build_site(&file, &dir.path().join("out"), false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_output_is_file() {
        let site = minimal_site();
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out");
        fs::write(&file, "x").unwrap();
        let err = build_site(site.path(), &file, false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_non_empty_output_needs_force() {
        let site = minimal_site();
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("index.html"), "old").unwrap();

        let err = build_site(site.path(), out.path(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(out.path().join("index.html")).unwrap(), "old");

        build_site(site.path(), out.path(), true).unwrap();
        assert_eq!(
            fs::read_to_string(out.path().join("index.html")).unwrap(),
            "<p>Hello</p>\n"
        );
    }
}
