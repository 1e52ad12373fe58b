//! Writing the site to the output directory.
//!
//! ```text
//! render_to_directory()
//!     │
//!     ├── create subdirectories          mirrors the content tree
//!     │
//!     └── rayon::join
//!             ├── copy static files      byte-for-byte
//!             └── render pages           template → entities → file
//! ```
//!
//! Pages are independent of each other, so both phases run on the rayon
//! pool. The first failure is logged and aborts the remaining work.

pub mod context;
pub mod engine;
pub mod entities;
pub mod filters;

use crate::{log, logger::ProgressBars, page::Page, site::Site};
use anyhow::{Context, Result, anyhow};
use engine::Renderer;
use entities::escape_non_ascii;
use rayon::prelude::*;
use std::{
    fs,
    path::Path,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

/// Output extension whose files are made ASCII-only.
pub const HTML_EXTENSION: &str = ".html";

/// Copy static files and render every page of `site` into `output_dir`.
pub fn render_to_directory(site: &Arc<Site>, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    for dir in site.subdirectories() {
        let target = output_dir.join(dir);
        fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
    }

    let renderer = Renderer::new(Arc::clone(site));
    let pages: Vec<&Arc<Page>> = site.pages().collect();

    let progress = ProgressBars::new_filtered(&[
        ("static", site.static_files().len()),
        ("pages", pages.len()),
    ]);
    let tick = |phase: &str| {
        if let Some(progress) = &progress {
            progress.inc_by_name(phase);
        }
    };
    let failure = FirstFailure::default();

    let (static_result, pages_result) = rayon::join(
        || {
            site.static_files().par_iter().try_for_each(|file| {
                if failure.is_set() {
                    return Err(anyhow!("Aborted"));
                }
                let from = site.directory().join(file);
                let to = output_dir.join(file);
                let copied = fs::copy(&from, &to)
                    .with_context(|| format!("Failed to copy {}", from.display()));
                if let Err(e) = copied {
                    return Err(failure.record(&file.display().to_string(), e));
                }
                tick("static");
                Ok(())
            })
        },
        || {
            pages.par_iter().try_for_each(|page| {
                if failure.is_set() {
                    return Err(anyhow!("Aborted"));
                }
                if let Err(e) = write_page(&renderer, page, output_dir) {
                    return Err(failure.record(&page.name(), e));
                }
                tick("pages");
                Ok(())
            })
        },
    );

    if let Some(progress) = &progress {
        progress.finish();
    }

    // Workers that stopped early only report "Aborted"; the cause is kept here.
    if let Some(e) = failure.take() {
        return Err(e);
    }
    static_result?;
    pages_result?;
    Ok(())
}

/// The first error raised by any worker. Later workers see `is_set` and stop.
#[derive(Default)]
struct FirstFailure {
    failed: AtomicBool,
    error: Mutex<Option<anyhow::Error>>,
}

impl FirstFailure {
    fn is_set(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Keep `error` if it is the first one, and hand back the value the
    /// worker returns to rayon.
    fn record(&self, name: &str, error: anyhow::Error) -> anyhow::Error {
        if self.failed.swap(true, Ordering::Relaxed) {
            return anyhow!("Aborted");
        }
        log!("error"; "{}: {:#}", name, error);
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(error);
        anyhow!("Aborted")
    }

    fn take(self) -> Option<anyhow::Error> {
        self.error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render one page and write it to `output_dir/<page.file()>`.
fn write_page(renderer: &Arc<Renderer>, page: &Arc<Page>, output_dir: &Path) -> Result<()> {
    let mut text = renderer.render_page(page)?;
    if page.extension() == HTML_EXTENSION {
        text = escape_non_ascii(&text);
    }

    let target = output_dir.join(page.file());
    fs::write(&target, text).with_context(|| format!("Failed to write {}", target.display()))
}
