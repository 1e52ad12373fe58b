//! The site index: configuration, page types and the page catalog.
//!
//! # Loading
//!
//! ```text
//! Site::load(dir)
//!     │
//!     ├── SiteConfig::load()            .fireproof → url + extra keys
//!     ├── collect_type_extensions()     templates/ → type → extension
//!     └── scan()                        content tree → pages, static files, dirs
//! ```
//!
//! Template types are collected before the walk so every content file is
//! classified against the complete table.

pub mod query;
pub mod scan;
pub mod templates;

use crate::config::SiteConfig;
use crate::error::{BuildError, BuildResult};
use crate::log;
use crate::page::{Page, route};
use anyhow::{Context, Result};
use scan::scan;
use serde_json::Value as JsonValue;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use templates::{TypeExtensions, collect_type_extensions};

/// Template directory name inside the site directory.
pub const TEMPLATE_DIR: &str = "templates";

#[derive(Debug)]
pub struct Site {
    directory: PathBuf,
    config: SiteConfig,
    template_dir: PathBuf,
    type_extensions: TypeExtensions,
    pages_by_type: BTreeMap<String, Vec<Arc<Page>>>,
    static_files: Vec<PathBuf>,
    subdirectories: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl Site {
    /// A site with no pages or files.
    pub fn empty(directory: PathBuf, config: SiteConfig) -> Self {
        Self {
            template_dir: directory.join(TEMPLATE_DIR),
            directory,
            config,
            type_extensions: TypeExtensions::new(),
            pages_by_type: BTreeMap::new(),
            static_files: Vec::new(),
            subdirectories: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Load config, template types and every content file under `directory`.
    pub fn load(directory: &Path) -> Result<Self> {
        let config = SiteConfig::load(directory)
            .with_context(|| format!("Failed to load config of {}", directory.display()))?;
        let mut site = Self::empty(directory.to_path_buf(), config);

        site.type_extensions = collect_type_extensions(&site.template_dir)
            .context("Failed to read the template directory")?;
        log!("scan"; "{} page types from templates", site.type_extensions.len());

        let result = scan(&site.directory, &site.template_dir, &site.type_extensions)
            .context("Failed to scan the site directory")?;
        site.pages_by_type = result.pages_by_type;
        site.static_files = result.static_files;
        site.subdirectories = result.subdirectories;
        site.files = result.files;

        log!(
            "scan";
            "{} pages, {} static files, {} directories",
            site.page_count(),
            site.static_files.len(),
            site.subdirectories.len()
        );

        Ok(site)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Output extension of a page type, if any template declares it.
    pub fn extension_of(&self, kind: &str) -> Option<&str> {
        self.type_extensions.get(kind).map(String::as_str)
    }

    /// All pages, grouped by type in type-name order.
    pub fn pages(&self) -> impl Iterator<Item = &Arc<Page>> {
        self.pages_by_type.values().flatten()
    }

    pub fn page_count(&self) -> usize {
        self.pages_by_type.values().map(Vec::len).sum()
    }

    pub fn static_files(&self) -> &[PathBuf] {
        &self.static_files
    }

    pub fn subdirectories(&self) -> &[PathBuf] {
        &self.subdirectories
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// `url` from `.fireproof`.
    pub fn base_url(&self) -> BuildResult<&str> {
        self.config
            .url
            .as_deref()
            .ok_or_else(|| BuildError::missing("site", "url"))
    }

    pub fn absolute_url(&self, page: &Page) -> BuildResult<String> {
        Ok(route::absolute_url(self.base_url()?, &page.url()))
    }

    pub fn tag(&self, page: &Page) -> BuildResult<String> {
        page.tag(&self.absolute_url(page)?)
    }

    /// Page attribute including the ones that need the site's `url`.
    ///
    /// `Ok(None)` when the page has no such key; `Err` when a derived
    /// attribute cannot be computed (no site `url`, bad `date`).
    pub fn attribute(&self, page: &Page, name: &str) -> BuildResult<Option<JsonValue>> {
        Ok(match name {
            "absolute_url" => Some(JsonValue::String(self.absolute_url(page)?)),
            "tag" => Some(JsonValue::String(self.tag(page)?)),
            _ => page.attribute(name).map(|value| value.into_owned()),
        })
    }

    /// A site config key (`url` or any extra key).
    pub fn setting(&self, key: &str) -> Option<JsonValue> {
        match key {
            "url" => self.config.url.clone().map(JsonValue::String),
            _ => self.config.extra.get(key).cloned(),
        }
    }
}
