//! Values handed to templates.
//!
//! ```text
//! PageContext                      top-level names of every render
//! ├── site   → SiteValue           config keys, site.pages(...)
//! ├── page   → PageValue           the page being rendered
//! ├── <type> → PageValue           same page, under its type name
//! ├── now    → "2026-01-01T…"      build timestamp
//! └── pages  → fn(...)             query resolver
//! ```
//!
//! Every value carries a `Scope`: the extension of the file being produced.
//! Printing a `PageValue` looks up the partial `_<type><scope extension>`,
//! so the same post can be embedded one way in `index.html` and another way
//! in `atom.xml`.

use super::engine::Renderer;
use crate::log;
use crate::page::{DERIVED_ATTRIBUTES, Page};
use crate::site::query::PageQuery;
use minijinja::value::{Enumerator, Kwargs, Object, ObjectRepr, from_args};
use minijinja::{Error, ErrorKind, State, Value};
use std::{fmt, sync::Arc};

/// Limit for partials that embed pages that embed pages...
pub const MAX_EMBED_DEPTH: usize = 16;

/// Attributes that need the site's `url`.
const SITE_ATTRIBUTES: &[&str] = &["absolute_url", "tag"];

/// What is being rendered: the output extension used for partial lookup.
#[derive(Clone)]
pub struct Scope {
    renderer: Arc<Renderer>,
    target: Arc<str>,
    depth: usize,
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("target", &self.target)
            .field("depth", &self.depth)
            .finish()
    }
}

impl Scope {
    pub fn new(renderer: Arc<Renderer>, target: &str) -> Self {
        Self {
            renderer,
            target: target.into(),
            depth: 0,
        }
    }

    fn page_value(&self, page: &Arc<Page>) -> Value {
        Value::from_object(PageValue {
            page: Arc::clone(page),
            scope: self.clone(),
            raw: false,
        })
    }

    /// `pages(types=[], directory=none, limit=none, order_by=[])`.
    fn pages_function(&self) -> Value {
        let scope = self.clone();
        Value::from_function(move |kwargs: Kwargs| scope.query(&kwargs))
    }

    fn query(&self, kwargs: &Kwargs) -> Result<Value, Error> {
        let order_by = match string_list(kwargs, "order_by")? {
            Some(keys) => keys,
            None => string_list(kwargs, "orderBy")?.unwrap_or_default(),
        };
        let query = PageQuery {
            types: string_list(kwargs, "types")?.unwrap_or_default(),
            directory: kwargs.get("directory")?,
            limit: kwargs.get("limit")?,
            order_by,
        };
        kwargs.assert_all_used()?;

        let pages = self
            .renderer
            .site()
            .query(&query)
            .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()))?;

        Ok(Value::from(
            pages
                .iter()
                .map(|page| self.page_value(page))
                .collect::<Vec<_>>(),
        ))
    }

    /// Render `page` through its partial for this scope's extension.
    ///
    /// `Ok(None)` when no such partial exists.
    fn render_partial(&self, page: &Arc<Page>) -> Result<Option<String>, Error> {
        if self.depth >= MAX_EMBED_DEPTH {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("pages embedded more than {MAX_EMBED_DEPTH} levels deep"),
            ));
        }

        let name = partial_name(page.kind(), &self.target);
        let Some(template) = self.renderer.template(&name)? else {
            return Ok(None);
        };

        let nested = Self {
            depth: self.depth + 1,
            ..self.clone()
        };
        template
            .render(PageContext::new(Arc::clone(page), nested, true).into_value())
            .map(Some)
    }
}

/// Name of the partial used to embed a `kind` page in a `target` file.
pub fn partial_name(kind: &str, target: &str) -> String {
    format!("_{kind}{target}")
}

/// Keyword argument holding one string or a list of strings.
fn string_list(kwargs: &Kwargs, name: &str) -> Result<Option<Vec<String>>, Error> {
    let Some(value) = kwargs.get::<Option<Value>>(name)? else {
        return Ok(None);
    };
    if let Some(single) = value.as_str() {
        return Ok(Some(vec![single.to_owned()]));
    }
    value
        .try_iter()?
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("`{name}` must be a list of strings"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

// ============================================================================
// Render context
// ============================================================================

/// Top-level names available to a template.
#[derive(Debug)]
pub struct PageContext {
    page: Arc<Page>,
    scope: Scope,
    /// Set inside partials: the page renders as its body, not its partial again.
    embedded: bool,
}

impl PageContext {
    pub fn new(page: Arc<Page>, scope: Scope, embedded: bool) -> Self {
        Self {
            page,
            scope,
            embedded,
        }
    }

    pub fn into_value(self) -> Value {
        Value::from_object(self)
    }

    fn page_value(&self) -> Value {
        Value::from_object(PageValue {
            page: Arc::clone(&self.page),
            scope: self.scope.clone(),
            raw: self.embedded,
        })
    }
}

impl Object for PageContext {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "site" => Some(Value::from_object(SiteValue {
                scope: self.scope.clone(),
            })),
            "page" => Some(self.page_value()),
            "now" => Some(Value::from(self.scope.renderer.now())),
            "pages" => Some(self.scope.pages_function()),
            kind if kind == self.page.kind() => Some(self.page_value()),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(
            ["site", "page", "now", "pages", self.page.kind()]
                .into_iter()
                .map(Value::from)
                .collect(),
        )
    }
}

// ============================================================================
// Page
// ============================================================================

/// A page as seen from a template.
#[derive(Debug)]
pub struct PageValue {
    page: Arc<Page>,
    scope: Scope,
    raw: bool,
}

impl Object for PageValue {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str()?;
        let site = self.scope.renderer.site();

        if SITE_ATTRIBUTES.contains(&name) {
            let derived = match name {
                "tag" => site.tag(&self.page),
                _ => site.absolute_url(&self.page),
            };
            return match derived {
                Ok(value) => Some(Value::from(value)),
                Err(err) => {
                    log!("warn"; "{}: {err} (`page.{name}()` reports it as an error)", self.page.name());
                    None
                }
            };
        }

        site.attribute(&self.page, name)
            .ok()
            .flatten()
            .map(|value| Value::from_serialize(&value))
    }

    /// `page.tag()` / `page.absolute_url()`: like the attributes, but a
    /// failure carries its cause into the render error.
    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        let site = self.scope.renderer.site();
        let derived = match method {
            "tag" => site.tag(&self.page),
            "absolute_url" => site.absolute_url(&self.page),
            _ => return Err(Error::from(ErrorKind::UnknownMethod)),
        };
        let () = from_args(args)?;
        derived
            .map(Value::from)
            .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let keys = DERIVED_ATTRIBUTES
            .iter()
            .chain(SITE_ATTRIBUTES)
            .map(|name| Value::from(*name))
            .chain(
                self.page
                    .front_matter()
                    .keys()
                    .filter(|key| !DERIVED_ATTRIBUTES.contains(&key.as_str()))
                    .map(|key| Value::from(key.as_str())),
            )
            .collect();
        Enumerator::Values(keys)
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.page.body().unwrap_or_default();
        if self.raw {
            return f.write_str(body);
        }

        match self.scope.render_partial(&self.page) {
            Ok(Some(text)) => f.write_str(&text),
            Ok(None) => f.write_str(body),
            Err(err) => {
                log!("error"; "embedding {}: {err:#}", self.page.name());
                Err(fmt::Error)
            }
        }
    }
}

// ============================================================================
// Site
// ============================================================================

/// The site as seen from a template: config keys, `directory`, `pages(...)`.
#[derive(Debug)]
pub struct SiteValue {
    scope: Scope,
}

impl Object for SiteValue {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let site = self.scope.renderer.site();
        match key.as_str()? {
            "pages" => Some(self.scope.pages_function()),
            "directory" => Some(Value::from(site.directory().display().to_string())),
            name => site
                .setting(name)
                .map(|value| Value::from_serialize(&value)),
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let config = self.scope.renderer.site().config();
        let keys = ["pages", "directory"]
            .into_iter()
            .chain(config.url.as_ref().map(|_| "url"))
            .map(Value::from)
            .chain(config.extra.keys().map(|key| Value::from(key.as_str())))
            .collect();
        Enumerator::Values(keys)
    }
}
