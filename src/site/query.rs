//! Cross-page queries over the catalog.
//!
//! Templates reach this through `pages(...)` / `site.pages(...)`:
//!
//! ```jinja
//! {% for post in pages(types=["post"], order_by=["-date", "title"], limit=10) %}
//!   {{ post }}
//! {% endfor %}
//! ```

use super::Site;
use crate::error::{BuildError, BuildResult};
use crate::page::Page;
use serde_json::Value as JsonValue;
use std::{cmp::Ordering, sync::Arc};

/// Marks a descending sort key, e.g. `-date`.
const DESCENDING: char = '-';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    /// Page types to include; empty means all.
    pub types: Vec<String>,
    /// Keep pages whose `directory` starts with this prefix.
    pub directory: Option<String>,
    /// Keep at most this many pages after sorting.
    pub limit: Option<usize>,
    /// Sort keys, most significant first. `-` prefix sorts descending.
    pub order_by: Vec<String>,
}

impl Site {
    /// Run a query. The result is a fresh list; the catalog is untouched.
    pub fn query(&self, query: &PageQuery) -> BuildResult<Vec<Arc<Page>>> {
        let mut pages: Vec<Arc<Page>> = if query.types.is_empty() {
            self.pages_by_type.values().flatten().cloned().collect()
        } else {
            query
                .types
                .iter()
                .filter_map(|kind| self.pages_by_type.get(kind))
                .flatten()
                .cloned()
                .collect()
        };

        if let Some(prefix) = &query.directory {
            pages.retain(|page| page.directory().starts_with(prefix.as_str()));
        }

        // Stable sorts from the least significant key up.
        for key in query.order_by.iter().rev() {
            let (name, descending) = match key.strip_prefix(DESCENDING) {
                Some(name) => (name, true),
                None => (key.as_str(), false),
            };
            pages = self.sort_by_attribute(pages, name, descending)?;
        }

        if let Some(limit) = query.limit {
            pages.truncate(limit);
        }

        Ok(pages)
    }

    fn sort_by_attribute(
        &self,
        pages: Vec<Arc<Page>>,
        name: &str,
        descending: bool,
    ) -> BuildResult<Vec<Arc<Page>>> {
        let mut keyed = pages
            .into_iter()
            .map(|page| {
                let key = self
                    .attribute(&page, name)?
                    .ok_or_else(|| BuildError::missing(page.name(), name))?;
                Ok((key, page))
            })
            .collect::<BuildResult<Vec<_>>>()?;

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = compare_values(a, b);
            if descending { ordering.reverse() } else { ordering }
        });

        Ok(keyed.into_iter().map(|(_, page)| page).collect())
    }
}

/// Total order over front-matter values.
///
/// Values of the same kind compare naturally (numbers numerically, strings
/// lexically, arrays element-wise). Mixed kinds order as
/// null < bool < number < string < array < object.
pub fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Bool(a), JsonValue::Bool(b)) => a.cmp(b),
        (JsonValue::Number(a), JsonValue::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
        (JsonValue::Array(a), JsonValue::Array(b)) => a
            .iter()
            .zip(b)
            .map(|(a, b)| compare_values(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (JsonValue::Object(a), JsonValue::Object(b)) => a.len().cmp(&b.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}
