//! Template filters.
//!
//! ```jinja
//! {{ post.date | date }}                    2020-06-01
//! {{ post.date | date(format="%B %Y") }}    June 2020
//! {{ post.summary | markdown }}             <p>…</p>
//! ```

use crate::page::markdown;
use crate::utils::date::{format_datetime, parse_datetime};
use minijinja::{Error, ErrorKind, Value, value::Kwargs};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reformat a date-like string.
pub fn date(value: &Value, kwargs: Kwargs) -> Result<String, Error> {
    let format: Option<String> = kwargs.get("format")?;
    kwargs.assert_all_used()?;

    let text = value.as_str().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("`date` expects a date string, got {}", value.kind()),
        )
    })?;
    let parsed = parse_datetime(text).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("`{text}` is not a date"),
        )
    })?;

    let format = format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
    format_datetime(&parsed, format).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format `{format}`"),
        )
    })
}

/// Render a markdown string to HTML.
pub fn markdown(value: &str) -> String {
    markdown::to_html(value)
}
