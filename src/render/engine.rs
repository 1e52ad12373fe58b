//! Template environment shared by every render of a build.

use super::context::{PageContext, Scope};
use super::filters;
use crate::error::{BuildError, BuildResult};
use crate::page::{Page, kind::DEFAULT_KIND};
use crate::site::Site;
use chrono::{Local, SecondsFormat};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Template, UndefinedBehavior, path_loader};
use std::{fmt, sync::Arc};

pub struct Renderer {
    env: Environment<'static>,
    site: Arc<Site>,
    /// Build timestamp, RFC 3339 in local time.
    now: String,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("site", &self.site.directory())
            .field("now", &self.now)
            .finish()
    }
}

impl Renderer {
    pub fn new(site: Arc<Site>) -> Arc<Self> {
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        Self::with_clock(site, now)
    }

    /// Renderer with a fixed `now`.
    pub fn with_clock(site: Arc<Site>, now: String) -> Arc<Self> {
        let mut env = Environment::new();
        env.set_loader(path_loader(site.template_dir().to_path_buf()));
        // Output is not always HTML; escaping is the template's business.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_filter("date", filters::date);
        env.add_filter("markdown", filters::markdown);

        Arc::new(Self { env, site, now })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn now(&self) -> &str {
        &self.now
    }

    /// Load a template by file name, `None` if the file does not exist.
    pub fn template(&self, name: &str) -> Result<Option<Template<'_, '_>>, Error> {
        match self.env.get_template(name) {
            Ok(template) => Ok(Some(template)),
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Render a page through `<type><ext>`, falling back to the `page` template.
    pub fn render_page(self: &Arc<Self>, page: &Arc<Page>) -> BuildResult<String> {
        let render_error = |err| BuildError::Render(page.source().to_path_buf(), err);

        let primary = format!("{}{}", page.kind(), page.extension());
        let fallback = format!(
            "{DEFAULT_KIND}{}",
            self.site
                .extension_of(DEFAULT_KIND)
                .unwrap_or(page.extension())
        );

        let template = match self.template(&primary).map_err(render_error)? {
            Some(template) => template,
            None => self
                .template(&fallback)
                .map_err(render_error)?
                .ok_or_else(|| BuildError::TemplateNotFound {
                    page: page.source().to_path_buf(),
                    tried: primary.clone(),
                    fallback: fallback.clone(),
                })?,
        };

        let scope = Scope::new(Arc::clone(self), page.extension());
        template
            .render(PageContext::new(Arc::clone(page), scope, false).into_value())
            .map_err(render_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn render(root: &Path, kind: &str) -> Vec<String> {
        let site = Arc::new(Site::load(root).unwrap());
        let renderer = Renderer::with_clock(Arc::clone(&site), "2026-01-01T00:00:00+00:00".into());
        site.pages()
            .filter(|page| page.kind() == kind)
            .map(|page| renderer.render_page(page).unwrap())
            .collect()
    }

    #[test]
    fn test_context_slots() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "templates/post.html",
            "{{ now }}|{{ post.title }}|{{ page.type }}|{{ page.directory }}",
        );
        write(dir.path(), "blog/a.post.md", "title: A\n\nx");

        assert_eq!(render(dir.path(), "post"), ["2026-01-01T00:00:00+00:00|A|post|/blog"]);
    }

    #[test]
    fn test_pages_keyword_arguments() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "templates/page.html",
            "{% for p in pages(types=[\"post\"], orderBy=\"title\", limit=2) %}{{ p.title }},{% endfor %}",
        );
        write(dir.path(), "templates/_post.html", "");
        write(dir.path(), "index.md", "title: Home\n\n");
        write(dir.path(), "c.post.md", "title: C\n\n.");
        write(dir.path(), "a.post.md", "title: A\n\n.");
        write(dir.path(), "b.post.md", "title: B\n\n.");

        let out: Vec<_> = render(dir.path(), "page");
        assert_eq!(out, ["A,B,"]);
    }

    #[test]
    fn test_unknown_keyword_argument_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "templates/page.html", "{{ pages(sort=\"title\") }}");
        write(dir.path(), "index.md", "title: Home\n\n");

        let site = Arc::new(Site::load(dir.path()).unwrap());
        let renderer = Renderer::new(Arc::clone(&site));
        let page = site.pages().next().unwrap();
        assert!(matches!(renderer.render_page(page), Err(BuildError::Render(..))));
    }

    #[test]
    fn test_tag_method_carries_cause() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".fireproof", "url: https://example.com\n");
        write(dir.path(), "templates/page.html", "{{ page.tag() }}");
        write(dir.path(), "undated.md", "title: No date\n\nx");

        let site = Arc::new(Site::load(dir.path()).unwrap());
        let renderer = Renderer::new(Arc::clone(&site));
        let page = site.pages().next().unwrap();
        let err = renderer.render_page(page).unwrap_err();
        let message = format!("{:#}", anyhow::Error::from(err));
        assert!(message.contains("undated.md"), "{message}");
        assert!(message.contains("has no attribute `date`"), "{message}");
    }

    #[test]
    fn test_tag_method_value() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".fireproof", "url: https://example.com\n");
        write(
            dir.path(),
            "templates/page.html",
            "{{ page.tag() }} {{ page.absolute_url() == page.absolute_url }}",
        );
        write(dir.path(), "blog/post.md", "date: 2020-01-01\n\nx");

        assert_eq!(
            render(dir.path(), "page"),
            ["tag:example.com,2020-01-01:/blog/post.html true"]
        );
    }

    #[test]
    fn test_front_matter_values_keep_their_shape() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "templates/page.html",
            "{{ page.tags | join(\"+\") }} {{ page.count + 1 }} {{ site.title }}",
        );
        write(dir.path(), ".fireproof", "title: Site\n");
        write(dir.path(), "index.md", "tags: [a, b]\ncount: 41\n\n");

        assert_eq!(render(dir.path(), "page"), ["a+b 42 Site"]);
    }
}
