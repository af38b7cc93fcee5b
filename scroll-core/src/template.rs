use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tera templates from a theme directory plus a context shared by every
/// render.
pub struct TemplateRenderer {
    tera: Tera,
    globals: Context,
}

impl TemplateRenderer {
    /// Load every `*.html` template under `theme_dir`.
    pub fn new<P: AsRef<Path>>(theme_dir: P) -> Result<Self, TemplateError> {
        let glob = theme_dir.as_ref().join("**").join("*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;
        Ok(Self::from_tera(tera))
    }

    pub fn from_tera(mut tera: Tera) -> Self {
        crate::naming::register(&mut tera);
        Self {
            tera,
            globals: Context::new(),
        }
    }

    /// Add a value visible to every template.
    pub fn set_global<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.globals.insert(key, value);
    }

    /// Render `template` with the globals overlaid by `context`.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        let mut full = self.globals.clone();
        full.extend(context.clone());
        Ok(self.tera.render(template, &full)?)
    }

    /// Render `template` and write the result, creating parent directories.
    pub fn render_to_file(
        &self,
        template: &str,
        context: &Context,
        output_path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render(template, context)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(output_path, rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TemplateRenderer {
        let mut tera = Tera::default();
        tera.add_raw_template("hello.html", "{{ site }}: {{ name | slugify }}").unwrap();
        let mut renderer = TemplateRenderer::from_tera(tera);
        renderer.set_global("site", "Scroll");
        renderer
    }

    #[test]
    fn merges_globals_with_page_context() {
        let mut context = Context::new();
        context.insert("name", "Song of Songs");
        assert_eq!(
            renderer().render("hello.html", &context).unwrap(),
            "Scroll: song-of-songs"
        );
    }

    #[test]
    fn page_context_wins_over_globals() {
        let mut context = Context::new();
        context.insert("site", "Override");
        context.insert("name", "x");
        assert_eq!(renderer().render("hello.html", &context).unwrap(), "Override: x");
    }

    #[test]
    fn writes_nested_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/index.html");
        let mut context = Context::new();
        context.insert("name", "n");
        renderer().render_to_file("hello.html", &context, &out).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "Scroll: n");
    }

    #[test]
    fn missing_template_is_an_error() {
        assert!(matches!(
            renderer().render("nope.html", &Context::new()),
            Err(TemplateError::Tera(_))
        ));
    }
}
