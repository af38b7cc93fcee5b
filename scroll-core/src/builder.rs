use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Context;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, ContentConfig, SiteConfig};
use crate::library::{Library, LibraryScanner, ScanError};
use crate::markdown::render_markdown;
use crate::site::{Page, PageType, scan_pages};
use crate::template::{TemplateError, TemplateRenderer};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not specified")]
    MissingSourceDir,
    #[error("Source directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to copy {}: {source}", .path.display())]
    Copy { path: PathBuf, source: walkdir::Error },
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

pub struct SiteBuilder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
    theme_dir: PathBuf,
    site: SiteConfig,
    content: ContentConfig,
    custom: HashMap<String, serde_json::Value>,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source_dir: None,
            output_dir: PathBuf::from("./_site"),
            theme_dir: PathBuf::from("./theme"),
            site: SiteConfig::default(),
            content: ContentConfig::default(),
            custom: HashMap::new(),
        }
    }

    // Required configuration
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn site_config(mut self, config: SiteConfig) -> Self {
        self.site = config;
        self
    }

    pub fn content_config(mut self, config: ContentConfig) -> Self {
        self.content = config;
        self
    }

    pub fn passthrough<S: Into<String>>(mut self, dir: S) -> Self {
        self.content.passthrough.push(dir.into());
        self
    }

    // Custom context data
    pub fn add_custom<T: Serialize>(mut self, key: &str, value: T) -> Result<Self, BuildError> {
        let json_value = serde_json::to_value(value)?;
        self.custom.insert(key.to_string(), json_value);
        Ok(self)
    }

    /// Scan the source directory and load the theme.
    pub fn build(self) -> Result<Site, BuildError> {
        let source_dir = self.source_dir.ok_or(BuildError::MissingSourceDir)?;
        if !source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(source_dir));
        }

        let library = LibraryScanner::new(source_dir.join(&self.content.library)).scan()?;
        let pages = scan_pages(&source_dir)?;

        let mut renderer = TemplateRenderer::new(&self.theme_dir)?;

        let mut navigation: Vec<NavItem> = pages
            .iter()
            .filter(|p| p.page_type == PageType::Regular)
            .map(|p| NavItem {
                text: p.title.clone(),
                link: p.url(),
            })
            .collect();
        navigation.extend(library.books.iter().map(|b| NavItem {
            text: b.title.clone(),
            link: b.url.clone(),
        }));

        renderer.set_global("site", &self.site);
        renderer.set_global("navigation", &navigation);
        renderer.set_global("books", &library.books);
        for (key, value) in &self.custom {
            renderer.set_global(key, value);
        }

        Ok(Site {
            library,
            pages,
            renderer,
            source_dir,
            output_dir: self.output_dir,
            passthrough: self.content.passthrough,
        })
    }
}

pub struct Site {
    library: Library,
    pages: Vec<Page>,
    renderer: TemplateRenderer,
    source_dir: PathBuf,
    output_dir: PathBuf,
    passthrough: Vec<String>,
}

impl Site {
    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn write(&self, template: &str, context: &Context, out_path: &Path) -> Result<(), RenderError> {
        let output_path = self.output_dir.join(out_path);
        debug!(template, path = %output_path.display(), "writing");
        self.renderer.render_to_file(template, context, &output_path)?;
        Ok(())
    }

    fn render_home(&self) -> Result<(), RenderError> {
        let mut context = Context::new();
        let home = self.pages.iter().find(|p| p.page_type == PageType::Home);

        let content = home.map(|p| render_markdown(&p.content)).unwrap_or_default();
        context.insert("page_content", &content);
        context.insert("title", &home.map(|p| p.title.as_str()));
        context.insert("pages", &self.pages);

        self.write("index.html", &context, Path::new("index.html"))
    }

    fn render_page(&self, page: &Page) -> Result<(), RenderError> {
        let mut context = Context::new();
        context.insert("page", page);
        context.insert("title", &page.title);
        context.insert("page_content", &render_markdown(&page.content));

        self.write("page.html", &context, &page.out_path())
    }

    fn render_library(&self) -> Result<(), RenderError> {
        let library_out = Path::new("library");

        for book in &self.library.books {
            let chapters: Vec<_> = self.library.chapters_of(&book.name).collect();

            let mut context = Context::new();
            context.insert("book", book);
            context.insert("title", &book.title);
            context.insert("chapters", &chapters);
            let book_index = library_out.join(&book.name).join("index.html");
            self.write("book.html", &context, &book_index)?;

            for chapter in chapters {
                let lines: Vec<_> = self.library.lines_of(&book.name, &chapter.chapter).collect();
                let groups: Vec<_> = self.library.groups_of(&book.name, &chapter.chapter).collect();
                let chapter_dir = library_out.join(&book.name).join(&chapter.chapter);

                let mut context = Context::new();
                context.insert("book", book);
                context.insert("chapter", chapter);
                context.insert("title", &format!("{} {}", book.title, chapter.chapter));
                context.insert("lines", &lines);
                context.insert("groups", &groups);
                self.write("chapter.html", &context, &chapter_dir.join("index.html"))?;

                for line in lines {
                    let mut context = Context::new();
                    context.insert("book", book);
                    context.insert("chapter", chapter);
                    context.insert("line", line);
                    context.insert("title", &line.display_title);
                    self.write(
                        "line.html",
                        &context,
                        &chapter_dir.join(&line.basename).join("index.html"),
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Copy configured asset directories from the source into the output.
    fn copy_passthrough(&self) -> Result<(), RenderError> {
        for dir in &self.passthrough {
            let from = self.source_dir.join(dir);
            if !from.is_dir() {
                debug!(dir = %dir, "passthrough directory missing, skipping");
                continue;
            }

            for entry in WalkDir::new(&from) {
                let entry = entry.map_err(|source| RenderError::Copy {
                    path: from.clone(),
                    source,
                })?;
                let relative = entry.path().strip_prefix(&self.source_dir).unwrap_or(entry.path());
                let target = self.output_dir.join(relative);
                if entry.file_type().is_dir() {
                    std::fs::create_dir_all(&target)?;
                } else {
                    std::fs::copy(entry.path(), &target)?;
                }
            }
        }

        Ok(())
    }

    pub fn render_all(&self) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        self.render_home()?;
        for page in self.pages.iter().filter(|p| p.page_type == PageType::Regular) {
            self.render_page(page)?;
        }
        self.render_library()?;
        self.copy_passthrough()?;

        info!(
            pages = self.pages.len(),
            lines = self.library.lines.len(),
            output = %self.output_dir.display(),
            "site rendered"
        );

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Scan, build and render in one step.
pub fn build_site(
    config: &Config,
    source_dir: &Path,
    output_dir: &Path,
    theme_dir: &Path,
) -> Result<Site, SiteError> {
    let site = SiteBuilder::new()
        .source_dir(source_dir)
        .output_dir(output_dir)
        .theme_dir(theme_dir)
        .site_config(config.site.clone())
        .content_config(config.content.clone())
        .build()?;
    site.render_all()?;
    Ok(site)
}
