use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::library::ScanError;
use crate::markdown::page_title;
use crate::naming::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    Regular,
}

/// A standalone markdown page at the top of the source directory.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    pub path: PathBuf,
    pub page_type: PageType,
    #[serde(skip)]
    pub content: String,
}

impl Page {
    pub fn url(&self) -> String {
        match self.page_type {
            PageType::Home => "/".to_string(),
            PageType::Regular => format!("/{}/", self.slug),
        }
    }

    pub fn out_path(&self) -> PathBuf {
        match self.page_type {
            PageType::Home => PathBuf::from("index.html"),
            PageType::Regular => PathBuf::from(&self.slug).join("index.html"),
        }
    }
}

/// Markdown pages directly inside `source_dir`, sorted by filename.
pub fn scan_pages<P: AsRef<Path>>(source_dir: P) -> Result<Vec<Page>, ScanError> {
    let source_dir = source_dir.as_ref();
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut pages = Vec::with_capacity(paths.len());
    for path in paths {
        pages.push(read_page(source_dir, &path)?);
    }
    Ok(pages)
}

fn read_page(source_dir: &Path, path: &Path) -> Result<Page, ScanError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ScanError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy()
        .to_lowercase();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let page_type = match file_name.as_str() {
        "readme.md" | "index.md" => PageType::Home,
        _ => PageType::Regular,
    };

    let content = std::fs::read_to_string(path)?;
    let title = page_title(&content).unwrap_or_else(|| stem.clone());
    let relative_path = path
        .strip_prefix(source_dir)
        .map_err(|_| ScanError::InvalidPath(path.to_path_buf()))?;

    debug!(path = %relative_path.display(), ?page_type, "found page");

    Ok(Page {
        title,
        slug: slugify(&stem),
        path: relative_path.to_path_buf(),
        page_type,
        content,
    })
}
