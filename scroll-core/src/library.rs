use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::format::{FormatMode, format};
use crate::naming::{capitalize, display_title, txt_url};

static GROUPED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Line_(\d{5})_(Source|Rendering|Reflections|Lens)\.txt$")
        .expect("valid grouped line pattern")
});

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk library: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub name: String,
    pub title: String,
    pub url: String,
    pub chapters: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Chapter {
    pub book: String,
    pub chapter: String,
    pub url: String,
}

/// A single `.txt` file inside a chapter, already formatted.
#[derive(Debug, Clone, Serialize)]
pub struct LineEntry {
    pub book: String,
    pub chapter: String,
    pub filename: String,
    pub basename: String,
    pub content: String,
    pub html: String,
    pub display_title: String,
    pub mode: FormatMode,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupFile {
    pub file: String,
    pub basename: String,
}

/// All `Line_NNNNN_<Type>.txt` files of one chapter sharing an id.
#[derive(Debug, Clone, Serialize)]
pub struct LineGroup {
    pub book: String,
    pub chapter: String,
    pub id: String,
    /// Keyed by lower-cased type: `source`, `rendering`, `reflections`, `lens`.
    pub files: BTreeMap<String, GroupFile>,
}

#[derive(Debug, Default, Serialize)]
pub struct Library {
    pub books: Vec<Book>,
    pub chapters: Vec<Chapter>,
    pub lines: Vec<LineEntry>,
    pub groups: Vec<LineGroup>,
}

impl Library {
    pub fn chapters_of<'a>(&'a self, book: &'a str) -> impl Iterator<Item = &'a Chapter> {
        self.chapters.iter().filter(move |c| c.book == book)
    }

    pub fn lines_of<'a>(
        &'a self,
        book: &'a str,
        chapter: &'a str,
    ) -> impl Iterator<Item = &'a LineEntry> {
        self.lines
            .iter()
            .filter(move |l| l.book == book && l.chapter == chapter)
    }

    pub fn groups_of<'a>(
        &'a self,
        book: &'a str,
        chapter: &'a str,
    ) -> impl Iterator<Item = &'a LineGroup> {
        self.groups
            .iter()
            .filter(move |g| g.book == book && g.chapter == chapter)
    }
}

/// Walks `<library>/<book>/<chapter>/*.txt`.
pub struct LibraryScanner {
    library_dir: PathBuf,
}

impl LibraryScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            library_dir: path.as_ref().to_path_buf(),
        }
    }

    pub fn scan(&self) -> Result<Library, ScanError> {
        if !self.library_dir.is_dir() {
            warn!(path = %self.library_dir.display(), "library directory not found, skipping");
            return Ok(Library::default());
        }

        info!(path = %self.library_dir.display(), "scanning library");

        let mut library = Library::default();
        let mut groups: BTreeMap<(String, String, String), LineGroup> = BTreeMap::new();

        for entry in WalkDir::new(&self.library_dir)
            .min_depth(1)
            .max_depth(3)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            let relative = path
                .strip_prefix(&self.library_dir)
                .map_err(|_| ScanError::InvalidPath(path.to_path_buf()))?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();

            match (entry.depth(), parts.as_slice()) {
                (1, [book]) if entry.file_type().is_dir() => {
                    library.books.push(Book {
                        name: book.clone(),
                        title: capitalize(book),
                        url: format!("/library/{book}/"),
                        chapters: Vec::new(),
                    });
                }
                (2, [book, chapter]) if entry.file_type().is_dir() => {
                    if let Some(b) = library.books.iter_mut().find(|b| &b.name == book) {
                        b.chapters.push(chapter.clone());
                    }
                    library.chapters.push(Chapter {
                        book: book.clone(),
                        chapter: chapter.clone(),
                        url: format!("/library/{book}/{chapter}/"),
                    });
                }
                (3, [book, chapter, filename]) if is_text_file(path) => {
                    let line = read_line_entry(path, book, chapter, filename)?;
                    if let Some(caps) = GROUPED_LINE.captures(filename) {
                        let id = caps[1].to_string();
                        let kind = caps[2].to_lowercase();
                        groups
                            .entry((book.clone(), chapter.clone(), id.clone()))
                            .or_insert_with(|| LineGroup {
                                book: book.clone(),
                                chapter: chapter.clone(),
                                id,
                                files: BTreeMap::new(),
                            })
                            .files
                            .insert(
                                kind,
                                GroupFile {
                                    file: line.filename.clone(),
                                    basename: line.basename.clone(),
                                },
                            );
                    }
                    library.lines.push(line);
                }
                _ => debug!(path = %path.display(), "skipping"),
            }
        }

        library.groups = groups.into_values().collect();
        library.groups.sort_by_key(|g| g.id.parse::<u32>().unwrap_or(u32::MAX));

        info!(
            books = library.books.len(),
            chapters = library.chapters.len(),
            lines = library.lines.len(),
            groups = library.groups.len(),
            "library scanned"
        );

        Ok(library)
    }
}

fn is_text_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "txt")
}

fn read_line_entry(
    path: &Path,
    book: &str,
    chapter: &str,
    filename: &str,
) -> Result<LineEntry, ScanError> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    let mode = FormatMode::from_filename(filename);
    let basename = filename.strip_suffix(".txt").unwrap_or(filename).to_string();

    debug!(file = filename, %mode, "formatting line file");

    Ok(LineEntry {
        book: book.to_string(),
        chapter: chapter.to_string(),
        filename: filename.to_string(),
        html: format(&content, mode),
        display_title: display_title(book, chapter, filename),
        url: txt_url(book, chapter, &basename),
        basename,
        content,
        mode,
    })
}
