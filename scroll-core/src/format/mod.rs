//! Plain-text to HTML formatters for library line files.
//!
//! Three formatters exist, chosen per file by [`FormatMode::from_filename`]:
//! the annotated-line formatter for commentary files, a per-line paragraph
//! formatter for translations, and a tabular formatter for delimited data.
//! All of them are total: any input produces markup, never an error.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod annotated;
pub mod patterns;
mod tabular;
mod translation;

pub use annotated::{AnnotatedFormatter, format_annotated};
pub use tabular::format_tabular;
pub use translation::format_translation;

/// Which formatter a line file is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    #[default]
    Annotated,
    Translation,
    Tabular,
}

impl FormatMode {
    /// Pick a mode from the file naming convention.
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("translation") {
            return FormatMode::Translation;
        }

        let stem = lower.rsplit_once('.').map_or(lower.as_str(), |(stem, _)| stem);
        if lower.ends_with(".tsv") || stem.ends_with("_table") || stem.ends_with("-table") {
            FormatMode::Tabular
        } else {
            FormatMode::Annotated
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatMode::Annotated => "annotated",
            FormatMode::Translation => "translation",
            FormatMode::Tabular => "tabular",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown format mode `{0}` (expected annotated, translation or tabular)")]
pub struct UnknownFormatMode(String);

impl FromStr for FormatMode {
    type Err = UnknownFormatMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annotated" => Ok(FormatMode::Annotated),
            "translation" => Ok(FormatMode::Translation),
            "tabular" | "table" => Ok(FormatMode::Tabular),
            _ => Err(UnknownFormatMode(s.to_string())),
        }
    }
}

/// Heading levels used by the annotated formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLevels {
    /// Bracket headings, file tag headings and file-type titles.
    pub section: u8,
    /// Demoted bracket headings and `Title:` lines introducing bullets.
    pub subsection: u8,
}

impl Default for HeadingLevels {
    fn default() -> Self {
        Self {
            section: 2,
            subsection: 3,
        }
    }
}

/// Render `text` with the formatter for `mode`.
pub fn format(text: &str, mode: FormatMode) -> String {
    match mode {
        FormatMode::Annotated => format_annotated(text),
        FormatMode::Translation => format_translation(text),
        FormatMode::Tabular => format_tabular(text),
    }
}

/// Escape `& < > " '` in rendered text content.
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Split text into lines after folding `\r\n` into `\n`.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
