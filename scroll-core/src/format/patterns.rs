use std::sync::LazyLock;

use regex::Regex;

/// Glyphs a divider line may be built from. A line made only of these (plus
/// whitespace) is a separator that promotes the next line to a bullet.
pub const SEPARATOR_GLYPHS: &str = r#"<>‹›«»〈〉.\-–—*•~^'`"=+/\\\[\]{}()|:\s"#;

/// Shared line patterns, compiled once.
pub static PATTERNS: LazyLock<LinePatterns> = LazyLock::new(LinePatterns::new);

/// Every regular expression the line classifiers need.
#[derive(Debug)]
pub struct LinePatterns {
    pub filetype_delimiter: Regex,
    pub bracket_heading: Regex,
    pub tag_pair: Regex,
    pub separator: Regex,
    pub quote_lead: Regex,
    pub dash_bullet: Regex,
    pub quote_bullet: Regex,
    pub lettered_bullet: Regex,
}

impl LinePatterns {
    fn new() -> Self {
        Self {
            filetype_delimiter: compile(r"^\s*={3,}\s*(.+?)\s*={3,}\s*$"),
            bracket_heading: compile(r"^\s*\[[^\]]+\]\s*$"),
            tag_pair: compile(r"^\s*\[([^\]]+)\]\s*:\s*(.+)\s*$"),
            separator: compile(&format!("^[{SEPARATOR_GLYPHS}]+$")),
            quote_lead: compile(r"^>\s+"),
            dash_bullet: compile(r"^\s*(?:[-*]|•)\s+(.+)$"),
            quote_bullet: compile(r"^\s*>\s+(.+)$"),
            lettered_bullet: compile(r"(?i)^\s*[a-z]\.\s+(.+)$"),
        }
    }

    /// A divider line: only separator glyphs, and not a `> text` quote bullet.
    pub fn is_separator(&self, line: &str) -> bool {
        let t = line.trim();
        !t.is_empty() && self.separator.is_match(t) && !self.quote_lead.is_match(t)
    }

    pub fn is_bracket_heading(&self, line: &str) -> bool {
        self.bracket_heading.is_match(line)
    }

    /// Text captured by whichever bullet syntax the line uses.
    pub fn bullet_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        [&self.dash_bullet, &self.quote_bullet, &self.lettered_bullet]
            .into_iter()
            .find_map(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Whether a line looks like the start of a bullet run.
    pub fn is_bulletish(&self, line: &str) -> bool {
        let t = line.trim();
        self.bullet_text(t).is_some() || self.is_separator(t)
    }

    /// `(key, value)` of a `[Key]: value` line, both trimmed.
    pub fn tag_pair<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.tag_pair.captures(line)?;
        Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
    }

    pub fn filetype_label<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.filetype_delimiter
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed at compile time; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid line pattern {pattern:?}: {e}"))
}
