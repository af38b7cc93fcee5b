use super::split_lines;

/// Format a translation: one paragraph per line, trimmed, unescaped.
pub fn format_translation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    split_lines(text)
        .into_iter()
        .map(|line| format!("<p>{}</p>", line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_paragraph_per_line() {
        assert_eq!(
            format_translation("  In the beginning\r\nthere was light  "),
            "<p>In the beginning</p>\n<p>there was light</p>"
        );
    }

    #[test]
    fn blank_lines_are_kept_as_empty_paragraphs() {
        assert_eq!(format_translation("a\n\nb"), "<p>a</p>\n<p></p>\n<p>b</p>");
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(format_translation(""), "");
    }
}
