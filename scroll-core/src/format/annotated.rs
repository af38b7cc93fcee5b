use super::patterns::{LinePatterns, PATTERNS};
use super::{HeadingLevels, escape, split_lines};

/// Heading label that opens a tag block.
const FILE_TAGS: &str = "FILE TAGS";
/// Heading label rendered one level below the other section headings.
const DEMOTED_HEADING: &str = "YOU ARE WELCOME HERE";

/// Format an annotated line file with the default heading levels.
pub fn format_annotated(text: &str) -> String {
    AnnotatedFormatter::default().format(text)
}

/// Converts loosely structured commentary into headings, lists, tag blocks
/// and paragraphs in a single forward pass.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedFormatter {
    levels: HeadingLevels,
    patterns: &'static LinePatterns,
}

impl Default for AnnotatedFormatter {
    fn default() -> Self {
        Self::new(HeadingLevels::default())
    }
}

impl AnnotatedFormatter {
    pub fn new(levels: HeadingLevels) -> Self {
        Self {
            levels,
            patterns: &PATTERNS,
        }
    }

    pub fn format(&self, text: &str) -> String {
        let lines = split_lines(text);
        let mut out = Emitter::default();

        for (i, raw) in lines.iter().copied().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }

            if let Some(label) = self.patterns.filetype_label(raw) {
                out.close_all();
                out.push(format!(
                    r#"<h{0} class="filetype-title">{1}</h{0}>"#,
                    self.levels.section,
                    escape(label)
                ));
                continue;
            }

            if self.patterns.is_bracket_heading(raw) {
                out.close_all();
                self.bracket_heading(&mut out, raw);
                continue;
            }

            // Tag blocks only surface `[Key]: value` pairs; anything else is dropped.
            if out.in_tags {
                if let Some((key, value)) = self.patterns.tag_pair(raw) {
                    out.push(format!("<p>[{}]: {}</p>", escape(key), escape(value)));
                }
                continue;
            }

            let trimmed = raw.trim();
            if trimmed.ends_with(':') && self.next_is_bulletish(&lines, i) {
                out.close_list();
                let title = trimmed.strip_suffix(':').unwrap_or(trimmed);
                out.heading(self.levels.subsection, &escape(title));
                out.pending_bullet = false;
                continue;
            }

            if self.patterns.is_separator(raw) {
                out.pending_bullet = true;
                continue;
            }

            if let Some(text) = self.patterns.bullet_text(raw) {
                out.item(text);
                continue;
            }

            if out.pending_bullet {
                out.item(raw);
                continue;
            }

            out.close_list();
            out.push(format!("<p>{}</p>", escape(raw)));
        }

        out.finish()
    }

    fn bracket_heading(&self, out: &mut Emitter, raw: &str) {
        let trimmed = raw.trim();
        let label = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(trimmed);
        let escaped = escape(label);

        match label.to_uppercase().as_str() {
            FILE_TAGS => {
                out.heading(self.levels.section, &escaped);
                out.push(r#"<div class="file-tags">"#.to_string());
                out.in_tags = true;
            }
            DEMOTED_HEADING => out.heading(self.levels.subsection, &escaped),
            _ => out.heading(self.levels.section, &escaped),
        }
    }

    /// Peek past blank lines to see whether a bullet run follows line `i`.
    fn next_is_bulletish(&self, lines: &[&str], i: usize) -> bool {
        lines[i + 1..]
            .iter()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|line| self.patterns.is_bulletish(line))
    }
}

/// Output buffer plus the state carried from one line to the next.
#[derive(Default)]
struct Emitter {
    out: Vec<String>,
    in_tags: bool,
    in_list: bool,
    /// Set by a bare separator line; the next non-blank line becomes a bullet.
    pending_bullet: bool,
}

impl Emitter {
    fn push(&mut self, token: String) {
        self.out.push(token);
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.push(format!("<h{level}>{text}</h{level}>"));
    }

    fn item(&mut self, text: &str) {
        if !self.in_list {
            self.push("<ul>".to_string());
            self.in_list = true;
        }
        self.push(format!("<li>{}</li>", escape(text)));
        self.pending_bullet = false;
    }

    fn close_list(&mut self) {
        if self.in_list {
            self.push("</ul>".to_string());
            self.in_list = false;
        }
    }

    fn close_tags(&mut self) {
        if self.in_tags {
            self.push("</div>".to_string());
            self.in_tags = false;
        }
    }

    fn close_all(&mut self) {
        self.close_list();
        self.close_tags();
        self.pending_bullet = false;
    }

    fn finish(mut self) -> String {
        self.close_all();
        self.out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn lines(text: &str) -> Vec<String> {
        format_annotated(text).lines().map(str::to_string).collect()
    }

    #[test]
    fn empty_and_blank_input_render_nothing() {
        assert_eq!(format_annotated(""), "");
        assert_eq!(format_annotated("  \n\t\n\r\n"), "");
    }

    #[test]
    fn consecutive_bullets_share_one_list() {
        assert_eq!(
            lines("- item one\n- item two"),
            ["<ul>", "<li>item one</li>", "<li>item two</li>", "</ul>"]
        );
    }

    #[test]
    fn all_bullet_syntaxes_join_the_same_list() {
        assert_eq!(
            lines("* star\n• glyph\n> quote\nb. lettered"),
            [
                "<ul>",
                "<li>star</li>",
                "<li>glyph</li>",
                "<li>quote</li>",
                "<li>lettered</li>",
                "</ul>"
            ]
        );
    }

    #[test]
    fn title_before_bullets_becomes_subheading() {
        assert_eq!(
            lines("Notes:\n- a\n- b"),
            ["<h3>Notes</h3>", "<ul>", "<li>a</li>", "<li>b</li>", "</ul>"]
        );
    }

    #[test]
    fn title_lookahead_skips_blank_lines() {
        assert_eq!(
            lines("Notes:\n\n\n- a"),
            ["<h3>Notes</h3>", "<ul>", "<li>a</li>", "</ul>"]
        );
    }

    #[rstest]
    #[case::separator("Notes:\n———\nx")]
    #[case::quote_bullet("Notes:\n> x")]
    #[case::lettered_bullet("Notes:\na. x")]
    #[case::star_bullet("Notes:\n* x")]
    fn every_bullet_kind_turns_a_title_into_a_subheading(#[case] text: &str) {
        assert_eq!(lines(text), ["<h3>Notes</h3>", "<ul>", "<li>x</li>", "</ul>"]);
    }

    #[test]
    fn title_without_bullets_is_a_paragraph() {
        assert_eq!(lines("Notes:\nJust prose."), ["<p>Notes:</p>", "<p>Just prose.</p>"]);
        assert_eq!(lines("Trailing:"), ["<p>Trailing:</p>"]);
    }

    #[test]
    fn title_closes_an_open_list() {
        assert_eq!(
            lines("- a\nMore:\n- b"),
            [
                "<ul>",
                "<li>a</li>",
                "</ul>",
                "<h3>More</h3>",
                "<ul>",
                "<li>b</li>",
                "</ul>"
            ]
        );
    }

    #[test]
    fn separator_promotes_next_line_to_bullet() {
        assert_eq!(
            lines("———\nContext here"),
            ["<ul>", "<li>Context here</li>", "</ul>"]
        );
    }

    #[test]
    fn separator_flag_survives_blank_lines() {
        assert_eq!(lines("———\n\nContext here"), ["<ul>", "<li>Context here</li>", "</ul>"]);
    }

    #[test]
    fn separators_between_bullets_keep_the_list_open() {
        assert_eq!(
            lines("- one\n~~~\n- two\n———\nthree\nplain"),
            [
                "<ul>",
                "<li>one</li>",
                "<li>two</li>",
                "<li>three</li>",
                "</ul>",
                "<p>plain</p>"
            ]
        );
    }

    #[test]
    fn repeated_separators_promote_only_one_line() {
        assert_eq!(
            lines("---\n***\nfirst\nsecond"),
            ["<ul>", "<li>first</li>", "</ul>", "<p>second</p>"]
        );
    }

    #[test]
    fn deferred_bullet_keeps_the_raw_line() {
        assert_eq!(lines("•••\n  indented"), ["<ul>", "<li>  indented</li>", "</ul>"]);
    }

    #[test]
    fn paragraph_breaks_a_list() {
        assert_eq!(
            lines("- a\nprose\n- b"),
            [
                "<ul>",
                "<li>a</li>",
                "</ul>",
                "<p>prose</p>",
                "<ul>",
                "<li>b</li>",
                "</ul>"
            ]
        );
    }

    #[test]
    fn blank_lines_do_not_close_a_list() {
        assert_eq!(
            lines("- a\n\n- b"),
            ["<ul>", "<li>a</li>", "<li>b</li>", "</ul>"]
        );
    }

    #[test]
    fn file_tags_block_collects_tag_pairs() {
        assert_eq!(
            lines("[FILE TAGS]\n[Author]: Jane Doe\n\n[Date]: 2024"),
            [
                "<h2>FILE TAGS</h2>",
                r#"<div class="file-tags">"#,
                "<p>[Author]: Jane Doe</p>",
                "<p>[Date]: 2024</p>",
                "</div>"
            ]
        );
    }

    #[test]
    fn file_tags_label_keeps_its_written_case() {
        assert_eq!(
            lines("[File Tags]\n[Theme]: Exile"),
            [
                "<h2>File Tags</h2>",
                r#"<div class="file-tags">"#,
                "<p>[Theme]: Exile</p>",
                "</div>"
            ]
        );
    }

    #[test]
    fn tag_block_ignores_bullets_separators_and_prose() {
        assert_eq!(
            lines("[FILE TAGS]\n- not a bullet\n———\nstray prose\n[Mood]: calm"),
            [
                "<h2>FILE TAGS</h2>",
                r#"<div class="file-tags">"#,
                "<p>[Mood]: calm</p>",
                "</div>"
            ]
        );
    }

    #[test]
    fn bracket_heading_closes_tag_block() {
        assert_eq!(
            lines("[FILE TAGS]\n[Key]: value\n[Context]\nBody"),
            [
                "<h2>FILE TAGS</h2>",
                r#"<div class="file-tags">"#,
                "<p>[Key]: value</p>",
                "</div>",
                "<h2>Context</h2>",
                "<p>Body</p>"
            ]
        );
    }

    #[test]
    fn welcome_heading_is_demoted() {
        assert_eq!(
            lines("[You Are Welcome Here]\n[Other]"),
            ["<h3>You Are Welcome Here</h3>", "<h2>Other</h2>"]
        );
    }

    #[test]
    fn bracket_heading_closes_list() {
        assert_eq!(
            lines("- a\n[Next]"),
            ["<ul>", "<li>a</li>", "</ul>", "<h2>Next</h2>"]
        );
    }

    #[test]
    fn filetype_delimiter_closes_everything() {
        assert_eq!(
            lines("[FILE TAGS]\n[K]: v\n- x\n=== Reflections ===\n- y"),
            [
                "<h2>FILE TAGS</h2>",
                r#"<div class="file-tags">"#,
                "<p>[K]: v</p>",
                "</div>",
                r#"<h2 class="filetype-title">Reflections</h2>"#,
                "<ul>",
                "<li>y</li>",
                "</ul>"
            ]
        );
    }

    #[test]
    fn filetype_delimiter_clears_pending_bullet() {
        assert_eq!(
            lines("———\n=== Source ===\nplain"),
            [r#"<h2 class="filetype-title">Source</h2>"#, "<p>plain</p>"]
        );
    }

    #[test]
    fn text_content_is_escaped() {
        assert_eq!(
            lines("[Q&A]\n- a < b\nTom & \"Jerry\""),
            [
                "<h2>Q&amp;A</h2>",
                "<ul>",
                "<li>a &lt; b</li>",
                "</ul>",
                "<p>Tom &amp; &quot;Jerry&quot;</p>"
            ]
        );
    }

    #[test]
    fn crlf_input_matches_lf_input() {
        assert_eq!(
            format_annotated("Notes:\r\n- a\r\n- b\r\n"),
            format_annotated("Notes:\n- a\n- b\n")
        );
    }

    #[test]
    fn malformed_brackets_degrade_to_paragraphs() {
        assert_eq!(lines("[unterminated\n[]x"), ["<p>[unterminated</p>", "<p>[]x</p>"]);
    }

    #[test]
    fn custom_heading_levels() {
        let formatter = AnnotatedFormatter::new(HeadingLevels {
            section: 3,
            subsection: 4,
        });
        assert_eq!(
            formatter.format("[Context]\nSteps:\n- one"),
            "<h3>Context</h3>\n<h4>Steps</h4>\n<ul>\n<li>one</li>\n</ul>"
        );
    }

    proptest! {
        #[test]
        fn lists_and_tag_blocks_are_balanced(
            input in prop::collection::vec(
                prop_oneof![
                    Just("- bullet".to_string()),
                    Just("———".to_string()),
                    Just("".to_string()),
                    Just("[FILE TAGS]".to_string()),
                    Just("[Key]: value".to_string()),
                    Just("[Section]".to_string()),
                    Just("=== Lens ===".to_string()),
                    Just("Heading:".to_string()),
                    "[ -~]{0,12}",
                ],
                0..24
            )
        ) {
            let html = format_annotated(&input.join("\n"));
            prop_assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
            prop_assert_eq!(
                html.matches(r#"<div class="file-tags">"#).count(),
                html.matches("</div>").count()
            );
        }

        #[test]
        fn never_panics_on_arbitrary_text(input in "\\PC*") {
            let _ = format_annotated(&input);
        }
    }
}
