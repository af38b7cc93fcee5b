use super::split_lines;

/// Format delimited data: `|`-fenced or tab-separated runs become tables,
/// other lines become headings (when they start with a letter) or
/// paragraphs. Text is emitted as written, without escaping.
pub fn format_tabular(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut table: Option<Table> = None;

    for line in split_lines(text) {
        if line.trim().is_empty() {
            if let Some(table) = table.take() {
                table.render_into(&mut out);
            }
            continue;
        }

        if let Some(cells) = table_cells(line) {
            match table.as_mut() {
                Some(table) => table.rows.push(cells),
                None => {
                    table = Some(Table {
                        header: cells,
                        rows: Vec::new(),
                    })
                }
            }
            continue;
        }

        if let Some(table) = table.take() {
            table.render_into(&mut out);
        }

        let trimmed = line.trim();
        if trimmed.starts_with(char::is_alphabetic) {
            out.push(format!("<h3>{trimmed}</h3>"));
        } else {
            out.push(format!("<p>{trimmed}</p>"));
        }
    }

    if let Some(table) = table {
        table.render_into(&mut out);
    }

    out.join("\n")
}

/// Cells of a table line, or `None` when the line is not part of a table.
fn table_cells(line: &str) -> Option<Vec<String>> {
    if line.starts_with('|') {
        let cells = line
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect();
        Some(cells)
    } else if line.contains('\t') {
        Some(line.split('\t').map(|cell| cell.trim().to_string()).collect())
    } else {
        None
    }
}

#[derive(Debug)]
struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn render_into(self, out: &mut Vec<String>) {
        out.push("<table>".to_string());
        out.push("<thead>".to_string());
        out.push("<tr>".to_string());
        out.extend(self.header.iter().map(|cell| format!("<th>{cell}</th>")));
        out.push("</tr>".to_string());
        out.push("</thead>".to_string());

        if !self.rows.is_empty() {
            out.push("<tbody>".to_string());
            for row in &self.rows {
                out.push("<tr>".to_string());
                out.extend(row.iter().map(|cell| format!("<td>{cell}</td>")));
                out.push("</tr>".to_string());
            }
            out.push("</tbody>".to_string());
        }

        out.push("</table>".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        format_tabular(text).lines().map(str::to_string).collect()
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(format_tabular(""), "");
        assert_eq!(format_tabular("\n\n"), "");
    }

    #[test]
    fn tab_separated_block_becomes_one_table() {
        assert_eq!(
            lines("A\tB\n1\t2\n3\t4\n"),
            [
                "<table>",
                "<thead>",
                "<tr>",
                "<th>A</th>",
                "<th>B</th>",
                "</tr>",
                "</thead>",
                "<tbody>",
                "<tr>",
                "<td>1</td>",
                "<td>2</td>",
                "</tr>",
                "<tr>",
                "<td>3</td>",
                "<td>4</td>",
                "</tr>",
                "</tbody>",
                "</table>"
            ]
        );
    }

    #[test]
    fn pipe_rows_drop_empty_fields() {
        assert_eq!(
            lines("| Word | Gloss |\n| shalom | peace |"),
            [
                "<table>",
                "<thead>",
                "<tr>",
                "<th>Word</th>",
                "<th>Gloss</th>",
                "</tr>",
                "</thead>",
                "<tbody>",
                "<tr>",
                "<td>shalom</td>",
                "<td>peace</td>",
                "</tr>",
                "</tbody>",
                "</table>"
            ]
        );
    }

    #[test]
    fn header_only_table_has_no_body() {
        assert_eq!(
            lines("A\tB"),
            [
                "<table>", "<thead>", "<tr>", "<th>A</th>", "<th>B</th>", "</tr>", "</thead>",
                "</table>"
            ]
        );
    }

    #[test]
    fn ragged_rows_render_as_is() {
        let html = format_tabular("| A | B | C |\n| 1 |\n| 2 | 3 |");
        assert!(html.contains("<tr>\n<td>1</td>\n</tr>"));
        assert!(html.contains("<tr>\n<td>2</td>\n<td>3</td>\n</tr>"));
    }

    #[test]
    fn prose_line_ends_a_table() {
        assert_eq!(
            lines("A\tB\nVocabulary\n1. counted"),
            [
                "<table>",
                "<thead>",
                "<tr>",
                "<th>A</th>",
                "<th>B</th>",
                "</tr>",
                "</thead>",
                "</table>",
                "<h3>Vocabulary</h3>",
                "<p>1. counted</p>"
            ]
        );
    }

    #[test]
    fn blank_line_splits_tables() {
        let html = format_tabular("A\tB\n\nC\tD");
        assert_eq!(html.matches("<table>").count(), 2);
        assert_eq!(html.matches("</table>").count(), 2);
    }

    #[test]
    fn text_is_not_escaped() {
        assert_eq!(lines("Fish & <chips>"), ["<h3>Fish & <chips></h3>"]);
    }
}
