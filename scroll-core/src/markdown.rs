use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Render a markdown document to HTML.
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, Options::all());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u32,
    pub text: String,
}

pub fn headings(content: &str) -> Vec<Heading> {
    let parser = Parser::new_ext(content, Options::all());

    let mut in_heading = false;
    let mut lvl: u32 = 0;
    let mut text_buf = String::new();
    let mut headings: Vec<Heading> = Vec::new();
    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                lvl = level as u32;
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading {
                    headings.push(Heading {
                        level: lvl,
                        text: std::mem::take(&mut text_buf),
                    });
                    in_heading = false;
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if in_heading {
                    text_buf.push_str(&text)
                }
            }
            _ => continue,
        };
    }

    headings
}

/// Text of the first heading, if the document has one.
pub fn page_title(content: &str) -> Option<String> {
    headings(content).into_iter().next().map(|h| h.text)
}
