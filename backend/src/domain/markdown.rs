//! Minimal markdown to HTML conversion for rendering skills in the browser.
//!
//! Covers headings, paragraphs, fenced code, ordered/unordered/task lists,
//! pipe tables, horizontal rules and inline `code`, **bold**, *italic* and
//! links. Anything else renders as a paragraph.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

#[derive(Debug, Default)]
enum Block {
    #[default]
    None,
    Code {
        language: String,
        lines: Vec<String>,
    },
    List(ListKind),
    Table {
        rows: usize,
    },
}

#[derive(Default)]
struct Renderer {
    html: Vec<String>,
    block: Block,
}

pub fn render_markdown(markdown: &str) -> String {
    let mut renderer = Renderer::default();
    for line in markdown.lines() {
        renderer.push_line(line);
    }
    renderer.finish()
}

impl Renderer {
    fn push_line(&mut self, raw: &str) {
        if let Block::Code { lines, .. } = &mut self.block {
            if raw.trim_start().starts_with("```") {
                self.close_block();
            } else {
                lines.push(escape_html(raw));
            }
            return;
        }

        let line = raw.trim();
        if let Some(language) = line.strip_prefix("```") {
            self.close_block();
            self.block = Block::Code {
                language: language.trim().to_string(),
                lines: Vec::new(),
            };
            return;
        }
        if line.is_empty() {
            self.close_block();
            return;
        }
        if let Some((level, text)) = parse_heading(line) {
            self.close_block();
            self.html
                .push(format!("<h{level}>{}</h{level}>", render_inline(text)));
            return;
        }
        if is_rule(line) {
            self.close_block();
            self.html.push("<hr />".to_string());
            return;
        }
        if line.starts_with('|') {
            self.push_table_row(line);
            return;
        }
        if let Some((checked, text)) = parse_task_item(line) {
            let state = if checked { " checked" } else { "" };
            let item = format!(
                "<li><input type=\"checkbox\" disabled{state} /> {}</li>",
                render_inline(text)
            );
            self.push_list_item(ListKind::Unordered, item);
            return;
        }
        if let Some(text) = parse_unordered_item(line) {
            let item = format!("<li>{}</li>", render_inline(text));
            self.push_list_item(ListKind::Unordered, item);
            return;
        }
        if let Some(text) = parse_ordered_item(line) {
            let item = format!("<li>{}</li>", render_inline(text));
            self.push_list_item(ListKind::Ordered, item);
            return;
        }

        self.close_block();
        self.html.push(format!("<p>{}</p>", render_inline(line)));
    }

    fn push_list_item(&mut self, kind: ListKind, item: String) {
        match self.block {
            Block::List(open) if open == kind => {}
            _ => {
                self.close_block();
                self.html.push(kind.open().to_string());
                self.block = Block::List(kind);
            }
        }
        self.html.push(item);
    }

    // Header and separator rows are dropped; only body rows are emitted.
    fn push_table_row(&mut self, line: &str) {
        if !matches!(self.block, Block::Table { .. }) {
            self.close_block();
            self.html.push("<table>".to_string());
            self.block = Block::Table { rows: 0 };
        }
        let Block::Table { rows } = &mut self.block else {
            return;
        };
        *rows += 1;
        let cells = split_cells(line);
        if *rows == 1 || is_separator_row(&cells) {
            return;
        }
        let cells: String = cells
            .iter()
            .map(|cell| format!("<td>{}</td>", render_inline(cell)))
            .collect();
        self.html.push(format!("<tr>{cells}</tr>"));
    }

    fn close_block(&mut self) {
        match std::mem::take(&mut self.block) {
            Block::None => {}
            Block::Code { language, lines } => {
                let open = if language.is_empty() {
                    "<pre><code>".to_string()
                } else {
                    format!("<pre><code data-language=\"{}\">", escape_attr(&language))
                };
                self.html
                    .push(format!("{open}{}</code></pre>", lines.join("\n")));
            }
            Block::List(kind) => self.html.push(kind.close().to_string()),
            Block::Table { .. } => self.html.push("</table>".to_string()),
        }
    }

    fn finish(mut self) -> String {
        self.close_block();
        self.html.join("\n")
    }
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| line.chars().all(|c| c == *marker))
}

fn parse_task_item(line: &str) -> Option<(bool, &str)> {
    let rest = line
        .strip_prefix("- [")
        .or_else(|| line.strip_prefix("* ["))?;
    let (checked, rest) = if let Some(rest) = rest.strip_prefix(" ]") {
        (false, rest)
    } else if let Some(rest) = rest
        .strip_prefix("x]")
        .or_else(|| rest.strip_prefix("X]"))
    {
        (true, rest)
    } else {
        return None;
    };
    if rest.is_empty() {
        return Some((checked, rest));
    }
    rest.strip_prefix(' ').map(|text| (checked, text.trim()))
}

fn parse_unordered_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
        .map(str::trim)
}

fn parse_ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(str::trim)
}

fn split_cells(line: &str) -> Vec<&str> {
    let inner = line.trim().trim_start_matches('|');
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn is_separator_row(cells: &[&str]) -> bool {
    cells.iter().all(|cell| {
        !cell.is_empty() && cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
    })
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Input is already entity-escaped; only quotes remain dangerous in attributes.
fn escape_attr(text: &str) -> String {
    text.replace('"', "&quot;")
}

/// Escape first, then apply inline markup. Text between backticks is left
/// untouched apart from escaping.
fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let segments: Vec<&str> = escaped.split('`').collect();
    let count = segments.len();
    let mut html = String::with_capacity(escaped.len());

    for (index, segment) in segments.iter().enumerate() {
        let is_code = index % 2 == 1 && index + 1 < count;
        if is_code {
            html.push_str("<code>");
            html.push_str(segment);
            html.push_str("</code>");
        } else {
            if index % 2 == 1 {
                // unmatched trailing backtick
                html.push('`');
            }
            html.push_str(&render_spans(segment));
        }
    }
    html
}

// Links are cut out first so emphasis markers never reach an `href`.
fn render_spans(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(mid) = after_open.find("](") else {
            break;
        };
        let after_mid = &after_open[mid + 2..];
        let Some(close) = after_mid.find(')') else {
            break;
        };

        let label = render_emphasis(&after_open[..mid]);
        let url = after_mid[..close].trim();
        html.push_str(&render_emphasis(&rest[..open]));
        if url.to_ascii_lowercase().starts_with("javascript:") {
            html.push_str(&label);
        } else {
            html.push_str(&format!("<a href=\"{}\">{label}</a>", escape_attr(url)));
        }
        rest = &after_mid[close + 1..];
    }

    html.push_str(&render_emphasis(rest));
    html
}

fn render_emphasis(text: &str) -> String {
    let bold = replace_pairs(text, "**", "<strong>", "</strong>");
    replace_pairs(&bold, "*", "<em>", "</em>")
}

fn replace_pairs(text: &str, marker: &str, open: &str, close: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(marker) {
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };
        let inner = &after[..end];
        if inner.is_empty()
            || inner.starts_with(char::is_whitespace)
            || inner.ends_with(char::is_whitespace)
        {
            html.push_str(&rest[..start + marker.len()]);
            rest = after;
            continue;
        }
        html.push_str(&rest[..start]);
        html.push_str(open);
        html.push_str(inner);
        html.push_str(close);
        rest = &after[end + marker.len()..];
    }

    html.push_str(rest);
    html
}
