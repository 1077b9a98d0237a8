//! Frontmatter and title extraction for `SKILL.md` / `*.mdx` documents.
//!
//! Parsing never fails: a missing or unterminated header block is treated as
//! "no header" and the whole input becomes the body.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Result of splitting a document into its header block and body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Value of the `name:` key, empty when absent.
    pub name: String,
    /// Value of the `description:` key, empty when absent.
    pub description: String,
    /// Every top-level `key: value` pair of the header; `None` without a header.
    pub header: Option<BTreeMap<String, String>>,
    pub body: String,
}

/// Title and description as shown in listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Heading {
    pub title: String,
    pub description: String,
}

pub fn parse_frontmatter(content: &str) -> Frontmatter {
    let Some((block, body)) = split_header(content) else {
        return Frontmatter {
            body: content.to_string(),
            ..Frontmatter::default()
        };
    };

    let mut header = BTreeMap::new();
    for line in block.lines() {
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim_end();
            if !key.is_empty() {
                header.insert(key.to_string(), value.trim().to_string());
            }
        }
    }

    Frontmatter {
        name: extract_field(block, "name"),
        description: extract_field(block, "description"),
        header: Some(header),
        body: body.trim_start_matches(['\n', '\r']).to_string(),
    }
}

/// Locate `---\n<block>\n---` at the very start of `content`.
/// Returns `(block, rest)` or `None` if either delimiter is missing.
fn split_header(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let opening = lines.next()?;
    if !is_delimiter(opening) {
        return None;
    }

    let block_start = opening.len();
    let mut offset = block_start;
    for line in lines {
        let line_end = offset + line.len();
        if is_delimiter(line) {
            return Some((&content[block_start..offset], &content[line_end..]));
        }
        offset = line_end;
    }
    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

fn extract_field(block: &str, key: &str) -> String {
    let prefix = format!("{key}:");
    for line in block.lines() {
        if let Some(value) = line.strip_prefix(&prefix) {
            return value.trim().to_string();
        }
    }
    String::new()
}

/// Scan a header-stripped body for the first `# ` heading and the first
/// plain line after it.
pub fn extract_heading(body: &str) -> Heading {
    let mut heading = Heading::default();
    let mut found_title = false;

    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if !found_title {
            if let Some(title) = line.strip_prefix("# ") {
                heading.title = title.trim().to_string();
                found_title = true;
            }
            continue;
        }
        if line.starts_with('#') || is_separator(line) {
            continue;
        }
        heading.description = line.to_string();
        break;
    }

    heading
}

/// Title falls back to the frontmatter name, then to the slug. A frontmatter
/// description wins over the inferred one.
pub fn derive_heading(frontmatter: &Frontmatter, slug: &str) -> Heading {
    let inferred = extract_heading(&frontmatter.body);
    let title = if !inferred.title.is_empty() {
        inferred.title
    } else if !frontmatter.name.is_empty() {
        frontmatter.name.clone()
    } else {
        slug.to_string()
    };
    let description = if frontmatter.description.is_empty() {
        inferred.description
    } else {
        frontmatter.description.clone()
    };
    Heading { title, description }
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3
        && ['-', '*', '_', '=']
            .iter()
            .any(|marker| line.chars().all(|c| c == *marker))
}
