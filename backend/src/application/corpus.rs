//! Plain-text renderings of the prompt collection for LLM ingestion
//! (`/llms.txt` and `/llms-full.txt`).

use crate::domain::content::{ContentDocument, ContentMeta};

/// Every prompt wrapped in a `<prompt>` block that carries its location.
pub fn render_full_corpus(documents: &[ContentDocument], site_url: &str) -> String {
    let blocks: Vec<String> = documents
        .iter()
        .map(|document| {
            let meta = &document.meta;
            format!(
                "<prompt url=\"{}\" category=\"{}\" slug=\"{}\">\n{}\n</prompt>",
                attribute(&format!("{site_url}{}", meta.url)),
                attribute(&meta.category),
                attribute(&meta.slug),
                document.content
            )
        })
        .collect();

    if blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n", blocks.join("\n\n"))
    }
}

/// Markdown link list grouped by category, uncategorized prompts first.
pub fn render_index(listing: &[ContentMeta], site_url: &str) -> String {
    let mut lines = vec!["# Prompts".to_string()];
    let mut current: Option<&str> = None;

    for meta in listing {
        if current != Some(meta.category.as_str()) {
            lines.push(String::new());
            if !meta.category.is_empty() {
                lines.push(format!("## {}", meta.category));
                lines.push(String::new());
            }
            current = Some(meta.category.as_str());
        }
        let link = format!("- [{}]({site_url}{})", meta.title, meta.url);
        if meta.description.is_empty() {
            lines.push(link);
        } else {
            lines.push(format!("{link}: {}", meta.description));
        }
    }

    format!("{}\n", lines.join("\n"))
}

fn attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
