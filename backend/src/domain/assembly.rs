use crate::domain::content::ReferenceFile;

const REFERENCE_EXTENSION: &str = ".md";

/// Build the canonical document for a unit: its body followed by one
/// `## Reference: <name>` section per reference file, in the given order.
///
/// Pure; the same inputs always produce byte-identical output.
pub fn assemble_document(body: &str, references: &[ReferenceFile]) -> String {
    if references.is_empty() {
        return body.trim().to_string();
    }

    let mut parts: Vec<String> = vec![body.trim().to_string(), String::new()];
    for reference in references {
        parts.push("---".to_string());
        parts.push(String::new());
        parts.push(format!(
            "## Reference: {}",
            reference_name(&reference.relative_path)
        ));
        parts.push(String::new());
        parts.push(reference.content.trim().to_string());
        parts.push(String::new());
    }

    parts.join("\n").trim().to_string()
}

/// `b/c.md` -> `b/c`
pub fn reference_name(relative_path: &str) -> &str {
    relative_path
        .strip_suffix(REFERENCE_EXTENSION)
        .unwrap_or(relative_path)
}
