// src/summarizer/parse.rs
// Lenient parsing of LLM responses into summary / key points / action items

use super::types::ChunkNotes;

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Summary,
    KeyPoints,
    ActionItems,
}

/// Parse a model response into its three fields. Parsing is lenient by
/// design: a response that does not match the expected section structure is
/// kept whole in `summary_text` with empty lists. Malformed-but-present
/// output beats data loss.
pub fn parse_response(content: &str) -> ChunkNotes {
    let mut key_points: Vec<String> = Vec::new();
    let mut action_items: Vec<String> = Vec::new();
    let mut summary_lines: Vec<String> = Vec::new();
    let mut section = Section::Summary;

    for line in content.lines() {
        let lower = line.trim().to_lowercase();

        // Section headers may appear as markdown headings or bare labels
        if lower.contains("summary") || lower.contains("overview") {
            section = Section::Summary;
            continue;
        } else if lower.contains("key point")
            || lower.contains("main point")
            || lower.contains("topic")
        {
            section = Section::KeyPoints;
            continue;
        } else if lower.contains("action item")
            || lower.contains("next step")
            || lower.contains("task")
        {
            section = Section::ActionItems;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = strip_bullet(trimmed) {
            match section {
                Section::KeyPoints => key_points.push(item.to_string()),
                Section::ActionItems => {
                    // "None" under action items means exactly that
                    if !item.eq_ignore_ascii_case("none") {
                        action_items.push(item.to_string());
                    }
                }
                Section::Summary => summary_lines.push(trimmed.to_string()),
            }
        } else if section == Section::Summary {
            summary_lines.push(trimmed.to_string());
        }
    }

    let summary_text = if summary_lines.is_empty() && key_points.is_empty() && action_items.is_empty()
    {
        content.trim().to_string()
    } else if summary_lines.is_empty() {
        String::new()
    } else {
        summary_lines.join(" ")
    };

    ChunkNotes {
        summary_text,
        key_points,
        action_items,
    }
}

fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            let item = rest.trim();
            if !item.is_empty() {
                return Some(item);
            }
        }
    }
    None
}
