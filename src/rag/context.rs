//! Context assembly for RAG prompts.

use crate::vector_store::RetrievedMatch;

/// Join the `content` of every match, in ranking order, into one context blob.
///
/// A match without content still contributes an (empty) segment; only the
/// outer whitespace is trimmed.
pub fn assemble_context(matches: &[RetrievedMatch]) -> String {
    matches
        .iter()
        .map(|m| m.content.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// First `max_chars` characters of `content`, with an ellipsis if cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let flat = content.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembles_in_ranking_order() {
        let matches = vec![
            RetrievedMatch::new("1", 0.9).with_content("Warm up with dynamic stretches."),
            RetrievedMatch::new("2", 0.8).with_content("Increase heart rate gradually."),
        ];
        assert_eq!(
            assemble_context(&matches),
            "Warm up with dynamic stretches. Increase heart rate gradually."
        );
    }

    #[test]
    fn test_missing_content_keeps_its_segment() {
        let matches = vec![
            RetrievedMatch::new("1", 0.9).with_content("First."),
            RetrievedMatch::new("2", 0.8),
            RetrievedMatch::new("3", 0.7).with_content("Third."),
        ];
        assert_eq!(assemble_context(&matches), "First.  Third.");
    }

    #[test]
    fn test_outer_whitespace_trimmed() {
        let matches = vec![
            RetrievedMatch::new("1", 0.9),
            RetrievedMatch::new("2", 0.8).with_content(" Sleep matters. "),
            RetrievedMatch::new("3", 0.7),
        ];
        assert_eq!(assemble_context(&matches), "Sleep matters.");
    }

    #[test]
    fn test_empty_matches() {
        assert_eq!(assemble_context(&[]), "");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("line one\nline two", 8), "line one...");
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }
}
