//! Node classification from formatting signals.
//!
//! DOCX paragraphs are classified by their style name, PDF text blocks by
//! their average font size. Both produce [`ContentNode`]s directly; empty
//! text never produces a node.

use unicode_normalization::UnicodeNormalization;

use crate::model::ContentNode;

use super::options::FontSizeThresholds;

/// Style-name markers checked in priority order, with their heading level.
const STYLE_MARKERS: &[(&str, u8)] = &[
    ("Heading 1", 1),
    ("Title", 1),
    ("Heading 2", 2),
    ("Heading 3", 3),
    ("Heading 4", 4),
    ("Heading 5", 5),
    ("Heading 6", 6),
];

/// Heading level for a DOCX style name, or `None` for body text.
///
/// Matching is a case-sensitive substring test, so "Heading 2 Char" or
/// "Custom Title" still classify.
pub fn heading_level_for_style(style: &str) -> Option<u8> {
    STYLE_MARKERS
        .iter()
        .find(|(marker, _)| style.contains(marker))
        .map(|(_, level)| *level)
}

/// Classify a styled DOCX paragraph.
pub fn classify_styled(style: &str, text: &str) -> Option<ContentNode> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(match heading_level_for_style(style) {
        Some(level) => ContentNode::heading(level, text),
        None => ContentNode::paragraph(text),
    })
}

/// Classify a PDF text block by its average font size.
///
/// Lines are joined with a single space and the result is NFC-normalized.
pub fn classify_sized(
    font_size: f32,
    lines: &[String],
    thresholds: &FontSizeThresholds,
) -> Option<ContentNode> {
    let text = join_lines(lines);
    if text.is_empty() {
        return None;
    }

    Some(match thresholds.level_for(font_size) {
        Some(level) => ContentNode::heading(level, text),
        None => ContentNode::paragraph(text),
    })
}

/// Join block lines with a single space, trimming each line and the result.
pub fn join_lines(lines: &[String]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim().nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_priority() {
        assert_eq!(heading_level_for_style("Heading 1"), Some(1));
        assert_eq!(heading_level_for_style("Title"), Some(1));
        assert_eq!(heading_level_for_style("Heading 3 Char"), Some(3));
        assert_eq!(heading_level_for_style("Heading 6"), Some(6));
        assert_eq!(heading_level_for_style("Normal"), None);
        assert_eq!(heading_level_for_style("heading 1"), None);
        assert_eq!(heading_level_for_style("Subtitle"), None);
    }

    #[test]
    fn test_classify_styled() {
        assert_eq!(
            classify_styled("Heading 2", "  Intro "),
            Some(ContentNode::heading(2, "Intro"))
        );
        assert_eq!(
            classify_styled("Normal", "Body"),
            Some(ContentNode::paragraph("Body"))
        );
        assert_eq!(classify_styled("Heading 1", "   "), None);
    }

    #[test]
    fn test_classify_sized_joins_lines() {
        let thresholds = FontSizeThresholds::default();
        let lines = vec!["First line ".to_string(), " second line".to_string()];
        assert_eq!(
            classify_sized(11.0, &lines, &thresholds),
            Some(ContentNode::paragraph("First line second line"))
        );
        assert_eq!(
            classify_sized(24.0, &["Big".to_string()], &thresholds),
            Some(ContentNode::heading(1, "Big"))
        );
        assert_eq!(classify_sized(30.0, &[" ".to_string()], &thresholds), None);
    }

    #[test]
    fn test_join_lines_normalizes() {
        // "e" followed by a combining acute accent composes to "é"
        let lines = vec!["cafe\u{0301}".to_string()];
        assert_eq!(join_lines(&lines), "caf\u{e9}");
    }
}
