//! Document metadata extraction
//!
//! Scans raw lines for the five recognized `<text_…>` tag prefixes and
//! collects their attribute values into a [`DocumentMetadata`] record.

use regex::Regex;

use crate::types::DocumentMetadata;

/// Extracts document-level tag attributes from raw corpus lines.
///
/// Recognizes exactly five tags: `<text_id …>`, `<text_author …>`,
/// `<text_year …>`, `<text_jrnl …>`, `<text_primaryTopic …>`. Anything else
/// is ignored. A tag whose attribute shape does not match leaves the field
/// absent; no error is raised. Repeated tags overwrite earlier values.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    patterns: [(MetaField, Regex); 5],
}

#[derive(Debug, Clone, Copy)]
enum MetaField {
    TextId,
    Author,
    Year,
    Journal,
    Topic,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        // The tag set is fixed, so the patterns are known-good.
        let compile = |tag: &str| {
            Regex::new(&format!(r"^<{tag}\s(.*?)>")).expect("static metadata pattern")
        };
        Self {
            patterns: [
                (MetaField::TextId, compile("text_id")),
                (MetaField::Author, compile("text_author")),
                (MetaField::Year, compile("text_year")),
                (MetaField::Journal, compile("text_jrnl")),
                (MetaField::Topic, compile("text_primaryTopic")),
            ],
        }
    }

    /// Scan lines and collect tag attributes.
    pub fn extract<'a, I>(&self, lines: I) -> DocumentMetadata
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut meta = DocumentMetadata::default();
        for line in lines {
            self.scan_line(line.trim(), &mut meta);
        }
        meta
    }

    /// Apply one line to a partially-filled metadata record.
    ///
    /// Used by the streaming tokenizer so metadata and sentences come out of
    /// a single pass over the file.
    pub fn scan_line(&self, line: &str, meta: &mut DocumentMetadata) {
        if !line.starts_with("<text_") {
            return;
        }
        for (field, pattern) in &self.patterns {
            if let Some(caps) = pattern.captures(line) {
                let value = caps[1].to_string();
                match field {
                    MetaField::TextId => meta.text_id = Some(value),
                    MetaField::Author => meta.author = Some(value),
                    MetaField::Year => meta.year = Some(value),
                    MetaField::Journal => meta.journal = Some(value),
                    MetaField::Topic => meta.topic = Some(value),
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_five_fields() {
        let lines = vec![
            "<text_id rsta_1700_001>",
            "<text_author Newton, Isaac>",
            "<text_year 1700>",
            "<text_jrnl Philosophical Transactions>",
            "<text_primaryTopic optics>",
        ];
        let meta = MetadataExtractor::new().extract(lines);
        assert_eq!(meta.text_id.as_deref(), Some("rsta_1700_001"));
        assert_eq!(meta.author.as_deref(), Some("Newton, Isaac"));
        assert_eq!(meta.year.as_deref(), Some("1700"));
        assert_eq!(meta.journal.as_deref(), Some("Philosophical Transactions"));
        assert_eq!(meta.topic.as_deref(), Some("optics"));
    }

    #[test]
    fn test_missing_tags_stay_absent() {
        let meta = MetadataExtractor::new().extract(vec!["<text_id abc>", "some token line"]);
        assert_eq!(meta.text_id.as_deref(), Some("abc"));
        assert!(meta.author.is_none());
        assert!(meta.topic.is_none());
    }

    #[test]
    fn test_repeated_tag_last_wins() {
        let meta =
            MetadataExtractor::new().extract(vec!["<text_year 1700>", "<text_year 1701>"]);
        assert_eq!(meta.year.as_deref(), Some("1701"));
    }

    #[test]
    fn test_malformed_tag_leaves_field_absent() {
        // Prefix present but no attribute before the closing bracket.
        let meta = MetadataExtractor::new().extract(vec!["<text_year>"]);
        assert!(meta.year.is_none());
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        let meta = MetadataExtractor::new()
            .extract(vec!["word\tlemma\tNOUN", "<s_s10local ...>", ""]);
        assert_eq!(meta, DocumentMetadata::default());
    }
}
