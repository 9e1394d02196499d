//! Sentence tokenization
//!
//! A two-state line scanner over VRT content: outside a sentence, lines are
//! checked for metadata and sentence-open tags; inside, annotation lines are
//! split into [`Token`] records until the close tag (or end of input) flushes
//! the buffered sentence.

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::types::{ColumnLayout, DocumentMetadata, Sentence, Token};
use crate::vrt::metadata::MetadataExtractor;

/// Configuration for [`SentenceTokenizer`].
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Regex matched against a full line to open a sentence.
    pub sentence_open: String,
    /// Literal line that closes a sentence.
    pub sentence_close: String,
    /// Regex capturing the sentence id from its tag line.
    pub sentence_id: String,
    /// Positional column layout of token lines.
    pub columns: ColumnLayout,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            sentence_open: r"^<s_s10local\b.*>$".to_string(),
            sentence_close: "</s_s10local>".to_string(),
            sentence_id: r"^<s_sid\s(.*?)>".to_string(),
            columns: ColumnLayout::default(),
        }
    }
}

impl TokenizerConfig {
    /// Override the token column layout.
    pub fn with_columns(mut self, columns: ColumnLayout) -> Self {
        self.columns = columns;
        self
    }
}

/// Result of one pass over a document: its metadata and its sentences.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub metadata: DocumentMetadata,
    pub sentences: Vec<Sentence>,
}

/// Streaming tokenizer for tag-delimited vertical text.
#[derive(Debug, Clone)]
pub struct SentenceTokenizer {
    open: Regex,
    close: String,
    sid: Regex,
    columns: ColumnLayout,
    metadata: MetadataExtractor,
}

impl SentenceTokenizer {
    /// Compile the configured tag patterns.
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        Ok(Self {
            open: Regex::new(&config.sentence_open)?,
            close: config.sentence_close,
            sid: Regex::new(&config.sentence_id)?,
            columns: config.columns,
            metadata: MetadataExtractor::new(),
        })
    }

    /// Tokenizer with the default tag patterns and column layout.
    pub fn with_defaults() -> Self {
        Self::new(TokenizerConfig::default()).expect("default patterns compile")
    }

    /// Single pass over the document: collect metadata and sentences.
    ///
    /// A file that ends while a sentence is still open flushes the buffered
    /// tokens as a final sentence rather than dropping them.
    pub fn tokenize(&self, content: &str) -> ParsedDocument {
        let mut doc = ParsedDocument::default();
        let mut buffer: Vec<Token> = Vec::new();
        let mut in_sentence = false;
        let mut current_sid: Option<String> = None;

        for raw in content.lines() {
            let line = raw.trim();

            if line.starts_with('<') && line.ends_with('>') {
                self.metadata.scan_line(line, &mut doc.metadata);

                if let Some(caps) = self.sid.captures(line) {
                    current_sid = Some(caps[1].to_string());
                }

                if self.open.is_match(line) {
                    // An open tag while already inside discards the
                    // unterminated buffer, matching the corpus producer.
                    in_sentence = true;
                    buffer.clear();
                } else if line == self.close {
                    in_sentence = false;
                    if !buffer.is_empty() {
                        doc.sentences.push(Sentence {
                            sid: current_sid.clone(),
                            tokens: std::mem::take(&mut buffer),
                        });
                    }
                }
                continue;
            }

            if in_sentence && !line.is_empty() {
                let seq_id = buffer.len() as u32 + 1;
                match parse_token_line(line, &self.columns, seq_id) {
                    Some(token) => buffer.push(token),
                    None => debug!(line, "skipping malformed token line"),
                }
            }
        }

        // Flush a sentence left open at end of input.
        if !buffer.is_empty() {
            doc.sentences.push(Sentence {
                sid: current_sid,
                tokens: buffer,
            });
        }

        doc
    }
}

/// Parse one tab-separated annotation line into a [`Token`].
///
/// Returns `None` for lines with too few columns or unparsable head id /
/// surprisal fields; such lines are skipped, never fatal.
fn parse_token_line(line: &str, columns: &ColumnLayout, seq_id: u32) -> Option<Token> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < columns.min_columns {
        return None;
    }

    let head_id: u32 = fields[columns.head].trim().parse().ok()?;
    let surprisal_idx = columns.surprisal.resolve(fields.len())?;
    let surprisal_field = fields[surprisal_idx].trim();
    let surprisal: f64 = if surprisal_field.is_empty() {
        0.0
    } else {
        surprisal_field.parse().ok()?
    };

    Some(Token {
        word: fields[columns.word].to_string(),
        lemma: fields[columns.lemma].to_string(),
        pos: fields[columns.pos].to_string(),
        deprel: fields[columns.deprel].to_string(),
        head_id,
        surprisal,
        seq_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurprisalColumn;

    /// Build a 10-column token line: surprisal lands 4th from the end.
    fn token_line(word: &str, lemma: &str, pos: &str, head: u32, deprel: &str, srp: f64) -> String {
        format!("{word}\t{lemma}\t{pos}\t_\t_\t{head}\t{deprel}\t{srp}\t_\t_\t_")
    }

    fn doc_with(lines: &[String]) -> String {
        let mut all = vec![
            "<text_id rsta_001>".to_string(),
            "<text_year 1750>".to_string(),
            "<s_sid s1>".to_string(),
            "<s_s10local 0.5>".to_string(),
        ];
        all.extend_from_slice(lines);
        all.push("</s_s10local>".to_string());
        all.join("\n")
    }

    #[test]
    fn test_basic_sentence() {
        let content = doc_with(&[
            token_line("The", "the", "DET", 2, "det", 1.5),
            token_line("sun", "sun", "NOUN", 0, "root", 3.0),
        ]);
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);

        assert_eq!(doc.metadata.text_id.as_deref(), Some("rsta_001"));
        assert_eq!(doc.sentences.len(), 1);
        let sent = &doc.sentences[0];
        assert_eq!(sent.sid.as_deref(), Some("s1"));
        assert_eq!(sent.len(), 2);
        assert_eq!(sent.tokens[0].seq_id, 1);
        assert_eq!(sent.tokens[1].seq_id, 2);
        assert_eq!(sent.tokens[1].word, "sun");
        assert_eq!(sent.tokens[1].head_id, 0);
        assert!((sent.tokens[0].surprisal - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_unterminated_sentence_is_flushed() {
        let content = format!(
            "<s_s10local 0.1>\n{}",
            token_line("word", "word", "NOUN", 0, "root", 2.0)
        );
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);
        assert_eq!(doc.sentences.len(), 1);
        assert_eq!(doc.sentences[0].len(), 1);
    }

    #[test]
    fn test_malformed_line_skipped_not_fatal() {
        let content = doc_with(&[
            "too\tfew\tcolumns".to_string(),
            token_line("sun", "sun", "NOUN", 0, "root", 3.0),
        ]);
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);
        assert_eq!(doc.sentences[0].len(), 1);
        assert_eq!(doc.sentences[0].tokens[0].word, "sun");
        // Sequence ids stay dense after a skip.
        assert_eq!(doc.sentences[0].tokens[0].seq_id, 1);
    }

    #[test]
    fn test_tag_lines_never_become_tokens() {
        let content = doc_with(&["<note some inline tag>".to_string()]);
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);
        assert!(doc.sentences.is_empty());
    }

    #[test]
    fn test_empty_sentence_not_emitted() {
        let content = "<s_s10local 0.2>\n</s_s10local>";
        let doc = SentenceTokenizer::with_defaults().tokenize(content);
        assert!(doc.sentences.is_empty());
    }

    #[test]
    fn test_reopen_discards_unterminated_buffer() {
        let content = format!(
            "<s_s10local 0.1>\n{}\n<s_s10local 0.2>\n{}\n</s_s10local>",
            token_line("lost", "lose", "VERB", 0, "root", 1.0),
            token_line("kept", "keep", "VERB", 0, "root", 1.0),
        );
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);
        assert_eq!(doc.sentences.len(), 1);
        assert_eq!(doc.sentences[0].tokens[0].word, "kept");
    }

    #[test]
    fn test_fixed_surprisal_column() {
        // 9 columns, surprisal in column 8 (the last).
        let line = "word\tlemma\tNOUN\t_\t_\t0\troot\t_\t4.25";
        let config = TokenizerConfig::default().with_columns(
            ColumnLayout::default().with_surprisal_column(SurprisalColumn::Index(8)),
        );
        let tokenizer = SentenceTokenizer::new(config).unwrap();
        let content = format!("<s_s10local 0.9>\n{line}\n</s_s10local>");
        let doc = tokenizer.tokenize(&content);
        assert!((doc.sentences[0].tokens[0].surprisal - 4.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_surprisal_field_defaults_to_zero() {
        let line = "word\tlemma\tNOUN\t_\t_\t0\troot\t\t_\t_\t_";
        let content = format!("<s_s10local 0.9>\n{line}\n</s_s10local>");
        let doc = SentenceTokenizer::with_defaults().tokenize(&content);
        assert_eq!(doc.sentences[0].tokens[0].surprisal, 0.0);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = TokenizerConfig {
            sentence_open: "<s_(unclosed".to_string(),
            ..TokenizerConfig::default()
        };
        assert!(SentenceTokenizer::new(config).is_err());
    }
}
