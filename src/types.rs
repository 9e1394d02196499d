//! Core data types shared across the extraction pipeline.
//!
//! A [`Token`] is one annotated line of a VRT file, a [`Sentence`] is the
//! ordered token sequence between a pair of sentence tags, and
//! [`DocumentMetadata`] carries the document-level tag attributes that get
//! attached to every extracted entity.

/// A single annotated corpus token.
///
/// Token identity within a sentence is `seq_id` (1-based, assigned in source
/// order). Uniqueness holds within one sentence only, never across sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form (column 0).
    pub word: String,
    /// Lemma (column 1).
    pub lemma: String,
    /// Universal POS tag (column 2), e.g. `NOUN`, `VERB`.
    pub pos: String,
    /// Dependency relation to the head (column 6), e.g. `nsubj`, `amod`.
    pub deprel: String,
    /// `seq_id` of the governing token; `0` marks the sentence root.
    pub head_id: u32,
    /// Precomputed surprisal annotation, in bits.
    pub surprisal: f64,
    /// 1-based position within the sentence.
    pub seq_id: u32,
}

impl Token {
    /// True if this token is a sentence root (`head_id == 0`).
    pub fn is_root_attached(&self) -> bool {
        self.head_id == 0
    }
}

/// An ordered token sequence, as it appeared in the source file.
///
/// Order is significant: it defines adjacency for surprisal differencing and
/// must be preserved through every transformation.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    /// Sentence id from the most recent `<s_sid …>` tag, if any.
    pub sid: Option<String>,
    /// Tokens in source order, `seq_id` running 1..=len.
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Look up a token by its `seq_id`.
    ///
    /// Ids are assigned densely from 1, so this is an index lookup.
    pub fn token(&self, seq_id: u32) -> Option<&Token> {
        if seq_id == 0 {
            return None;
        }
        self.tokens.get(seq_id as usize - 1)
    }

    /// Surprisal values of all tokens, in source order.
    pub fn surprisals(&self) -> Vec<f64> {
        self.tokens.iter().map(|t| t.surprisal).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Document-level metadata extracted from `<text_…>` tags.
///
/// Absent tags stay `None`; downstream consumers must tolerate that. When a
/// tag repeats, the last occurrence wins (this mirrors the corpus producer's
/// observed behavior and is deliberate, see DESIGN.md).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub text_id: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub journal: Option<String>,
    pub topic: Option<String>,
}

impl DocumentMetadata {
    /// The text id, or `"unknown"` when the tag was missing.
    pub fn text_id_or_unknown(&self) -> &str {
        self.text_id.as_deref().unwrap_or("unknown")
    }
}

/// Where the surprisal annotation sits on a token line.
///
/// Two corpus producers disagree on this: the per-sentence pipeline carries
/// surprisal in the 4th column from the end, the flat extractor in a fixed
/// column index. Both layouts are supported; pick per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurprisalColumn {
    /// Fixed 0-based column index.
    Index(usize),
    /// Offset from the end of the line; `FromEnd(1)` is the last column.
    FromEnd(usize),
}

impl SurprisalColumn {
    /// Resolve against a concrete column count.
    pub fn resolve(&self, num_columns: usize) -> Option<usize> {
        match *self {
            SurprisalColumn::Index(i) => (i < num_columns).then_some(i),
            SurprisalColumn::FromEnd(n) => {
                (n >= 1 && n <= num_columns).then(|| num_columns - n)
            }
        }
    }
}

/// Positional column layout of a token line.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Minimum number of tab-separated columns for a line to count as a token.
    pub min_columns: usize,
    pub word: usize,
    pub lemma: usize,
    pub pos: usize,
    pub head: usize,
    pub deprel: usize,
    pub surprisal: SurprisalColumn,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            min_columns: 9,
            word: 0,
            lemma: 1,
            pos: 2,
            head: 5,
            deprel: 6,
            surprisal: SurprisalColumn::FromEnd(4),
        }
    }
}

impl ColumnLayout {
    /// Use a fixed surprisal column instead of an end-relative one.
    pub fn with_surprisal_column(mut self, column: SurprisalColumn) -> Self {
        self.surprisal = column;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surprisal_column_from_end() {
        let col = SurprisalColumn::FromEnd(4);
        assert_eq!(col.resolve(10), Some(6));
        assert_eq!(col.resolve(4), Some(0));
        assert_eq!(col.resolve(3), None);
    }

    #[test]
    fn test_surprisal_column_index() {
        let col = SurprisalColumn::Index(8);
        assert_eq!(col.resolve(9), Some(8));
        assert_eq!(col.resolve(8), None);
    }

    #[test]
    fn test_sentence_token_lookup() {
        let sentence = Sentence {
            sid: None,
            tokens: vec![Token {
                word: "word".into(),
                lemma: "word".into(),
                pos: "NOUN".into(),
                deprel: "nsubj".into(),
                head_id: 0,
                surprisal: 1.0,
                seq_id: 1,
            }],
        };
        assert_eq!(sentence.token(1).map(|t| t.word.as_str()), Some("word"));
        assert!(sentence.token(0).is_none());
        assert!(sentence.token(2).is_none());
    }

    #[test]
    fn test_metadata_fallback_id() {
        let meta = DocumentMetadata::default();
        assert_eq!(meta.text_id_or_unknown(), "unknown");
    }
}
