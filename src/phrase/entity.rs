//! Noun phrase entity
//!
//! A [`NounPhrase`] is assembled through an [`NpBuilder`]: tokens accumulate
//! in discovery order, the head pointer tracks the latest qualifying noun,
//! and `finalize` freezes everything into an immutable value with its
//! metrics attached. After finalization nothing mutates until the entity is
//! serialized and discarded.

use crate::metrics::{SurprisalCalculator, SurprisalMetrics};
use crate::types::{DocumentMetadata, Token};

/// Dependency relations that make a noun the head of its phrase.
pub const HEAD_RELATIONS: &[&str] = &["obj", "nsubj", "nsubj:pass", "iobj"];

/// An extracted noun phrase with its computed metrics.
///
/// `tokens` is sorted by `seq_id` ascending; the traversal order that
/// discovered the tokens never leaks into the output. The entity owns its
/// token copies outright.
#[derive(Debug, Clone)]
pub struct NounPhrase {
    pub text_id: String,
    pub metadata: DocumentMetadata,
    pub tokens: Vec<Token>,
    pub head: Token,
    pub head_lemma: String,
    pub head_deprel: String,
    pub metrics: SurprisalMetrics,
}

impl NounPhrase {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Space-joined surface forms.
    pub fn words(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Underscore-joined POS tags, e.g. `DET_ADJ_NOUN`.
    pub fn pos_pattern(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.pos.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Accumulator for one candidate noun phrase.
#[derive(Debug, Clone)]
pub struct NpBuilder {
    text_id: String,
    metadata: DocumentMetadata,
    tokens: Vec<Token>,
    head: Option<Token>,
}

impl NpBuilder {
    pub fn new(metadata: &DocumentMetadata) -> Self {
        Self {
            text_id: metadata.text_id_or_unknown().to_string(),
            metadata: metadata.clone(),
            tokens: Vec::new(),
            head: None,
        }
    }

    /// Append a token copy.
    ///
    /// A `NOUN` in one of [`HEAD_RELATIONS`] becomes the head pointer,
    /// overwriting any head found earlier in traversal order. Last-wins is
    /// the corpus producer's established semantic and is preserved here.
    pub fn add_token(&mut self, token: &Token) {
        if token.pos == "NOUN" && HEAD_RELATIONS.contains(&token.deprel.as_str()) {
            self.head = Some(token.clone());
        }
        self.tokens.push(token.clone());
    }

    /// A phrase is valid once it has a head and at least one token.
    pub fn is_valid(&self) -> bool {
        self.head.is_some() && !self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Freeze into an immutable [`NounPhrase`], computing metrics once.
    ///
    /// Returns `None` exactly when the builder is not valid; invalid
    /// candidates never reach the output.
    pub fn finalize(mut self, calculator: &SurprisalCalculator) -> Option<NounPhrase> {
        let head = self.head?;
        if self.tokens.is_empty() {
            return None;
        }

        self.tokens.sort_by_key(|t| t.seq_id);
        let surprisals: Vec<f64> = self.tokens.iter().map(|t| t.surprisal).collect();
        let metrics = calculator.compute(&surprisals)?;

        Some(NounPhrase {
            text_id: self.text_id,
            metadata: self.metadata,
            tokens: self.tokens,
            head_lemma: head.lemma.clone(),
            head_deprel: head.deprel.clone(),
            head,
            metrics,
        })
    }
}
