//! Flat CSV record types
//!
//! One serializable struct per output level (NP, sentence, document). Field
//! order here is the column order in the output file. Absent metadata
//! serializes as an empty field; NaN metrics serialize as `NaN`.

use serde::Serialize;

use crate::metrics::SurprisalMetrics;
use crate::phrase::NounPhrase;
use crate::types::{DocumentMetadata, Sentence};

/// One row per retained noun phrase.
#[derive(Debug, Clone, Serialize)]
pub struct NpRecord {
    pub text_id: String,
    pub author: Option<String>,
    pub year: Option<String>,
    pub journal: Option<String>,
    pub topic: Option<String>,
    pub np_tokens: String,
    pub np_length: usize,
    pub head_word: String,
    pub head_lemma: String,
    pub head_deprel: String,
    pub mean_surprisal: f64,
    pub uid_dev: f64,
    pub sigma_gamma: f64,
}

impl NpRecord {
    pub fn from_phrase(np: &NounPhrase) -> Self {
        Self {
            text_id: np.text_id.clone(),
            author: np.metadata.author.clone(),
            year: np.metadata.year.clone(),
            journal: np.metadata.journal.clone(),
            topic: np.metadata.topic.clone(),
            np_tokens: np.words(),
            np_length: np.len(),
            head_word: np.head.word.clone(),
            head_lemma: np.head_lemma.clone(),
            head_deprel: np.head_deprel.clone(),
            mean_surprisal: np.metrics.mean,
            uid_dev: np.metrics.uid_dev,
            sigma_gamma: np.metrics.sigma_gamma,
        }
    }
}

/// One row per sentence.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceRecord {
    pub text_id: String,
    pub author: Option<String>,
    pub year: Option<String>,
    pub journal: Option<String>,
    pub sent_id: Option<String>,
    pub sent_len: usize,
    pub sent_str: String,
    pub avg_srp: f64,
    pub sum_srp: f64,
    pub uid_dev: f64,
    pub sigma_gamma: f64,
}

impl SentenceRecord {
    pub fn new(sentence: &Sentence, meta: &DocumentMetadata, metrics: &SurprisalMetrics) -> Self {
        Self {
            text_id: meta.text_id_or_unknown().to_string(),
            author: meta.author.clone(),
            year: meta.year.clone(),
            journal: meta.journal.clone(),
            sent_id: sentence.sid.clone(),
            sent_len: sentence.len(),
            sent_str: sentence
                .tokens
                .iter()
                .map(|t| t.word.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            avg_srp: metrics.mean,
            sum_srp: metrics.sum,
            uid_dev: metrics.uid_dev,
            sigma_gamma: metrics.sigma_gamma,
        }
    }
}

/// One row per document (input file).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub text_id: String,
    pub author: Option<String>,
    pub year: Option<String>,
    pub journal: Option<String>,
    pub doc_len: usize,
    pub avg_srp: f64,
    pub sum_srp: f64,
    pub uid_dev: f64,
    pub sigma_gamma: f64,
}

impl DocumentRecord {
    pub fn new(meta: &DocumentMetadata, doc_len: usize, metrics: &SurprisalMetrics) -> Self {
        Self {
            text_id: meta.text_id_or_unknown().to_string(),
            author: meta.author.clone(),
            year: meta.year.clone(),
            journal: meta.journal.clone(),
            doc_len,
            avg_srp: metrics.mean,
            sum_srp: metrics.sum,
            uid_dev: metrics.uid_dev,
            sigma_gamma: metrics.sigma_gamma,
        }
    }
}

/// One row per corpus year in the vocabulary sidecar file.
#[derive(Debug, Clone, Serialize)]
pub struct VocabRecord {
    pub year: String,
    pub vocab_size: usize,
}
