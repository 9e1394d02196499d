//! NP extraction policies
//!
//! Given a sentence and its dependency graph, identify candidate NP heads
//! and assemble each phrase's token set. Three extraction policies coexist
//! in the corpus tooling; they are modeled as one enum selected by
//! configuration so each stays independently testable.

use rustc_hash::FxHashSet;

use crate::graph::{collect_subtree, visit_subtree, DependencyGraph};
use crate::metrics::SurprisalCalculator;
use crate::phrase::entity::{NounPhrase, NpBuilder};
use crate::types::{DocumentMetadata, Sentence, Token};

/// Relations that qualify a noun as a subtree head (full-subtree policy).
const SUBTREE_HEAD_RELATIONS: &[&str] = &["nsubj", "nsubj:pass", "obj"];

/// Relations that disqualify a root-attached noun as a head
/// (constrained policies).
const EXCLUDED_HEAD_RELATIONS: &[&str] = &["obl", "vocative", "expl", "dislocated"];

/// Direct dependents admitted as single tokens.
const DIRECT_RELATIONS: &[&str] = &["det", "amod", "compound", "nmod", "nummod"];

/// Direct dependents that pull in their whole subtree under
/// [`ExtractionPolicy::RecursiveClauseExpansion`].
const EXPANDED_RELATIONS: &[&str] = &["acl:relcl", "acl", "relcl", "nmod:prep", "prep"];

/// Which tokens belong to a candidate NP head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionPolicy {
    /// Every descendant of the head, regardless of relation label.
    ///
    /// Candidate heads are nouns in subject or direct-object position.
    /// Traversal is breadth-first and visited-set guarded.
    #[default]
    FullSubtree,
    /// Head plus its determiner/modifier direct dependents, one level deep.
    ///
    /// Candidate heads are nouns attached to a root token whose relation is
    /// not oblique/vocative/expletive/dislocated. Relative clauses are left
    /// out entirely.
    ConstrainedDirect,
    /// As `ConstrainedDirect`, but a relative-clause or prepositional
    /// dependent brings its full subtree along.
    RecursiveClauseExpansion,
}

/// Extracts [`NounPhrase`] entities from analyzed sentences.
#[derive(Debug, Clone, Default)]
pub struct NpExtractor {
    policy: ExtractionPolicy,
    calculator: SurprisalCalculator,
}

impl NpExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self {
            policy,
            calculator: SurprisalCalculator::default(),
        }
    }

    /// Use a specific metrics calculator (short-sequence mode).
    pub fn with_calculator(mut self, calculator: SurprisalCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Extract all valid NPs of one sentence.
    ///
    /// A sentence without candidates yields an empty vector; that is not an
    /// error.
    pub fn extract(
        &self,
        sentence: &Sentence,
        graph: &DependencyGraph,
        metadata: &DocumentMetadata,
    ) -> Vec<NounPhrase> {
        match self.policy {
            ExtractionPolicy::FullSubtree => self.extract_subtrees(sentence, graph, metadata),
            ExtractionPolicy::ConstrainedDirect | ExtractionPolicy::RecursiveClauseExpansion => {
                self.extract_constrained(sentence, graph, metadata)
            }
        }
    }

    fn extract_subtrees(
        &self,
        sentence: &Sentence,
        graph: &DependencyGraph,
        metadata: &DocumentMetadata,
    ) -> Vec<NounPhrase> {
        let mut phrases = Vec::new();
        for token in &sentence.tokens {
            if token.pos != "NOUN" || !SUBTREE_HEAD_RELATIONS.contains(&token.deprel.as_str()) {
                continue;
            }

            let mut builder = NpBuilder::new(metadata);
            for id in collect_subtree(graph, token.seq_id) {
                if let Some(t) = sentence.token(id) {
                    builder.add_token(t);
                }
            }
            if let Some(np) = builder.finalize(&self.calculator) {
                phrases.push(np);
            }
        }
        phrases
    }

    fn extract_constrained(
        &self,
        sentence: &Sentence,
        graph: &DependencyGraph,
        metadata: &DocumentMetadata,
    ) -> Vec<NounPhrase> {
        let root_ids: FxHashSet<u32> = sentence
            .tokens
            .iter()
            .filter(|t| t.deprel == "root")
            .map(|t| t.seq_id)
            .collect();

        let mut phrases = Vec::new();
        for token in &sentence.tokens {
            if !self.is_constrained_head(token, &root_ids) {
                continue;
            }

            let mut builder = NpBuilder::new(metadata);
            builder.add_token(token);

            let mut visited = FxHashSet::default();
            visited.insert(token.seq_id);

            for &dep_id in graph.dependents(token.seq_id) {
                let Some(dep) = sentence.token(dep_id) else {
                    continue;
                };
                let expand = self.policy == ExtractionPolicy::RecursiveClauseExpansion
                    && EXPANDED_RELATIONS.contains(&dep.deprel.as_str());
                if expand {
                    for id in visit_subtree(graph, dep_id, &mut visited) {
                        if let Some(t) = sentence.token(id) {
                            builder.add_token(t);
                        }
                    }
                } else if DIRECT_RELATIONS.contains(&dep.deprel.as_str())
                    && visited.insert(dep_id)
                {
                    builder.add_token(dep);
                }
            }

            if let Some(np) = builder.finalize(&self.calculator) {
                phrases.push(np);
            }
        }
        phrases
    }

    fn is_constrained_head(&self, token: &Token, root_ids: &FxHashSet<u32>) -> bool {
        token.pos == "NOUN"
            && root_ids.contains(&token.head_id)
            && !EXCLUDED_HEAD_RELATIONS.contains(&token.deprel.as_str())
    }
}
