//! Dependency graph builder
//!
//! Rebuilds the head -> dependents mapping of one sentence from the per-token
//! head-id annotation. Uses FxHashMap for O(1) lookups during construction.

use rustc_hash::FxHashMap;

use crate::types::Sentence;

/// Head-to-dependents mapping for one sentence.
///
/// Keys are head `seq_id`s; values are the direct dependents' `seq_id`s in
/// sentence order. The structure is not required to be a single tree:
/// malformed input may leave orphaned heads, which are simply never reached
/// from a root during traversal. No cycle detection happens at build time;
/// cycle-safety is the traversal's job.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: FxHashMap<u32, Vec<u32>>,
}

impl DependencyGraph {
    /// Build the graph for one sentence. O(n) in sentence length.
    pub fn from_sentence(sentence: &Sentence) -> Self {
        let mut dependents: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for token in &sentence.tokens {
            if token.head_id != 0 {
                dependents.entry(token.head_id).or_default().push(token.seq_id);
            }
        }
        Self { dependents }
    }

    /// Direct dependents of `head`, in sentence order.
    pub fn dependents(&self, head: u32) -> &[u32] {
        self.dependents.get(&head).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of heads with at least one dependent.
    pub fn num_heads(&self) -> usize {
        self.dependents.len()
    }

    /// Total number of dependency edges.
    pub fn num_edges(&self) -> usize {
        self.dependents.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    /// Insert an edge directly. Test scaffolding for synthetic graphs.
    #[cfg(test)]
    pub(crate) fn insert_edge(&mut self, head: u32, dependent: u32) {
        self.dependents.entry(head).or_default().push(dependent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;

    fn make_token(seq_id: u32, head_id: u32) -> Token {
        Token {
            word: format!("w{seq_id}"),
            lemma: format!("w{seq_id}"),
            pos: "NOUN".into(),
            deprel: "dep".into(),
            head_id,
            surprisal: 1.0,
            seq_id,
        }
    }

    fn make_sentence(edges: &[(u32, u32)]) -> Sentence {
        // edges: (seq_id, head_id)
        Sentence {
            sid: None,
            tokens: edges.iter().map(|&(s, h)| make_token(s, h)).collect(),
        }
    }

    #[test]
    fn test_basic_tree() {
        // 2 <- 1, 2 <- 3, root 2
        let sentence = make_sentence(&[(1, 2), (2, 0), (3, 2)]);
        let graph = DependencyGraph::from_sentence(&sentence);

        assert_eq!(graph.dependents(2), &[1, 3]);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.num_heads(), 1);
    }

    #[test]
    fn test_root_tokens_create_no_edge() {
        let sentence = make_sentence(&[(1, 0), (2, 0)]);
        let graph = DependencyGraph::from_sentence(&sentence);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_dependents_preserve_sentence_order() {
        let sentence = make_sentence(&[(1, 4), (2, 4), (3, 4), (4, 0)]);
        let graph = DependencyGraph::from_sentence(&sentence);
        assert_eq!(graph.dependents(4), &[1, 2, 3]);
    }

    #[test]
    fn test_unknown_head_is_empty() {
        let sentence = make_sentence(&[(1, 0)]);
        let graph = DependencyGraph::from_sentence(&sentence);
        assert!(graph.dependents(99).is_empty());
    }
}
