//! Dependency graph construction and traversal
//!
//! This module rebuilds head-to-dependents structure from the flat head-id
//! annotation and provides cycle-safe subtree collection over it.

pub mod builder;
pub mod traversal;

pub use builder::DependencyGraph;
pub use traversal::{collect_subtree, visit_subtree};
