pub mod criterion;
pub mod decision_tree;
pub mod pruning;

pub use criterion::*;
pub use decision_tree::*;
pub use pruning::*;
