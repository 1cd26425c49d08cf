//! # classic-ml
//!
//! Two classical supervised learners written from scratch.
//!
//! ## Modules
//!
//! - **core** — Example model: categorical examples, attribute schema, numeric examples, errors
//! - **tree** — Decision trees: entropy/Gini splitting, chi-squared pruning, classification
//! - **nn** — Multilayer perceptron: sigmoid units, backpropagation, training loop, evaluation
//! - **datasets** — Built-in XOR and play-tennis data, CSV loading, one-hot encoding, splitting

/// Example model and error types.
pub use classic_ml_core as core;

/// Decision tree learner.
pub use classic_ml_tree as tree;

/// Neural network learner.
pub use classic_ml_nn as nn;

/// Dataset adapters.
pub use classic_ml_datasets as datasets;
