use std::fmt;

use classic_ml_core::{AttributeSchema, CategoricalExample, MlError, MlResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criterion::{partition, ClassCounts, Criterion, SplitCriterion};
use crate::pruning::{chi_squared_test, validate_significance};

/// A node in a categorical decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Splits on `attribute`; one child per legal value, in schema order.
    Internal {
        attribute: String,
        children: Vec<(String, Node)>,
    },
    /// Predicts a class label.
    Leaf { value: String },
}

impl Node {
    pub fn leaf(value: impl Into<String>) -> Self {
        Node::Leaf { value: value.into() }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Child reached by `value`, if this is an internal node that has one.
    pub fn child(&self, value: &str) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { children, .. } => {
                children.iter().find(|(v, _)| v == value).map(|(_, n)| n)
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { children, .. } => {
                1 + children.iter().map(|(_, c)| c.node_count()).sum::<usize>()
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { children, .. } => children.iter().map(|(_, c)| c.leaf_count()).sum(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { children, .. } => {
                1 + children.iter().map(|(_, c)| c.depth()).max().unwrap_or(0)
            }
        }
    }

    fn write_preorder(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "|---".repeat(depth);
        match self {
            Node::Leaf { value } => writeln!(f, "{}{}", indent, value),
            Node::Internal { attribute, children } => {
                for (value, child) in children {
                    writeln!(f, "{}{} = {}", indent, attribute, value)?;
                    child.write_preorder(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Per-call tree-building options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub criterion: Criterion,
    /// Chi-squared threshold `q`; `None` grows the tree unpruned.
    #[serde(default)]
    pub significance: Option<f64>,
}

impl TreeConfig {
    pub fn new(criterion: Criterion) -> Self {
        TreeConfig {
            criterion,
            significance: None,
        }
    }

    pub fn with_significance(mut self, q: f64) -> Self {
        self.significance = Some(q);
        self
    }

    pub fn validate(&self) -> MlResult<()> {
        match self.significance {
            Some(q) => validate_significance(q),
            None => Ok(()),
        }
    }
}

struct TreeBuilder<'a, C: SplitCriterion + ?Sized> {
    schema: &'a AttributeSchema,
    class_name: &'a str,
    criterion: &'a C,
    significance: Option<f64>,
}

impl<'a, C: SplitCriterion + ?Sized> TreeBuilder<'a, C> {
    fn subtree(
        &self,
        remaining: &[&'a str],
        examples: &[&CategoricalExample],
        default_label: &str,
    ) -> MlResult<Node> {
        if examples.is_empty() {
            return Ok(Node::leaf(default_label));
        }

        let counts = ClassCounts::from_examples(examples, self.class_name)?;
        let majority = counts.majority().unwrap_or(default_label).to_string();
        if counts.len() == 1 || remaining.is_empty() {
            return Ok(Node::Leaf { value: majority });
        }

        let (best, gain) = self.best_attribute(remaining, examples)?;
        let attribute = self
            .schema
            .get(best)
            .ok_or_else(|| MlError::MissingAttribute {
                attribute: best.to_string(),
            })?;

        if let Some(q) = self.significance {
            let test = chi_squared_test(examples, attribute, self.class_name)?;
            if test.rejects_split(q) {
                debug!(
                    attribute = best,
                    statistic = test.statistic,
                    dof = test.degrees_of_freedom,
                    p_value = test.p_value,
                    q,
                    "split rejected by chi-squared test"
                );
                return Ok(Node::Leaf { value: majority });
            }
        }

        debug!(attribute = best, gain, examples = examples.len(), "split");
        let rest: Vec<&'a str> = remaining.iter().copied().filter(|&a| a != best).collect();
        let mut children = Vec::with_capacity(attribute.values.len());
        for value in &attribute.values {
            let part = partition(examples, best, value)?;
            children.push((value.clone(), self.subtree(&rest, &part, &majority)?));
        }

        Ok(Node::Internal {
            attribute: best.to_string(),
            children,
        })
    }

    /// First attribute whose gain strictly beats everything before it,
    /// starting from a zero baseline.
    fn best_attribute(
        &self,
        remaining: &[&'a str],
        examples: &[&CategoricalExample],
    ) -> MlResult<(&'a str, f64)> {
        let mut best = remaining[0];
        let mut max_gain = 0.0;
        for &name in remaining {
            let attribute = self
                .schema
                .get(name)
                .ok_or_else(|| MlError::MissingAttribute {
                    attribute: name.to_string(),
                })?;
            let gain = self.criterion.gain(examples, attribute, self.class_name)?;
            if gain > max_gain {
                max_gain = gain;
                best = name;
            }
        }
        Ok((best, max_gain))
    }
}

/// Classification tree over categorical examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    pub fn from_root(root: Node) -> Self {
        DecisionTree { root }
    }

    /// Grow an unpruned tree.
    pub fn build<C: SplitCriterion + ?Sized>(
        examples: &[CategoricalExample],
        schema: &AttributeSchema,
        class_name: &str,
        criterion: &C,
    ) -> MlResult<Self> {
        Self::grow(examples, schema, class_name, criterion, None)
    }

    /// Grow a tree whose splits must pass a chi-squared test at threshold `q`.
    pub fn build_pruned<C: SplitCriterion + ?Sized>(
        examples: &[CategoricalExample],
        schema: &AttributeSchema,
        class_name: &str,
        criterion: &C,
        q: f64,
    ) -> MlResult<Self> {
        validate_significance(q)?;
        Self::grow(examples, schema, class_name, criterion, Some(q))
    }

    pub fn fit(
        examples: &[CategoricalExample],
        schema: &AttributeSchema,
        class_name: &str,
        config: &TreeConfig,
    ) -> MlResult<Self> {
        config.validate()?;
        Self::grow(examples, schema, class_name, &config.criterion, config.significance)
    }

    fn grow<C: SplitCriterion + ?Sized>(
        examples: &[CategoricalExample],
        schema: &AttributeSchema,
        class_name: &str,
        criterion: &C,
        significance: Option<f64>,
    ) -> MlResult<Self> {
        if schema.get(class_name).is_some() {
            return Err(MlError::InvalidConfig(format!(
                "class attribute '{}' must not be a split attribute",
                class_name
            )));
        }
        if examples.is_empty() {
            return Err(MlError::EmptyDataset("cannot build a tree without examples".into()));
        }
        for ex in examples {
            schema.validate(ex)?;
            ex.require(class_name)?;
        }

        let refs: Vec<&CategoricalExample> = examples.iter().collect();
        let counts = ClassCounts::from_examples(&refs, class_name)?;
        let default_label = counts.majority().unwrap_or_default().to_string();

        let builder = TreeBuilder {
            schema,
            class_name,
            criterion,
            significance,
        };
        let root = builder.subtree(&schema.names(), &refs, &default_label)?;
        Ok(DecisionTree { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk from the root to a leaf following `example`'s values.
    pub fn classify(&self, example: &CategoricalExample) -> MlResult<&str> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return Ok(value.as_str()),
                Node::Internal { attribute, .. } => {
                    let value = example.require(attribute)?;
                    node = node.child(value).ok_or_else(|| MlError::UnknownValue {
                        attribute: attribute.clone(),
                        value: value.to_string(),
                    })?;
                }
            }
        }
    }

    /// Fraction of `examples` classified as their own `class_name` value.
    pub fn accuracy(&self, examples: &[CategoricalExample], class_name: &str) -> MlResult<f64> {
        if examples.is_empty() {
            return Err(MlError::EmptyDataset("no examples to score".into()));
        }
        let mut correct = 0usize;
        for ex in examples {
            if self.classify(ex)? == ex.require(class_name)? {
                correct += 1;
            }
        }
        Ok(correct as f64 / examples.len() as f64)
    }

    /// Internal nodes plus leaves.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_preorder(f, 0)
    }
}
