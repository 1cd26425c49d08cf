use classic_ml_core::{Attribute, CategoricalExample, MlResult};
use serde::{Deserialize, Serialize};

/// Class-label counts in first-seen order.
///
/// The order matters: [`majority`](ClassCounts::majority) breaks ties in
/// favour of the label that appeared first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts {
    entries: Vec<(String, usize)>,
}

impl ClassCounts {
    pub fn from_examples(examples: &[&CategoricalExample], class_name: &str) -> MlResult<Self> {
        let mut counts = ClassCounts::default();
        for ex in examples {
            counts.add(ex.require(class_name)?);
        }
        Ok(counts)
    }

    fn add(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, c)) => *c += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Most common label; the first one seen wins a tie.
    pub fn majority(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in &self.entries {
            match best {
                Some((_, c)) if *count <= c => {}
                _ => best = Some((label.as_str(), *count)),
            }
        }
        best.map(|(l, _)| l)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Examples whose `attribute` equals `value`.
pub fn partition<'a>(
    examples: &[&'a CategoricalExample],
    attribute: &str,
    value: &str,
) -> MlResult<Vec<&'a CategoricalExample>> {
    let mut out = Vec::new();
    for &ex in examples {
        if ex.require(attribute)? == value {
            out.push(ex);
        }
    }
    Ok(out)
}

/// Set entropy `-Σ p·log2 p` over class proportions. Zero counts contribute nothing.
pub fn set_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut entropy = 0.0;
    for &c in counts.iter().filter(|&&c| c > 0) {
        let p = c as f64 / total;
        entropy -= p * p.log2();
    }
    entropy
}

/// Gini impurity `1 - Σ p²`.
pub fn gini_index(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum_sq: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Weighted average of `impurity` over the partitions induced by `attribute`.
pub fn remainder(
    examples: &[&CategoricalExample],
    attribute: &Attribute,
    class_name: &str,
    impurity: fn(&[usize]) -> f64,
) -> MlResult<f64> {
    if examples.is_empty() {
        return Ok(0.0);
    }
    let total = examples.len() as f64;
    let mut rem = 0.0;
    for value in &attribute.values {
        let part = partition(examples, &attribute.name, value)?;
        if part.is_empty() {
            continue;
        }
        let counts = ClassCounts::from_examples(&part, class_name)?;
        rem += (part.len() as f64 / total) * impurity(&counts.counts());
    }
    Ok(rem)
}

/// Information gain: parent entropy minus entropy remainder.
pub fn info_gain(
    examples: &[&CategoricalExample],
    attribute: &Attribute,
    class_name: &str,
) -> MlResult<f64> {
    let parent = set_entropy(&ClassCounts::from_examples(examples, class_name)?.counts());
    Ok(parent - remainder(examples, attribute, class_name, set_entropy)?)
}

/// Reciprocal of the weighted Gini remainder.
///
/// A zero remainder means the attribute separates the classes perfectly and
/// scores `f64::INFINITY`, above every finite gain.
pub fn gini_gain(
    examples: &[&CategoricalExample],
    attribute: &Attribute,
    class_name: &str,
) -> MlResult<f64> {
    let weighted = remainder(examples, attribute, class_name, gini_index)?;
    if weighted == 0.0 {
        Ok(f64::INFINITY)
    } else {
        Ok(1.0 / weighted)
    }
}

/// A rule for scoring candidate splits. Higher gain is better.
pub trait SplitCriterion {
    /// Impurity of a class-count distribution.
    fn impurity(&self, counts: &[usize]) -> f64;

    /// Score for splitting `examples` on `attribute`.
    fn gain(
        &self,
        examples: &[&CategoricalExample],
        attribute: &Attribute,
        class_name: &str,
    ) -> MlResult<f64>;
}

/// Entropy impurity with information gain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Entropy;

impl SplitCriterion for Entropy {
    fn impurity(&self, counts: &[usize]) -> f64 {
        set_entropy(counts)
    }

    fn gain(
        &self,
        examples: &[&CategoricalExample],
        attribute: &Attribute,
        class_name: &str,
    ) -> MlResult<f64> {
        info_gain(examples, attribute, class_name)
    }
}

/// Gini impurity with reciprocal-remainder gain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gini;

impl SplitCriterion for Gini {
    fn impurity(&self, counts: &[usize]) -> f64 {
        gini_index(counts)
    }

    fn gain(
        &self,
        examples: &[&CategoricalExample],
        attribute: &Attribute,
        class_name: &str,
    ) -> MlResult<f64> {
        gini_gain(examples, attribute, class_name)
    }
}

/// Serializable choice between the built-in criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    #[default]
    Entropy,
    Gini,
}

impl SplitCriterion for Criterion {
    fn impurity(&self, counts: &[usize]) -> f64 {
        match self {
            Criterion::Entropy => Entropy.impurity(counts),
            Criterion::Gini => Gini.impurity(counts),
        }
    }

    fn gain(
        &self,
        examples: &[&CategoricalExample],
        attribute: &Attribute,
        class_name: &str,
    ) -> MlResult<f64> {
        match self {
            Criterion::Entropy => Entropy.gain(examples, attribute, class_name),
            Criterion::Gini => Gini.gain(examples, attribute, class_name),
        }
    }
}
