use classic_ml_core::{Attribute, CategoricalExample, MlError, MlResult};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::criterion::{partition, ClassCounts};

/// Result of testing a candidate split against attribute independence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredTest {
    /// Pearson deviation `Σ (observed − expected)² / expected`.
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

impl ChiSquaredTest {
    /// A split is rejected when its p-value exceeds the threshold `q`.
    pub fn rejects_split(&self, q: f64) -> bool {
        self.p_value > q
    }
}

/// Upper-tail probability of the chi-squared distribution.
///
/// With zero degrees of freedom there is no evidence against independence,
/// so the p-value is 1.
pub fn chi_squared_p_value(statistic: f64, degrees_of_freedom: usize) -> f64 {
    // A NaN p-value here would fail `p > q` and let the split through;
    // pinning it to 1 rejects a split on a single-valued attribute instead.
    if degrees_of_freedom == 0 {
        return 1.0;
    }
    match ChiSquared::new(degrees_of_freedom as f64) {
        Ok(dist) => 1.0 - dist.cdf(statistic),
        Err(_) => 1.0,
    }
}

/// Test whether splitting `examples` on `attribute` is statistically significant.
///
/// Expected counts come from the overall class ratios scaled by each
/// partition size. Empty partitions and zero expected counts add nothing.
pub fn chi_squared_test(
    examples: &[&CategoricalExample],
    attribute: &Attribute,
    class_name: &str,
) -> MlResult<ChiSquaredTest> {
    let overall = ClassCounts::from_examples(examples, class_name)?;
    let total = overall.total() as f64;

    let mut statistic = 0.0;
    for value in &attribute.values {
        let part = partition(examples, &attribute.name, value)?;
        if part.is_empty() {
            continue;
        }
        let observed = ClassCounts::from_examples(&part, class_name)?;
        let size = part.len() as f64;
        for label in overall.labels() {
            let expected = overall.get(label) as f64 / total * size;
            if expected == 0.0 {
                continue;
            }
            let diff = observed.get(label) as f64 - expected;
            statistic += diff * diff / expected;
        }
    }

    let degrees_of_freedom =
        attribute.values.len().saturating_sub(1) * overall.len().saturating_sub(1);
    Ok(ChiSquaredTest {
        statistic,
        degrees_of_freedom,
        p_value: chi_squared_p_value(statistic, degrees_of_freedom),
    })
}

pub(crate) fn validate_significance(q: f64) -> MlResult<()> {
    if q > 0.0 && q < 1.0 {
        Ok(())
    } else {
        Err(MlError::InvalidConfig(format!(
            "significance threshold must lie in (0, 1), got {}",
            q
        )))
    }
}
