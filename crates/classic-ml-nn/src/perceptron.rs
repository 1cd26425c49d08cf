use std::fmt;

use classic_ml_core::{MlError, MlResult};
use rand::Rng;

/// Logistic sigmoid `1 / (1 + e^-z)`.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Derivative of the sigmoid at `z`: `σ(z)·(1 − σ(z))`.
pub fn sigmoid_deriv(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

/// Draw a weight with magnitude in `[0.0001, 1.0001)` and random sign.
fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let magnitude = rng.gen::<f64>() + 0.0001;
    if rng.gen::<bool>() {
        magnitude
    } else {
        -magnitude
    }
}

/// A single sigmoid unit. `weights[0]` is the bias weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    weights: Vec<f64>,
}

impl Perceptron {
    /// Random non-zero weights for `input_size` inputs plus the bias.
    pub fn new<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Self {
        Perceptron {
            weights: (0..=input_size).map(|_| random_weight(rng)).collect(),
        }
    }

    pub fn with_weights(weights: Vec<f64>) -> MlResult<Self> {
        if weights.is_empty() {
            return Err(MlError::InvalidConfig(
                "perceptron needs at least a bias weight".into(),
            ));
        }
        Ok(Perceptron { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of inputs, not counting the bias.
    pub fn input_size(&self) -> usize {
        self.weights.len() - 1
    }

    /// `w₀ + Σ wᵢ·inputᵢ`.
    pub fn weighted_sum(&self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len(), self.input_size());
        self.weights[0]
            + self.weights[1..]
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    pub fn activate(&self, inputs: &[f64]) -> f64 {
        sigmoid(self.weighted_sum(inputs))
    }

    /// Local gradient factor σ'(z) at the same weighted sum.
    pub fn activate_deriv(&self, inputs: &[f64]) -> f64 {
        sigmoid_deriv(self.weighted_sum(inputs))
    }

    /// Move every weight by `alpha·delta·input` (input 1 for the bias).
    ///
    /// Returns the sum of absolute weight changes.
    pub fn update_weights(&mut self, inputs: &[f64], alpha: f64, delta: f64) -> f64 {
        debug_assert_eq!(inputs.len(), self.input_size());
        let step = alpha * delta;
        self.weights[0] += step;
        let mut total = step.abs();
        for (w, x) in self.weights[1..].iter_mut().zip(inputs) {
            let change = step * x;
            *w += change;
            total += change.abs();
        }
        total
    }
}

impl fmt::Display for Perceptron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Perceptron with {} inputs", self.input_size())?;
        writeln!(f, "Input weights {:?}", self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sigmoid() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid_deriv(0.0), 0.25);
        assert!(sigmoid(30.0) < 1.0 && sigmoid(-30.0) > 0.0);
    }

    #[test]
    fn test_activate() {
        let p = Perceptron::with_weights(vec![0.5, -1.0, 2.0]).unwrap();
        assert_relative_eq!(p.weighted_sum(&[1.0, 0.25]), 0.0);
        assert_relative_eq!(p.activate(&[1.0, 0.25]), 0.5);
        assert_relative_eq!(p.activate_deriv(&[1.0, 0.25]), 0.25);
        assert_eq!(p.input_size(), 2);
    }

    #[test]
    fn test_update_weights() {
        let mut p = Perceptron::with_weights(vec![0.0, 1.0, 1.0]).unwrap();
        let change = p.update_weights(&[2.0, -1.0], 0.5, 0.2);
        // step 0.1: bias +0.1, w1 +0.2, w2 -0.1
        assert_relative_eq!(change, 0.4);
        assert_relative_eq!(p.weights()[0], 0.1);
        assert_relative_eq!(p.weights()[1], 1.2);
        assert_relative_eq!(p.weights()[2], 0.9);
    }

    #[test]
    fn test_random_weights_are_nonzero_with_both_signs() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = Perceptron::new(500, &mut rng);
        assert_eq!(p.weights().len(), 501);
        assert!(p.weights().iter().all(|w| w.abs() >= 0.0001 && w.abs() < 1.0001));
        assert!(p.weights().iter().any(|&w| w > 0.0));
        assert!(p.weights().iter().any(|&w| w < 0.0));
    }

    #[test]
    fn test_empty_weights_rejected() {
        assert!(Perceptron::with_weights(vec![]).is_err());
    }

    #[test]
    fn test_display() {
        let p = Perceptron::with_weights(vec![0.5, -1.0]).unwrap();
        assert_eq!(p.to_string(), "Perceptron with 1 inputs\nInput weights [0.5, -1.0]\n");
    }
}
