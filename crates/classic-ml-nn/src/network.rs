use std::fmt;

use classic_ml_core::{MlError, MlResult, NumericExample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::perceptron::Perceptron;

/// Perceptrons fed by the same previous layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    perceptrons: Vec<Perceptron>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Self {
        Layer {
            perceptrons: (0..size).map(|_| Perceptron::new(input_size, rng)).collect(),
        }
    }

    /// Build a layer from existing units; they must share one input size.
    pub fn from_perceptrons(perceptrons: Vec<Perceptron>) -> MlResult<Self> {
        let first = perceptrons
            .first()
            .ok_or_else(|| MlError::InvalidConfig("layer must have at least one perceptron".into()))?;
        let expected = first.input_size();
        if let Some(p) = perceptrons.iter().find(|p| p.input_size() != expected) {
            return Err(MlError::DimensionMismatch {
                expected,
                got: p.input_size(),
            });
        }
        Ok(Layer { perceptrons })
    }

    pub fn perceptrons(&self) -> &[Perceptron] {
        &self.perceptrons
    }

    pub fn len(&self) -> usize {
        self.perceptrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perceptrons.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.perceptrons.first().map_or(0, Perceptron::input_size)
    }

    /// Activation of every unit for the given inputs.
    pub fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        self.perceptrons.iter().map(|p| p.activate(inputs)).collect()
    }
}

/// Convergence signal from one full-batch backpropagation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// Summed `error²/2` over all examples and outputs, averaged by both.
    pub average_error: f64,
    /// Summed absolute weight change divided by the total weight count.
    pub average_weight_change: f64,
}

/// A feed-forward network of sigmoid perceptrons.
///
/// `layer_sizes` lists the input size, each hidden layer size, then the
/// output size. `layers` holds the hidden layers followed by the output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer>,
}

impl NeuralNet {
    /// Random network for `layer_sizes`. `None` seeds from entropy.
    pub fn new(layer_sizes: &[usize], seed: Option<u64>) -> MlResult<Self> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(layer_sizes, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> MlResult<Self> {
        if layer_sizes.len() < 2 {
            return Err(MlError::InvalidConfig(format!(
                "need at least input and output sizes, got {:?}",
                layer_sizes
            )));
        }
        if layer_sizes.contains(&0) {
            return Err(MlError::InvalidConfig(format!(
                "layer sizes must be positive, got {:?}",
                layer_sizes
            )));
        }
        let layers = layer_sizes
            .windows(2)
            .map(|w| Layer::new(w[1], w[0], rng))
            .collect();
        Ok(NeuralNet {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// Assemble a network from fixed layers, checking that they chain.
    pub fn from_layers(input_size: usize, layers: Vec<Layer>) -> MlResult<Self> {
        if layers.is_empty() {
            return Err(MlError::InvalidConfig("network needs an output layer".into()));
        }
        let mut layer_sizes = vec![input_size];
        for layer in &layers {
            let prev = layer_sizes[layer_sizes.len() - 1];
            if layer.input_size() != prev {
                return Err(MlError::DimensionMismatch {
                    expected: prev,
                    got: layer.input_size(),
                });
            }
            layer_sizes.push(layer.len());
        }
        Ok(NeuralNet { layer_sizes, layers })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Hidden layers followed by the output layer.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn hidden_layers(&self) -> &[Layer] {
        &self.layers[..self.layers.len() - 1]
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn hidden_layer_sizes(&self) -> Vec<usize> {
        self.hidden_layers().iter().map(Layer::len).collect()
    }

    /// Activations of every layer, starting with `input` itself.
    pub fn feed_forward(&self, input: &[f64]) -> MlResult<Vec<Vec<f64>>> {
        if input.len() != self.input_size() {
            return Err(MlError::DimensionMismatch {
                expected: self.input_size(),
                got: input.len(),
            });
        }
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.activate(&activations[activations.len() - 1]);
            activations.push(next);
        }
        Ok(activations)
    }

    /// Output-layer activations only.
    pub fn predict(&self, input: &[f64]) -> MlResult<Vec<f64>> {
        let mut activations = self.feed_forward(input)?;
        Ok(activations.pop().unwrap_or_default())
    }

    /// Backpropagated deltas for every layer, indexed like [`layers`](Self::layers).
    ///
    /// `activations` must come from [`feed_forward`](Self::feed_forward) on
    /// the current weights. Deltas are computed from the output layer down
    /// and read only the weights as they are now.
    pub fn deltas(&self, activations: &[Vec<f64>], target: &[f64]) -> MlResult<Vec<Vec<f64>>> {
        if activations.len() != self.layers.len() + 1 {
            return Err(MlError::DimensionMismatch {
                expected: self.layers.len() + 1,
                got: activations.len(),
            });
        }
        if target.len() != self.output_size() {
            return Err(MlError::DimensionMismatch {
                expected: self.output_size(),
                got: target.len(),
            });
        }

        let n = self.layers.len();
        let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); n];

        let output = &activations[n];
        deltas[n - 1] = self.layers[n - 1]
            .perceptrons
            .iter()
            .zip(output.iter().zip(target))
            .map(|(p, (o, t))| (t - o) * p.activate_deriv(&activations[n - 1]))
            .collect();

        for l in (0..n - 1).rev() {
            let next = &self.layers[l + 1];
            let next_deltas = &deltas[l + 1];
            let layer_deltas: Vec<f64> = self.layers[l]
                .perceptrons
                .iter()
                .enumerate()
                .map(|(j, p)| {
                    let downstream: f64 = next
                        .perceptrons
                        .iter()
                        .zip(next_deltas)
                        .map(|(k, d)| k.weights()[j + 1] * d)
                        .sum();
                    p.activate_deriv(&activations[l]) * downstream
                })
                .collect();
            deltas[l] = layer_deltas;
        }
        Ok(deltas)
    }

    fn check_example(&self, example: &NumericExample) -> MlResult<()> {
        if example.input.len() != self.input_size() {
            return Err(MlError::DimensionMismatch {
                expected: self.input_size(),
                got: example.input.len(),
            });
        }
        if example.target.len() != self.output_size() {
            return Err(MlError::DimensionMismatch {
                expected: self.output_size(),
                got: example.target.len(),
            });
        }
        Ok(())
    }

    /// One full-batch pass: forward, backward and weight update per example.
    ///
    /// For each example every delta is computed before any weight moves.
    pub fn back_prop_iteration(
        &mut self,
        examples: &[NumericExample],
        alpha: f64,
    ) -> MlResult<IterationStats> {
        if examples.is_empty() {
            return Err(MlError::EmptyDataset("no training examples".into()));
        }
        // Reject the whole batch before any weight moves.
        for ex in examples {
            self.check_example(ex)?;
        }

        let mut total_error = 0.0;
        let mut total_change = 0.0;
        let mut weight_count = 0usize;

        for ex in examples {
            let activations = self.feed_forward(&ex.input)?;
            let deltas = self.deltas(&activations, &ex.target)?;

            let output = &activations[activations.len() - 1];
            for (t, o) in ex.target.iter().zip(output) {
                let err = t - o;
                total_error += err * err / 2.0;
            }

            for (l, layer) in self.layers.iter_mut().enumerate() {
                for (p, &delta) in layer.perceptrons.iter_mut().zip(&deltas[l]) {
                    total_change += p.update_weights(&activations[l], alpha, delta);
                    weight_count += p.weights().len();
                }
            }
        }

        Ok(IterationStats {
            average_error: total_error / (examples.len() * self.output_size()) as f64,
            average_weight_change: total_change / weight_count as f64,
        })
    }
}

impl fmt::Display for NeuralNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Neural net with layer sizes {:?}", self.layer_sizes)?;
        for (h, layer) in self.hidden_layers().iter().enumerate() {
            writeln!(f, "Hidden layer #{}", h)?;
            for (i, p) in layer.perceptrons.iter().enumerate() {
                write!(f, "Percep #{}: {}", i, p)?;
            }
        }
        writeln!(f, "Output layer")?;
        for (i, p) in self.output_layer().perceptrons.iter().enumerate() {
            write!(f, "Output percep #{}: {}", i, p)?;
        }
        Ok(())
    }
}
