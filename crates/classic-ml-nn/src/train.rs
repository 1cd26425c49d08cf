use std::time::Instant;

use classic_ml_core::{MlError, MlResult, NumericExample};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::network::{IterationStats, NeuralNet};

/// Per-call training options. Build a fresh one for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Learning rate.
    pub alpha: f64,
    /// Stop once the average weight change falls to this value or below.
    pub weight_change_threshold: f64,
    pub hidden_layer_sizes: Vec<usize>,
    /// Iteration cap; `None` trains until convergence.
    pub max_iterations: Option<usize>,
    /// Seed for weight initialization; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            alpha: 0.1,
            weight_change_threshold: 0.00008,
            hidden_layer_sizes: vec![1],
            max_iterations: None,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_weight_change_threshold(mut self, threshold: f64) -> Self {
        self.weight_change_threshold = threshold;
        self
    }

    pub fn with_hidden_layers(mut self, sizes: Vec<usize>) -> Self {
        self.hidden_layer_sizes = sizes;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> MlResult<Self> {
        let config: TrainConfig =
            serde_json::from_str(json).map_err(|e| MlError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MlResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(MlError::InvalidConfig(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !(self.weight_change_threshold >= 0.0) {
            return Err(MlError::InvalidConfig(format!(
                "weight change threshold must be non-negative, got {}",
                self.weight_change_threshold
            )));
        }
        if self.hidden_layer_sizes.contains(&0) {
            return Err(MlError::InvalidConfig(format!(
                "hidden layer sizes must be positive, got {:?}",
                self.hidden_layer_sizes
            )));
        }
        Ok(())
    }
}

/// Correct/incorrect counts from an all-or-nothing rounded comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub incorrect: usize,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / (self.correct + self.incorrect) as f64
    }
}

/// Score `network` on `examples`.
///
/// Every output is rounded to the nearest integer; an example counts as
/// correct only if the whole rounded output equals the whole rounded target.
pub fn evaluate(network: &NeuralNet, examples: &[NumericExample]) -> MlResult<Evaluation> {
    if examples.is_empty() {
        return Err(MlError::EmptyDataset("no test examples".into()));
    }
    let mut eval = Evaluation {
        correct: 0,
        incorrect: 0,
    };
    for ex in examples {
        let output = network.predict(&ex.input)?;
        if output.len() != ex.target.len() {
            return Err(MlError::DimensionMismatch {
                expected: output.len(),
                got: ex.target.len(),
            });
        }
        let hit = output
            .iter()
            .zip(&ex.target)
            .all(|(o, t)| o.round() == t.round());
        if hit {
            eval.correct += 1;
        } else {
            eval.incorrect += 1;
        }
    }
    Ok(eval)
}

pub fn evaluate_accuracy(network: &NeuralNet, examples: &[NumericExample]) -> MlResult<f64> {
    Ok(evaluate(network, examples)?.accuracy())
}

/// A trained network together with how training went.
#[derive(Debug, Clone)]
pub struct TrainedNetwork {
    pub network: NeuralNet,
    pub test_accuracy: f64,
    pub iterations: usize,
    /// Average error of the last iteration.
    pub train_error: f64,
    /// Average weight change of the last iteration.
    pub weight_change: f64,
}

/// Train a network on `train` and report its accuracy on `test`.
///
/// A supplied `existing` network is trained further instead of a fresh one,
/// and its hidden layer sizes take precedence over the config's.
pub fn build_neural_net(
    train: &[NumericExample],
    test: &[NumericExample],
    config: &TrainConfig,
    existing: Option<NeuralNet>,
) -> MlResult<TrainedNetwork> {
    config.validate()?;
    let first = train
        .first()
        .ok_or_else(|| MlError::EmptyDataset("no training examples".into()))?;
    if test.is_empty() {
        return Err(MlError::EmptyDataset("no test examples".into()));
    }
    let num_in = first.input.len();
    let num_out = first.target.len();

    let mut network = match existing {
        Some(net) => {
            if net.input_size() != num_in {
                return Err(MlError::DimensionMismatch {
                    expected: net.input_size(),
                    got: num_in,
                });
            }
            if net.output_size() != num_out {
                return Err(MlError::DimensionMismatch {
                    expected: net.output_size(),
                    got: num_out,
                });
            }
            net
        }
        None => {
            let mut sizes = Vec::with_capacity(config.hidden_layer_sizes.len() + 2);
            sizes.push(num_in);
            sizes.extend_from_slice(&config.hidden_layer_sizes);
            sizes.push(num_out);
            NeuralNet::new(&sizes, config.seed)?
        }
    };

    info!(
        inputs = num_in,
        outputs = num_out,
        hidden = ?network.hidden_layer_sizes(),
        train_size = train.len(),
        test_size = test.len(),
        "starting training"
    );
    let started = Instant::now();

    let mut iterations = 0usize;
    let stats: IterationStats = loop {
        let stats = network.back_prop_iteration(train, config.alpha)?;
        iterations += 1;
        trace!(
            iteration = iterations,
            error = stats.average_error,
            weight_change = stats.average_weight_change,
            "iteration"
        );
        if !stats.average_error.is_finite() || !stats.average_weight_change.is_finite() {
            return Err(MlError::Diverged {
                iteration: iterations,
            });
        }
        if stats.average_weight_change <= config.weight_change_threshold {
            break stats;
        }
        if config.max_iterations.map_or(false, |max| iterations >= max) {
            break stats;
        }
    };

    info!(
        iterations,
        train_error = stats.average_error,
        weight_change = stats.average_weight_change,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "finished training"
    );

    let eval = evaluate(&network, test)?;
    let test_accuracy = eval.accuracy();
    info!(
        correct = eval.correct,
        incorrect = eval.incorrect,
        accuracy = test_accuracy,
        "evaluated on test set"
    );

    Ok(TrainedNetwork {
        network,
        test_accuracy,
        iterations,
        train_error: stats.average_error,
        weight_change: stats.average_weight_change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Layer;
    use crate::perceptron::Perceptron;
    use classic_ml_datasets::xor_examples;

    #[test]
    fn test_xor_reaches_full_accuracy() {
        let data = xor_examples();
        let mut best = 0.0f64;
        for seed in 0..5 {
            let config = TrainConfig::new()
                .with_alpha(0.5)
                .with_weight_change_threshold(0.0)
                .with_hidden_layers(vec![8])
                .with_max_iterations(10_000)
                .with_seed(seed);
            let trained = build_neural_net(&data, &data, &config, None).unwrap();
            assert_eq!(trained.iterations, 10_000);
            best = best.max(trained.test_accuracy);
            if best == 1.0 {
                break;
            }
        }
        assert_eq!(best, 1.0);
    }

    #[test]
    fn test_runs_at_least_one_iteration() {
        let data = xor_examples();
        let config = TrainConfig::new()
            .with_weight_change_threshold(f64::MAX)
            .with_seed(1);
        let trained = build_neural_net(&data, &data, &config, None).unwrap();
        assert_eq!(trained.iterations, 1);

        let capped = TrainConfig::new().with_max_iterations(0).with_seed(1);
        let trained = build_neural_net(&data, &data, &capped, None).unwrap();
        assert_eq!(trained.iterations, 1);
    }

    #[test]
    fn test_iteration_cap() {
        let data = xor_examples();
        let config = TrainConfig::new()
            .with_weight_change_threshold(0.0)
            .with_max_iterations(25)
            .with_seed(2);
        let trained = build_neural_net(&data, &data, &config, None).unwrap();
        assert_eq!(trained.iterations, 25);
        assert_eq!(trained.network.layer_sizes(), &[2, 1, 2]);
    }

    #[test]
    fn test_existing_network_overrides_hidden_sizes() {
        let data = xor_examples();
        let start = NeuralNet::new(&[2, 3, 3, 2], Some(4)).unwrap();
        let config = TrainConfig::new()
            .with_hidden_layers(vec![7])
            .with_max_iterations(3)
            .with_weight_change_threshold(0.0);
        let trained = build_neural_net(&data, &data, &config, Some(start.clone())).unwrap();
        assert_eq!(trained.network.hidden_layer_sizes(), vec![3, 3]);
        assert_ne!(trained.network, start);

        let wrong = NeuralNet::new(&[3, 2], Some(4)).unwrap();
        assert!(matches!(
            build_neural_net(&data, &data, &config, Some(wrong)),
            Err(MlError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_evaluation_is_all_or_nothing() {
        // No hidden layer: outputs ≈ σ(10) and σ(-10) for any input.
        let output = Layer::from_perceptrons(vec![
            Perceptron::with_weights(vec![10.0, 0.0]).unwrap(),
            Perceptron::with_weights(vec![-10.0, 0.0]).unwrap(),
        ])
        .unwrap();
        let net = NeuralNet::from_layers(1, vec![output]).unwrap();
        let examples = vec![
            NumericExample::new(vec![0.0], vec![1.0, 0.0]),
            NumericExample::new(vec![1.0], vec![1.0, 1.0]),
            NumericExample::new(vec![2.0], vec![0.0, 0.0]),
            NumericExample::new(vec![3.0], vec![1.0, 0.0]),
        ];
        let eval = evaluate(&net, &examples).unwrap();
        assert_eq!(eval, Evaluation { correct: 2, incorrect: 2 });
        assert_eq!(evaluate_accuracy(&net, &examples).unwrap(), 0.5);
        assert!(evaluate(&net, &[]).is_err());
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = TrainConfig::from_json(r#"{"hidden_layer_sizes": [4, 2], "seed": 11}"#).unwrap();
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.weight_change_threshold, 0.00008);
        assert_eq!(config.hidden_layer_sizes, vec![4, 2]);
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.seed, Some(11));

        assert!(TrainConfig::from_json(r#"{"alpha": -1.0}"#).is_err());
        assert!(TrainConfig::from_json(r#"{"hidden_layer_sizes": [0]}"#).is_err());
        assert!(TrainConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_nan_weights_stop_training() {
        let hidden = Layer::from_perceptrons(vec![
            Perceptron::with_weights(vec![f64::NAN, 0.0, 0.0]).unwrap(),
        ])
        .unwrap();
        let output = Layer::from_perceptrons(vec![
            Perceptron::with_weights(vec![0.0, 1.0]).unwrap(),
            Perceptron::with_weights(vec![0.0, -1.0]).unwrap(),
        ])
        .unwrap();
        let net = NeuralNet::from_layers(2, vec![hidden, output]).unwrap();
        let data = xor_examples();
        let config = TrainConfig::default();
        assert_eq!(config.max_iterations, None);
        let result = build_neural_net(&data, &data, &config, Some(net));
        assert_eq!(result.err(), Some(MlError::Diverged { iteration: 1 }));
    }

    #[test]
    fn test_empty_sets_rejected() {
        let data = xor_examples();
        let config = TrainConfig::new().with_seed(0);
        assert!(matches!(
            build_neural_net(&[], &data, &config, None),
            Err(MlError::EmptyDataset(_))
        ));
        assert!(matches!(
            build_neural_net(&data, &[], &config, None),
            Err(MlError::EmptyDataset(_))
        ));
    }
}
