use classic_ml_core::{MlError, MlResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `examples` and split off a test set.
///
/// Returns `(train, test)`; the test set holds `round(n · test_ratio)` items.
pub fn train_test_split<T: Clone>(
    examples: &[T],
    test_ratio: f64,
    seed: Option<u64>,
) -> MlResult<(Vec<T>, Vec<T>)> {
    if !(0.0..=1.0).contains(&test_ratio) {
        return Err(MlError::InvalidConfig(format!(
            "test ratio must lie in [0, 1], got {}",
            test_ratio
        )));
    }
    let mut shuffled = examples.to_vec();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    shuffled.shuffle(&mut rng);

    let test_size = (examples.len() as f64 * test_ratio).round() as usize;
    let test = shuffled.split_off(examples.len() - test_size);
    Ok((shuffled, test))
}
