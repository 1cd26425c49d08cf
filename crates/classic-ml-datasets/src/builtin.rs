use classic_ml_core::{AttributeSchema, CategoricalExample, NumericExample};

/// Exclusive-or truth table with one-hot targets.
///
/// Equal inputs map to `[1, 0]`, differing inputs to `[0, 1]`.
pub fn xor_examples() -> Vec<NumericExample> {
    vec![
        NumericExample::new(vec![0.0, 0.0], vec![1.0, 0.0]),
        NumericExample::new(vec![0.0, 1.0], vec![0.0, 1.0]),
        NumericExample::new(vec![1.0, 0.0], vec![0.0, 1.0]),
        NumericExample::new(vec![1.0, 1.0], vec![1.0, 0.0]),
    ]
}

/// The 14-day "play tennis" weather dataset. The class key is `label`.
pub fn play_tennis() -> (Vec<CategoricalExample>, AttributeSchema) {
    const ROWS: [[&str; 5]; 14] = [
        ["sunny", "hot", "high", "weak", "no"],
        ["sunny", "hot", "high", "strong", "no"],
        ["overcast", "hot", "high", "weak", "yes"],
        ["rain", "mild", "high", "weak", "yes"],
        ["rain", "cool", "normal", "weak", "yes"],
        ["rain", "cool", "normal", "strong", "no"],
        ["overcast", "cool", "normal", "strong", "yes"],
        ["sunny", "mild", "high", "weak", "no"],
        ["sunny", "cool", "normal", "weak", "yes"],
        ["rain", "mild", "normal", "weak", "yes"],
        ["sunny", "mild", "normal", "strong", "yes"],
        ["overcast", "mild", "high", "strong", "yes"],
        ["overcast", "hot", "normal", "weak", "yes"],
        ["rain", "mild", "high", "strong", "no"],
    ];
    const COLUMNS: [&str; 5] = ["outlook", "temp", "humidity", "wind", "label"];

    let examples: Vec<CategoricalExample> = ROWS
        .iter()
        .map(|row| {
            COLUMNS
                .iter()
                .zip(row.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .collect();
    let schema = AttributeSchema::new()
        .with_attribute("outlook", &["sunny", "overcast", "rain"])
        .with_attribute("temp", &["hot", "mild", "cool"])
        .with_attribute("humidity", &["high", "normal"])
        .with_attribute("wind", &["weak", "strong"]);
    (examples, schema)
}
