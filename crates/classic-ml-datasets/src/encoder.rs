use classic_ml_core::{AttributeSchema, CategoricalExample, MlError, MlResult, NumericExample};

/// A vector of `length` zeros with a one at `index`.
pub fn one_hot(index: usize, length: usize) -> Vec<f64> {
    let mut v = vec![0.0; length];
    if index < length {
        v[index] = 1.0;
    }
    v
}

/// Turns categorical examples into numeric ones.
///
/// The input vector concatenates one one-hot block per schema attribute, in
/// schema order; the target is the one-hot class vector.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    schema: AttributeSchema,
    class_name: String,
    class_values: Vec<String>,
}

impl OneHotEncoder {
    pub fn new<S: AsRef<str>>(
        schema: AttributeSchema,
        class_name: impl Into<String>,
        class_values: &[S],
    ) -> Self {
        OneHotEncoder {
            schema,
            class_name: class_name.into(),
            class_values: class_values.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    /// Take class values from `examples` in first-seen order.
    pub fn fit(
        examples: &[CategoricalExample],
        schema: AttributeSchema,
        class_name: &str,
    ) -> MlResult<Self> {
        let mut class_values: Vec<String> = Vec::new();
        for ex in examples {
            let label = ex.require(class_name)?;
            if !class_values.iter().any(|c| c == label) {
                class_values.push(label.to_string());
            }
        }
        Ok(Self::new(schema, class_name, class_values.as_slice()))
    }

    pub fn input_size(&self) -> usize {
        self.schema.attributes().iter().map(|a| a.values.len()).sum()
    }

    pub fn output_size(&self) -> usize {
        self.class_values.len()
    }

    pub fn class_values(&self) -> &[String] {
        &self.class_values
    }

    pub fn encode(&self, example: &CategoricalExample) -> MlResult<NumericExample> {
        let mut input = Vec::with_capacity(self.input_size());
        for attr in self.schema.attributes() {
            let value = example.require(&attr.name)?;
            let idx = position(&attr.values, value).ok_or_else(|| MlError::UnknownValue {
                attribute: attr.name.clone(),
                value: value.to_string(),
            })?;
            input.extend(one_hot(idx, attr.values.len()));
        }

        let label = example.require(&self.class_name)?;
        let idx = position(&self.class_values, label).ok_or_else(|| MlError::UnknownValue {
            attribute: self.class_name.clone(),
            value: label.to_string(),
        })?;
        Ok(NumericExample::new(input, one_hot(idx, self.class_values.len())))
    }

    pub fn encode_all(&self, examples: &[CategoricalExample]) -> MlResult<Vec<NumericExample>> {
        examples.iter().map(|ex| self.encode(ex)).collect()
    }

    /// Class value of the largest output unit.
    pub fn decode_class(&self, output: &[f64]) -> Option<&str> {
        let (idx, _) = output
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if v <= b => best,
                _ => Some((i, v)),
            })?;
        self.class_values.get(idx).map(String::as_str)
    }
}

fn position(values: &[String], value: &str) -> Option<usize> {
    values.iter().position(|v| v == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::play_tennis;

    #[test]
    fn test_one_hot() {
        assert_eq!(one_hot(2, 4), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(one_hot(5, 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_encode_play_tennis() {
        let (examples, schema) = play_tennis();
        let enc = OneHotEncoder::fit(&examples, schema, "label").unwrap();
        assert_eq!(enc.input_size(), 10);
        assert_eq!(enc.class_values(), &["no".to_string(), "yes".to_string()]);

        let first = enc.encode(&examples[0]).unwrap();
        // sunny, hot, high, weak → no
        assert_eq!(
            first.input,
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(first.target, vec![1.0, 0.0]);
        assert_eq!(enc.encode_all(&examples).unwrap().len(), 14);
    }

    #[test]
    fn test_unknown_value() {
        let (examples, schema) = play_tennis();
        let enc = OneHotEncoder::new(schema, "label", &["yes", "no"]);
        let mut ex = examples[0].clone();
        ex.insert("wind", "gale");
        assert!(matches!(enc.encode(&ex), Err(MlError::UnknownValue { .. })));
    }

    #[test]
    fn test_decode_class() {
        let (_, schema) = play_tennis();
        let enc = OneHotEncoder::new(schema, "label", &["yes", "no"]);
        assert_eq!(enc.decode_class(&[0.2, 0.7]), Some("no"));
        assert_eq!(enc.decode_class(&[0.5, 0.5]), Some("yes"));
        assert_eq!(enc.decode_class(&[]), None);
    }
}
