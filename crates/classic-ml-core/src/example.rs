use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MlError, MlResult};

/// A categorical example: attribute name → attribute value.
///
/// The class label is stored under an ordinary key; which key is the class
/// is decided by the caller at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalExample {
    values: HashMap<String, String>,
}

impl CategoricalExample {
    pub fn new() -> Self {
        CategoricalExample {
            values: HashMap::new(),
        }
    }

    /// Build an example from `(attribute, value)` pairs.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect()
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<String>) {
        self.values.insert(attribute.into(), value.into());
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing attribute is an error.
    pub fn require(&self, attribute: &str) -> MlResult<&str> {
        self.get(attribute).ok_or_else(|| MlError::MissingAttribute {
            attribute: attribute.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for CategoricalExample {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        CategoricalExample {
            values: iter.into_iter().collect(),
        }
    }
}

/// A numeric example: input vector and target output vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericExample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl NumericExample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Self {
        NumericExample { input, target }
    }
}
