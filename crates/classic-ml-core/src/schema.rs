use serde::{Deserialize, Serialize};

use crate::error::{MlError, MlResult};
use crate::example::CategoricalExample;

/// One attribute and its ordered set of legal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Attribute {
            name: name.into(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Attribute-value schema: attribute name → legal values.
///
/// Attributes keep insertion order. Split selection iterates in this order,
/// so it also decides ties between equally good attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        AttributeSchema {
            attributes: Vec::new(),
        }
    }

    /// Builder-style insert. Re-adding a name replaces its values in place.
    pub fn with_attribute<S: AsRef<str>>(mut self, name: impl Into<String>, values: &[S]) -> Self {
        self.push(Attribute::new(name, values));
        self
    }

    pub fn push(&mut self, attribute: Attribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Infer a schema from data. Legal values appear in first-seen order.
    pub fn infer<S: AsRef<str>>(
        examples: &[CategoricalExample],
        attribute_names: &[S],
    ) -> MlResult<Self> {
        let mut schema = AttributeSchema::new();
        for name in attribute_names {
            let name = name.as_ref();
            let mut values: Vec<String> = Vec::new();
            for ex in examples {
                let v = ex.require(name)?;
                if !values.iter().any(|seen| seen == v) {
                    values.push(v.to_string());
                }
            }
            schema.push(Attribute {
                name: name.to_string(),
                values,
            });
        }
        Ok(schema)
    }

    /// Check that `example` has a legal value for every attribute.
    pub fn validate(&self, example: &CategoricalExample) -> MlResult<()> {
        for attr in &self.attributes {
            let value = example.require(&attr.name)?;
            if !attr.contains(value) {
                return Err(MlError::UnknownValue {
                    attribute: attr.name.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_preserves_first_seen_order() {
        let examples = vec![
            CategoricalExample::from_pairs(&[("wind", "strong")]),
            CategoricalExample::from_pairs(&[("wind", "weak")]),
            CategoricalExample::from_pairs(&[("wind", "strong")]),
        ];
        let schema = AttributeSchema::infer(&examples, &["wind"]).unwrap();
        assert_eq!(schema.get("wind").unwrap().values, vec!["strong", "weak"]);
    }

    #[test]
    fn test_validate_rejects_unknown_value() {
        let schema = AttributeSchema::new().with_attribute("wind", &["weak", "strong"]);
        let ok = CategoricalExample::from_pairs(&[("wind", "weak")]);
        let bad = CategoricalExample::from_pairs(&[("wind", "gale")]);
        assert!(schema.validate(&ok).is_ok());
        assert!(matches!(
            schema.validate(&bad),
            Err(MlError::UnknownValue { .. })
        ));
        assert!(matches!(
            schema.validate(&CategoricalExample::new()),
            Err(MlError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_push_replaces_existing() {
        let mut schema = AttributeSchema::new()
            .with_attribute("a", &["x"])
            .with_attribute("b", &["y"]);
        schema.push(Attribute::new("a", &["x", "z"]));
        assert_eq!(schema.names(), vec!["a", "b"]);
        assert_eq!(schema.get("a").unwrap().values.len(), 2);
    }
}
