use std::io::Read;
use std::path::Path;

use classic_ml_core::{CategoricalExample, MlError, MlResult};

/// Read headerless categorical records from a CSV file.
///
/// Each row holds one column per name in `attribute_names`, followed by the
/// class value, which is stored under `class_name`.
pub fn read_categorical_csv<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    attribute_names: &[S],
    class_name: &str,
) -> MlResult<Vec<CategoricalExample>> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| MlError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    read_categorical(file, attribute_names, class_name)
}

/// Like [`read_categorical_csv`], from any reader.
pub fn read_categorical<R: Read, S: AsRef<str>>(
    reader: R,
    attribute_names: &[S],
    class_name: &str,
) -> MlResult<Vec<CategoricalExample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let expected = attribute_names.len() + 1;
    let mut examples = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| MlError::Csv(e.to_string()))?;
        if record.len() != expected {
            return Err(MlError::DimensionMismatch {
                expected,
                got: record.len(),
            });
        }
        let mut ex = CategoricalExample::new();
        for (name, field) in attribute_names.iter().zip(record.iter()) {
            ex.insert(name.as_ref(), field);
        }
        ex.insert(class_name, &record[attribute_names.len()]);
        examples.push(ex);
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAR_ROWS: &str = "vhigh,vhigh,2,2,small,low,unacc\n\
                            low,med,4,more,big,high,vgood\n\
                            med, low ,3,4,med,med,acc\n";

    #[test]
    fn test_read_categorical() {
        let names = ["buying", "maint", "doors", "persons", "lug_boot", "safety"];
        let examples = read_categorical(CAR_ROWS.as_bytes(), &names, "class").unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[1].get("safety"), Some("high"));
        assert_eq!(examples[1].get("class"), Some("vgood"));
        assert_eq!(examples[2].get("maint"), Some("low"));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = read_categorical("a,b\n".as_bytes(), &["x", "y"], "class").unwrap_err();
        assert_eq!(err, MlError::DimensionMismatch { expected: 3, got: 2 });
    }

    #[test]
    fn test_missing_file() {
        let err = read_categorical_csv("/nonexistent/car.data", &["x"], "class").unwrap_err();
        assert!(matches!(err, MlError::Io(_)));
    }
}
