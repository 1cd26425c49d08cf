pub mod error;
pub mod example;
pub mod schema;

pub use error::{MlError, MlResult};
pub use example::{CategoricalExample, NumericExample};
pub use schema::{Attribute, AttributeSchema};
