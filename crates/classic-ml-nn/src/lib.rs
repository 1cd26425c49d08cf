pub mod perceptron;
pub mod network;
pub mod train;

pub use perceptron::*;
pub use network::*;
pub use train::*;
