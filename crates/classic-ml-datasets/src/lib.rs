pub mod builtin;
pub mod csv_io;
pub mod encoder;
pub mod split;

pub use builtin::*;
pub use csv_io::*;
pub use encoder::*;
pub use split::*;
