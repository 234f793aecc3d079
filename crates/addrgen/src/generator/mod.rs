mod address_generator;
mod iter;

pub use address_generator::*;
pub use iter::*;
