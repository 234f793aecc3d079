mod interface;
mod memory;
mod registry;

pub use interface::*;
pub use memory::*;
pub use registry::*;
