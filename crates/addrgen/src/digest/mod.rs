mod hash_chain;
mod interface;

pub use hash_chain::*;
pub use interface::*;
