pub mod temporal;
pub mod test_utils;

pub use temporal::*;
