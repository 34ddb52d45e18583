/// Logistic sigmoid activation
pub mod sigmoid;

pub use sigmoid::*;
