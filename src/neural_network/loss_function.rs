/// Half squared error loss function
pub mod half_squared_error;

pub use half_squared_error::*;
