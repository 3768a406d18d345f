pub mod example;
pub mod priority;

pub use example::*;
pub use priority::*;
