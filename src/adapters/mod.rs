pub mod ownership;

pub use ownership::*;
