pub mod prelude;

pub mod task;

pub use prelude::*;
