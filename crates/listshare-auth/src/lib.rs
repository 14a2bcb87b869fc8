pub mod contracts;
pub mod driver;
pub mod executor;

pub use contracts::*;
pub use driver::*;
pub use executor::*;
