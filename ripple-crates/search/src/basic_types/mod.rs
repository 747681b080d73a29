mod cost;
mod moves;
mod search_error;
#[cfg(test)]
pub(crate) mod test_random;

pub use cost::*;
pub use moves::*;
pub use search_error::*;
