#[macro_use]
extern crate serde;

mod ballot;
mod chain;
mod error;
mod paillier;
pub mod serde_decimal;
mod store;
mod tally;

pub use ballot::*;
pub use chain::*;
pub use error::*;
pub use paillier::*;
pub use store::*;
pub use tally::*;
