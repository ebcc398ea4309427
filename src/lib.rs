#[macro_use]
mod logging;

mod error;
mod block;
mod uninit;
mod vector;
mod traits;

pub use error::Error;
pub use block::Block;
pub use vector::Vector;
pub use traits::VectorIterator;

#[cfg(test)]
pub mod dropflag;
