//! Photo organization module.
//!
//! Places files into category folders by moving or copying them.
//!
//! Name collisions are resolved by appending `_1`, `_2`, ... to the file stem
//! until a free name is found. Directories are created on first use.

mod executor;
mod types;

pub use executor::{unique_destination, FsMaterializer, Materializer, MAX_COLLISION_ATTEMPTS};
pub use types::*;
