//! Repository operations.

pub mod export;
pub mod posters;
pub mod stats;
pub mod tags;
