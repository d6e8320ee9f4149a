//! Report rendering for the query commands.

pub mod generator;

pub use generator::*;
