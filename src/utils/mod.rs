//! Shared utilities for the network engine
//!
//! Currently this is just the seedable RNG used for parameter initialization.

pub mod rng;

pub use rng::SimpleRng;
