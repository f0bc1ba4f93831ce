//! Tensor primitives: fixed-size vectors and matrices
//!
//! All binary operations are pure and return new tensors. Shape contracts
//! are checked on every operation; the only mutating operations are `set`,
//! `set_row`, and `rand` (parameter initialization).

pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
