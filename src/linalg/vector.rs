//! Fixed-size vector of f64 values
//!
//! Size is fixed at construction and never changes. All binary operations
//! are pure and return a new vector; the only mutating operations are
//! `set` and `rand` (parameter initialization).

use crate::error::{Error, Result};
use crate::utils::SimpleRng;

/// Ordered fixed-size sequence of real numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    values: Vec<f64>,
}

impl Vector {
    /// Create a zero-filled vector of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// Create a vector from a slice of values.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    /// Create a one-element vector holding a scalar.
    pub fn from_scalar(scalar: f64) -> Self {
        Self {
            values: vec![scalar],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the element at `index`.
    pub fn get(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row: 0,
                col: index,
                rows: 1,
                cols: self.values.len(),
            })
    }

    /// Set the element at `index`.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row: 0,
                col: index,
                rows: 1,
                cols: len,
            }),
        }
    }

    fn check_same_len(&self, other: &Vector, op: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::ShapeMismatch {
                op,
                lhs_rows: 1,
                lhs_cols: self.len(),
                rhs_rows: 1,
                rhs_cols: other.len(),
            });
        }
        Ok(())
    }

    /// Elementwise addition. Requires identical lengths.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Add a scalar to every element.
    pub fn add_scalar(&self, scalar: f64) -> Vector {
        self.apply(|x| x + scalar)
    }

    /// Elementwise subtraction. Requires identical lengths.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector sub")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Subtract a scalar from every element.
    pub fn sub_scalar(&self, scalar: f64) -> Vector {
        self.apply(|x| x - scalar)
    }

    /// Hadamard (elementwise) product. Requires identical lengths.
    pub fn mul(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector mul")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    /// Multiply every element by a scalar.
    pub fn mul_scalar(&self, scalar: f64) -> Vector {
        self.apply(|x| x * scalar)
    }

    /// Elementwise division. A zero element in the divisor is an error.
    pub fn div(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector div")?;
        if other.values.iter().any(|&x| x == 0.0) {
            return Err(Error::DivisionByZero { op: "vector div" });
        }
        Ok(self.zip_with(other, |a, b| a / b))
    }

    /// Divide every element by a scalar. Zero is an error.
    pub fn div_scalar(&self, scalar: f64) -> Result<Vector> {
        if scalar == 0.0 {
            return Err(Error::DivisionByZero {
                op: "vector div_scalar",
            });
        }
        Ok(self.apply(|x| x / scalar))
    }

    /// Inner product with another vector of the same length.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_same_len(other, "vector dot")?;
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Transpose. Row/column duality collapses for 1-D, so this is a copy.
    pub fn t(&self) -> Vector {
        self.clone()
    }

    /// Elementwise map producing a new vector of the same length.
    pub fn apply<F: Fn(f64) -> f64>(&self, f: F) -> Vector {
        Vector {
            values: self.values.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest element, or negative infinity for an empty vector.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Raise every element to an integer power.
    pub fn powi(&self, exponent: i32) -> Vector {
        self.apply(|x| x.powi(exponent))
    }

    /// Elementwise natural logarithm.
    pub fn log(&self) -> Vector {
        self.apply(f64::ln)
    }

    /// Elementwise exponential.
    pub fn exp(&self) -> Vector {
        self.apply(f64::exp)
    }

    /// Elementwise clamp to [min, max]. Keeps logarithms well-defined.
    pub fn clip(&self, min: f64, max: f64) -> Vector {
        self.apply(|x| x.clamp(min, max))
    }

    /// Fill with independent uniform samples in [-1, 1).
    pub fn rand(&mut self, rng: &mut SimpleRng) {
        for value in &mut self.values {
            *value = rng.gen_range_f64(-1.0, 1.0);
        }
    }

    /// Elementwise |a - b| <= tolerance over all positions.
    /// False if the lengths differ.
    pub fn is_equal(&self, other: &Vector, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Error out if any element is NaN or infinite.
    pub fn validate_finite(&self, context: &'static str) -> Result<()> {
        if self.values.iter().any(|x| !x.is_finite()) {
            return Err(Error::NumericInstability { context });
        }
        Ok(())
    }

    /// Copy the values out as a plain `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    /// Borrow the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Vector, f: F) -> Vector {
        Vector {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let v = Vector::new(3);
        assert_eq!(v.to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_get_set_bounds() {
        let mut v = Vector::new(2);
        v.set(1, 5.0).unwrap();
        assert_eq!(v.get(1).unwrap(), 5.0);
        assert!(v.get(2).is_err());
        assert!(v.set(2, 1.0).is_err());
    }

    #[test]
    fn test_add_shape_mismatch() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_dot() {
        let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b).unwrap(), 32.0);
    }

    #[test]
    fn test_div_by_zero_element() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 0.0]);
        assert!(matches!(a.div(&b), Err(Error::DivisionByZero { .. })));
    }

    #[test]
    fn test_transpose_is_identity() {
        let v = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(v.t(), v);
    }

    #[test]
    fn test_clip() {
        let v = Vector::from_slice(&[-2.0, 0.5, 3.0]);
        assert_eq!(v.clip(0.0, 1.0).to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_validate_finite() {
        let v = Vector::from_slice(&[1.0, f64::NAN]);
        assert!(v.validate_finite("test").is_err());
        let w = Vector::from_slice(&[1.0, 2.0]);
        assert!(w.validate_finite("test").is_ok());
    }

    #[test]
    fn test_is_equal_tolerance() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.01, 1.99]);
        assert!(a.is_equal(&b, 0.02));
        assert!(!a.is_equal(&b, 0.001));
    }

    #[test]
    fn test_rand_range() {
        let mut rng = SimpleRng::new(7);
        let mut v = Vector::new(100);
        v.rand(&mut rng);
        assert!(v.to_vec().iter().all(|&x| (-1.0..1.0).contains(&x)));
    }
}
