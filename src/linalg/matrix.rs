//! Fixed-shape matrix of f64 values
//!
//! Values are stored row-major in a flat buffer. Shape is fixed at
//! construction. Every operation between two matrices requires compatible
//! shapes per the operation's contract; a violation is a [`ShapeMismatch`]
//! error, never silent truncation.
//!
//! [`ShapeMismatch`]: crate::error::Error::ShapeMismatch

use crate::error::{Error, Result};
use crate::linalg::Vector;
use crate::utils::SimpleRng;

/// Rows x cols real-valued grid, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from row slices. Rejects empty or ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Error::InvalidConfiguration(
                "matrix must have at least one row and one column".to_string(),
            ));
        }
        let cols = rows[0].len();
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::ShapeMismatch {
                    op: "from_rows",
                    lhs_rows: rows.len(),
                    lhs_cols: cols,
                    rhs_rows: 1,
                    rhs_cols: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    /// Build a single-column matrix from a vector.
    pub fn from_vector(vector: &Vector) -> Self {
        Self {
            rows: vector.len(),
            cols: 1,
            values: vector.to_vec(),
        }
    }

    /// Build a single-row matrix from a vector.
    pub fn from_row_vector(vector: &Vector) -> Self {
        Self {
            rows: 1,
            cols: vector.len(),
            values: vector.to_vec(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols) pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Get the element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        Ok(self.values[self.index(row, col)?])
    }

    /// Set the element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let idx = self.index(row, col)?;
        self.values[idx] = value;
        Ok(())
    }

    /// Copy row `i` out as a vector.
    pub fn row(&self, i: usize) -> Result<Vector> {
        self.index(i, 0)?;
        let start = i * self.cols;
        Ok(Vector::from_slice(&self.values[start..start + self.cols]))
    }

    /// Overwrite row `i` with the given vector.
    pub fn set_row(&mut self, i: usize, row: &Vector) -> Result<()> {
        self.index(i, 0)?;
        if row.len() != self.cols {
            return Err(Error::ShapeMismatch {
                op: "set_row",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: 1,
                rhs_cols: row.len(),
            });
        }
        let start = i * self.cols;
        self.values[start..start + self.cols].copy_from_slice(row.as_slice());
        Ok(())
    }

    fn check_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                op,
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: other.rows,
                rhs_cols: other.cols,
            });
        }
        Ok(())
    }

    /// Elementwise addition. Requires identical shapes.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Add a scalar to every element.
    pub fn add_scalar(&self, scalar: f64) -> Matrix {
        self.apply(|x| x + scalar)
    }

    /// Elementwise subtraction. Requires identical shapes.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix sub")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Subtract a scalar from every element.
    pub fn sub_scalar(&self, scalar: f64) -> Matrix {
        self.apply(|x| x - scalar)
    }

    /// Hadamard (elementwise) product. Requires identical shapes.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix mul")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    /// Multiply every element by a scalar.
    pub fn mul_scalar(&self, scalar: f64) -> Matrix {
        self.apply(|x| x * scalar)
    }

    /// Elementwise division. A zero element in the divisor is an error.
    pub fn div(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix div")?;
        if other.values.iter().any(|&x| x == 0.0) {
            return Err(Error::DivisionByZero { op: "matrix div" });
        }
        Ok(self.zip_with(other, |a, b| a / b))
    }

    /// Divide every element by a scalar. Zero is an error.
    pub fn div_scalar(&self, scalar: f64) -> Result<Matrix> {
        if scalar == 0.0 {
            return Err(Error::DivisionByZero {
                op: "matrix div_scalar",
            });
        }
        Ok(self.apply(|x| x / scalar))
    }

    /// Standard matrix product. Inner dimensions must agree.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::ShapeMismatch {
                op: "matrix dot",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: other.rows,
                rhs_cols: other.cols,
            });
        }
        let mut out = Matrix::new(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.values[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out.values[i * other.cols + j] += a * other.values[k * other.cols + j];
                }
            }
        }
        Ok(out)
    }

    /// Matrix-vector product: (rows x cols) . cols -> rows.
    pub fn dot_vector(&self, other: &Vector) -> Result<Vector> {
        if self.cols != other.len() {
            return Err(Error::ShapeMismatch {
                op: "matrix dot_vector",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: other.len(),
                rhs_cols: 1,
            });
        }
        let mut out = Vector::new(self.rows);
        for (i, row) in self.values.chunks_exact(self.cols).enumerate() {
            let sum = row
                .iter()
                .zip(other.as_slice())
                .map(|(a, b)| a * b)
                .sum::<f64>();
            out.set(i, sum)?;
        }
        Ok(out)
    }

    /// Transpose: swaps shape and reflects indices.
    pub fn t(&self) -> Matrix {
        let mut out = Matrix::new(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.values[j * self.rows + i] = self.values[i * self.cols + j];
            }
        }
        out
    }

    /// Elementwise map producing a new matrix of the same shape.
    pub fn apply<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Row-wise map: each row is passed through `f` as a [`Vector`].
    ///
    /// This is the mechanism by which per-row activation functions are
    /// applied to a batch-shaped matrix. The produced rows must all have
    /// the same length.
    pub fn apply_rows<F>(&self, f: F) -> Result<Matrix>
    where
        F: Fn(&Vector) -> Result<Vector>,
    {
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(self.rows);
        for i in 0..self.rows {
            rows.push(f(&self.row(i)?)?.to_vec());
        }
        Matrix::from_rows(&rows)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Raise every element to an integer power.
    pub fn powi(&self, exponent: i32) -> Matrix {
        self.apply(|x| x.powi(exponent))
    }

    /// Elementwise natural logarithm.
    pub fn log(&self) -> Matrix {
        self.apply(f64::ln)
    }

    /// Elementwise exponential.
    pub fn exp(&self) -> Matrix {
        self.apply(f64::exp)
    }

    /// Elementwise clamp to [min, max]. Keeps logarithms well-defined.
    pub fn clip(&self, min: f64, max: f64) -> Matrix {
        self.apply(|x| x.clamp(min, max))
    }

    /// Reshape an R x C matrix into a 1 x (R*C) row, row-major order kept.
    pub fn flatten(&self) -> Matrix {
        Matrix {
            rows: 1,
            cols: self.rows * self.cols,
            values: self.values.clone(),
        }
    }

    /// Reshape into (rows, cols). The element count must be unchanged.
    pub fn reshape(&self, rows: usize, cols: usize) -> Result<Matrix> {
        if rows * cols != self.values.len() {
            return Err(Error::ShapeMismatch {
                op: "reshape",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rows,
                rhs_cols: cols,
            });
        }
        Ok(Matrix {
            rows,
            cols,
            values: self.values.clone(),
        })
    }

    /// Replicate a 1-row or 1-column matrix to a larger shape, repeating
    /// indices modulo the original size.
    pub fn broadcast(&self, rows: usize, cols: usize) -> Result<Matrix> {
        if self.rows != 1 && self.cols != 1 {
            return Err(Error::ShapeMismatch {
                op: "broadcast",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rows,
                rhs_cols: cols,
            });
        }
        let mut out = Matrix::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let value = if self.rows == 1 {
                    self.values[j % self.cols]
                } else {
                    self.values[i % self.rows]
                };
                out.values[i * cols + j] = value;
            }
        }
        Ok(out)
    }

    /// Fill with independent uniform samples in [-1, 1).
    pub fn rand(&mut self, rng: &mut SimpleRng) {
        for value in &mut self.values {
            *value = rng.gen_range_f64(-1.0, 1.0);
        }
    }

    /// Elementwise |a - b| <= tolerance over all positions.
    /// False if the shapes differ.
    pub fn is_equal(&self, other: &Matrix, tolerance: f64) -> bool {
        self.shape() == other.shape()
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

    /// Copy the values out as nested row vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks_exact(self.cols)
            .map(|row| row.to_vec())
            .collect()
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Matrix, f: F) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl Vector {
    /// Vector-matrix product: n . (n x cols) -> cols.
    pub fn dot_matrix(&self, matrix: &Matrix) -> Result<Vector> {
        if self.len() != matrix.rows() {
            return Err(Error::ShapeMismatch {
                op: "vector dot_matrix",
                lhs_rows: 1,
                lhs_cols: self.len(),
                rhs_rows: matrix.rows(),
                rhs_cols: matrix.cols(),
            });
        }
        let mut out = Vector::new(matrix.cols());
        for j in 0..matrix.cols() {
            let mut sum = 0.0;
            for i in 0..self.len() {
                sum += self.get(i)? * matrix.get(i, j)?;
            }
            out.set(j, sum)?;
        }
        Ok(out)
    }
}
