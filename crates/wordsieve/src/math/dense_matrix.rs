//! # Dense Row-Major Matrix

use crate::{
    concurrency::par_fill_chunks,
    errors::{WSResult, WordsieveError},
};

/// A dense, row-major `f32` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DenseMatrix {
    /// A `rows x cols` matrix of zeros.
    pub fn zeros(
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> WSResult<Self> {
        if data.len() != rows * cols {
            return Err(WordsieveError::ShapeMismatch(format!(
                "{rows}x{cols} matrix from {} values",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from equal-length rows.
    ///
    /// No rows yields a `0x0` matrix.
    pub fn from_rows<R>(rows: &[R]) -> WSResult<Self>
    where
        R: AsRef<[f32]>,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(WordsieveError::ShapeMismatch(format!(
                    "row {idx} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Row `idx`.
    ///
    /// ## Panics
    /// Panics if `idx` is out of range.
    pub fn row(
        &self,
        idx: usize,
    ) -> &[f32] {
        assert!(idx < self.rows, "row {idx} out of range ({})", self.rows);
        &self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    /// Mutable row `idx`.
    ///
    /// ## Panics
    /// Panics if `idx` is out of range.
    pub fn row_mut(
        &mut self,
        idx: usize,
    ) -> &mut [f32] {
        assert!(idx < self.rows, "row {idx} out of range ({})", self.rows);
        &mut self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    /// Iterate over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // `chunks_exact(0)` panics; a zero-width matrix still has rows.
        (0..self.rows).map(move |idx| &self.data[idx * self.cols..(idx + 1) * self.cols])
    }

    /// Element `(row, col)`.
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> f32 {
        self.row(row)[col]
    }

    /// Set element `(row, col)`.
    pub fn set(
        &mut self,
        row: usize,
        col: usize,
        value: f32,
    ) {
        self.row_mut(row)[col] = value;
    }

    /// Matrix product `self * other`; output rows are computed in parallel.
    pub fn matmul(
        &self,
        other: &DenseMatrix,
    ) -> WSResult<DenseMatrix> {
        if self.cols != other.rows {
            return Err(WordsieveError::ShapeMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }

        let mut out = DenseMatrix::zeros(self.rows, other.cols);
        if out.cols == 0 {
            return Ok(out);
        }

        par_fill_chunks(&mut out.data, other.cols, |idx, out_row| {
            for (k, &a) in self.row(idx).iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (o, &b) in out_row.iter_mut().zip(other.row(k)) {
                    *o += a * b;
                }
            }
        });

        Ok(out)
    }

    /// Row-vector product `vᵀ * self`; `v` has one entry per row.
    pub fn vec_mul(
        &self,
        v: &[f32],
    ) -> WSResult<Vec<f32>> {
        if v.len() != self.rows {
            return Err(WordsieveError::ShapeMismatch(format!(
                "cannot multiply a {}-vector by a {}x{} matrix",
                v.len(),
                self.rows,
                self.cols
            )));
        }

        let mut out = vec![0.0; self.cols];
        for (&a, row) in v.iter().zip(self.iter_rows()) {
            for (o, &b) in out.iter_mut().zip(row) {
                *o += a * b;
            }
        }
        Ok(out)
    }

    /// Squared Frobenius norm.
    pub fn squared_norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// A new matrix holding the given rows, in the given order.
    ///
    /// ## Panics
    /// Panics if any index is out of range.
    pub fn select_rows(
        &self,
        indices: &[usize],
    ) -> DenseMatrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            data.extend_from_slice(self.row(idx));
        }
        DenseMatrix {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.get(0, 1), 2.0);

        assert!(matches!(
            DenseMatrix::from_rows(&[vec![1.0], vec![2.0, 3.0]]),
            Err(WordsieveError::ShapeMismatch(_))
        ));

        let empty = DenseMatrix::from_rows::<Vec<f32>>(&[]).unwrap();
        assert_eq!(empty.shape(), (0, 0));
    }

    #[test]
    fn test_matmul() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = DenseMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();

        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[4.0, 5.0, 10.0, 11.0]);

        assert!(b.matmul(&b).is_err());
    }

    #[test]
    fn test_vec_mul() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.vec_mul(&[1.0, 1.0]).unwrap(), vec![4.0, 6.0]);
        assert!(m.vec_mul(&[1.0]).is_err());
    }

    #[test]
    fn test_select_rows_and_norm() {
        let mut m = DenseMatrix::zeros(3, 2);
        m.set(0, 0, 1.0);
        m.set(2, 1, 2.0);
        assert_eq!(m.squared_norm(), 5.0);

        let s = m.select_rows(&[2, 0]);
        assert_eq!(s.as_slice(), &[0.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_width() {
        let m = DenseMatrix::zeros(3, 0);
        assert_eq!(m.iter_rows().count(), 3);
        let p = DenseMatrix::zeros(2, 3).matmul(&m).unwrap();
        assert_eq!(p.shape(), (2, 0));
    }
}
