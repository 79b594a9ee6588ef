//! Row-major dense storage for full matrices and striped row blocks.
//!
//! A [`RowBlock`] holds a contiguous range of rows of a conceptual global
//! `ncols x ncols` matrix, flattened row-major. A fully assembled matrix is
//! the special case `row_offset == 0, nrows == ncols`. The block knows its
//! global first row so diagonal addressing stays correct after a row split.

use faer::{Mat, MatRef};

use crate::blas::dot_slice;
use crate::error::Error;

/// Contiguous row range of a dense global matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBlock {
    row_offset: usize,
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl RowBlock {
    /// Full matrix from flattened row-major storage.
    pub fn from_row_major(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self, Error> {
        Self::block(0, nrows, ncols, data)
    }

    /// Row block starting at global row `row_offset`.
    pub fn block(
        row_offset: usize,
        nrows: usize,
        ncols: usize,
        data: Vec<f64>,
    ) -> Result<Self, Error> {
        if data.len() != nrows * ncols {
            return Err(Error::DimensionMismatch {
                context: "row-major matrix storage",
                expected: nrows * ncols,
                found: data.len(),
            });
        }
        Ok(RowBlock {
            row_offset,
            nrows,
            ncols,
            data,
        })
    }

    /// Copies a faer matrix into a full row-major block.
    pub fn from_faer(a: MatRef<'_, f64>) -> Self {
        let (nrows, ncols) = (a.nrows(), a.ncols());
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(a[(i, j)]);
            }
        }
        RowBlock {
            row_offset: 0,
            nrows,
            ncols,
            data,
        }
    }

    /// Copies this block into a faer matrix of the same shape.
    pub fn to_faer(&self) -> Mat<f64> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }

    /// Rows held locally in this block.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Columns, equal to the global extent.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Global index of the first local row.
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// Entry at local row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.ncols + j]
    }

    /// Local row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Flattened row-major storage.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// y <- A x for the rows of this block; `x` spans the full extent and
    /// `y` only the locally owned rows.
    pub fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.ncols, "input vector x has incorrect length");
        assert_eq!(y.len(), self.nrows, "output vector y has incorrect length");
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = dot_slice(self.row(i), x);
        }
    }
}
