//! Single-threaded kernel backend.

use super::{Kernels, axpby_slice, dot_slice, invert_diagonal_rows, pointwise_slice};
use crate::error::Error;
use crate::matrix::RowBlock;

/// Sequential kernels over fully assembled vectors and matrices.
pub struct SerialKernels {
    extent: usize,
}

impl SerialKernels {
    pub fn new(extent: usize) -> Self {
        SerialKernels { extent }
    }
}

impl Kernels for SerialKernels {
    fn local_len(&self) -> usize {
        self.extent
    }

    fn global_len(&self) -> usize {
        self.extent
    }

    fn axpby(&self, a: f64, x: &[f64], b: f64, y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.extent, "operand x has incorrect length");
        assert_eq!(y.len(), self.extent, "operand y has incorrect length");
        assert_eq!(out.len(), self.extent, "result vector has incorrect length");
        axpby_slice(a, x, b, y, out);
    }

    fn dot(&self, x: &[f64], y: &[f64]) -> f64 {
        assert_eq!(x.len(), self.extent, "operand x has incorrect length");
        assert_eq!(y.len(), self.extent, "operand y has incorrect length");
        dot_slice(x, y)
    }

    fn pointwise_mul(&self, x: &[f64], y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.extent, "operand x has incorrect length");
        assert_eq!(y.len(), self.extent, "operand y has incorrect length");
        assert_eq!(out.len(), self.extent, "result vector has incorrect length");
        pointwise_slice(x, y, out);
    }

    fn invert_diagonal(&self, a: &RowBlock) -> Result<Vec<f64>, Error> {
        assert_eq!(a.nrows(), self.extent, "matrix row count does not match the backend");
        assert_eq!(a.ncols(), self.extent, "matrix column count does not match the backend");
        assert_eq!(a.row_offset(), 0, "serial backend expects a full matrix");
        let mut out = vec![0.0; self.extent];
        invert_diagonal_rows(a, 0, &mut out)?;
        Ok(out)
    }

    fn matvec(&self, a: &RowBlock, x: &[f64], y: &mut [f64]) {
        assert_eq!(a.nrows(), self.extent, "matrix row count does not match the backend");
        assert_eq!(a.row_offset(), 0, "serial backend expects a full matrix");
        a.matvec_into(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_diagonal_reports_global_row() {
        let a = RowBlock::from_row_major(2, 2, vec![2.0, 0.0, 0.0, 0.0]).unwrap();
        let k = SerialKernels::new(2);
        match k.invert_diagonal(&a) {
            Err(Error::SingularDiagonal { row }) => assert_eq!(row, 1),
            other => panic!("expected singular diagonal, got {other:?}"),
        }
    }
}
