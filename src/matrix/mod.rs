//! Dense matrix storage: row-major blocks of a row-partitioned global matrix.

pub mod dense;
pub use dense::RowBlock;
