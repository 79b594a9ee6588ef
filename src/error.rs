use thiserror::Error;

// Unified error type for partisol

#[derive(Error, Debug)]
pub enum Error {
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("matrix storage holds {elements} elements, expected {extent}x{extent}")]
    NonSquare { elements: usize, extent: usize },
    #[error("worker count {workers} exceeds system size {extent}")]
    TooManyWorkers { workers: usize, extent: usize },
    #[error("singular preconditioner: zero diagonal entry at row {row}")]
    SingularDiagonal { row: usize },
    #[error("pcg breakdown: p^T A p = {value} is not positive")]
    Breakdown { value: f64 },
    #[error("indefinite preconditioner: z^T r = {value} is negative")]
    IndefinitePreconditioner { value: f64 },
    #[error("the coordinator rank must supply the global system")]
    MissingSystem,
    #[error("coordinator rejected the system; solve aborted before distribution")]
    CoordinatorAbort,
    #[error("thread pool construction failed: {0}")]
    ThreadPool(String),
}
