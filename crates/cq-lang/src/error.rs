use thiserror::Error;

/// Errors raised while converting the wire form back into a query tree.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unknown operator kind `{0}`")]
    UnknownOperatorKind(i32),
    #[error("NOT operator expects exactly one operand but got {0}")]
    InvalidNotOperands(usize),
    #[error("Timestamp out of range: {seconds}s {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: i32 },
    #[error("Search request has no query")]
    MissingQuery,
    #[error("Invalid result limit `{0}`")]
    InvalidLimit(i64),
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
