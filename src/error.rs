use crate::server::CapacityError;

#[derive(Debug, thiserror::Error)]
pub enum SpanError {
    /// No servers to partition the hash space across.
    #[error("No servers to partition the hash space across")]
    NoServers,

    /// Replication factor must be positive.
    #[error("Invalid replication factor: {0}")]
    InvalidReplicationFactor(usize),

    /// The same server is listed more than once.
    #[error("Duplicate server: {0}")]
    DuplicateServer(String),

    /// Capacity lookup failed; the whole calculation is aborted.
    #[error("Failed to get available space of server {server}")]
    Capacity {
        server: String,
        #[source]
        source: CapacityError,
    },

    /// Hash value of a wrong length.
    #[error("Invalid hash length: expected {expected} bytes, got {0}", expected = crate::HASH_LEN)]
    InvalidHashLength(usize),

    /// Hash value is not valid hex.
    #[error("Invalid hash encoding")]
    InvalidHashEncoding,

    /// Bucket index is outside of `[0, MAX_BUCKET]`.
    #[error("Bucket index out of range: {0}")]
    BucketOutOfRange(u32),

    /// Assigned spans do not add up to the full hash space.
    #[error("Incomplete hash space coverage: {0} missing span(s)")]
    IncompleteCoverage(usize),
}

pub type SpanResult<T> = Result<T, SpanError>;
