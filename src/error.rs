use thiserror::Error;

/// Errors produced by the anonymization core.
///
/// Nothing is retried internally; every failure surfaces at the call site.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoPanError {
    /// The construction secret is shorter than 32 bytes, or an ASCII key
    /// contains non-ASCII characters.
    #[error("key must be 32 bytes (or 32 ASCII characters)")]
    InvalidKey,

    /// The address is empty, or too short for the declared family.
    #[error("address must be 1 to 16 bytes and wide enough for its family")]
    InvalidInput,

    /// The family tag is neither IPv4 nor IPv6.
    #[error("address family must be IPv4 or IPv6")]
    InvalidFamily,

    /// The instance has been released and its key material wiped.
    #[error("anonymizer has been released")]
    Disposed,

    /// The AES primitive reported a failure.
    #[error("AES primitive failure")]
    Internal,
}
