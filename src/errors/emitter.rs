use thiserror::Error;

/// Errors returned when an ISR table configuration is rejected
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmitterError {
    /// A vector was listed twice in the error code set
    #[error("Vector {0} appears more than once in the error code set")]
    DuplicateErrorCode(u16),
    /// An error code vector lies outside of the IDT
    #[error("Error code vector {0} is outside of the IDT")]
    ErrorCodeOutOfRange(u16),
    #[error("The error code set is empty")]
    EmptyErrorCodeSet,
    /// Only the full IDT may be emitted
    #[error("Vector range {start}..{end} does not cover the IDT (expected 0..256)")]
    InvalidVectorRange { start: u16, end: u16 },
    /// A handler or stub symbol isn't a valid C identifier
    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),
    #[error("No output sections were selected")]
    NothingToEmit,
}
