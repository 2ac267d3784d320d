use thiserror::Error;

/// Errors that occur when reading an address literal
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// No digits were given
    #[error("No address was given")]
    Empty,
    /// The literal had a bad prefix, a bad separator or a digit outside its radix
    #[error("`{0}` is not a valid address literal")]
    InvalidDigit(String),
}
