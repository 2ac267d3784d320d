use thiserror::Error;

/// Errors from parsing command line values
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown emission strategy `{0}` (expected standard, naked or uniform)")]
    UnknownStrategy(String),
    #[error("Unknown output section `{0}` (expected registrations, definitions or all)")]
    UnknownSection(String),
}
