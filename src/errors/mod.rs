mod address;
pub use address::AddressError;

mod emitter;
pub use emitter::EmitterError;

mod parse;
pub use parse::ParseError;
