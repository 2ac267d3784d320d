//! Generation of the interrupt service routine table.
//!
//! Every vector of the IDT gets a registration call and a stub definition.
//! Lines are always produced in ascending vector order, since the kernel
//! pastes them positionally next to code that indexes by vector.

mod strategy;
pub use strategy::{Strategy, REGISTER_ERROR_ISR, REGISTER_ISR};

use std::{
    io::{self, Write},
    str::FromStr,
};

use bitflags::bitflags;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::errors::{EmitterError, ParseError};

/// Number of vectors in the x86_64 IDT
pub const VECTOR_COUNT: u16 = 256;

/// Exceptions for which the CPU pushes an error code
pub const ARCHITECTURAL_ERROR_CODES: [u16; 8] = [8, 10, 11, 12, 13, 14, 17, 30];

/// Shared symbols the stubs hand off to
pub const DEFAULT_HANDLER: &str = "isrHandler";
pub const DEFAULT_STUB_ENTRY: &str = "isrCommonStub";

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Get the symbol name of the stub for `vector`
pub fn isr_name(vector: u8) -> String {
    format!("isr{}", vector)
}

/// A validated set of vectors which carry an error code
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorCodeSet {
    vectors: Vec<u8>,
}

impl ErrorCodeSet {
    /// Build a set, rejecting duplicates and vectors outside of the IDT
    pub fn new(vectors: &[u16]) -> Result<Self, EmitterError> {
        if vectors.is_empty() {
            return Err(EmitterError::EmptyErrorCodeSet);
        }

        let mut set: Vec<u8> = Vec::with_capacity(vectors.len());
        for &vector in vectors {
            let vector_u8 =
                u8::try_from(vector).map_err(|_| EmitterError::ErrorCodeOutOfRange(vector))?;
            match set.binary_search(&vector_u8) {
                Ok(_) => return Err(EmitterError::DuplicateErrorCode(vector)),
                Err(idx) => set.insert(idx, vector_u8),
            }
        }

        Ok(Self { vectors: set })
    }

    /// The error code vectors defined by the x86_64 architecture
    pub fn architectural() -> Self {
        Self {
            vectors: ARCHITECTURAL_ERROR_CODES.iter().map(|&v| v as u8).collect(),
        }
    }

    pub fn contains(&self, vector: u8) -> bool {
        self.vectors.binary_search(&vector).is_ok()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.vectors.iter().copied()
    }
}

impl Default for ErrorCodeSet {
    fn default() -> Self {
        Self::architectural()
    }
}

/// The span of vectors to emit, which must be the whole IDT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorRange {
    start: u16,
    end: u16,
}

impl VectorRange {
    /// Create a range, only `0..256` is accepted
    pub fn new(start: u16, end: u16) -> Result<Self, EmitterError> {
        if start != 0 || end != VECTOR_COUNT {
            return Err(EmitterError::InvalidVectorRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn full() -> Self {
        Self {
            start: 0,
            end: VECTOR_COUNT,
        }
    }

    pub const fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (self.start..self.end).filter_map(|v| u8::try_from(v).ok())
    }
}

impl Default for VectorRange {
    fn default() -> Self {
        Self::full()
    }
}

bitflags! {
    /// Sections of the generated table
    pub struct Sections: u8 {
        const REGISTRATIONS = 1 << 0;
        const DEFINITIONS = 1 << 1;
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for Sections {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "registrations" | "registration" | "reg" => Self::REGISTRATIONS,
            "definitions" | "definition" | "def" => Self::DEFINITIONS,
            "all" => Self::all(),
            _ => return Err(ParseError::UnknownSection(s.to_owned())),
        })
    }
}

/// Everything that decides what the ISR table looks like
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitterConfig {
    pub strategy: Strategy,
    pub error_codes: ErrorCodeSet,
    pub vectors: VectorRange,
    /// Function standard stubs forward to
    pub handler: String,
    /// Label naked stubs jump to
    pub stub_entry: String,
    pub sections: Sections,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            error_codes: ErrorCodeSet::default(),
            vectors: VectorRange::default(),
            handler: DEFAULT_HANDLER.to_owned(),
            stub_entry: DEFAULT_STUB_ENTRY.to_owned(),
            sections: Sections::default(),
        }
    }
}

/// Writes the ISR table for a validated configuration
#[derive(Clone, Debug)]
pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    /// Validate `config` and create an emitter for it
    pub fn new(config: EmitterConfig) -> Result<Self, EmitterError> {
        for identifier in [&config.handler, &config.stub_entry] {
            if !IDENTIFIER.is_match(identifier) {
                return Err(EmitterError::InvalidIdentifier(identifier.clone()));
            }
        }

        if config.sections.is_empty() {
            return Err(EmitterError::NothingToEmit);
        }

        debug!(
            "ISR table: strategy {}, {} vectors, error codes {:?}",
            config.strategy,
            config.vectors.len(),
            config.error_codes.iter().collect::<Vec<_>>()
        );

        Ok(Self { config })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn has_error_code(&self, vector: u8) -> bool {
        self.config.error_codes.contains(vector)
    }

    pub fn registration(&self, vector: u8) -> String {
        self.config
            .strategy
            .registration(vector, self.has_error_code(vector))
    }

    pub fn definition(&self, vector: u8) -> String {
        self.config.strategy.definition(
            vector,
            self.has_error_code(vector),
            &self.config.handler,
            &self.config.stub_entry,
        )
    }

    /// Registration lines for every vector, in ascending order
    pub fn registrations(&self) -> Vec<String> {
        self.config
            .vectors
            .iter()
            .map(|vector| self.registration(vector))
            .collect()
    }

    /// Stub definitions for every vector, in ascending order
    pub fn definitions(&self) -> Vec<String> {
        self.config
            .vectors
            .iter()
            .map(|vector| self.definition(vector))
            .collect()
    }

    /// Write the selected sections to `out`, registrations first
    pub fn emit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.config.sections.contains(Sections::REGISTRATIONS) {
            for vector in self.config.vectors.iter() {
                let line = self.registration(vector);
                trace!("{}", line);
                writeln!(out, "{}", line)?;
            }
            debug!("Wrote {} registrations", self.config.vectors.len());
        }

        if self.config.sections.contains(Sections::DEFINITIONS) {
            for vector in self.config.vectors.iter() {
                let line = self.definition(vector);
                trace!("{}", line);
                writeln!(out, "{}", line)?;
            }
            debug!("Wrote {} definitions", self.config.vectors.len());
        }

        Ok(())
    }
}
