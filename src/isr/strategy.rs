use std::{fmt, str::FromStr};

use crate::errors::ParseError;

use super::isr_name;

/// Registration call for vectors without an error code
pub const REGISTER_ISR: &str = "GLOBAL_IDT.kernelISR";
/// Registration call for vectors where the CPU pushes an error code
pub const REGISTER_ERROR_ISR: &str = "GLOBAL_IDT.kernelErrorISR";

/// How the table of stubs is written out
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `interrupt` calling convention stubs forwarding to a shared handler
    Standard,
    /// Naked stubs that push the vector and jump to a shared entry point
    Naked,
    /// Naked stubs, with every vector registered through `kernelISR`
    UniformRegistration,
}

impl Strategy {
    /// All strategies, in the order they are listed on the command line
    pub const ALL: [Strategy; 3] = [Self::Standard, Self::Naked, Self::UniformRegistration];

    /// The name used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Naked => "naked",
            Self::UniformRegistration => "uniform",
        }
    }

    /// Build the line registering `vector` with the IDT
    pub fn registration(self, vector: u8, has_error_code: bool) -> String {
        let call = match self {
            Self::UniformRegistration => REGISTER_ISR,
            Self::Standard | Self::Naked if has_error_code => REGISTER_ERROR_ISR,
            Self::Standard | Self::Naked => REGISTER_ISR,
        };

        format!("{}({}, {});", call, vector, isr_name(vector))
    }

    /// Build the definition of the stub for `vector`.
    ///
    /// Standard stubs call `handler`; naked stubs jump to `stub_entry`.
    pub fn definition(
        self,
        vector: u8,
        has_error_code: bool,
        handler: &str,
        stub_entry: &str,
    ) -> String {
        let name = isr_name(vector);

        match self {
            Self::Standard if has_error_code => format!(
                "__attribute__((interrupt)) void {}(InterruptFrame* frame, uint64_t errorCode) {{ {}(frame, {}, &errorCode); }}",
                name, handler, vector
            ),
            Self::Standard => format!(
                "__attribute__((interrupt)) void {}(InterruptFrame* frame) {{ {}(frame, {}, nullptr); }}",
                name, handler, vector
            ),
            // The CPU already pushed the error code
            Self::Naked | Self::UniformRegistration if has_error_code => format!(
                "__attribute__((naked)) void {}() {{ asm volatile(\"cli; push ${}; jmp {}\"); }}",
                name, vector, stub_entry
            ),
            Self::Naked | Self::UniformRegistration => format!(
                "__attribute__((naked)) void {}() {{ asm volatile(\"cli; push $0; push ${}; jmp {}\"); }}",
                name, vector, stub_entry
            ),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "standard" | "interrupt" => Self::Standard,
            "naked" => Self::Naked,
            "uniform" | "uniform-registration" => Self::UniformRegistration,
            _ => return Err(ParseError::UnknownStrategy(s.to_owned())),
        })
    }
}
