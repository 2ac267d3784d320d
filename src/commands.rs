use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use kgen::{
    address::VirtualAddress,
    isr::{EmitterConfig, Sections, Strategy, DEFAULT_HANDLER, DEFAULT_STUB_ENTRY},
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Source generator for the kernel's paging and interrupt tables", long_about = None)]
pub struct Arguments {
    /// Verbosity
    #[clap(short, long, parse(from_occurrences))]
    pub verbosity: usize,
    /// Write the generated source to a file instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,
    /// Address used when no subcommand is given, or `decompose` gets none
    #[clap(short, long, allow_hyphen_values = true)]
    pub address: Option<VirtualAddress>,
    // With no subcommand the default address and ISR table are both written
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a virtual address into its page table indices
    Decompose {
        /// Address to decompose, in hex (0x), octal (0o), binary (0b) or decimal
        #[clap(allow_hyphen_values = true)]
        address: Option<VirtualAddress>,
    },
    /// Emit ISR registrations and stub definitions for every vector
    Isr(IsrArgs),
}

#[derive(Args, Debug)]
pub struct IsrArgs {
    /// Emission strategy: standard, naked or uniform
    #[clap(short, long, default_value = "standard")]
    pub strategy: Strategy,
    /// Function standard stubs forward to
    #[clap(long, default_value = DEFAULT_HANDLER)]
    pub handler: String,
    /// Label naked stubs jump to
    #[clap(long, default_value = DEFAULT_STUB_ENTRY)]
    pub stub_entry: String,
    /// Only emit registrations or definitions
    #[clap(long)]
    pub only: Option<Sections>,
}

impl IsrArgs {
    /// Build the emitter configuration, the error code set is always the architectural one
    pub fn config(&self) -> EmitterConfig {
        EmitterConfig {
            strategy: self.strategy,
            handler: self.handler.clone(),
            stub_entry: self.stub_entry.clone(),
            sections: self.only.unwrap_or_default(),
            ..Default::default()
        }
    }
}
