//! Source generators for the kernel's paging and interrupt tables

pub mod address;
pub mod errors;
pub mod generator;
pub mod isr;
