use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::AddressError;

/// The address decomposed when none is given
pub const DEFAULT_ADDRESS: u64 = 0x003f_e000_00;

/// Bits 0-47, the part of an address covered by 4-level paging
pub const ADDRESS_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

const INDEX_MASK: u64 = 0x1FF;
const OFFSET_MASK: u64 = 0xFFF;

lazy_static! {
    static ref ADDRESS_LITERAL: Regex = Regex::new(
        r"^(?P<sign>-)?(?:0(?P<radix>[xXoObB]))?(?P<digits>[0-9A-Fa-f](?:_?[0-9A-Fa-f])*)$"
    )
    .unwrap();
}

/// A virtual address split into its page table indices
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTableIndices {
    /// Bits 39-47
    pub l4: u16,
    /// Bits 30-38
    pub l3: u16,
    /// Bits 21-29
    pub l2: u16,
    /// Bits 12-20
    pub l1: u16,
    /// Bits 0-11
    pub offset: u16,
}

impl PageTableIndices {
    /// Split `address` into its four table indices and the in-page offset.
    ///
    /// Bits above 47 are ignored, so this never fails.
    pub const fn new(address: u64) -> Self {
        Self {
            l4: ((address >> 39) & INDEX_MASK) as u16,
            l3: ((address >> 30) & INDEX_MASK) as u16,
            l2: ((address >> 21) & INDEX_MASK) as u16,
            l1: ((address >> 12) & INDEX_MASK) as u16,
            offset: (address & OFFSET_MASK) as u16,
        }
    }

    /// Rebuild bits 0-47 of the address these indices came from
    pub const fn compose(self) -> u64 {
        ((self.l4 as u64) << 39)
            | ((self.l3 as u64) << 30)
            | ((self.l2 as u64) << 21)
            | ((self.l1 as u64) << 12)
            | self.offset as u64
    }
}

impl From<u64> for PageTableIndices {
    fn from(address: u64) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for PageTableIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}-{:x}-{:x}-{:x}-{:x}",
            self.l4, self.l3, self.l2, self.l1, self.offset
        )
    }
}

impl fmt::Debug for PageTableIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTableIndices")
            .field("Address", &format_args!("{:#x}", self.compose()))
            .field("Level4Index", &format_args!("{:#x}", self.l4))
            .field("Level3Index", &format_args!("{:#x}", self.l3))
            .field("Level2Index", &format_args!("{:#x}", self.l2))
            .field("Level1Index", &format_args!("{:#x}", self.l1))
            .field("FrameOffset", &format_args!("{:#x}", self.offset))
            .finish()
    }
}

pub fn decompose(address: u64) -> String {
    PageTableIndices::new(address).to_string()
}

/// Test whether bits 47-63 of `address` are all equal
pub const fn is_canonical(address: u64) -> bool {
    let mask = !0u64 >> 47 << 47;
    (address & mask) == mask || (address & mask) == 0
}

/// Parse an address literal.
///
/// Accepts `0x`, `0o` and `0b` prefixes or plain decimal, with `_` allowed
/// between digits. Input is treated as unsigned: a leading `-` gives the two's
/// complement and literals wider than 64 bits keep their low 64 bits.
pub fn parse_address(literal: &str) -> Result<u64, AddressError> {
    let literal = literal.trim();
    if literal.is_empty() {
        return Err(AddressError::Empty);
    }

    let invalid = || AddressError::InvalidDigit(literal.to_owned());
    let captures = ADDRESS_LITERAL.captures(literal).ok_or_else(invalid)?;

    let radix = match captures.name("radix").map(|m| m.as_str()) {
        Some("x" | "X") => 16,
        Some("o" | "O") => 8,
        Some("b" | "B") => 2,
        _ => 10,
    };

    let mut value = 0u64;
    for digit in captures["digits"].chars().filter(|&c| c != '_') {
        let digit = digit.to_digit(radix).ok_or_else(invalid)?;
        value = value
            .wrapping_mul(u64::from(radix))
            .wrapping_add(u64::from(digit));
    }

    if captures.name("sign").is_some() {
        value = value.wrapping_neg();
    }

    Ok(value)
}

/// A virtual address given on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualAddress(pub u64);

impl VirtualAddress {
    pub const fn indices(self) -> PageTableIndices {
        PageTableIndices::new(self.0)
    }
}

impl Default for VirtualAddress {
    fn default() -> Self {
        Self(DEFAULT_ADDRESS)
    }
}

impl FromStr for VirtualAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s).map(Self)
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
