use std::io::{self, Write};

use log::{debug, warn};

use crate::{
    address::{is_canonical, PageTableIndices},
    isr::Emitter,
};

/// Write the page table indices of `address` as a single line
pub fn write_address<W: Write>(address: u64, out: &mut W) -> io::Result<()> {
    if !is_canonical(address) {
        warn!("{:#x} is not a canonical address, bits 48-63 are ignored", address);
    }

    let indices = PageTableIndices::new(address);
    debug!("{:#?}", indices);

    writeln!(out, "{}", indices)
}

/// Write the address line followed by the ISR table
pub fn write_all<W: Write>(address: u64, emitter: &Emitter, out: &mut W) -> io::Result<()> {
    write_address(address, out)?;
    emitter.emit(out)
}
