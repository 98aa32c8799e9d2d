//! Human-readable table listings.

use std::io::{self, Write};

use usdhc_adma::{DESCRIPTOR_SIZE, DescriptorChain};

/// Writes one line per descriptor followed by a summary line.
pub fn print_chain(out: &mut impl Write, chain: &DescriptorChain) -> io::Result<()> {
    for (i, desc) in chain.iter().enumerate() {
        writeln!(out, "  {i:4} +{:#06x}  {desc}", i * DESCRIPTOR_SIZE)?;
    }
    writeln!(
        out,
        "  {} descriptor(s), {} table bytes, {} data bytes, mode {:?} (DMASEL={:#04b})",
        chain.len(),
        chain.byte_len(),
        chain.total_length(),
        DescriptorChain::MODE,
        DescriptorChain::MODE.bits(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_reference_transfer() {
        let chain = DescriptorChain::build(0x8800_0000, 70_000).unwrap();
        let mut out = Vec::new();
        print_chain(&mut out, &chain).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "     0 +0x0000  attr=0x21 TRAN V-- len=65532 addr=0x88000000",
                "     1 +0x0008  attr=0x23 TRAN VE- len= 4468 addr=0x8800fffc",
                "  2 descriptor(s), 16 table bytes, 70000 data bytes, mode Adma2 (DMASEL=0b10)",
            ]
        );
    }
}
