//! Part information

use spinor_core::flash::Registers;
use spinor_core::part::{EraseCaps, PartDescriptor};

use super::list::format_size;

/// Print a part descriptor and the register file it powers up with
pub fn print_part_info(part: &PartDescriptor, nvcfg: u16) {
    println!("Flash Part Information");
    println!("======================");
    println!();
    println!("Name:            {}", part.name());
    println!("Vendor:          {}", part.vendor());
    println!("Family:          {}", part.family().name());
    println!("JEDEC ID:        {:06X}", part.jedec_id);
    if part.ext_jedec_id != 0 {
        println!("Extended ID:     {:04X}", part.ext_jedec_id);
    }
    if part.vendor_id != 0 || part.device_id != 0 {
        println!("Legacy ID:       {:02X} {:02X}", part.vendor_id, part.device_id);
    }
    println!(
        "Size:            {} bytes ({})",
        part.capacity(),
        format_size(part.capacity())
    );
    println!("Page size:       {} bytes", part.page_size);
    println!(
        "Sectors:         {} x {}",
        part.sector_count,
        format_size(part.sector_size)
    );
    println!("Addressing:      {}", if part.requires_4byte_addr() { "3/4-byte" } else { "3-byte" });

    println!();
    println!("Erase commands:");
    if part.erase.contains(EraseCaps::ERASE_4K) {
        println!("  Opcode 0x20: 4 KiB");
    }
    if part.erase.contains(EraseCaps::ERASE_32K) {
        println!("  Opcode 0x52: 32 KiB");
    }
    println!("  Opcode 0xD8: {}", format_size(part.sector_size));
    println!("  Opcode 0xC7: chip");
    if !part.quirks.is_empty() {
        println!("Quirks:          {:?}", part.quirks);
    }

    let mut regs = Registers::new(nvcfg);
    regs.power_on(part.family());

    println!();
    println!("Power-on registers (NVCR 0x{:04X}):", nvcfg);
    println!("  Status:          0x{:02X}", regs.status_byte());
    println!("  Flag status:     0x{:02X}", regs.flag_status());
    println!("  4-byte mode:     {}", regs.four_byte);
    println!("  Segment:         {}", regs.segment(part.family()));
    if part.family().derives_volatile_config() {
        println!("  VCR:             0x{:02X}", regs.vcfg);
        println!("  EVCR:            0x{:02X}", regs.evcfg);
        match regs.dummy_clocks() {
            Some(n) => println!("  Dummy clocks:    {}", n),
            None => println!("  Dummy clocks:    bus default"),
        }
    }
}
