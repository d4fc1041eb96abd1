//! Part capability and quirk flags

use bitflags::bitflags;

bitflags! {
    /// Erase granularities advertised by a part
    ///
    /// Sector erase (part-specific size) and chip erase are always available.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EraseCaps: u8 {
        /// Has 4KB sector erase (0x20 / 0x21)
        const ERASE_4K  = 1 << 0;
        /// Has 32KB block erase (0x52)
        const ERASE_32K = 1 << 1;
    }
}

bitflags! {
    /// Per-part protocol quirks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Quirks: u8 {
        /// Page program may set bits back to 1 (data overwrites the cell)
        const WRITE_ONES = 1 << 0;
        /// EEPROM with a SPI flash command set: bytes are rewritten in place
        const EEPROM     = Self::WRITE_ONES.bits() | (1 << 1);
    }
}

impl Default for EraseCaps {
    fn default() -> Self {
        EraseCaps::empty()
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::empty()
    }
}

impl Quirks {
    /// Returns true if programmed data replaces the cell contents instead of
    /// being ANDed into them
    pub const fn overwrites(&self) -> bool {
        self.contains(Quirks::WRITE_ONES)
    }
}
