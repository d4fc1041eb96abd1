//! Status, addressing and configuration registers

use serde::{Deserialize, Serialize};

use crate::part::VendorFamily;
use crate::spi::opcodes::{FSR_4BYTE_ADDR, FSR_READY, SR_WEL, SR_WRITABLE};

/// Power-on value of the nonvolatile configuration register
pub const NVCFG_DEFAULT: u16 = 0x8FFF;

// Nonvolatile configuration register fields
const NVCFG_4BYTE_ADDR: u16 = 1 << 0;
const NVCFG_LOWER_SEGMENT: u16 = 1 << 1;
const NVCFG_DUAL_IO: u16 = 1 << 2;
const NVCFG_QUAD_IO: u16 = 1 << 3;
const NVCFG_XIP_MASK: u16 = 7 << 9;
const NVCFG_XIP_DISABLED: u16 = 7 << 9;
const NVCFG_DUMMY_POS: u16 = 12;

// Volatile configuration register fields
const VCFG_DUMMY: u8 = 0x1;
const VCFG_WRAP_SEQUENTIAL: u8 = 0x2;
const VCFG_XIP_ENABLED: u8 = 1 << 3;
const VCFG_DUMMY_POS: u8 = 4;

// Enhanced volatile configuration register fields
const EVCFG_DRIVER_STRENGTH_DEFAULT: u8 = 7;
const EVCFG_VPP_ACCELERATOR: u8 = 1 << 3;
const EVCFG_RESET_HOLD: u8 = 1 << 4;
const EVCFG_DUAL_IO: u8 = 1 << 6;
const EVCFG_QUAD_IO: u8 = 1 << 7;

const CFG_DUMMY_LEN_MASK: u16 = 0xF;

/// Extended address value selecting the upper 128 Mbit segment
const EAR_UPPER_SEGMENT: u8 = 0x3;

/// Register file of an emulated chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Writable bits of the status register (WIP and WEL are synthesized)
    pub status: u8,
    /// Write enable latch
    pub write_enable: bool,
    /// Persistent 4-byte address mode
    pub four_byte: bool,
    /// Reset enable latch, armed by RSTEN
    pub reset_enable: bool,
    /// Auto address increment program sequence in progress
    pub aai: bool,
    /// Extended address register
    pub ear: u8,
    /// Bank address register
    pub bar: u8,
    /// Nonvolatile configuration register
    pub nvcfg: u16,
    /// Volatile configuration register
    pub vcfg: u8,
    /// Enhanced volatile configuration register
    pub evcfg: u8,
}

impl Registers {
    /// Create a register file holding the given nonvolatile configuration
    ///
    /// Everything else is zero until [`Registers::power_on`] runs.
    pub fn new(nvcfg: u16) -> Self {
        Self {
            status: 0,
            write_enable: false,
            four_byte: false,
            reset_enable: false,
            aai: false,
            ear: 0,
            bar: 0,
            nvcfg,
            vcfg: 0,
            evcfg: 0,
        }
    }

    /// Reset volatile state to power-on defaults
    ///
    /// The nonvolatile configuration register survives. On Numonyx parts the
    /// volatile and enhanced volatile registers, the 4-byte address default
    /// and the initial segment are derived from it.
    pub fn power_on(&mut self, family: VendorFamily) {
        *self = Self {
            status: self.status,
            ..Self::new(self.nvcfg)
        };

        if !family.derives_volatile_config() {
            return;
        }

        let nv = self.nvcfg;

        let mut vcfg = VCFG_DUMMY | VCFG_WRAP_SEQUENTIAL;
        if nv & NVCFG_XIP_MASK != NVCFG_XIP_DISABLED {
            vcfg |= VCFG_XIP_ENABLED;
        }
        vcfg |= (((nv >> NVCFG_DUMMY_POS) & CFG_DUMMY_LEN_MASK) as u8) << VCFG_DUMMY_POS;
        self.vcfg = vcfg;

        let mut evcfg = EVCFG_DRIVER_STRENGTH_DEFAULT | EVCFG_VPP_ACCELERATOR | EVCFG_RESET_HOLD;
        if nv & NVCFG_DUAL_IO != 0 {
            evcfg |= EVCFG_DUAL_IO;
        }
        if nv & NVCFG_QUAD_IO != 0 {
            evcfg |= EVCFG_QUAD_IO;
        }
        self.evcfg = evcfg;

        // Both bits are active low
        if nv & NVCFG_4BYTE_ADDR == 0 {
            self.four_byte = true;
        }
        if nv & NVCFG_LOWER_SEGMENT == 0 {
            self.ear = EAR_UPPER_SEGMENT;
        }
    }

    /// Value returned by RDSR
    pub fn status_byte(&self) -> u8 {
        (self.status & SR_WRITABLE) | if self.write_enable { SR_WEL } else { 0 }
    }

    /// Value returned by RDFSR
    pub fn flag_status(&self) -> u8 {
        FSR_READY | if self.four_byte { FSR_4BYTE_ADDR } else { 0 }
    }

    /// 16 MiB segment added to 3-byte addresses
    pub fn segment(&self, family: VendorFamily) -> u8 {
        if family.uses_bank_register() {
            self.bar & 0x3
        } else {
            self.ear & 0x3
        }
    }

    /// Dummy clock count programmed in the volatile configuration register
    ///
    /// Zero and 15 mean "part default" and yield `None`.
    pub fn dummy_clocks(&self) -> Option<u8> {
        match self.vcfg >> VCFG_DUMMY_POS {
            0 | 0xF => None,
            n => Some(n),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new(NVCFG_DEFAULT)
    }
}
