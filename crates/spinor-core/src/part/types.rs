//! Flash part type definitions

use alloc::borrow::Cow;
use heapless::Vec;

use super::quirks::{EraseCaps, Quirks};
use crate::error::{PartError, Result};

/// Vendor family of a part, derived from its JEDEC manufacturer byte
///
/// Vendors disagree on a handful of protocol details; the family selects
/// which variant the emulated chip follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorFamily {
    /// Micron / Numonyx / ST
    Numonyx,
    /// Winbond
    Winbond,
    /// Spansion / Cypress
    Spansion,
    /// Everyone else
    Generic,
}

impl VendorFamily {
    /// Determine the family from a JEDEC manufacturer ID
    pub const fn from_manufacturer(id: u8) -> Self {
        match id {
            manufacturer::NUMONYX => Self::Numonyx,
            manufacturer::WINBOND => Self::Winbond,
            manufacturer::SPANSION => Self::Spansion,
            _ => Self::Generic,
        }
    }

    /// Parameter bytes (address plus mode/dummy bytes) of a Dual I/O read
    /// (0xBB) issued with a 3-byte address
    pub const fn dual_io_params(&self) -> u8 {
        match self {
            Self::Winbond | Self::Spansion => 4,
            Self::Numonyx | Self::Generic => 5,
        }
    }

    /// Parameter bytes (address plus mode/dummy bytes) of a Quad I/O read
    /// (0xEB) issued with a 3-byte address
    pub const fn quad_io_params(&self) -> u8 {
        match self {
            Self::Winbond | Self::Spansion => 6,
            Self::Numonyx | Self::Generic => 8,
        }
    }

    /// Returns true if the volatile configuration registers are derived from
    /// the nonvolatile one at reset
    pub const fn derives_volatile_config(&self) -> bool {
        matches!(self, Self::Numonyx)
    }

    /// Returns true if the bank register (BRWR/BRRD), rather than the
    /// extended address register, supplies the high address bits in 3-byte
    /// mode
    pub const fn uses_bank_register(&self) -> bool {
        matches!(self, Self::Spansion)
    }

    /// Human readable family name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Numonyx => "Micron/Numonyx",
            Self::Winbond => "Winbond",
            Self::Spansion => "Spansion",
            Self::Generic => "generic",
        }
    }
}

/// Static description of an emulated flash part
///
/// Immutable and shared by every device instance of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDescriptor {
    /// Part name (e.g., "n25q128a13")
    pub name: Cow<'static, str>,
    /// 24-bit JEDEC ID: manufacturer, memory type, capacity
    pub jedec_id: u32,
    /// Extended JEDEC ID appended to the RDID response when non-zero
    pub ext_jedec_id: u16,
    /// Manufacturer ID returned by the legacy ID commands (0x90/0xAB)
    pub vendor_id: u8,
    /// Device ID returned by the legacy ID commands (0x90/0xAB)
    pub device_id: u8,
    /// Page size in bytes (program and dirty-tracking granularity)
    pub page_size: u32,
    /// Size erased by the sector erase command (0xD8)
    pub sector_size: u32,
    /// Number of sectors
    pub sector_count: u32,
    /// Advertised erase granularities
    pub erase: EraseCaps,
    /// Protocol quirks
    pub quirks: Quirks,
}

impl PartDescriptor {
    /// Create a descriptor with a 256-byte page and no legacy ID bytes
    pub const fn new(
        name: &'static str,
        jedec_id: u32,
        ext_jedec_id: u16,
        sector_size: u32,
        sector_count: u32,
        erase: EraseCaps,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            jedec_id,
            ext_jedec_id,
            vendor_id: 0,
            device_id: 0,
            page_size: 256,
            sector_size,
            sector_count,
            erase,
            quirks: Quirks::empty(),
        }
    }

    /// Set the legacy manufacturer/device ID bytes
    pub const fn with_legacy_id(mut self, vendor_id: u8, device_id: u8) -> Self {
        self.vendor_id = vendor_id;
        self.device_id = device_id;
        self
    }

    /// Set the protocol quirks
    pub const fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Get the part name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// JEDEC manufacturer byte
    pub const fn manufacturer(&self) -> u8 {
        (self.jedec_id >> 16) as u8
    }

    /// Vendor name derived from the manufacturer byte
    pub const fn vendor(&self) -> &'static str {
        manufacturer::name(self.manufacturer())
    }

    /// Vendor family derived from the manufacturer byte
    pub const fn family(&self) -> VendorFamily {
        VendorFamily::from_manufacturer(self.manufacturer())
    }

    /// Total size in bytes
    ///
    /// Only meaningful for validated descriptors; saturates otherwise.
    pub const fn capacity(&self) -> u32 {
        self.sector_size.saturating_mul(self.sector_count)
    }

    /// Number of pages
    pub const fn page_count(&self) -> u32 {
        self.capacity() / self.page_size
    }

    /// Check if this part needs more than a 3-byte address
    pub const fn requires_4byte_addr(&self) -> bool {
        self.capacity() > crate::spi::AddressWidth::ThreeByte.max_size()
    }

    /// Check if this part matches the given JEDEC ID
    ///
    /// An `ext` of `None` matches any extended ID.
    pub fn matches_jedec(&self, jedec_id: u32, ext: Option<u16>) -> bool {
        self.jedec_id == jedec_id && ext.is_none_or(|e| e == self.ext_jedec_id)
    }

    /// RDID response: JEDEC ID big-endian, followed by the extended ID
    /// big-endian when it is non-zero
    pub fn jedec_bytes(&self) -> Vec<u8, 5> {
        let mut out = Vec::new();
        let bytes = [
            (self.jedec_id >> 16) as u8,
            (self.jedec_id >> 8) as u8,
            self.jedec_id as u8,
            (self.ext_jedec_id >> 8) as u8,
            self.ext_jedec_id as u8,
        ];
        let len = if self.ext_jedec_id != 0 { 5 } else { 3 };
        // Capacity is 5, so this cannot fail
        let _ = out.extend_from_slice(&bytes[..len]);
        out
    }

    /// Reject descriptors that cannot back a device
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PartError::ZeroPageSize.into());
        }
        if self.sector_size == 0 {
            return Err(PartError::ZeroSectorSize.into());
        }
        if self.sector_count == 0 {
            return Err(PartError::ZeroSectorCount.into());
        }
        if self.sector_size.checked_mul(self.sector_count).is_none() {
            return Err(PartError::CapacityOverflow.into());
        }
        if self.sector_size % self.page_size != 0 {
            return Err(PartError::SectorNotPageMultiple.into());
        }
        Ok(())
    }
}

/// JEDEC manufacturer IDs
pub mod manufacturer {
    /// AMD/Spansion
    pub const SPANSION: u8 = 0x01;
    /// Atmel
    pub const ATMEL: u8 = 0x1F;
    /// EON
    pub const EON: u8 = 0x1C;
    /// GigaDevice
    pub const GIGADEVICE: u8 = 0xC8;
    /// Intel
    pub const INTEL: u8 = 0x89;
    /// Macronix
    pub const MACRONIX: u8 = 0xC2;
    /// Micron / Numonyx / ST
    pub const NUMONYX: u8 = 0x20;
    /// SST
    pub const SST: u8 = 0xBF;
    /// Winbond
    pub const WINBOND: u8 = 0xEF;

    /// Vendor name for a manufacturer ID
    pub const fn name(id: u8) -> &'static str {
        match id {
            SPANSION => "Spansion",
            ATMEL => "Atmel",
            EON => "EON",
            GIGADEVICE => "GigaDevice",
            INTEL => "Intel",
            MACRONIX => "Macronix",
            NUMONYX => "Micron",
            SST => "SST",
            WINBOND => "Winbond",
            _ => "Unknown",
        }
    }
}
