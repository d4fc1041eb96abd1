//! Address width types

/// Size of the window reachable with a 3-byte address
pub const MAX_3BYTE_SIZE: u32 = 16 * 1024 * 1024;

/// Address width for SPI commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// No address phase
    #[default]
    None,
    /// 3-byte (24-bit) address - supports up to 16 MiB
    ThreeByte,
    /// 4-byte (32-bit) address - supports up to 4 GiB
    FourByte,
}

impl AddressWidth {
    /// Returns the number of address bytes
    pub const fn bytes(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::ThreeByte => 3,
            Self::FourByte => 4,
        }
    }

    /// Returns the maximum addressable size in bytes
    pub const fn max_size(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::ThreeByte => MAX_3BYTE_SIZE,
            Self::FourByte => u32::MAX,
        }
    }

    /// Encode an address into bytes, most significant first
    pub fn encode(&self, address: u32, buf: &mut [u8]) {
        match self {
            Self::None => {}
            Self::ThreeByte => {
                buf[0] = (address >> 16) as u8;
                buf[1] = (address >> 8) as u8;
                buf[2] = address as u8;
            }
            Self::FourByte => {
                buf[0] = (address >> 24) as u8;
                buf[1] = (address >> 16) as u8;
                buf[2] = (address >> 8) as u8;
                buf[3] = address as u8;
            }
        }
    }

    /// Assemble an address from the leading bytes of `buf`, most significant first
    ///
    /// Missing bytes (short buffer) are treated as zero.
    pub fn decode(&self, buf: &[u8]) -> u32 {
        (0..self.bytes() as usize).fold(0u32, |acc, i| {
            (acc << 8) | buf.get(i).copied().unwrap_or(0) as u32
        })
    }
}
