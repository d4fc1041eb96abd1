//! SPI I/O modes and bus widths

use serde::{Deserialize, Serialize};

/// Number of data lines currently driven on the bus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusWidth {
    /// One line (standard SPI)
    #[default]
    Single,
    /// Two lines
    Dual,
    /// Four lines
    Quad,
}

impl BusWidth {
    /// Map a line count to a bus width
    ///
    /// Zero is treated as a single line, matching controllers that leave the
    /// line count unset. Any other unsupported count yields `None`.
    pub const fn from_lines(lines: u8) -> Option<Self> {
        match lines {
            0 | 1 => Some(Self::Single),
            2 => Some(Self::Dual),
            4 => Some(Self::Quad),
            _ => None,
        }
    }

    /// Number of data lines
    pub const fn lines(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
            Self::Quad => 4,
        }
    }
}

/// I/O mode for SPI transactions
///
/// Represents how the phases of a command are carried on the bus, from
/// single-wire to quad-wire modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IoMode {
    /// Standard SPI: 1-1-1 (cmd, addr, data all on single line)
    #[default]
    Single,
    /// Dual Output: 1-1-2 (data phase on 2 lines)
    DualOut,
    /// Dual I/O: 1-2-2 (addr and data on 2 lines)
    DualIo,
    /// Quad Output: 1-1-4 (data phase on 4 lines)
    QuadOut,
    /// Quad I/O: 1-4-4 (addr and data on 4 lines)
    QuadIo,
}

impl IoMode {
    /// Returns the number of data lines used for the data phase
    pub const fn data_lines(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::DualOut | Self::DualIo => 2,
            Self::QuadOut | Self::QuadIo => 4,
        }
    }

    /// Bus width of the data phase
    pub const fn data_width(&self) -> BusWidth {
        match self {
            Self::Single => BusWidth::Single,
            Self::DualOut | Self::DualIo => BusWidth::Dual,
            Self::QuadOut | Self::QuadIo => BusWidth::Quad,
        }
    }
}
