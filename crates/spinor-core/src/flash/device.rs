//! Emulated flash device

use heapless::{HistoryBuffer, Vec};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::registers::{Registers, NVCFG_DEFAULT};
use super::storage::{BitCursor, Storage};
use crate::backing::{Backing, NoBacking};
use crate::error::{ProtocolWarning, Result};
use crate::part::{PartDescriptor, VendorFamily};
use crate::spi::{opcodes, BusWidth};

/// Largest parameter count of any command (quad I/O read, 4-byte opcode)
pub(crate) const MAX_PARAMS: usize = 16;

/// Longest response (JEDEC ID with extended bytes)
pub(crate) const MAX_RESPONSE: usize = 8;

/// Number of protocol warnings kept per device
pub const WARNING_HISTORY: usize = 32;

/// Phase of the command state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Waiting for an opcode
    #[default]
    Idle,
    /// Programming data units at the cursor
    PageProgram,
    /// Streaming array contents from the cursor
    Read,
    /// Accumulating parameter bytes
    CollectingParams,
    /// Streaming the response buffer
    StreamingResponse,
    /// Consuming dummy units before a read
    DummyWait,
}

impl State {
    /// Returns true in states that accept sub-byte units
    pub const fn is_data_phase(&self) -> bool {
        matches!(self, Self::PageProgram | Self::Read | Self::DummyWait)
    }
}

/// Response buffer of register and ID reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Response {
    pub(crate) bytes: Vec<u8, MAX_RESPONSE>,
    pub(crate) pos: u8,
    pub(crate) cyclic: bool,
}

impl Response {
    pub(crate) fn load(&mut self, bytes: &[u8], cyclic: bool) {
        self.bytes.clear();
        // Responses are at most 5 bytes
        let _ = self.bytes.extend_from_slice(bytes);
        self.pos = 0;
        self.cyclic = cyclic;
    }

    /// Next byte, and whether the buffer was exhausted by it
    pub(crate) fn next_byte(&mut self) -> (u8, bool) {
        let Some(&byte) = self.bytes.get(self.pos as usize) else {
            self.pos = 0;
            return (0, true);
        };
        self.pos += 1;
        if self.pos as usize == self.bytes.len() {
            self.pos = 0;
            (byte, true)
        } else {
            (byte, false)
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
        self.pos = 0;
        self.cyclic = false;
    }
}

/// Command-level model of one SPI NOR flash chip
///
/// The device is driven one bus unit at a time through [`Flash::transfer`],
/// framed by [`Flash::select`]. It never fails once constructed: host
/// mistakes are logged and recorded as [`ProtocolWarning`]s, and the array
/// is flushed to the backing sink on a best-effort basis.
pub struct Flash<'p, B = NoBacking> {
    pub(super) part: &'p PartDescriptor,
    pub(super) family: VendorFamily,
    pub(super) storage: Storage<B>,
    pub(super) regs: Registers,
    pub(super) state: State,
    /// Opcode of the command in flight
    pub(super) opcode: u8,
    pub(super) command: Option<Command>,
    pub(super) params: Vec<u8, MAX_PARAMS>,
    pub(super) needed: u8,
    /// Leading parameter bytes that form the address
    pub(super) addr_len: u8,
    pub(super) cursor: BitCursor,
    pub(super) response: Response,
    pub(super) bus: BusWidth,
    pub(super) dummy_remaining: u32,
    /// Program data of the current command is dropped (write enable was clear)
    pub(super) discard_program: bool,
    warnings: HistoryBuffer<ProtocolWarning, WARNING_HISTORY>,
}

impl<'p> Flash<'p, NoBacking> {
    /// Create a device whose array lives in RAM, fully erased
    pub fn new(part: &'p PartDescriptor) -> Result<Self> {
        Self::with_backing(part, NoBacking)
    }

    /// Create a RAM-only device pre-filled with `initial`
    ///
    /// Data beyond the device capacity is ignored.
    pub fn with_data(part: &'p PartDescriptor, initial: &[u8]) -> Result<Self> {
        let mut flash = Self::new(part)?;
        flash.storage.preload(initial);
        Ok(flash)
    }
}

impl<'p, B: Backing> Flash<'p, B> {
    /// Attach a device to a backing sink
    ///
    /// The part descriptor is validated and the array is seeded from the
    /// sink when one is attached.
    pub fn with_backing(part: &'p PartDescriptor, backing: B) -> Result<Self> {
        part.validate()?;
        let storage = Storage::attach(part, backing)?;

        let mut flash = Self {
            part,
            family: part.family(),
            storage,
            regs: Registers::new(NVCFG_DEFAULT),
            state: State::Idle,
            opcode: opcodes::NOP,
            command: None,
            params: Vec::new(),
            needed: 0,
            addr_len: 0,
            cursor: BitCursor::default(),
            response: Response::default(),
            bus: BusWidth::Single,
            dummy_remaining: 0,
            discard_program: false,
            warnings: HistoryBuffer::new(),
        };
        flash.reset();

        debug!(
            "{}: attached, {} bytes, {} family",
            part.name(),
            part.capacity(),
            flash.family.name()
        );
        Ok(flash)
    }

    /// Set the nonvolatile configuration register and power-cycle
    pub fn with_nonvolatile_cfg(mut self, nvcfg: u16) -> Self {
        self.regs.nvcfg = nvcfg;
        self.reset();
        self
    }

    /// Part being emulated
    pub fn part(&self) -> &'p PartDescriptor {
        self.part
    }

    /// Current state machine phase
    pub fn state(&self) -> State {
        self.state
    }

    /// Register file
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Current bus width
    pub fn bus_width(&self) -> BusWidth {
        self.bus
    }

    /// Array contents
    pub fn data(&self) -> &[u8] {
        self.storage.data()
    }

    /// Page index waiting to be flushed
    pub fn dirty_page(&self) -> Option<u32> {
        self.storage.dirty_page()
    }

    /// Backing sink
    pub fn backing(&self) -> &B {
        self.storage.backing()
    }

    /// Mutable backing sink
    pub fn backing_mut(&mut self) -> &mut B {
        self.storage.backing_mut()
    }

    /// Flush the dirty page and detach from the backing sink
    pub fn into_backing(self) -> B {
        self.storage.into_backing()
    }

    /// Write the dirty page to the backing sink
    pub fn flush(&mut self) {
        self.storage.flush();
    }

    /// Recorded protocol warnings, oldest first
    ///
    /// Only the most recent [`WARNING_HISTORY`] are kept.
    pub fn warnings(&self) -> impl Iterator<Item = &ProtocolWarning> + '_ {
        self.warnings.oldest_ordered()
    }

    /// Forget recorded protocol warnings
    pub fn clear_warnings(&mut self) {
        self.warnings = HistoryBuffer::new();
    }

    /// Dummy units a read entering its dummy phase now would wait for
    ///
    /// Numonyx parts take the count from the volatile configuration
    /// register; everyone else waits one unit per active data line.
    pub fn dummy_units(&self) -> u32 {
        if self.family.derives_volatile_config() {
            if let Some(clocks) = self.regs.dummy_clocks() {
                return clocks.into();
            }
        }
        self.bus.lines().into()
    }

    /// Power-on reset
    ///
    /// Drops any command in flight and returns every volatile register to
    /// its default. Array contents and the bus width are untouched.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.opcode = opcodes::NOP;
        self.command = None;
        self.params.clear();
        self.needed = 0;
        self.addr_len = 0;
        self.cursor = BitCursor::default();
        self.response.clear();
        self.dummy_remaining = 0;
        self.discard_program = false;
        self.regs.power_on(self.family);
        debug!("{}: reset done", self.part.name());
    }

    /// Chip-select edge
    ///
    /// Either edge aborts decoding and parameter collection; deassertion
    /// also flushes the dirty page. Registers are kept.
    pub fn select(&mut self, asserted: bool) {
        debug!("{}: {}select", self.part.name(), if asserted { "" } else { "de" });
        self.state = State::Idle;
        self.params.clear();
        self.response.clear();
        self.dummy_remaining = 0;
        self.discard_program = false;
        if !asserted {
            self.storage.flush();
        }
    }

    /// Change the number of data lines
    ///
    /// An outstanding dummy wait is rescaled so that it spans the same
    /// number of bits at the new width, rounded up.
    pub fn set_bus_width(&mut self, lines: u8) {
        let Some(width) = BusWidth::from_lines(lines) else {
            self.warn(ProtocolWarning::InvalidBusWidth { lines });
            return;
        };
        if width == self.bus {
            return;
        }
        debug!(
            "{}: data lines {} -> {}",
            self.part.name(),
            self.bus.lines(),
            width.lines()
        );
        if self.state == State::DummyWait && self.dummy_remaining > 0 {
            let bits = self.dummy_remaining * u32::from(self.bus.lines());
            self.dummy_remaining = bits.div_ceil(width.lines().into()).max(1);
        }
        self.bus = width;
    }

    /// Log and record a protocol warning
    pub(super) fn warn(&mut self, warning: ProtocolWarning) {
        warn!("{}: {}", self.part.name(), warning);
        self.warnings.write(warning);
    }

    /// Record a protocol warning that was already logged
    pub(super) fn record(&mut self, warning: ProtocolWarning) {
        self.warnings.write(warning);
    }
}
