//! Per-unit data path

use log::{debug, trace};

use super::device::{Flash, State};
use crate::backing::Backing;
use crate::error::ProtocolWarning;

/// Mask of the low `bits` bits of a unit
const fn unit_mask(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

impl<B: Backing> Flash<'_, B> {
    /// Exchange one bus unit
    ///
    /// `unit_bits` is the width of the unit in bits: 1, 2, 4 or 8, with 0
    /// meaning 8. Sub-byte units carry their payload in the low bits of
    /// `tx` and the return value. Outside data phases every unit is a byte.
    pub fn transfer(&mut self, tx: u8, unit_bits: u8) -> u8 {
        let bits = self.unit_width(unit_bits);
        match self.state {
            State::Idle => {
                self.decode(tx);
                0
            }
            State::CollectingParams => {
                self.collect(tx);
                0
            }
            State::StreamingResponse => self.stream_response(),
            State::PageProgram => {
                self.program_unit(tx, bits);
                0
            }
            State::Read => self.read_unit(bits),
            State::DummyWait => {
                self.dummy_unit();
                0
            }
        }
    }

    fn unit_width(&mut self, unit_bits: u8) -> u8 {
        let bits = if unit_bits == 0 { 8 } else { unit_bits };
        let valid = matches!(bits, 1 | 2 | 4 | 8);
        if !valid || (bits != 8 && !self.state.is_data_phase()) {
            self.warn(ProtocolWarning::UnexpectedUnitWidth { bits: unit_bits });
            return 8;
        }
        bits
    }

    /// Move a unit that would straddle a byte boundary to the next aligned
    /// position
    fn align_unit(&mut self, bits: u8) {
        if self.cursor.straddles(bits) {
            self.warn(ProtocolWarning::MisalignedUnit {
                bit_offset: self.cursor.bit_offset(),
                bits,
            });
            self.cursor.align_up(bits, self.storage.capacity());
        }
    }

    fn stream_response(&mut self) -> u8 {
        let (byte, exhausted) = self.response.next_byte();
        if exhausted && !self.response.cyclic {
            self.state = State::Idle;
        }
        byte
    }

    fn read_unit(&mut self, bits: u8) -> u8 {
        self.align_unit(bits);
        let addr = self.cursor.byte();
        let shift = 8 - self.cursor.bit_offset() - bits;
        let value = (self.storage.byte(addr) >> shift) & unit_mask(bits);
        trace!("{}: read 0x{:08X}.{} = {:#x}", self.part.name(), addr, shift, value);
        self.cursor.advance(bits, self.storage.capacity());
        value
    }

    fn program_unit(&mut self, tx: u8, bits: u8) {
        self.align_unit(bits);
        if self.discard_program {
            self.cursor.advance(bits, self.storage.capacity());
            return;
        }

        let addr = self.cursor.byte();
        let shift = 8 - self.cursor.bit_offset() - bits;
        let mask = unit_mask(bits) << shift;
        let data = (tx & unit_mask(bits)) << shift;
        let prev = self.storage.byte(addr);

        if (prev ^ data) & data & mask != 0 {
            debug!(
                "{}: programming zero to one at 0x{:08X}: {:#04x} -> {:#04x}",
                self.part.name(),
                addr,
                prev,
                data
            );
            self.record(ProtocolWarning::ZeroToOne { addr, prev, data });
        }

        let next = if self.part.quirks.overwrites() {
            (prev & !mask) | data
        } else {
            prev & (data | !mask)
        };
        trace!("{}: program 0x{:08X} = {:#04x}", self.part.name(), addr, next);
        self.storage.program(addr, next);
        self.cursor.advance(bits, self.storage.capacity());
    }

    fn dummy_unit(&mut self) {
        self.dummy_remaining = self.dummy_remaining.saturating_sub(1);
        trace!("{}: dummy, {} left", self.part.name(), self.dummy_remaining);
        if self.dummy_remaining == 0 {
            self.finish_dummy_wait();
        }
    }
}
