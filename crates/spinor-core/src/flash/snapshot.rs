//! Checkpoint and restore of a device
//!
//! A snapshot captures everything that influences future bus behavior: the
//! array, the state machine and every register and latch. It is encoded
//! with postcard and carries a format version plus the part name and
//! capacity so that it cannot be restored into a different chip.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use heapless::Vec as BoundedVec;
use log::debug;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::device::{Flash, Response, State, MAX_PARAMS};
use super::registers::Registers;
use super::storage::BitCursor;
use crate::backing::Backing;
use crate::error::{Error, Result};
use crate::spi::BusWidth;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot<'a> {
    version: u16,
    part: Cow<'a, str>,
    capacity: u32,
    data: Cow<'a, [u8]>,
    dirty_page: Option<u32>,
    state: State,
    opcode: u8,
    command: bool,
    params: BoundedVec<u8, MAX_PARAMS>,
    needed: u8,
    addr_len: u8,
    cursor: BitCursor,
    response: Response,
    bus: BusWidth,
    dummy_remaining: u32,
    discard_program: bool,
    registers: Registers,
}

impl<B: Backing> Flash<'_, B> {
    /// Capture the device state as an opaque blob
    ///
    /// The dirty page is flushed to the backing sink first.
    pub fn snapshot(&mut self) -> Result<Vec<u8>> {
        self.storage.flush();
        let snap = Snapshot {
            version: SNAPSHOT_VERSION,
            part: Cow::Borrowed(self.part.name()),
            capacity: self.storage.capacity(),
            data: Cow::Borrowed(self.storage.data()),
            dirty_page: self.storage.dirty_page(),
            state: self.state,
            opcode: self.opcode,
            command: self.command.is_some(),
            params: self.params.clone(),
            needed: self.needed,
            addr_len: self.addr_len,
            cursor: self.cursor,
            response: self.response.clone(),
            bus: self.bus,
            dummy_remaining: self.dummy_remaining,
            discard_program: self.discard_program,
            registers: self.regs.clone(),
        };
        let blob = postcard::to_allocvec(&snap).map_err(|_| Error::SnapshotCorrupt)?;
        debug!("{}: snapshot of {} bytes", self.part.name(), blob.len());
        Ok(blob)
    }

    /// Restore a blob produced by [`Flash::snapshot`]
    ///
    /// The device is left untouched if the blob is rejected. Otherwise the
    /// restored array is written to the backing sink in full.
    pub fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let snap: Snapshot<'_> = postcard::from_bytes(blob).map_err(|_| Error::SnapshotCorrupt)?;

        if snap.version != SNAPSHOT_VERSION
            || snap.part != self.part.name()
            || snap.capacity != self.storage.capacity()
        {
            return Err(Error::SnapshotMismatch);
        }

        let command = if snap.command {
            Some(Command::from_opcode(snap.opcode).ok_or(Error::SnapshotCorrupt)?)
        } else {
            None
        };
        let page_count = self.part.page_count();
        if snap.data.len() != self.storage.capacity() as usize
            || snap.dirty_page.is_some_and(|p| p >= page_count)
            || snap.cursor.byte() >= self.storage.capacity()
            || snap.response.pos as usize > snap.response.bytes.len()
        {
            return Err(Error::SnapshotCorrupt);
        }

        self.storage.restore(&snap.data, snap.dirty_page);
        self.state = snap.state;
        self.opcode = snap.opcode;
        self.command = command;
        self.params = snap.params;
        self.needed = snap.needed;
        self.addr_len = snap.addr_len;
        self.cursor = snap.cursor;
        self.response = snap.response;
        self.bus = snap.bus;
        self.dummy_remaining = snap.dummy_remaining;
        self.discard_program = snap.discard_program;
        self.regs = snap.registers;

        debug!("{}: restored snapshot", self.part.name());
        Ok(())
    }
}
