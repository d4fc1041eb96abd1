//! Storage buffer, dirty page tracking and the bit-granular cursor

use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::backing::Backing;
use crate::error::Result;
use crate::part::PartDescriptor;

/// Value of an erased cell
pub const ERASED: u8 = 0xFF;

/// Position in the array, counted in bits from the start of the array
///
/// Bit 0 of the cursor is the most significant bit of byte 0: sub-byte
/// units are transferred MSB first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitCursor(u64);

impl BitCursor {
    /// Cursor at the first bit of byte `addr`
    pub const fn from_byte(addr: u32) -> Self {
        Self((addr as u64) << 3)
    }

    /// Raw position in bits
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Byte the cursor points into
    pub const fn byte(&self) -> u32 {
        (self.0 >> 3) as u32
    }

    /// Offset in bits from the MSB of the current byte
    pub const fn bit_offset(&self) -> u8 {
        (self.0 & 0x7) as u8
    }

    /// Returns true if a `width`-bit unit at the cursor would cross into the
    /// next byte
    pub const fn straddles(&self, width: u8) -> bool {
        self.bit_offset() + width > 8
    }

    /// Move forward by `width` bits, wrapping at `capacity` bytes
    pub fn advance(&mut self, width: u8, capacity: u32) {
        self.0 = (self.0 + width as u64) % ((capacity as u64) << 3);
    }

    /// Round up to the next multiple of `width` bits, wrapping at `capacity`
    /// bytes
    pub fn align_up(&mut self, width: u8, capacity: u32) {
        let width = width as u64;
        self.0 = self.0.div_ceil(width) * width % ((capacity as u64) << 3);
    }
}

/// Byte array holding the chip contents
pub struct Storage<B> {
    data: Vec<u8>,
    page_size: u32,
    dirty_page: Option<u32>,
    backing: B,
}

impl<B: Backing> Storage<B> {
    /// Allocate the array for `part`, seeding it from `backing` when a
    /// medium is attached
    pub fn attach(part: &PartDescriptor, mut backing: B) -> Result<Self> {
        let mut data = vec![ERASED; part.capacity() as usize];
        if backing.is_attached() {
            log::debug!("{}: loading {} bytes from backing", part.name(), data.len());
            backing.read_page(0, &mut data)?;
        } else {
            log::debug!("{}: no backing, array lives in RAM", part.name());
        }
        Ok(Self {
            data,
            page_size: part.page_size,
            dirty_page: None,
            backing,
        })
    }

    /// Array contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Array size in bytes
    pub fn capacity(&self) -> u32 {
        self.data.len() as u32
    }

    /// Read one byte
    pub fn byte(&self, addr: u32) -> u8 {
        self.data[addr as usize]
    }

    /// Page index currently marked dirty
    pub fn dirty_page(&self) -> Option<u32> {
        self.dirty_page
    }

    /// Store one byte and mark its page dirty
    ///
    /// A different page that was dirty is flushed first.
    pub fn program(&mut self, addr: u32, value: u8) {
        self.data[addr as usize] = value;
        let page = addr / self.page_size;
        if self.dirty_page.is_some_and(|p| p != page) {
            self.flush();
        }
        self.dirty_page = Some(page);
    }

    /// Write the dirty page (if any) to the backing sink
    pub fn flush(&mut self) {
        if let Some(page) = self.dirty_page.take() {
            let offset = page * self.page_size;
            self.sync(offset, self.page_size);
        }
    }

    /// Fill `len` bytes at `offset` with the erased value and sync the area
    ///
    /// The range is clamped to the array.
    pub fn erase(&mut self, offset: u32, len: u32) {
        let start = offset.min(self.capacity());
        let end = offset.saturating_add(len).min(self.capacity());
        self.data[start as usize..end as usize].fill(ERASED);
        self.sync(start, end - start);
    }

    fn sync(&mut self, offset: u32, len: u32) {
        if len == 0 || !self.backing.is_attached() || self.backing.is_read_only() {
            return;
        }
        let chunk = &self.data[offset as usize..(offset + len) as usize];
        log::trace!("sync 0x{:08X}+0x{:X}", offset, len);
        if let Err(e) = self.backing.write_page(offset, chunk) {
            log::warn!("backing write at 0x{:08X} failed: {}", offset, e);
        }
    }

    /// Overwrite the start of the array without touching the backing sink
    pub(crate) fn preload(&mut self, data: &[u8]) {
        let len = data.len().min(self.data.len());
        self.data[..len].copy_from_slice(&data[..len]);
    }

    /// Replace the array contents and dirty marker (snapshot restore)
    ///
    /// The whole array is written to the backing sink so the medium matches
    /// the restored contents.
    pub(crate) fn restore(&mut self, data: &[u8], dirty_page: Option<u32>) {
        self.data.copy_from_slice(data);
        self.dirty_page = dirty_page;
        self.sync(0, self.capacity());
    }

    /// Backing sink
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Mutable backing sink
    pub fn backing_mut(&mut self) -> &mut B {
        &mut self.backing
    }

    /// Flush and hand back the backing sink
    pub fn into_backing(mut self) -> B {
        self.flush();
        self.backing
    }
}
