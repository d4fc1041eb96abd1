//! Backing sink for the storage array
//!
//! A device keeps its whole array in memory. The backing sink seeds that
//! buffer when the device is attached and receives dirty pages and erased
//! areas as they are evicted. Flushes are fire-and-forget: a failing
//! `write_page` is logged by the device and otherwise ignored.

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Persistent medium behind an emulated flash array
pub trait Backing {
    /// Returns false if there is no medium at all
    ///
    /// A device without a medium starts out fully erased and never flushes.
    fn is_attached(&self) -> bool {
        true
    }

    /// Returns true if writes must not reach the medium
    fn is_read_only(&self) -> bool {
        false
    }

    /// Fill `buf` with the medium's contents starting at `offset`
    fn read_page(&mut self, offset: u32, buf: &mut [u8]) -> Result<()>;

    /// Store `data` at `offset`
    fn write_page(&mut self, offset: u32, data: &[u8]) -> Result<()>;
}

impl<B: Backing + ?Sized> Backing for &mut B {
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }

    fn read_page(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read_page(offset, buf)
    }

    fn write_page(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        (**self).write_page(offset, data)
    }
}

/// No medium: the array lives in RAM only
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBacking;

impl Backing for NoBacking {
    fn is_attached(&self) -> bool {
        false
    }

    fn read_page(&mut self, _offset: u32, _buf: &mut [u8]) -> Result<()> {
        Err(Error::ReadError)
    }

    fn write_page(&mut self, _offset: u32, _data: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// In-memory medium that records every write it receives
#[derive(Debug, Clone, Default)]
pub struct MemoryBacking {
    image: Vec<u8>,
    writes: Vec<(u32, usize)>,
    read_only: bool,
}

impl MemoryBacking {
    /// Create a medium holding `image`
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            writes: Vec::new(),
            read_only: false,
        }
    }

    /// Mark the medium read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Current medium contents
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// `(offset, length)` of every write received so far
    pub fn writes(&self) -> &[(u32, usize)] {
        &self.writes
    }
}

impl Backing for MemoryBacking {
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn read_page(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        let start = offset as usize;
        let src = self
            .image
            .get(start..start + buf.len())
            .ok_or(Error::ReadError)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write_page(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        let start = offset as usize;
        let dst = self
            .image
            .get_mut(start..start + data.len())
            .ok_or(Error::WriteError)?;
        dst.copy_from_slice(data);
        self.writes.push((offset, data.len()));
        Ok(())
    }
}
