//! Image file backing sink

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use spinor_core::backing::Backing;
use spinor_core::Error;

use crate::error::{AppError, Result};

/// Flash array persisted in a raw image file
///
/// The file must be at least as large as the part. Bytes past the end of
/// the part are left alone.
pub struct FileBacking {
    file: File,
    path: PathBuf,
    read_only: bool,
}

impl FileBacking {
    /// Open an image for a part of `capacity` bytes
    pub fn open(path: &Path, capacity: u32, read_only: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(!read_only)
            .open(path)
            .map_err(AppError::io(path))?;
        let size = file.metadata().map_err(AppError::io(path))?.len();
        if size < u64::from(capacity) {
            return Err(AppError::ImageTooSmall {
                path: path.to_owned(),
                size,
                capacity,
            });
        }
        log::info!(
            "Using image {}{}",
            path.display(),
            if read_only { " (read-only)" } else { "" }
        );
        Ok(Self {
            file,
            path: path.to_owned(),
            read_only,
        })
    }
}

impl Backing for FileBacking {
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn read_page(&mut self, offset: u32, buf: &mut [u8]) -> spinor_core::Result<()> {
        self.file
            .seek(SeekFrom::Start(offset.into()))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|e| {
                log::error!("{}: read at 0x{:08X} failed: {}", self.path.display(), offset, e);
                Error::ReadError
            })
    }

    fn write_page(&mut self, offset: u32, data: &[u8]) -> spinor_core::Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        self.file
            .seek(SeekFrom::Start(offset.into()))
            .and_then(|_| self.file.write_all(data))
            .map_err(|e| {
                log::error!("{}: write at 0x{:08X} failed: {}", self.path.display(), offset, e);
                Error::WriteError
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinor_core::flash::Flash;
    use spinor_core::part::find_part;

    fn temp_image(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("spinor-{}-{}.bin", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_rejects_short_image() {
        let path = temp_image("short", &[0xFF; 1024]);
        let result = FileBacking::open(&path, 64 * 1024, false);
        assert!(matches!(result, Err(AppError::ImageTooSmall { size: 1024, .. })));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_device_round_trip() {
        let part = find_part("sst25wf512").unwrap();
        let mut image = vec![0xFF; part.capacity() as usize];
        image[0x10] = 0x42;
        let path = temp_image("rw", &image);

        let backing = FileBacking::open(&path, part.capacity(), false).unwrap();
        let mut flash = Flash::with_backing(part, backing).unwrap();
        assert_eq!(flash.data()[0x10], 0x42);

        flash.select(true);
        flash.transfer(0x06, 8);
        flash.select(false);
        flash.select(true);
        for byte in [0x02, 0x00, 0x01, 0x00, 0x5A] {
            flash.transfer(byte, 8);
        }
        flash.select(false);
        drop(flash);

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written[0x100], 0x5A);
        assert_eq!(written[0x10], 0x42);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_only_image_untouched() {
        let part = find_part("sst25wf512").unwrap();
        let path = temp_image("ro", &vec![0x00; part.capacity() as usize]);

        let backing = FileBacking::open(&path, part.capacity(), true).unwrap();
        let mut flash = Flash::with_backing(part, backing).unwrap();
        for frame in [&[0x06][..], &[0xC7][..]] {
            flash.select(true);
            for &byte in frame {
                flash.transfer(byte, 8);
            }
            flash.select(false);
        }
        assert!(flash.data().iter().all(|&b| b == 0xFF));
        drop(flash);

        assert!(std::fs::read(&path).unwrap().iter().all(|&b| b == 0x00));
        std::fs::remove_file(&path).unwrap();
    }
}
