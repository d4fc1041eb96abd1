//! Script replay

use std::fs;
use std::path::Path;

use spinor_core::backing::Backing;
use spinor_core::flash::Flash;
use spinor_core::part::{PartDatabase, PartDescriptor};

use crate::backing::FileBacking;
use crate::cli::RunArgs;
use crate::config::{DeviceConfig, DeviceFile};
use crate::error::{AppError, Result};
use crate::script::{self, Frame};

/// Attach a device as configured and replay the script against it
pub fn run_script(db: &PartDatabase, args: &RunArgs) -> Result<()> {
    let file = args.config.as_deref().map(DeviceFile::load).transpose()?;
    let cfg = DeviceConfig::resolve(file, args)?;
    let part = db
        .find(&cfg.part)
        .ok_or_else(|| AppError::UnknownPart(cfg.part.clone()))?;

    let text = fs::read_to_string(&args.script).map_err(AppError::io(&args.script))?;
    let frames = script::parse(&text)?;
    log::info!(
        "Replaying {} frames from {} on {}",
        frames.len(),
        args.script.display(),
        part.name()
    );

    match &cfg.image {
        Some(path) => {
            let backing = FileBacking::open(path, part.capacity(), cfg.read_only)?;
            let flash = Flash::with_backing(part, backing)?.with_nonvolatile_cfg(cfg.nvcfg);
            drive(flash, &frames, args)
        }
        None => {
            let flash = attach_memory(part, cfg.nvcfg)?;
            drive(flash, &frames, args)
        }
    }
}

fn attach_memory(part: &PartDescriptor, nvcfg: u16) -> Result<Flash<'_>> {
    Ok(Flash::new(part)?.with_nonvolatile_cfg(nvcfg))
}

fn drive<B: Backing>(mut flash: Flash<'_, B>, frames: &[Frame], args: &RunArgs) -> Result<()> {
    if let Some(path) = &args.load_snapshot {
        let blob = fs::read(path).map_err(AppError::io(path))?;
        flash.restore(&blob)?;
        log::info!("Restored snapshot {}", path.display());
    }

    for frame in frames {
        let received = script::play(&mut flash, frame);
        if !received.is_empty() {
            println!("{:>4}: {}", frame.line, hex(&received));
        }
    }

    let warnings: Vec<_> = flash.warnings().collect();
    if !warnings.is_empty() {
        println!();
        println!("Protocol warnings (most recent {}):", warnings.len());
        for warning in warnings {
            println!("  {}", warning);
        }
    }

    if let Some(path) = &args.save_snapshot {
        save_snapshot(&mut flash, path)?;
    }
    flash.flush();
    Ok(())
}

fn save_snapshot<B: Backing>(flash: &mut Flash<'_, B>, path: &Path) -> Result<()> {
    let blob = flash.snapshot()?;
    fs::write(path, &blob).map_err(AppError::io(path))?;
    log::info!("Saved {} byte snapshot to {}", blob.len(), path.display());
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
