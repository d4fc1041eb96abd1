use alloc::vec;
use alloc::vec::Vec;

use super::*;
use crate::backing::{Backing, MemoryBacking};
use crate::error::{Error, PartError, ProtocolWarning};
use crate::host::{EmulatedMaster, SpiMaster};
use crate::part::{find_part, EraseCaps, PartDescriptor, Quirks, VendorFamily};
use crate::protocol::{self, ConfigRegister, ReadMode};
use crate::spi::{opcodes, AddressWidth, IoMode, SpiCommand};

const THREE: AddressWidth = AddressWidth::ThreeByte;
const FOUR: AddressWidth = AddressWidth::FourByte;

fn part(name: &str) -> &'static PartDescriptor {
    find_part(name).unwrap()
}

/// Clock one chip-select frame of whole bytes and return what came back
fn frame<B: Backing>(flash: &mut Flash<'_, B>, bytes: &[u8]) -> Vec<u8> {
    flash.select(true);
    let out = bytes.iter().map(|&b| flash.transfer(b, 8)).collect();
    flash.select(false);
    out
}

fn has_warning<B: Backing>(flash: &Flash<'_, B>, warning: ProtocolWarning) -> bool {
    flash.warnings().any(|w| *w == warning)
}

#[test]
fn test_jedec_id_matches_descriptor() {
    for name in ["w25q64", "n25q128a13", "s25fl256s1", "sst25wf080"] {
        let p = part(name);
        let mut flash = Flash::new(p).unwrap();
        let out = frame(&mut flash, &[opcodes::RDID, 0, 0, 0, 0, 0]);

        let expected = p.jedec_bytes();
        assert_eq!(&out[1..1 + expected.len()], expected.as_slice(), "{}", name);
        // The response is not cyclic: once exhausted the device is idle again
        assert!(out[1 + expected.len()..].iter().all(|&b| b == 0), "{}", name);
    }

    let mut flash = Flash::new(part("s25fl256s1")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);
    assert_eq!(protocol::read_jedec_id(&mut master).unwrap(), (0x010219, 0x4D01));
}

#[test]
fn test_legacy_id_is_cyclic() {
    let mut flash = Flash::new(part("sst25wf080")).unwrap();
    let out = frame(&mut flash, &[opcodes::RES, 0, 0, 0, 0]);
    assert_eq!(out, [0, 0xBF, 0x05, 0xBF, 0x05]);

    let mut master = EmulatedMaster::new(&mut flash);
    assert_eq!(protocol::read_legacy_id(&mut master).unwrap(), (0xBF, 0x05));
}

#[test]
fn test_status_write_enable_bit() {
    let mut flash = Flash::new(part("w25q64")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    assert_eq!(protocol::read_status(&mut master).unwrap() & opcodes::SR_WEL, 0);
    protocol::write_enable(&mut master).unwrap();
    assert_ne!(protocol::read_status(&mut master).unwrap() & opcodes::SR_WEL, 0);

    // WRSR consumes the latch
    protocol::write_status(&mut master, 0x1C).unwrap();
    let status = protocol::read_status(&mut master).unwrap();
    assert_eq!(status & opcodes::SR_WEL, 0);
    assert_eq!(status, 0x1C);

    protocol::write_enable(&mut master).unwrap();
    protocol::write_disable(&mut master).unwrap();
    assert_eq!(protocol::read_status(&mut master).unwrap() & opcodes::SR_WEL, 0);

    // Status reads repeat for as long as the host clocks
    protocol::write_enable(&mut master).unwrap();
    let out = frame(master.flash_mut(), &[opcodes::RDSR, 0, 0, 0]);
    assert_eq!(out, [0, 0x1E, 0x1E, 0x1E]);
}

#[test]
fn test_mutations_require_write_enable() {
    let p = part("w25q64");
    let mut flash = Flash::with_data(p, &vec![0x00; 0x10000]).unwrap();
    let before = flash.data().to_vec();
    let regs = flash.registers().clone();
    let mut master = EmulatedMaster::new(&mut flash);

    let mut cmd = SpiCommand::write(opcodes::PP, THREE, 0x1000, &[0x00, 0x00]);
    master.execute(&mut cmd).unwrap();
    let mut cmd = SpiCommand::erase(opcodes::SE_20, THREE, 0);
    master.execute(&mut cmd).unwrap();
    let mut cmd = SpiCommand::simple(opcodes::CE_C7);
    master.execute(&mut cmd).unwrap();
    let register_writes: [(u8, &[u8]); 6] = [
        (opcodes::WREAR, &[0x01]),
        (opcodes::WRSR, &[0x1C]),
        (opcodes::BRWR, &[0x81]),
        (opcodes::WRNVCR, &[0xFE, 0x0F]),
        (opcodes::WRVCR, &[0x5B]),
        (opcodes::WREVCR, &[0x1F]),
    ];
    for (opcode, value) in register_writes {
        let mut cmd = SpiCommand::write_reg(opcode, value);
        master.execute(&mut cmd).unwrap();
    }

    assert_eq!(flash.data(), before.as_slice());
    assert_eq!(flash.registers(), &regs);
    let mutations = [opcodes::PP, opcodes::SE_20, opcodes::CE_C7];
    for opcode in mutations.into_iter().chain(register_writes.map(|(op, _)| op)) {
        assert!(
            has_warning(&flash, ProtocolWarning::MissingWriteEnable { opcode }),
            "opcode 0x{:02X}",
            opcode
        );
    }
}

#[test]
fn test_program_round_trip_standard() {
    let mut flash = Flash::with_data(part("w25q64"), &vec![0x00; 0x2000]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);
    let pattern = [0x12, 0x34, 0xF0, 0x0F, 0xAA];

    protocol::erase(&mut master, opcodes::SE_20, THREE, 0x1000).unwrap();
    protocol::page_program(&mut master, IoMode::Single, THREE, 0x1000, &pattern).unwrap();
    let mut buf = [0u8; 5];
    protocol::read(&mut master, THREE, 0x1000, &mut buf).unwrap();
    assert_eq!(buf, pattern);

    // Programming can only clear bits
    protocol::page_program(&mut master, IoMode::Single, THREE, 0x1000, &[0xFF, 0x0F, 0x0F, 0xFF, 0x55])
        .unwrap();
    protocol::read(&mut master, THREE, 0x1000, &mut buf).unwrap();
    assert_eq!(buf, [0x12, 0x04, 0x00, 0x0F, 0x00]);
    assert!(has_warning(
        master.flash(),
        ProtocolWarning::ZeroToOne {
            addr: 0x1000,
            prev: 0x12,
            data: 0xFF
        }
    ));
}

#[test]
fn test_program_round_trip_eeprom() {
    let eeprom = PartDescriptor::new("test-eeprom", 0x1F6699, 0, 4096, 4, EraseCaps::ERASE_4K)
        .with_quirks(Quirks::EEPROM);
    let mut flash = Flash::with_data(&eeprom, &[0x00; 64]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);
    let pattern = [0x12, 0x34, 0xF0, 0x0F, 0xAA];

    protocol::page_program(&mut master, IoMode::Single, THREE, 0, &pattern).unwrap();
    let mut buf = [0u8; 5];
    protocol::read(&mut master, THREE, 0, &mut buf).unwrap();
    assert_eq!(buf, pattern);
}

#[test]
fn test_eeprom_zero_to_one_still_reported() {
    // Overwriting parts accept 0 -> 1 transitions, but the diagnostic is
    // raised for every part alike.
    let eeprom = PartDescriptor::new("test-eeprom", 0x1F6699, 0, 4096, 4, EraseCaps::ERASE_4K)
        .with_quirks(Quirks::EEPROM);
    let mut flash = Flash::with_data(&eeprom, &[0x00]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::page_program(&mut master, IoMode::Single, THREE, 0, &[0x81]).unwrap();
    assert_eq!(flash.data()[0], 0x81);
    assert!(has_warning(
        &flash,
        ProtocolWarning::ZeroToOne {
            addr: 0,
            prev: 0x00,
            data: 0x81
        }
    ));
}

#[test]
fn test_erase_is_idempotent() {
    let mut flash = Flash::with_data(part("w25q64"), &vec![0x00; 0x2000]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    // Unaligned address erases the containing 4 KiB block
    protocol::erase(&mut master, opcodes::SE_20, THREE, 0x1234).unwrap();
    protocol::erase(&mut master, opcodes::SE_20, THREE, 0x1000).unwrap();
    assert!(flash.data()[0x1000..0x2000].iter().all(|&b| b == ERASED));
    assert!(flash.data()[..0x1000].iter().all(|&b| b == 0x00));

    // Still needs write enable
    let mut master = EmulatedMaster::new(&mut flash);
    protocol::write_disable(&mut master).unwrap();
    master.flash_mut().clear_warnings();
    let mut cmd = SpiCommand::erase(opcodes::SE_20, THREE, 0x0000);
    master.execute(&mut cmd).unwrap();
    assert!(flash.data()[..0x1000].iter().all(|&b| b == 0x00));
    assert!(has_warning(
        &flash,
        ProtocolWarning::MissingWriteEnable {
            opcode: opcodes::SE_20
        }
    ));
}

#[test]
fn test_unsupported_erase_size_still_erases() {
    let mut flash = Flash::with_data(part("w25q64"), &vec![0x00; 0x20000]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::erase(&mut master, opcodes::BE_52, THREE, 0x9000).unwrap();
    assert!(flash.data()[0x8000..0x10000].iter().all(|&b| b == ERASED));
    assert_eq!(flash.data()[0x7FFF], 0x00);
    assert_eq!(flash.data()[0x10000], 0x00);
    assert!(has_warning(
        &flash,
        ProtocolWarning::UnsupportedEraseSize { size: 32 * 1024 }
    ));
}

#[test]
fn test_sector_and_chip_erase() {
    let p = part("w25x10");
    let mut flash = Flash::with_data(p, &vec![0x00; p.capacity() as usize]).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::erase(&mut master, opcodes::SE_D8, THREE, 0x1_0005).unwrap();
    assert!(master.flash().data()[0x1_0000..].iter().all(|&b| b == ERASED));
    assert_eq!(master.flash().data()[0xFFFF], 0x00);

    protocol::chip_erase(&mut master).unwrap();
    assert!(flash.data().iter().all(|&b| b == ERASED));
    assert_eq!(flash.warnings().count(), 0);
}

#[test]
fn test_extended_address_register_selects_segment() {
    let mut flash = Flash::new(part("n25q256a13")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::page_program(&mut master, IoMode::Single, FOUR, 0x0100_0100, &[0xDE, 0xAD]).unwrap();

    let mut buf = [0u8; 2];
    protocol::read(&mut master, THREE, 0x100, &mut buf).unwrap();
    assert_eq!(buf, [0xFF, 0xFF]);

    protocol::write_ext_addr(&mut master, 0x01).unwrap();
    assert_eq!(protocol::read_ext_addr(&mut master).unwrap(), 0x01);
    protocol::read(&mut master, THREE, 0x100, &mut buf).unwrap();
    assert_eq!(buf, [0xDE, 0xAD]);
}

#[test]
fn test_bank_register_selects_segment() {
    let mut flash = Flash::new(part("s25fl256s1")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::page_program(&mut master, IoMode::Single, FOUR, 0x0100_0010, &[0xC0, 0xDE]).unwrap();

    protocol::write_bank_register(&mut master, 0x01).unwrap();
    assert_eq!(protocol::read_bank_register(&mut master).unwrap(), 0x01);
    let mut buf = [0u8; 2];
    protocol::read(&mut master, THREE, 0x10, &mut buf).unwrap();
    assert_eq!(buf, [0xC0, 0xDE]);

    // The extended address register plays no part on Spansion parts
    protocol::write_bank_register(&mut master, 0x00).unwrap();
    protocol::write_ext_addr(&mut master, 0x01).unwrap();
    protocol::read(&mut master, THREE, 0x10, &mut buf).unwrap();
    assert_eq!(buf, [0xFF, 0xFF]);

    // EXTADD switches to 4-byte addressing
    protocol::write_bank_register(&mut master, opcodes::BAR_EXTADD).unwrap();
    assert_eq!(
        protocol::read_flag_status(&mut master).unwrap() & opcodes::FSR_4BYTE_ADDR,
        opcodes::FSR_4BYTE_ADDR
    );
    let mut cmd = SpiCommand::read(opcodes::READ, FOUR, 0x0100_0010, &mut buf);
    master.execute(&mut cmd).unwrap();
    assert_eq!(buf, [0xC0, 0xDE]);
}

#[test]
fn test_four_byte_mode_address_length() {
    let mut flash = Flash::new(part("w25q256")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);
    protocol::page_program(&mut master, IoMode::Single, FOUR, 0x0180_0000, &[0x42]).unwrap();

    protocol::enter_4byte_mode(&mut master).unwrap();
    assert_eq!(protocol::read_flag_status(&mut master).unwrap(), 0x81);

    // 3-byte opcodes now take four address bytes
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read(opcodes::READ, FOUR, 0x0180_0000, &mut buf);
    master.execute(&mut cmd).unwrap();
    assert_eq!(buf, [0x42]);

    // Explicit 4-byte opcodes are not double counted
    let mut buf = [0u8; 1];
    protocol::read(&mut master, FOUR, 0x0180_0000, &mut buf).unwrap();
    assert_eq!(buf, [0x42]);

    protocol::exit_4byte_mode(&mut master).unwrap();
    assert_eq!(protocol::read_flag_status(&mut master).unwrap(), 0x80);
    protocol::read(&mut master, THREE, 0x80_0000, &mut buf).unwrap();
    assert_eq!(buf, [0xFF]);
    assert_eq!(master.flash().warnings().count(), 0);
}

#[test]
fn test_io_read_parameter_counts_follow_vendor() {
    for (name, dual, quad) in [("w25q64", 4, 6), ("s25fl256s1", 4, 6), ("n25q128a13", 5, 8), ("mx25l6405d", 5, 8)] {
        let mut flash = Flash::new(part(name)).unwrap();
        for (opcode, count) in [(opcodes::DIOR, dual), (opcodes::QIOR, quad), (opcodes::DIOR_4B, dual + 1), (opcodes::QIOR_4B, quad + 1)] {
            flash.select(true);
            flash.transfer(opcode, 8);
            for _ in 0..count - 1 {
                flash.transfer(0, 8);
                assert_eq!(flash.state(), State::CollectingParams, "{} 0x{:02X}", name, opcode);
            }
            flash.transfer(0, 8);
            assert_eq!(flash.state(), State::DummyWait, "{} 0x{:02X}", name, opcode);
            flash.select(false);
        }
    }
}

#[test]
fn test_dummy_wait_rescaled_on_bus_width_change() {
    let p = part("n25q128a13");
    let mut image = vec![0xFF; 0x200];
    image[0x123] = 0x5A;
    let mut flash = Flash::with_data(p, &image).unwrap();
    assert_eq!(flash.dummy_units(), 8);

    flash.select(true);
    for byte in [opcodes::FAST_READ, 0x00, 0x01, 0x23] {
        flash.transfer(byte, 8);
    }
    assert_eq!(flash.state(), State::DummyWait);

    // Eight single-line units become two quad units
    flash.set_bus_width(4);
    flash.transfer(0, 4);
    assert_eq!(flash.state(), State::DummyWait);
    flash.transfer(0, 4);
    assert_eq!(flash.state(), State::Read);

    let hi = flash.transfer(0, 4);
    let lo = flash.transfer(0, 4);
    assert_eq!((hi << 4) | lo, 0x5A);
    flash.select(false);
    assert_eq!(flash.warnings().count(), 0);
}

#[test]
fn test_dummy_wait_partial_rescale_rounds_up() {
    let mut flash = Flash::new(part("n25q128a13")).unwrap();
    flash.select(true);
    for byte in [opcodes::FAST_READ, 0x00, 0x00, 0x00] {
        flash.transfer(byte, 8);
    }
    for _ in 0..3 {
        flash.transfer(0, 1);
    }
    // Five single-line units left: two quad units cover them
    flash.set_bus_width(4);
    flash.transfer(0, 4);
    flash.transfer(0, 4);
    assert_eq!(flash.state(), State::Read);
}

#[test]
fn test_fast_reads_through_host() {
    let p = part("w25q64");
    let mut image = vec![0xFF; 0x400];
    image[0x300..0x304].copy_from_slice(&[1, 2, 3, 4]);
    let mut flash = Flash::with_data(p, &image).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    let modes = [
        ReadMode::new(IoMode::Single, 1),
        ReadMode::new(IoMode::DualOut, 1),
        ReadMode::new(IoMode::QuadOut, 1),
        ReadMode::for_family(VendorFamily::Winbond, IoMode::DualIo, 2),
        ReadMode::for_family(VendorFamily::Winbond, IoMode::QuadIo, 4),
    ];
    for mode in modes {
        let mut buf = [0u8; 4];
        protocol::fast_read(&mut master, mode, THREE, 0x300, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4], "{:?}", mode);
    }
    assert_eq!(master.flash().warnings().count(), 0);
}

#[test]
fn test_multi_line_page_program() {
    let mut flash = Flash::new(part("w25q64")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::page_program(&mut master, IoMode::QuadOut, THREE, 0x200, &[0x5A, 0xC3]).unwrap();
    protocol::page_program(&mut master, IoMode::DualOut, THREE, 0x210, &[0x96]).unwrap();
    assert_eq!(
        protocol::page_program(&mut master, IoMode::DualOut, FOUR, 0x210, &[0x96]),
        Err(Error::OpcodeNotSupported)
    );

    assert_eq!(&flash.data()[0x200..0x202], &[0x5A, 0xC3]);
    assert_eq!(flash.data()[0x210], 0x96);
    assert_eq!(flash.warnings().count(), 0);
}

#[test]
fn test_unit_width_boundaries() {
    let mut image = vec![0u8; 16];
    image[..3].copy_from_slice(&[0xA5, 0x3C, 0x7E]);
    let mut flash = Flash::with_data(part("w25q64"), &image).unwrap();

    // Byte-aligned streams of any legal width never straddle a byte
    for width in [1u8, 2, 4, 8] {
        flash.select(true);
        for byte in [opcodes::READ, 0, 0, 0] {
            flash.transfer(byte, 8);
        }
        let mut out = [0u8; 3];
        for slot in out.iter_mut() {
            for _ in 0..8 / width {
                *slot = ((u16::from(*slot) << width) as u8) | flash.transfer(0, width);
            }
        }
        flash.select(false);
        assert_eq!(out, [0xA5, 0x3C, 0x7E], "width {}", width);
    }
    assert_eq!(flash.warnings().count(), 0);

    // A byte after a 2-bit unit is realigned to the next byte
    flash.select(true);
    for byte in [opcodes::READ, 0, 0, 0] {
        flash.transfer(byte, 8);
    }
    assert_eq!(flash.transfer(0, 2), 0b10);
    assert_eq!(flash.transfer(0, 8), 0x3C);
    assert!(has_warning(
        &flash,
        ProtocolWarning::MisalignedUnit {
            bit_offset: 2,
            bits: 8
        }
    ));

    // Widths other than 1, 2, 4 and 8 count as a byte
    assert_eq!(flash.transfer(0, 3), 0x7E);
    assert!(has_warning(&flash, ProtocolWarning::UnexpectedUnitWidth { bits: 3 }));
    flash.select(false);

    // Sub-byte units are bytes while decoding
    flash.select(true);
    flash.transfer(opcodes::WREN, 4);
    flash.select(false);
    assert!(flash.registers().write_enable);
    assert!(has_warning(&flash, ProtocolWarning::UnexpectedUnitWidth { bits: 4 }));
}

#[test]
fn test_read_wraps_at_capacity() {
    let p = part("w25x10");
    let mut image = vec![0xFF; p.capacity() as usize];
    image[0] = 0x11;
    *image.last_mut().unwrap() = 0x22;
    let mut flash = Flash::with_data(p, &image).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    let mut buf = [0u8; 2];
    protocol::read(&mut master, THREE, p.capacity() - 1, &mut buf).unwrap();
    assert_eq!(buf, [0x22, 0x11]);
}

#[test]
fn test_reset_sequence() {
    let mut flash = Flash::new(part("w25q64")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    protocol::write_enable(&mut master).unwrap();
    protocol::enter_4byte_mode(&mut master).unwrap();
    protocol::reset(&mut master).unwrap();
    assert_eq!(protocol::read_status(&mut master).unwrap() & opcodes::SR_WEL, 0);
    assert_eq!(protocol::read_flag_status(&mut master).unwrap(), 0x80);

    // Any command between RSTEN and RST disarms the reset
    protocol::write_enable(&mut master).unwrap();
    for interloper in [opcodes::RDSR, 0xFF] {
        frame(master.flash_mut(), &[opcodes::RSTEN]);
        frame(master.flash_mut(), &[interloper]);
        frame(master.flash_mut(), &[opcodes::RST]);
        assert!(master.flash().registers().write_enable);
    }

    // RST alone does nothing
    frame(master.flash_mut(), &[opcodes::RST]);
    assert!(master.flash().registers().write_enable);
}

#[test]
fn test_unknown_opcode_keeps_state() {
    let mut flash = Flash::new(part("w25q64")).unwrap();
    frame(&mut flash, &[opcodes::WREN]);
    let regs = flash.registers().clone();

    frame(&mut flash, &[0xFF]);
    assert_eq!(flash.state(), State::Idle);
    assert_eq!(flash.registers(), &regs);
    assert!(has_warning(&flash, ProtocolWarning::UnknownOpcode(0xFF)));

    let out = frame(&mut flash, &[opcodes::RDSR, 0]);
    assert_eq!(out[1] & opcodes::SR_WEL, opcodes::SR_WEL);
}

#[test]
fn test_auto_address_increment_program() {
    let mut flash = Flash::new(part("sst25vf040b")).unwrap();
    frame(&mut flash, &[opcodes::WREN]);

    frame(&mut flash, &[opcodes::AAI, 0x00, 0x00, 0x10, 0x12, 0x34]);
    assert!(flash.registers().aai);
    // Continuation frames carry data only
    frame(&mut flash, &[opcodes::AAI, 0x56, 0x78]);
    frame(&mut flash, &[opcodes::WRDI]);
    assert!(!flash.registers().aai);
    assert_eq!(&flash.data()[0x10..0x14], &[0x12, 0x34, 0x56, 0x78]);

    // After WRDI the next AAI expects an address again
    frame(&mut flash, &[opcodes::WREN]);
    frame(&mut flash, &[opcodes::AAI, 0x00, 0x00, 0x20, 0x9A]);
    assert_eq!(flash.data()[0x20], 0x9A);
}

#[test]
fn test_chip_select_flushes_dirty_page() {
    let p = part("sst25wf512");
    let backing = MemoryBacking::new(vec![0xFF; p.capacity() as usize]);
    let mut flash = Flash::with_backing(p, backing).unwrap();
    frame(&mut flash, &[opcodes::WREN]);

    flash.select(true);
    for byte in [opcodes::PP, 0x00, 0x00, 0xFF, 0x11, 0x22] {
        flash.transfer(byte, 8);
    }
    // Crossing into page 1 evicted page 0
    assert_eq!(flash.dirty_page(), Some(1));
    assert_eq!(flash.backing().writes(), &[(0, 256)]);

    flash.select(false);
    assert_eq!(flash.dirty_page(), None);
    assert_eq!(flash.backing().writes(), &[(0, 256), (256, 256)]);
    assert_eq!(&flash.backing().image()[0xFF..0x101], &[0x11, 0x22]);
}

#[test]
fn test_erase_syncs_backing() {
    let p = part("sst25wf512");
    let backing = MemoryBacking::new(vec![0x00; p.capacity() as usize]);
    let mut flash = Flash::with_backing(p, backing).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);
    protocol::erase(&mut master, opcodes::SE_20, THREE, 0x2000).unwrap();

    let backing = flash.into_backing();
    assert_eq!(backing.writes(), &[(0x2000, 0x1000)]);
    assert!(backing.image()[0x2000..0x3000].iter().all(|&b| b == ERASED));
}

#[test]
fn test_snapshot_round_trip() {
    let p = part("w25q64");
    let mut a = Flash::new(p).unwrap();
    {
        let mut master = EmulatedMaster::new(&mut a);
        protocol::page_program(&mut master, IoMode::Single, THREE, 0x1000, &[1, 2, 3, 4]).unwrap();
    }

    // Checkpoint in the middle of a READ's address phase
    a.select(true);
    a.transfer(opcodes::READ, 8);
    a.transfer(0x00, 8);
    let blob = a.snapshot().unwrap();

    let mut b = Flash::new(p).unwrap();
    b.restore(&blob).unwrap();
    assert_eq!(b.state(), State::CollectingParams);
    assert_eq!(a.registers(), b.registers());

    for flash in [&mut a, &mut b] {
        flash.transfer(0x10, 8);
        flash.transfer(0x00, 8);
        let out: Vec<u8> = (0..4).map(|_| flash.transfer(0, 8)).collect();
        assert_eq!(out, [1, 2, 3, 4]);
        flash.select(false);
    }
}

#[test]
fn test_snapshot_restore_syncs_backing() {
    let p = part("sst25wf512");
    let mut source = Flash::new(p).unwrap();
    {
        let mut master = EmulatedMaster::new(&mut source);
        protocol::page_program(&mut master, IoMode::Single, THREE, 0, &[0x11, 0x11]).unwrap();
    }
    let blob = source.snapshot().unwrap();

    let backing = MemoryBacking::new(vec![0xFF; p.capacity() as usize]);
    let mut flash = Flash::with_backing(p, backing).unwrap();
    flash.restore(&blob).unwrap();
    flash.select(false);
    assert_eq!(&flash.data()[..2], &[0x11, 0x11]);

    let backing = flash.into_backing();
    assert_eq!(backing.writes(), &[(0, p.capacity() as usize)]);
    assert_eq!(backing.image(), source.data());
}

#[test]
fn test_snapshot_rejects_foreign_blobs() {
    let mut a = Flash::new(part("w25x10")).unwrap();
    let blob = a.snapshot().unwrap();

    let mut other = Flash::new(part("w25x20")).unwrap();
    assert_eq!(other.restore(&blob), Err(Error::SnapshotMismatch));
    assert_eq!(a.restore(&blob[..blob.len() / 2]), Err(Error::SnapshotCorrupt));
    assert_eq!(a.restore(&[1, 2, 3]), Err(Error::SnapshotCorrupt));
    assert!(a.restore(&blob).is_ok());
}

#[test]
fn test_config_registers() {
    let mut flash = Flash::new(part("n25q128a13")).unwrap();
    let mut master = EmulatedMaster::new(&mut flash);

    assert_eq!(protocol::read_config(&mut master, ConfigRegister::Nonvolatile).unwrap(), 0x8FFF);
    assert_eq!(protocol::read_config(&mut master, ConfigRegister::Volatile).unwrap(), 0x83);
    assert_eq!(protocol::read_config(&mut master, ConfigRegister::EnhancedVolatile).unwrap(), 0xDF);

    protocol::write_config(&mut master, ConfigRegister::Volatile, 0x5B).unwrap();
    assert_eq!(protocol::read_config(&mut master, ConfigRegister::Volatile).unwrap(), 0x5B);
    assert_eq!(master.flash().dummy_units(), 5);

    // The nonvolatile word takes effect at the next reset
    protocol::write_config(&mut master, ConfigRegister::Nonvolatile, 0x8FFE).unwrap();
    assert_eq!(protocol::read_config(&mut master, ConfigRegister::Nonvolatile).unwrap(), 0x8FFE);
    assert_eq!(protocol::read_flag_status(&mut master).unwrap(), 0x80);
    protocol::reset(&mut master).unwrap();
    assert_eq!(protocol::read_flag_status(&mut master).unwrap(), 0x81);
    assert_eq!(protocol::read_config(&mut master, ConfigRegister::Volatile).unwrap(), 0x83);
}

#[test]
fn test_nonvolatile_cfg_at_power_on() {
    let flash = Flash::new(part("n25q256a13")).unwrap().with_nonvolatile_cfg(0x8FFC);
    assert!(flash.registers().four_byte);
    assert_eq!(flash.registers().ear, 0x3);

    // Only Numonyx parts derive anything from it
    let flash = Flash::new(part("w25q256")).unwrap().with_nonvolatile_cfg(0x8FFC);
    assert!(!flash.registers().four_byte);
    assert_eq!(flash.dummy_units(), 1);
}

#[test]
fn test_invalid_part_rejected() {
    let mut bad = PartDescriptor::new("bad", 0xEF4017, 0, 4096, 16, EraseCaps::ERASE_4K);
    bad.page_size = 0;
    assert_eq!(
        Flash::new(&bad).err(),
        Some(Error::InvalidPart(PartError::ZeroPageSize))
    );
}

#[test]
fn test_warning_history_is_bounded() {
    let mut flash = Flash::new(part("w25q64")).unwrap();
    for _ in 0..WARNING_HISTORY + 8 {
        frame(&mut flash, &[0xFF]);
    }
    assert_eq!(flash.warnings().count(), WARNING_HISTORY);
    flash.set_bus_width(3);
    assert_eq!(
        flash.warnings().last(),
        Some(&ProtocolWarning::InvalidBusWidth { lines: 3 })
    );
    assert_eq!(flash.bus_width(), crate::spi::BusWidth::Single);

    flash.clear_warnings();
    assert_eq!(flash.warnings().count(), 0);
}
