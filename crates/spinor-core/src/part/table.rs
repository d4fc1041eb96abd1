//! Table of known parts

use super::quirks::EraseCaps;
use super::types::PartDescriptor;

const KIB: u32 = 1024;

const NONE: EraseCaps = EraseCaps::empty();
const ER_4K: EraseCaps = EraseCaps::ERASE_4K;
const ER_4K_32K: EraseCaps = EraseCaps::ERASE_4K.union(EraseCaps::ERASE_32K);

const fn part(
    name: &'static str,
    jedec: u32,
    ext_jedec: u16,
    sector_size: u32,
    sectors: u32,
    erase: EraseCaps,
) -> PartDescriptor {
    PartDescriptor::new(name, jedec, ext_jedec, sector_size, sectors, erase)
}

/// Parts known to the emulator
///
/// A "sector" here is always the unit erased by the 0xD8 sector erase
/// command, whatever the vendor datasheet calls it.
pub static KNOWN_PARTS: &[PartDescriptor] = &[
    // Atmel
    part("at25fs010", 0x1F6601, 0, 32 * KIB, 4, ER_4K),
    part("at25fs040", 0x1F6604, 0, 64 * KIB, 8, ER_4K),
    part("at25df041a", 0x1F4401, 0, 64 * KIB, 8, ER_4K),
    part("at25df321a", 0x1F4701, 0, 64 * KIB, 64, ER_4K),
    part("at25df641", 0x1F4800, 0, 64 * KIB, 128, ER_4K),
    part("at26f004", 0x1F0400, 0, 64 * KIB, 8, ER_4K),
    part("at26df081a", 0x1F4501, 0, 64 * KIB, 16, ER_4K),
    part("at26df161a", 0x1F4601, 0, 64 * KIB, 32, ER_4K),
    part("at26df321", 0x1F4700, 0, 64 * KIB, 64, ER_4K),
    part("at45db081d", 0x1F2500, 0, 64 * KIB, 16, ER_4K),

    // EON
    part("en25f32", 0x1C3116, 0, 64 * KIB, 64, ER_4K),
    part("en25p32", 0x1C2016, 0, 64 * KIB, 64, NONE),
    part("en25q32b", 0x1C3016, 0, 64 * KIB, 64, NONE),
    part("en25p64", 0x1C2017, 0, 64 * KIB, 128, NONE),
    part("en25q64", 0x1C3017, 0, 64 * KIB, 128, ER_4K),

    // GigaDevice
    part("gd25q32", 0xC84016, 0, 64 * KIB, 64, ER_4K),
    part("gd25q64", 0xC84017, 0, 64 * KIB, 128, ER_4K),

    // Intel
    part("160s33b", 0x898911, 0, 64 * KIB, 32, NONE),
    part("320s33b", 0x898912, 0, 64 * KIB, 64, NONE),
    part("640s33b", 0x898913, 0, 64 * KIB, 128, NONE),
    part("n25q064", 0x20BA17, 0, 64 * KIB, 128, NONE),

    // Macronix
    part("mx25l2005a", 0xC22012, 0, 64 * KIB, 4, ER_4K),
    part("mx25l4005a", 0xC22013, 0, 64 * KIB, 8, ER_4K),
    part("mx25l8005", 0xC22014, 0, 64 * KIB, 16, NONE),
    part("mx25l1606e", 0xC22015, 0, 64 * KIB, 32, ER_4K),
    part("mx25l3205d", 0xC22016, 0, 64 * KIB, 64, NONE),
    part("mx25l6405d", 0xC22017, 0, 64 * KIB, 128, NONE),
    part("mx25l12805d", 0xC22018, 0, 64 * KIB, 256, NONE),
    part("mx25l12855e", 0xC22618, 0, 64 * KIB, 256, NONE),
    part("mx25l25635e", 0xC22019, 0, 64 * KIB, 512, NONE),
    part("mx25l25655e", 0xC22619, 0, 64 * KIB, 512, NONE),

    // Micron
    part("n25q032a11", 0x20BB16, 0, 64 * KIB, 64, ER_4K),
    part("n25q032a13", 0x20BA16, 0, 64 * KIB, 64, ER_4K),
    part("n25q064a11", 0x20BB17, 0, 64 * KIB, 128, ER_4K),
    part("n25q064a13", 0x20BA17, 0, 64 * KIB, 128, ER_4K),
    part("n25q128a11", 0x20BB18, 0, 64 * KIB, 256, ER_4K),
    part("n25q128a13", 0x20BA18, 0, 64 * KIB, 256, ER_4K),
    part("n25q256a11", 0x20BB19, 0, 64 * KIB, 512, ER_4K),
    part("n25q256a13", 0x20BA19, 0, 64 * KIB, 512, ER_4K),
    part("n25q512a11", 0x20BB20, 0, 64 * KIB, 1024, ER_4K),
    part("n25q512a13", 0x20BA20, 0, 64 * KIB, 1024, ER_4K),

    // Spansion (uniform sector parts)
    part("s25sl032p", 0x010215, 0x4D00, 64 * KIB, 64, ER_4K),
    part("s25sl064p", 0x010216, 0x4D00, 64 * KIB, 128, ER_4K),
    part("s25fl256s0", 0x010219, 0x4D00, 256 * KIB, 128, NONE),
    part("s25fl256s1", 0x010219, 0x4D01, 64 * KIB, 512, NONE),
    part("s25fl512s", 0x010220, 0x4D00, 256 * KIB, 256, NONE),
    part("s70fl01gs", 0x010221, 0x4D00, 256 * KIB, 256, NONE),
    part("s25sl12800", 0x012018, 0x0300, 256 * KIB, 64, NONE),
    part("s25sl12801", 0x012018, 0x0301, 64 * KIB, 256, NONE),
    part("s25fl129p0", 0x012018, 0x4D00, 256 * KIB, 64, NONE),
    part("s25fl129p1", 0x012018, 0x4D01, 64 * KIB, 256, NONE),
    part("s25sl004a", 0x010212, 0, 64 * KIB, 8, NONE),
    part("s25sl008a", 0x010213, 0, 64 * KIB, 16, NONE),
    part("s25sl016a", 0x010214, 0, 64 * KIB, 32, NONE),
    part("s25sl032a", 0x010215, 0, 64 * KIB, 64, NONE),
    part("s25sl064a", 0x010216, 0, 64 * KIB, 128, NONE),
    part("s25fl016k", 0xEF4015, 0, 64 * KIB, 32, ER_4K_32K),
    part("s25fl064k", 0xEF4017, 0, 64 * KIB, 128, ER_4K_32K),

    // SST
    part("sst25vf040b", 0xBF258D, 0, 64 * KIB, 8, ER_4K),
    part("sst25vf080b", 0xBF258E, 0, 64 * KIB, 16, ER_4K),
    part("sst25vf016b", 0xBF2541, 0, 64 * KIB, 32, ER_4K),
    part("sst25vf032b", 0xBF254A, 0, 64 * KIB, 64, ER_4K),
    part("sst25wf512", 0xBF2501, 0, 64 * KIB, 1, ER_4K),
    part("sst25wf010", 0xBF2502, 0, 64 * KIB, 2, ER_4K),
    part("sst25wf020", 0xBF2503, 0, 64 * KIB, 4, ER_4K),
    part("sst25wf040", 0xBF2504, 0, 64 * KIB, 8, ER_4K),
    part("sst25wf080", 0xBF2505, 0, 64 * KIB, 16, ER_4K).with_legacy_id(0xBF, 0x05),

    // ST Microelectronics
    part("m25p05", 0x202010, 0, 32 * KIB, 2, NONE),
    part("m25p10", 0x202011, 0, 32 * KIB, 4, NONE),
    part("m25p20", 0x202012, 0, 64 * KIB, 4, NONE),
    part("m25p40", 0x202013, 0, 64 * KIB, 8, NONE),
    part("m25p80", 0x202014, 0, 64 * KIB, 16, NONE),
    part("m25p16", 0x202015, 0, 64 * KIB, 32, NONE),
    part("m25p32", 0x202016, 0, 64 * KIB, 64, NONE),
    part("m25p64", 0x202017, 0, 64 * KIB, 128, NONE),
    part("m25p128", 0x202018, 0, 256 * KIB, 64, NONE),
    part("n25q032", 0x20BA16, 0, 64 * KIB, 64, NONE),
    part("m45pe10", 0x204011, 0, 64 * KIB, 2, NONE),
    part("m45pe80", 0x204014, 0, 64 * KIB, 16, NONE),
    part("m45pe16", 0x204015, 0, 64 * KIB, 32, NONE),
    part("m25pe20", 0x208012, 0, 64 * KIB, 4, NONE),
    part("m25pe80", 0x208014, 0, 64 * KIB, 16, NONE),
    part("m25pe16", 0x208015, 0, 64 * KIB, 32, ER_4K),
    part("m25px32", 0x207116, 0, 64 * KIB, 64, ER_4K),
    part("m25px32-s0", 0x207316, 0, 64 * KIB, 64, ER_4K),
    part("m25px32-s1", 0x206316, 0, 64 * KIB, 64, ER_4K),
    part("m25px64", 0x207117, 0, 64 * KIB, 128, NONE),

    // Winbond
    part("w25x10", 0xEF3011, 0, 64 * KIB, 2, ER_4K),
    part("w25x20", 0xEF3012, 0, 64 * KIB, 4, ER_4K),
    part("w25x40", 0xEF3013, 0, 64 * KIB, 8, ER_4K),
    part("w25x80", 0xEF3014, 0, 64 * KIB, 16, ER_4K),
    part("w25x16", 0xEF3015, 0, 64 * KIB, 32, ER_4K),
    part("w25x32", 0xEF3016, 0, 64 * KIB, 64, ER_4K),
    part("w25q32", 0xEF4016, 0, 64 * KIB, 64, ER_4K),
    part("w25q32dw", 0xEF6016, 0, 64 * KIB, 64, ER_4K),
    part("w25x64", 0xEF3017, 0, 64 * KIB, 128, ER_4K),
    part("w25q64", 0xEF4017, 0, 64 * KIB, 128, ER_4K),
    part("w25q80", 0xEF5014, 0, 64 * KIB, 16, ER_4K),
    part("w25q80bl", 0xEF4014, 0, 64 * KIB, 16, ER_4K),
    part("w25q256", 0xEF4019, 0, 64 * KIB, 512, ER_4K),

    // Numonyx
    part("n25q128", 0x20BA18, 0, 64 * KIB, 256, NONE),
];

/// Find a known part by name (case-insensitive)
pub fn find_part(name: &str) -> Option<&'static PartDescriptor> {
    KNOWN_PARTS
        .iter()
        .find(|p| p.name().eq_ignore_ascii_case(name))
}

/// Find the first known part with the given JEDEC ID
///
/// Several parts share a JEDEC ID and differ only in their extended ID;
/// pass `ext` to disambiguate.
pub fn find_by_jedec(jedec_id: u32, ext: Option<u16>) -> Option<&'static PartDescriptor> {
    KNOWN_PARTS.iter().find(|p| p.matches_jedec(jedec_id, ext))
}
