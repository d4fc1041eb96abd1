//! List command implementation

use spinor_core::part::PartDatabase;

/// List all known parts
pub fn list_parts(db: &PartDatabase, vendor_filter: Option<&str>) {
    println!("Known flash parts:");
    println!();
    println!(
        "{:<12} {:<16} {:<16} {:>10} {:>12}",
        "Vendor", "Family", "Name", "Size", "JEDEC ID"
    );
    println!("{}", "-".repeat(70));

    let filter = vendor_filter.map(str::to_lowercase);
    for part in db.iter() {
        if let Some(vendor) = &filter {
            if !part.vendor().to_lowercase().contains(vendor.as_str()) {
                continue;
            }
        }

        let jedec_str = if part.ext_jedec_id != 0 {
            format!("{:06X} {:04X}", part.jedec_id, part.ext_jedec_id)
        } else {
            format!("{:06X}", part.jedec_id)
        };

        println!(
            "{:<12} {:<16} {:<16} {:>10} {:>12}",
            part.vendor(),
            part.family().name(),
            part.name(),
            format_size(part.capacity()),
            jedec_str
        );
    }
}

pub(crate) fn format_size(bytes: u32) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}
