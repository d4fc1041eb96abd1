//! CLI command implementations
//!
//! `list` and `info` only look at part descriptors. `run` attaches an
//! emulated device and replays a transaction script against it.

mod info;
mod list;
mod run;

pub use info::print_part_info;
pub use list::list_parts;
pub use run::run_script;
