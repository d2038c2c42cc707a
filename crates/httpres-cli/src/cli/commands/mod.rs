//! CLI command handlers, one per operation.

mod check;
mod checksum;
mod get;
mod put;

pub use check::run_check;
pub use checksum::run_checksum;
pub use get::run_in;
pub use put::run_out;
