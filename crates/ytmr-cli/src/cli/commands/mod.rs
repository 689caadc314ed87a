//! CLI command handlers, one per file.

mod config;
mod formats;
mod resolve;

pub use config::run_config;
pub use formats::run_formats;
pub use resolve::{run_resolve, ResolveOverrides};
