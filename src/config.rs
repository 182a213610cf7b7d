//! Configuration loader and schema types.
//!
//! Settings cover the sticky playback defaults, directory-scan options and
//! the polling cadences used by the output backend and the driver.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
