/* src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{find_build_config, load_build_config};
pub use types::BlockworkConfig;
