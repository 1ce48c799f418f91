//! Module File Loader Domain
//!
//! Reads MOD files from disk into memory. Parsing borrows the returned
//! buffer, so the caller keeps it alive for the whole playback session.

pub mod loader;

pub use loader::ModFileLoader;

use crate::Result;

/// Convenience function to load a MOD file from disk
pub fn load_file(path: &str) -> Result<Vec<u8>> {
    ModFileLoader::load(path)
}
