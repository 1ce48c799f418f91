//! MOD File Loader
//!
//! Loads whole module files and checks they look like a supported format
//! before handing them to the parser.

use log::debug;
use std::fs;
use std::path::Path;

use crate::mod_parser::{HEADER_SIZE, SUPPORTED_SIGNATURES};
use crate::{PtModError, Result};

/// Offset of the format signature in the header
const SIGNATURE_OFFSET: usize = HEADER_SIZE - 4;

/// Loads MOD files from disk
pub struct ModFileLoader;

impl ModFileLoader {
    /// Read a module file, rejecting files too short or with an unknown signature
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            PtModError::Other(format!("Failed to read file '{}': {}", path.display(), e))
        })?;

        match Self::detect_format(&data) {
            Some(format) => {
                debug!(
                    "Loaded {} ({} bytes, {})",
                    path.display(),
                    data.len(),
                    format
                );
                Ok(data)
            }
            None if data.len() < HEADER_SIZE => Err(PtModError::Parse(format!(
                "'{}' is too small to be a module ({} bytes)",
                path.display(),
                data.len()
            ))),
            None => Err(PtModError::Parse(format!(
                "'{}' is not a supported module. Supported: M.K., M!K!, 4CHN, FLT4",
                path.display()
            ))),
        }
    }

    /// Detect the module format from its signature
    pub fn detect_format(data: &[u8]) -> Option<&'static str> {
        let signature = data.get(SIGNATURE_OFFSET..HEADER_SIZE)?;
        SUPPORTED_SIGNATURES
            .into_iter()
            .find(|sig| sig.as_slice() == signature)
            .and_then(|sig| std::str::from_utf8(sig).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header_with(signature: &[u8; 4]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[SIGNATURE_OFFSET..].copy_from_slice(signature);
        data
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ModFileLoader::detect_format(&header_with(b"M.K.")), Some("M.K."));
        assert_eq!(ModFileLoader::detect_format(&header_with(b"FLT4")), Some("FLT4"));
        assert_eq!(ModFileLoader::detect_format(&header_with(b"6CHN")), None);
        assert_eq!(ModFileLoader::detect_format(&[0u8; 16]), None);
    }

    #[test]
    fn test_load_reads_whole_file() {
        let mut data = header_with(b"M!K!");
        data.extend_from_slice(&[1, 2, 3, 4]);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let loaded = ModFileLoader::load(file.path()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_load_rejects_short_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"M.K.").unwrap();
        assert!(matches!(
            ModFileLoader::load(file.path()),
            Err(PtModError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_signature() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&header_with(b"8CHN")).unwrap();
        assert!(ModFileLoader::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ModFileLoader::load("/nonexistent/song.mod").is_err());
    }
}
