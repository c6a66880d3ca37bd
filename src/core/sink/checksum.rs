//! Checksum calculation for finished artifacts

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Calculate the hex SHA-256 of a file, reading it in chunks
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn checksum_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate the hex SHA-256 of raw bytes
///
/// # Examples
///
/// ```
/// use stockfeed::core::sink::checksum::checksum_bytes;
///
/// let checksum = checksum_bytes(b"partNumber,quantity\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
