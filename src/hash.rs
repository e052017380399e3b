//! Content-hash primitives.
//!
//! Digests are 16 bytes (MD5), computed from a buffered chunked read so a
//! large source file is never pulled fully into memory just to be hashed.

use md5::{Digest, Md5};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// A 16-byte content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct ContentHash(pub [u8; 16]);

impl ContentHash {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Hashes the bytes of `path` in 8KiB chunks, matching the buffered-read
/// shape the rest of the pipeline uses for every other file read.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 16];
    out.copy_from_slice(&digest);
    Ok(ContentHash(out))
}
