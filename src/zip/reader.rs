use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;

use crate::error::{BulkError, Result};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Read access to an archive held in memory.
pub struct ZipReader<'a> {
    parser: ZipParser<'a>,
}

impl<'a> ZipReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            parser: ZipParser::new(data),
        }
    }

    /// List all files in the archive
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files()
    }

    /// Decompress an entry and verify its CRC-32.
    pub fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        let raw = self.parser.entry_data(entry)?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw.to_vec(),
            CompressionMethod::Deflate => {
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
                out
            }
            CompressionMethod::Unknown(method) => {
                return Err(BulkError::zip(format!(
                    "unsupported compression method {method} for {}",
                    entry.file_name
                )));
            }
        };

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 || data.len() as u64 != entry.uncompressed_size {
            return Err(BulkError::zip(format!("checksum mismatch for {}", entry.file_name)));
        }

        Ok(data)
    }

    /// Find an entry by its full path and decompress it.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let entries = self.list_files()?;
        let entry = entries
            .iter()
            .find(|e| e.file_name == name)
            .ok_or_else(|| BulkError::zip(format!("no entry named {name}")))?;
        self.extract_to_memory(entry)
    }
}
