//! In-memory ZIP archive writer.
//!
//! Entries are compressed as they are added and appended to a single
//! buffer. [`ZipWriter::finish`] writes the Central Directory and the
//! EOCD record and hands the finished archive back.

use flate2::Crc;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

use crate::error::{BulkError, Result};

use super::structures::*;

/// Builds a ZIP archive in memory.
///
/// Every entry gets the same modification time, so the output depends only
/// on the entries and that timestamp.
pub struct ZipWriter {
    buf: Vec<u8>,
    entries: Vec<ZipFileEntry>,
    modified: DosDateTime,
    compression: Compression,
}

impl ZipWriter {
    pub fn new(modified: DosDateTime) -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
            modified,
            compression: Compression::default(),
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compress `data` with DEFLATE and append it as `name` with UNIX mode `mode`.
    pub fn add_file(&mut self, name: &str, data: &[u8], mode: u32) -> Result<()> {
        if self.entries.len() >= usize::from(u16::MAX) {
            return Err(BulkError::Archive(std::io::Error::other(
                "too many entries for a non-ZIP64 archive",
            )));
        }

        let mut crc = Crc::new();
        crc.update(data);

        let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2), self.compression);
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        let entry = ZipFileEntry {
            file_name: name.to_string(),
            compression_method: CompressionMethod::Deflate,
            compressed_size: compressed.len() as u64,
            uncompressed_size: data.len() as u64,
            crc32: crc.sum(),
            lfh_offset: self.buf.len() as u64,
            last_mod_time: self.modified.time,
            last_mod_date: self.modified.date,
            version_made_by: HOST_UNIX | VERSION_NEEDED,
            external_attrs: (S_IFREG | (mode & 0o7777)) << 16,
            is_directory: false,
        };

        entry.write_local_header(&mut self.buf, FLAG_UTF8)?;
        self.buf.write_all(&compressed)?;

        tracing::trace!(
            "Added {} ({} -> {} bytes, mode {:o})",
            name,
            entry.uncompressed_size,
            entry.compressed_size,
            mode
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Write the Central Directory and EOCD, returning the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cd_offset = self.buf.len() as u64;
        for entry in &self.entries {
            entry.write_central_header(&mut self.buf, FLAG_UTF8)?;
        }
        let cd_size = self.buf.len() as u64 - cd_offset;

        // Checked in add_file
        let count = self.entries.len() as u16;
        let eocd = EndOfCentralDirectory {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: count,
            total_entries: count,
            cd_size: to_u32(cd_size, "central directory size")?,
            cd_offset: to_u32(cd_offset, "central directory offset")?,
            comment_len: 0,
        };
        eocd.write_to(&mut self.buf)?;

        Ok(self.buf)
    }
}
