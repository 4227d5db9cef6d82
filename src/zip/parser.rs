//! Low-level ZIP archive parser.
//!
//! The parser works on an archive held entirely in memory, reading it the
//! way ZIP files are designed to be read: from the end.
//!
//! 1. Find the End of Central Directory (EOCD) at the archive's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, read each file's Local File Header to locate its data

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{BulkError, Result};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Low-level ZIP parser over a byte slice.
///
/// Typically used through [`ZipReader`](super::ZipReader) rather than directly.
pub struct ZipParser<'a> {
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Handles both the common case (no comment) and archives with a
    /// comment by searching backwards for the signature.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, usize)> {
        let size = self.data.len();
        if size < EndOfCentralDirectory::SIZE {
            return Err(BulkError::zip("archive too short"));
        }

        // Fast path: no comment, EOCD is the last 22 bytes
        let offset = size - EndOfCentralDirectory::SIZE;
        let tail = &self.data[offset..];
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && tail[20..22] == [0, 0] {
            return Ok((EndOfCentralDirectory::from_bytes(tail)?, offset));
        }

        let search_start = size.saturating_sub(MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE);
        for i in (search_start..=offset).rev() {
            if &self.data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // The comment length field must account for the remaining bytes
                let comment_len = u16::from_le_bytes([self.data[i + 20], self.data[i + 21]]) as usize;
                if comment_len == size - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(&self.data[i..])?;
                    return Ok((eocd, i));
                }
            }
        }

        Err(BulkError::zip("not a valid ZIP file"))
    }

    /// List all entries recorded in the Central Directory.
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, _) = self.find_eocd()?;
        if eocd.is_zip64() {
            return Err(BulkError::zip("ZIP64 archives are not supported"));
        }

        let start = eocd.cd_offset as usize;
        let end = start + eocd.cd_size as usize;
        let cd_data = self
            .data
            .get(start..end)
            .ok_or_else(|| BulkError::zip("central directory out of bounds"))?;

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut cursor = Cursor::new(cd_data);
        for _ in 0..eocd.total_entries {
            entries.push(self.parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        let remaining = cursor.get_ref().len() as u64 - cursor.position();
        if remaining < CDFH_MIN_SIZE as u64 {
            return Err(BulkError::zip("truncated Central Directory File Header"));
        }

        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(BulkError::zip("invalid Central Directory File Header"));
        }

        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();
        let is_directory = file_name.ends_with('/');

        // Extra field and comment are not used
        cursor.set_position(
            cursor.position() + extra_field_length as u64 + file_comment_length as u64,
        );

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            version_made_by,
            external_attrs,
            is_directory,
        })
    }

    /// Compressed data of an entry, located through its Local File Header.
    ///
    /// The LFH's variable-length fields may differ from the Central
    /// Directory entry, so the data offset is computed from the LFH itself.
    pub fn entry_data(&self, entry: &ZipFileEntry) -> Result<&'a [u8]> {
        let lfh_offset = entry.lfh_offset as usize;
        let lfh = self
            .data
            .get(lfh_offset..lfh_offset + LFH_SIZE)
            .ok_or_else(|| BulkError::zip("local file header out of bounds"))?;

        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(BulkError::zip("invalid Local File Header"));
        }

        let mut cursor = Cursor::new(lfh);
        cursor.set_position(26); // Offset to filename length field
        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        let start = lfh_offset + LFH_SIZE + file_name_length + extra_field_length;
        let end = start + entry.compressed_size as usize;
        self.data
            .get(start..end)
            .ok_or_else(|| BulkError::zip(format!("data for {} out of bounds", entry.file_name)))
    }
}
