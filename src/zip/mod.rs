//! ZIP archive writing and reading.
//!
//! Bulk archives are assembled in memory, so both directions work on byte
//! buffers rather than files.
//!
//! ## Architecture
//!
//! - [`structures`]: ZIP format records (EOCD, file headers, DOS timestamps)
//! - [`writer`]: appends DEFLATE entries and writes the Central Directory
//! - [`parser`]: low-level parsing of ZIP structures from raw bytes
//! - [`reader`]: listing and extraction on top of the parser
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Entries are written with the "made by UNIX" host so that extractors
//! restore the permission bits stored in the external attributes. This is
//! what keeps the download scripts executable after unpacking.
//!
//! ## Limitations
//!
//! - No ZIP64: archives, entries and offsets must stay below 4 GiB
//! - No encryption, no multi-disk archives
//! - Reading supports STORED and DEFLATE only

mod parser;
mod reader;
mod structures;
mod writer;

pub use parser::ZipParser;
pub use reader::ZipReader;
pub use structures::*;
pub use writer::ZipWriter;
