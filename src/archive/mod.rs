//! Bulk archive assembly.
//!
//! [`BulkArchiveBuilder`] turns a [`BulkRequest`](crate::BulkRequest) into a
//! ZIP with this layout:
//!
//! ```text
//! <prefix>/README.txt
//! <prefix>/QUERY.txt
//! <prefix>/download.sh
//! <prefix>/download.ps1
//! <prefix>/download.py
//! <prefix>/tmp/<prefix>_urls.txt
//! <prefix>/tmp/<prefix>_md5sum.txt
//! ```

mod builder;
mod manifest;

pub use builder::{
    ArchiveEntry, BulkArchiveBuilder, FILE_MODE, GeneratedArchive, SCRIPT_MODE, build_archive,
    md5sum_path, urls_path,
};
pub use manifest::{Manifest, collect_manifest, url_file_name};
