//! # bulkzip
//!
//! Assemble "bulk download" ZIP packages for a set of catalogued data
//! resources.
//!
//! Given the packages and resources a catalogue search resolved to, the
//! library produces a single archive containing:
//!
//! - the sorted list of resource URLs and an `md5sum`-style checksum list
//! - download scripts for POSIX shell, PowerShell and Python that fetch
//!   every URL with the user's API key and verify the checksums
//! - `README.txt` and `QUERY.txt` describing the package and the query
//!
//! Nothing is downloaded here; the scripts do that later on the user's
//! machine. The whole archive is built in memory and returned as bytes,
//! ready to be served as `application/zip`.
//!
//! ## Example
//!
//! ```
//! use bulkzip::{BulkRequest, build_archive};
//! use serde_json::json;
//!
//! let mut request = BulkRequest::new("bulk_2024_001", "Marine microbes");
//! request.resources = vec![
//!     json!({"url": "https://data.example.org/r/b.fastq.gz", "size": 10, "md5": "aaa"}),
//!     json!({"url": "https://data.example.org/r/a.fastq.gz", "size": 20, "md5": "bbb"}),
//! ];
//!
//! let archive = build_archive(&request)?;
//! assert_eq!(archive.file_name(), "bulk_2024_001.zip");
//! # Ok::<(), bulkzip::BulkError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod metadata;
pub mod model;
pub mod script;
pub mod zip;

pub use archive::{ArchiveEntry, BulkArchiveBuilder, GeneratedArchive, Manifest, build_archive};
pub use cli::Cli;
pub use error::{BulkError, Result};
pub use metadata::{Clock, FixedClock, SystemClock};
pub use model::{BulkRequest, Package, Resource};
pub use script::{ChecksumAlgorithm, ScriptKind};
pub use zip::{ZipFileEntry, ZipReader};
