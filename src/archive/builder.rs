use tracing::{debug, info};

use crate::error::Result;
use crate::metadata::{
    Clock, QueryContext, ReadmeContext, SystemClock, format_timestamp, render_query, render_readme,
    to_crlf,
};
use crate::model::BulkRequest;
use crate::script::{ChecksumAlgorithm, ScriptKind, ScriptVars};
use crate::zip::{DosDateTime, ZipWriter};

use super::manifest::{Manifest, collect_manifest};

/// Permission bits for plain files.
pub const FILE_MODE: u32 = 0o644;
/// Permission bits for download scripts.
pub const SCRIPT_MODE: u32 = 0o755;

/// One file staged for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full archive path, starting with `<prefix>/`.
    pub path: String,
    pub contents: Vec<u8>,
    pub mode: u32,
}

impl ArchiveEntry {
    fn file(prefix: &str, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: format!("{prefix}/{name}"),
            contents: contents.into(),
            mode: FILE_MODE,
        }
    }

    fn script(prefix: &str, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            mode: SCRIPT_MODE,
            ..Self::file(prefix, name, contents)
        }
    }

    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// A finished bulk archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArchive {
    pub prefix: String,
    pub bytes: Vec<u8>,
}

impl GeneratedArchive {
    /// Content type to serve the archive with.
    pub const CONTENT_TYPE: &'static str = "application/zip";

    /// Download file name, `<prefix>.zip`.
    pub fn file_name(&self) -> String {
        format!("{}.zip", self.prefix)
    }

    /// Value for a `Content-Disposition` response header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name())
    }
}

/// Archive-relative path of the URL list.
pub fn urls_path(prefix: &str) -> String {
    format!("tmp/{prefix}_urls.txt")
}

/// Archive-relative path of the checksum list.
pub fn md5sum_path(prefix: &str) -> String {
    format!("tmp/{prefix}_md5sum.txt")
}

/// Assembles bulk archives.
///
/// The builder holds no per-request state, so one instance can serve
/// concurrent requests. The clock supplies document timestamps and entry
/// modification times.
#[derive(Debug, Clone, Default)]
pub struct BulkArchiveBuilder<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> BulkArchiveBuilder<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Validate the request and compute its URL/checksum manifest.
    pub fn manifest(&self, request: &BulkRequest) -> Result<Manifest> {
        request.validate_prefix()?;
        let resources = request.parse_resources()?;
        Ok(collect_manifest(&resources, &request.checksum_attribute))
    }

    /// Render every archive entry, in archive order.
    pub fn entries(&self, request: &BulkRequest) -> Result<Vec<ArchiveEntry>> {
        let prefix = request.prefix.as_str();
        let checksum_algorithm = ChecksumAlgorithm::from_attribute(&request.checksum_attribute)?;
        let manifest = self.manifest(request)?;
        debug!(
            "Collected {} URLs and {} checksums for {}",
            manifest.urls.len(),
            manifest.checksums.len(),
            prefix
        );

        let user_page = request.user_page.as_deref();
        let package_count = request.packages.len();
        let resource_count = request.resources.len();

        let readme = render_readme(&ReadmeContext {
            title: &request.title,
            prefix,
            timestamp: &format_timestamp(&self.clock.now()),
            user_page,
            package_count,
            resource_count,
            total_bytes: manifest.total_bytes,
        });

        let urls_fname = urls_path(prefix);
        let md5sum_fname = md5sum_path(prefix);

        let mut entries = vec![
            ArchiveEntry::file(prefix, "README.txt", to_crlf(&readme)),
            ArchiveEntry::file(prefix, &urls_fname, manifest.urls_file()),
            ArchiveEntry::file(prefix, &md5sum_fname, manifest.checksums_file()),
        ];

        let vars = ScriptVars {
            user_page: user_page.unwrap_or_default(),
            urls_fname: &urls_fname,
            md5sum_fname: &md5sum_fname,
            prefix,
            username: request.username.as_deref().unwrap_or_default(),
            checksum_algorithm,
        };
        for kind in ScriptKind::ALL {
            let script = kind.render(&vars)?;
            debug!("Rendered {} ({} bytes)", kind, script.len());
            entries.push(ArchiveEntry::script(prefix, kind.file_name(), script));
        }

        let query = render_query(&QueryContext {
            title: &request.title,
            prefix,
            timestamp: &format_timestamp(&self.clock.now()),
            user_page,
            query: request.query.as_deref(),
            query_url: request.query_url.as_deref(),
            download_url: request.download_url.as_deref(),
            url_count: manifest.urls.len(),
            checksum_count: manifest.checksums.len(),
            package_count,
            resource_count,
            total_bytes: manifest.total_bytes,
        });
        entries.push(ArchiveEntry::file(prefix, "QUERY.txt", to_crlf(&query)));

        Ok(entries)
    }

    /// Build the complete archive for `request`.
    ///
    /// Any failure aborts the build. No partially written archive is returned.
    pub fn build(&self, request: &BulkRequest) -> Result<GeneratedArchive> {
        let entries = self.entries(request)?;

        let modified = DosDateTime::from_naive(&self.clock.now().naive_local());
        let mut writer = ZipWriter::new(modified);
        for entry in &entries {
            writer.add_file(&entry.path, &entry.contents, entry.mode)?;
        }
        let bytes = writer.finish()?;

        info!(
            "Built bulk archive {}.zip: {} entries, {} bytes",
            request.prefix,
            entries.len(),
            bytes.len()
        );

        Ok(GeneratedArchive {
            prefix: request.prefix.clone(),
            bytes,
        })
    }
}

/// Build an archive using the system clock.
pub fn build_archive(request: &BulkRequest) -> Result<GeneratedArchive> {
    BulkArchiveBuilder::new(SystemClock).build(request)
}
