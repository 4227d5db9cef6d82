//! URL and checksum lists derived from a resource set.

use crate::model::Resource;

/// Aggregates for one resource set, in URL order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub urls: Vec<String>,
    /// `(checksum, file name)` pairs for resources carrying the checksum attribute.
    pub checksums: Vec<(String, String)>,
    pub total_bytes: u64,
}

impl Manifest {
    /// Contents of the URL list file: one URL per line, trailing newline.
    pub fn urls_file(&self) -> String {
        join_lines(self.urls.iter().map(String::as_str))
    }

    /// Contents of the checksum list in `md5sum -c` format.
    pub fn checksums_file(&self) -> String {
        let lines: Vec<String> = self
            .checksums
            .iter()
            .map(|(checksum, name)| format!("{checksum}  {name}"))
            .collect();
        join_lines(lines.iter().map(String::as_str))
    }
}

/// Sort resources by URL and collect URLs, checksums and total size.
///
/// The sort is stable and duplicates are kept.
pub fn collect_manifest(resources: &[Resource], checksum_attribute: &str) -> Manifest {
    let mut sorted: Vec<&Resource> = resources.iter().collect();
    sorted.sort_by(|a, b| a.url.cmp(&b.url));

    let mut manifest = Manifest::default();
    for resource in sorted {
        manifest.urls.push(resource.url.clone());
        if let Some(checksum) = resource.attribute(checksum_attribute) {
            manifest
                .checksums
                .push((checksum.to_string(), url_file_name(&resource.url).to_string()));
        }
        manifest.total_bytes = manifest.total_bytes.saturating_add(resource.size.unwrap_or(0));
    }

    manifest
}

/// Final path segment of a URL, ignoring any query string or fragment.
///
/// A URL with no path (`http://host`) has an empty file name.
pub fn url_file_name(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = match url[..end].split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
        None => &url[..end],
    };
    path.rsplit('/').next().unwrap_or(path)
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut first = true;
    for line in lines {
        if !first {
            out.push('\n');
        }
        out.push_str(line);
        first = false;
    }
    out.push('\n');
    out
}
