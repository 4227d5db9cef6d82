//! Human-readable documents shipped inside a bulk archive.
//!
//! Two documents are produced:
//!
//! - `README.txt`: what the archive contains and how to run the scripts
//! - `QUERY.txt`: a flat key/value record of the request and its counts
//!
//! Both are rendered with `\n` line endings; the archive builder converts
//! them with [`to_crlf`] so they open cleanly on Windows too.

mod clock;
mod size;

pub use clock::{Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT, format_timestamp};
pub use size::format_size;

use std::fmt::Write;

/// Environment variable the generated scripts read the API key from.
pub const API_KEY_ENV: &str = "CKAN_API_KEY";

/// Inputs for `README.txt`.
#[derive(Debug, Clone, Copy)]
pub struct ReadmeContext<'a> {
    pub title: &'a str,
    pub prefix: &'a str,
    pub timestamp: &'a str,
    pub user_page: Option<&'a str>,
    pub package_count: usize,
    pub resource_count: usize,
    pub total_bytes: u64,
}

/// Inputs for `QUERY.txt`.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    pub title: &'a str,
    pub prefix: &'a str,
    pub timestamp: &'a str,
    pub user_page: Option<&'a str>,
    pub query: Option<&'a str>,
    pub query_url: Option<&'a str>,
    pub download_url: Option<&'a str>,
    pub url_count: usize,
    pub checksum_count: usize,
    pub package_count: usize,
    pub resource_count: usize,
    pub total_bytes: u64,
}

const README_BODY: &str = "\
This archive contains the following files:

download.py:
Python 3 script, which when executed will download the files,
and then checksum them.  This script is cross platform and is supported
on Linux / MacOS / Windows hosts. Requires the `requests` module.

download.ps1:
Windows PowerShell script, which when executed will download the files,
and then checksum them. There are no dependencies other than PowerShell.

download.sh:
UNIX shell script, which when executed will download the files,
and then checksum them. This is supported on any Linux or MacOS/BSD
system, so long as `curl` is installed.
";

const README_FOOTER: &str = "\
QUERY.txt:
Text file which contains metadata about the download results and the original
query

tmp folder:
This folder contains files required by the download scripts. Its
contents can be ignored.
";

/// Render the explanatory note.
pub fn render_readme(ctx: &ReadmeContext<'_>) -> String {
    let mut out = String::new();
    let key = API_KEY_ENV;
    let placeholder = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx";

    out.push_str("CKAN Bulk Download\n");
    out.push_str("------------------\n\n");
    let _ = writeln!(out, "{} {}\n", ctx.title, ctx.prefix);

    push_field(&mut out, 31, "Bulk download package generated", ctx.timestamp);
    push_field(&mut out, 31, "Number of Packages", ctx.package_count);
    push_field(&mut out, 31, "Number of Resources", ctx.resource_count);
    push_field(&mut out, 31, "Total Space required", format_size(ctx.total_bytes));
    push_field(&mut out, 31, "Total Size (bytes)", ctx.total_bytes);
    out.push('\n');

    out.push_str(README_BODY);
    out.push('\n');

    let _ = writeln!(
        out,
        "Before running either of these scripts, please set the {key}\n\
         environment variable.\n\n\
         You can find your API Key by browsing to:\n{}\n\n\
         The API key has the format:\n{placeholder}\n\
         To set the environment variable in Linux/MacOS/Unix, use:\n\
         export {key}={placeholder}\n\n\
         On Microsoft Windows, within Powershell, use:\n\
         $env:{key}=\"{placeholder}\"\n",
        ctx.user_page.unwrap_or_default(),
    );

    out.push_str(README_FOOTER);
    out
}

/// Render the request summary.
pub fn render_query(ctx: &QueryContext<'_>) -> String {
    let mut out = String::new();

    push_field(&mut out, 19, "Title", ctx.title);
    push_field(&mut out, 19, "Prefix", ctx.prefix);
    push_field(&mut out, 19, "Timestamp", ctx.timestamp);
    push_field(&mut out, 19, "User Page", ctx.user_page.unwrap_or_default());
    push_field(&mut out, 19, "Query", ctx.query.unwrap_or_default());
    push_field(&mut out, 19, "QueryURL", ctx.query_url.unwrap_or_default());
    push_field(&mut out, 19, "Download URL", ctx.download_url.unwrap_or_default());
    push_field(&mut out, 19, "URL Count", ctx.url_count);
    push_field(&mut out, 19, "MD5 Sum Count", ctx.checksum_count);
    push_field(&mut out, 19, "Package Count", ctx.package_count);
    push_field(&mut out, 19, "Resource Count", ctx.resource_count);
    push_field(&mut out, 19, "Total Space", format_size(ctx.total_bytes));
    push_field(&mut out, 19, "Total Bytes", ctx.total_bytes);

    out
}

/// Convert `\n` line endings to `\r\n`. Existing `\r\n` pairs are left alone.
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(c);
        prev = c;
    }
    out
}

fn push_field(out: &mut String, width: usize, label: &str, value: impl std::fmt::Display) {
    // Writing into a String cannot fail
    let _ = writeln!(out, "{:<width$}: {}", label, value);
}
