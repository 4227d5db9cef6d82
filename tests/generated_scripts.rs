//! Runs the generated shell script against `file://` URLs.
//!
//! Each test returns early when `sh` or `curl` is not installed.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use bulkzip::{BulkArchiveBuilder, BulkRequest, FixedClock, ZipReader};
use chrono::DateTime;
use serde_json::{Map, Value};
use tempfile::{TempDir, tempdir};

const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";
const HELLO_SHA1: &str = "f572d396fae9206628714fb2ce00f72e94f2258f";

fn tool_available(tool: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {tool}"))
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn can_run_shell_script(algorithm: &str) -> bool {
    tool_available("curl") && (tool_available(&format!("{algorithm}sum")) || tool_available("shasum"))
}

/// A directory holding `a.txt` with the content `hello\n`.
fn data_dir() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    dir
}

fn file_url(dir: &Path, suffix: &str) -> String {
    format!("file://{}/a.txt{}", dir.display(), suffix)
}

/// Build `request`, unpack it under `into` and return the archive root.
fn unpack(request: &BulkRequest, into: &Path) -> PathBuf {
    let at = DateTime::parse_from_rfc3339("2024-06-01T00:00:00+00:00").unwrap();
    let archive = BulkArchiveBuilder::new(FixedClock(at)).build(request).unwrap();
    let reader = ZipReader::new(&archive.bytes);

    for entry in reader.list_files().unwrap() {
        let path = into.join(&entry.file_name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, reader.extract_to_memory(&entry).unwrap()).unwrap();
    }
    into.join(&request.prefix)
}

fn run_shell_script(root: &Path) -> Output {
    Command::new("sh")
        .arg(root.join("download.sh"))
        .env("CKAN_API_KEY", "00000000-0000-0000-0000-000000000000")
        .output()
        .unwrap()
}

fn request_for(url: String, attribute: &str, checksum: &str) -> BulkRequest {
    let mut request = BulkRequest::new("bulk", "Script run");
    request.checksum_attribute = attribute.to_string();
    let mut record = Map::new();
    record.insert("url".to_string(), Value::String(url));
    record.insert(attribute.to_string(), Value::String(checksum.to_string()));
    request.resources = vec![Value::Object(record)];
    request
}

#[test]
fn test_md5_download_verifies() {
    if !can_run_shell_script("md5") {
        return;
    }
    let data = data_dir();
    let out = tempdir().unwrap();
    let root = unpack(&request_for(file_url(data.path(), ""), "md5", HELLO_MD5), out.path());

    let output = run_shell_script(&root);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("OK       a.txt"), "{stdout}");
}

#[test]
fn test_sha1_download_verifies() {
    if !can_run_shell_script("sha1") {
        return;
    }
    let data = data_dir();
    let out = tempdir().unwrap();
    let root = unpack(&request_for(file_url(data.path(), ""), "sha1", HELLO_SHA1), out.path());

    let output = run_shell_script(&root);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("Checking sha1 checksums"), "{stdout}");
    assert!(stdout.contains("OK       a.txt"), "{stdout}");
}

#[test]
fn test_wrong_checksum_fails() {
    if !can_run_shell_script("sha1") {
        return;
    }
    let data = data_dir();
    let out = tempdir().unwrap();
    let root = unpack(&request_for(file_url(data.path(), ""), "sha1", HELLO_MD5), out.path());

    let output = run_shell_script(&root);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success(), "{stdout}");
    assert!(stdout.contains("MISMATCH a.txt"), "{stdout}");
}

#[test]
fn test_url_fragment_not_in_file_name() {
    if !can_run_shell_script("md5") {
        return;
    }
    let data = data_dir();
    let out = tempdir().unwrap();
    let root = unpack(&request_for(file_url(data.path(), "#part"), "md5", HELLO_MD5), out.path());

    let output = run_shell_script(&root);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(root.join("a.txt").exists(), "{stdout}");
    assert!(output.status.success(), "{stdout}");
}

#[test]
fn test_username_cannot_inject_commands() {
    if !can_run_shell_script("md5") {
        return;
    }
    let data = data_dir();
    let out = tempdir().unwrap();
    let marker = out.path().join("injected");

    let mut request = request_for(file_url(data.path(), ""), "md5", HELLO_MD5);
    request.username = Some(format!("eve\ntouch {}; echo INJECTED", marker.display()));
    request.user_page = Some(format!("https://x/\"$(touch {})\"'", marker.display()));
    let root = unpack(&request, out.path());

    let output = run_shell_script(&root);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!marker.exists(), "{stdout}");
    assert!(output.status.success(), "{stdout}");
}
