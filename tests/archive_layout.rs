use bulkzip::{BulkArchiveBuilder, BulkError, BulkRequest, FixedClock, Package, ZipReader};
use chrono::DateTime;
use serde_json::json;

fn builder() -> BulkArchiveBuilder<FixedClock> {
    let at = DateTime::parse_from_rfc3339("2024-06-01T12:30:00.123456+00:00").unwrap();
    BulkArchiveBuilder::new(FixedClock(at))
}

fn sample_request() -> BulkRequest {
    let mut request = BulkRequest::new("abc", "Test");
    request.username = Some("alice".to_string());
    request.user_page = Some("https://data.example.org/user/alice".to_string());
    request.packages = vec![Package {
        name: "pkg-1".to_string(),
        package_type: "dataset".to_string(),
    }];
    request.resources = vec![
        json!({"url": "http://x/b.txt", "size": 10, "md5": "aaa"}),
        json!({"url": "http://x/a.txt", "size": 20, "md5": "bbb"}),
    ];
    request
}

fn read_text(bytes: &[u8], name: &str) -> String {
    String::from_utf8(ZipReader::new(bytes).read_file(name).unwrap()).unwrap()
}

#[test]
fn test_two_resource_scenario() {
    let archive = builder().build(&sample_request()).unwrap();
    let bytes = &archive.bytes;

    assert_eq!(read_text(bytes, "abc/tmp/abc_urls.txt"), "http://x/a.txt\nhttp://x/b.txt\n");
    assert_eq!(read_text(bytes, "abc/tmp/abc_md5sum.txt"), "bbb  a.txt\naaa  b.txt\n");

    let query = read_text(bytes, "abc/QUERY.txt");
    assert!(query.contains("URL Count          : 2\r\n"));
    assert!(query.contains("MD5 Sum Count      : 2\r\n"));
    assert!(query.contains("Total Bytes        : 30\r\n"));
    assert!(query.contains("Package Count      : 1\r\n"));

    let readme = read_text(bytes, "abc/README.txt");
    assert!(readme.contains("Total Space required           : 30 B\r\n"));
    assert!(readme.contains("https://data.example.org/user/alice\r\n"));
}

#[test]
fn test_single_root_directory_layout() {
    let archive = builder().build(&sample_request()).unwrap();
    let entries = ZipReader::new(&archive.bytes).list_files().unwrap();

    let mut names: Vec<_> = entries.iter().map(|e| e.file_name.clone()).collect();
    names.sort();
    assert_eq!(
        names,
        [
            "abc/QUERY.txt",
            "abc/README.txt",
            "abc/download.ps1",
            "abc/download.py",
            "abc/download.sh",
            "abc/tmp/abc_md5sum.txt",
            "abc/tmp/abc_urls.txt",
        ]
    );

    for entry in &entries {
        let expected = if entry.file_name.contains("/download.") { 0o755 } else { 0o644 };
        assert_eq!(entry.unix_mode(), Some(expected), "{}", entry.file_name);
    }
}

#[test]
fn test_scripts_reference_tmp_lists() {
    let archive = builder().build(&sample_request()).unwrap();

    for script in ["download.sh", "download.ps1", "download.py"] {
        let text = read_text(&archive.bytes, &format!("abc/{script}"));
        assert!(text.contains("tmp/abc_urls.txt"), "{script}");
        assert!(text.contains("tmp/abc_md5sum.txt"), "{script}");
        assert!(text.contains("alice"), "{script}");
    }
}

#[test]
fn test_resource_without_checksum() {
    let mut request = sample_request();
    request.resources.push(json!({"url": "http://x/c.txt", "size": 5}));
    let archive = builder().build(&request).unwrap();

    assert_eq!(
        read_text(&archive.bytes, "abc/tmp/abc_urls.txt"),
        "http://x/a.txt\nhttp://x/b.txt\nhttp://x/c.txt\n"
    );
    assert_eq!(read_text(&archive.bytes, "abc/tmp/abc_md5sum.txt"), "bbb  a.txt\naaa  b.txt\n");

    let query = read_text(&archive.bytes, "abc/QUERY.txt");
    assert!(query.contains("URL Count          : 3\r\n"));
    assert!(query.contains("MD5 Sum Count      : 2\r\n"));
    assert!(query.contains("Total Bytes        : 35\r\n"));
}

#[test]
fn test_empty_request() {
    let request = BulkRequest::new("empty", "Nothing");
    let archive = builder().build(&request).unwrap();

    assert_eq!(read_text(&archive.bytes, "empty/tmp/empty_urls.txt"), "\n");
    assert_eq!(read_text(&archive.bytes, "empty/tmp/empty_md5sum.txt"), "\n");

    let query = read_text(&archive.bytes, "empty/QUERY.txt");
    for line in [
        "URL Count          : 0",
        "MD5 Sum Count      : 0",
        "Package Count      : 0",
        "Resource Count     : 0",
        "Total Space        : 0 B",
        "Total Bytes        : 0",
    ] {
        assert!(query.contains(line), "{line}");
    }
}

#[test]
fn test_fixed_clock_is_deterministic() {
    let first = builder().build(&sample_request()).unwrap();
    let second = builder().build(&sample_request()).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_input_order_does_not_matter() {
    let mut reversed = sample_request();
    reversed.resources.reverse();

    let a = builder().build(&sample_request()).unwrap();
    let b = builder().build(&reversed).unwrap();
    assert_eq!(
        read_text(&a.bytes, "abc/tmp/abc_urls.txt"),
        read_text(&b.bytes, "abc/tmp/abc_urls.txt")
    );
}

#[test]
fn test_negative_size_rejected() {
    let mut request = sample_request();
    request.resources.push(json!({"url": "http://x/d.txt", "size": -1}));

    match builder().build(&request) {
        Err(BulkError::NegativeSize { url, size }) => {
            assert_eq!(url, "http://x/d.txt");
            assert_eq!(size, -1);
        }
        other => panic!("expected NegativeSize, got {other:?}"),
    }
}

#[test]
fn test_request_from_json_document() {
    let document = br#"{
        "prefix": "json_req",
        "title": "From JSON",
        "username": "bob",
        "packages": [{"name": "p", "type": "amplicon"}],
        "resources": [{"url": "http://x/f.gz", "sha1": "ff", "size": 2048}],
        "query": "type:amplicon",
        "checksum_attribute": "sha1"
    }"#;
    let request = BulkRequest::from_json(document).unwrap();
    let archive = builder().build(&request).unwrap();

    assert_eq!(read_text(&archive.bytes, "json_req/tmp/json_req_md5sum.txt"), "ff  f.gz\n");
    let query = read_text(&archive.bytes, "json_req/QUERY.txt");
    assert!(query.contains("Query              : type:amplicon\r\n"));
    assert!(query.contains("Total Space        : 2.00 KiB\r\n"));
}
