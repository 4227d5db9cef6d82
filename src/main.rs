//! Main entry point for the bulkzip CLI application.
//!
//! This binary is a thin adapter around the library: it loads a request
//! document from disk or HTTP, builds the archive and writes it out.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bulkzip::cli::{BuildArgs, Command, RequestArgs};
use bulkzip::io::open_source;
use bulkzip::{BulkArchiveBuilder, BulkRequest, Cli, SystemClock, ZipReader};

/// Application entry point.
///
/// Parses command-line arguments, sets up logging and dispatches to the
/// subcommand handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Build(args) => build(args).await,
        Command::List { archive } => list(Path::new(archive)).await,
        Command::Urls(args) => urls(args).await,
    }
}

/// Load a request and apply command-line overrides.
async fn load_request(args: &RequestArgs) -> Result<BulkRequest> {
    let source = open_source(&args.request)?;
    let mut request = source.load().await?;
    if let Some(attribute) = &args.checksum_attribute {
        request.checksum_attribute = attribute.clone();
    }
    Ok(request)
}

/// Build an archive and write it to `<output_dir>/<prefix>.zip`.
async fn build(args: &BuildArgs) -> Result<()> {
    let mut request = load_request(&args.source).await?;
    if let Some(prefix) = &args.prefix {
        request.prefix = prefix.clone();
    }

    let archive = BulkArchiveBuilder::new(SystemClock)
        .build(&request)
        .with_context(|| format!("failed to build archive for {}", args.source.request))?;

    let output_path = PathBuf::from(&args.output_dir).join(archive.file_name());
    if output_path.exists() && !args.overwrite {
        bail!("{} already exists (use -o to overwrite)", output_path.display());
    }

    tokio::fs::create_dir_all(&args.output_dir).await?;
    tokio::fs::write(&output_path, &archive.bytes)
        .await
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("{} ({} bytes)", output_path.display(), archive.bytes.len());
    Ok(())
}

/// Print a table of the archive's entries.
async fn list(path: &Path) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let reader = ZipReader::new(&data);
    let entries = reader.list_files()?;

    println!(
        "{:>10}  {:>10}  {:>4}  {:>10}  {:>5}  Name",
        "Length", "Size", "Mode", "Date", "Time"
    );
    println!("{}", "-".repeat(70));

    let mut total = 0u64;
    for entry in &entries {
        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();
        let mode = entry
            .unix_mode()
            .map(|m| format!("{:04o}", m))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>10}  {:>10}  {:>4}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            mode,
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );
        total += entry.uncompressed_size;
    }

    println!("{}", "-".repeat(70));
    println!("{:>10}  {:>36}  {} files", total, "", entries.len());
    Ok(())
}

/// Print the URL list exactly as it would appear in the archive.
async fn urls(args: &RequestArgs) -> Result<()> {
    let request = load_request(args).await?;
    let manifest = BulkArchiveBuilder::new(SystemClock).manifest(&request)?;

    use tokio::io::AsyncWriteExt;
    let mut stdout = tokio::io::stdout();
    stdout.write_all(manifest.urls_file().as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
