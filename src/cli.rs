use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bulkzip")]
#[command(version)]
#[command(about = "Assemble bulk download ZIP packages for catalogued data resources", long_about = None)]
#[command(after_help = "Examples:\n  \
  bulkzip build request.json -d out      write out/<prefix>.zip\n  \
  bulkzip build https://data.example.org/bulk/request.json\n  \
  bulkzip list bulk_2024.zip -v           show entries with modes and sizes\n  \
  bulkzip urls request.json | wget -i -   feed the sorted URL list to wget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-vv for debug)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a bulk archive from a request document
    Build(BuildArgs),

    /// List the entries of a bulk archive
    List {
        /// Path to the ZIP archive
        #[arg(value_name = "ARCHIVE")]
        archive: String,
    },

    /// Print the sorted URL list of a request
    Urls(RequestArgs),
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Request JSON file path or HTTP URL
    #[arg(value_name = "REQUEST")]
    pub request: String,

    /// Resource field holding the checksum (overrides the request)
    #[arg(long, value_name = "NAME")]
    pub checksum_attribute: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: RequestArgs,

    /// Write the archive into this directory
    #[arg(short = 'd', value_name = "DIR", default_value = ".")]
    pub output_dir: String,

    /// Archive prefix (overrides the request)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Overwrite an existing archive
    #[arg(short = 'o')]
    pub overwrite: bool,
}

impl Cli {
    /// Default tracing filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
