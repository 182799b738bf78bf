//! CLI argument parsing for pdfops.
//!
//! This module only describes the command line; `build.rs` renders the man
//! page from it, so it must not depend on the library.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Merge, split, rotate, compress and preview PDF documents.
///
/// Every command reads its inputs fully into memory, runs one operation
/// and writes the result. Damaged inputs are repaired when possible; pages
/// that cannot be processed are reported and skipped.
#[derive(Parser, Debug)]
#[command(name = "pdfops")]
#[command(version)]
#[command(about = "Merge, split, rotate, compress and preview PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (JSON)
    ///
    /// Fields that are missing take their defaults.
    #[arg(long, global = true, env = "PDFOPS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for statistics, ratings and contact messages
    ///
    /// Overrides `data_dir` from the configuration file.
    #[arg(long, global = true, env = "PDFOPS_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate documents in the order given
    ///
    /// Example:
    ///   pdfops merge intro.pdf body.pdf appendix.pdf -o book.pdf
    Merge {
        /// Input PDF files, at least two
        #[arg(required = true, num_args = 2.., value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Split a document into several documents
    Split(SplitArgs),

    /// Rotate selected pages clockwise
    ///
    /// Examples:
    ///   pdfops rotate scan.pdf --angle 90 -o fixed.pdf
    ///   pdfops rotate scan.pdf --angle -90 --pages "2-4,7" -o fixed.pdf
    Rotate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Rotation in degrees, a multiple of 90 (normalized modulo 360)
        #[arg(short, long, default_value_t = 90, allow_negative_numbers = true)]
        angle: i64,

        /// Pages to rotate ("all", "1-3,5")
        #[arg(short, long, default_value = "all", value_name = "SELECTOR")]
        pages: String,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Rewrite a document with compressed content streams
    Compress {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Print the first pages as base64 encoded documents (JSON)
    Preview {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of pages to preview (defaults to the configured value)
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,
    },

    /// Submit a rating from 1 to 5
    Rate {
        /// Stars, from 1 to 5
        #[arg(short, long, allow_negative_numbers = true)]
        rating: i64,

        /// Free text feedback
        #[arg(short, long, value_name = "TEXT")]
        feedback: Option<String>,

        /// Page the rating refers to
        #[arg(long, value_name = "PAGE")]
        page: Option<String>,
    },

    /// Send or manage contact messages
    #[command(subcommand)]
    Contact(ContactCommand),

    /// Show usage statistics and feedback summary
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments of the `split` command.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// How to split
    ///
    /// - all: one document per page
    /// - range: one document per range in --pages ("1-3,4-6")
    /// - selected: one document with the listed pages, in order ("3,1,3")
    #[arg(short, long, default_value = "all", value_name = "MODE")]
    #[arg(value_parser = ["all", "range", "selected"])]
    pub mode: String,

    /// Ranges or page numbers, depending on --mode
    #[arg(short, long, default_value = "", value_name = "PAGES")]
    pub pages: String,

    /// Write all documents into one zip archive
    #[arg(long, value_name = "ARCHIVE", conflicts_with = "output_dir")]
    pub zip: Option<PathBuf>,

    /// Write documents into this directory
    #[arg(short, long = "output-dir", value_name = "DIR", required_unless_present = "zip")]
    pub output_dir: Option<PathBuf>,
}

/// Contact message commands.
#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// Send a message
    Send {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// E-mail address
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Subject
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        message: String,
    },

    /// List inbox messages, newest first
    List,

    /// Mark every inbox message as read
    MarkSeen,

    /// Delete an inbox message
    Delete {
        /// Message identifier
        id: String,
    },

    /// Move an inbox message to the archive
    Archive {
        /// Message identifier
        id: String,
    },
}
