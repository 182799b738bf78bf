//! pdfops - Merge, split, rotate, compress and preview PDF documents.
//!
//! A thin front end over the `pdfops` library: it reads files, validates
//! them, runs one engine operation off the async runtime and writes the
//! results.

mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use std::process;
use tokio::{fs, task};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ContactCommand, SplitArgs};
use pdfops::archive::entry_name;
use pdfops::io::{format_file_size, load_document};
use pdfops::output::{
    OutputFormatter, display_compress_summary, display_page_issues, display_rating_summary,
};
use pdfops::services::{ContactForm, Operation, Services};
use pdfops::validation::UploadValidator;
use pdfops::{Config, Engine, PdfOpsError};

/// Files read at the same time.
const READ_CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<PdfOpsError>() {
            Some(pdf_err) => {
                error!(error = %pdf_err, "Operation failed");
                eprintln!("Error: {}", pdf_err.user_message());
                process::exit(pdf_err.exit_code());
            }
            None => {
                eprintln!("Error: {err:#}");
                process::exit(1);
            }
        }
    }
}

/// Log level used when RUST_LOG is not set.
fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An input file read into memory.
#[derive(Debug)]
struct Upload {
    name: String,
    bytes: Vec<u8>,
}

/// Everything a command needs.
struct App {
    config: Config,
    engine: Engine,
    validator: UploadValidator,
    services: Services,
    formatter: OutputFormatter,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(data_dir) = &cli.data_dir {
            config = config.with_data_dir(data_dir);
        }
        config.validate()?;

        debug!(?config, "Configuration resolved");

        Ok(Self {
            engine: Engine::from_config(&config),
            validator: UploadValidator::from_limits(&config.limits),
            services: Services::open(&config),
            formatter: OutputFormatter::new(cli.quiet, cli.verbose > 0),
            config,
        })
    }

    /// Read and validate inputs, keeping their order.
    async fn uploads(&self, paths: &[PathBuf]) -> Result<Vec<Upload>> {
        let uploads = read_inputs(paths).await?;
        for upload in &uploads {
            self.validator.validate_pdf(&upload.name, &upload.bytes)?;
        }
        Ok(uploads)
    }

    /// Run `op` on a blocking worker after enforcing the page limit.
    async fn process<T, F>(&self, buffers: Vec<Vec<u8>>, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Engine, &[Vec<u8>]) -> pdfops::Result<T> + Send + 'static,
    {
        let engine = self.engine.clone();
        let validator = self.validator.clone();

        let output = task::spawn_blocking(move || {
            for buffer in &buffers {
                validator.check_document(&load_document(buffer)?)?;
            }
            op(&engine, &buffers)
        })
        .await
        .context("Worker task failed")??;

        Ok(output)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::new(&cli)?;

    match cli.command {
        Command::Merge { inputs, output } => merge(&app, &inputs, &output).await,
        Command::Split(args) => split(&app, args).await,
        Command::Rotate {
            input,
            angle,
            pages,
            output,
        } => rotate(&app, &input, angle, pages, &output).await,
        Command::Compress { input, output } => compress(&app, &input, &output).await,
        Command::Preview { input, max_pages } => preview(&app, &input, max_pages).await,
        Command::Rate {
            rating,
            feedback,
            page,
        } => {
            let rating = app
                .services
                .ratings
                .submit(rating, feedback.as_deref(), page.as_deref())?;
            app.formatter
                .success(&format!("Thank you for your {}-star rating", rating.rating));
            Ok(())
        }
        Command::Contact(command) => contact(&app, command),
        Command::Stats { json } => stats(&app, json),
    }
}

async fn merge(app: &App, inputs: &[PathBuf], output: &Path) -> Result<()> {
    app.validator.check_merge_inputs(inputs.len())?;
    let uploads = app.uploads(inputs).await?;
    let buffers = uploads.into_iter().map(|upload| upload.bytes).collect();

    let merged = app
        .process(buffers, |engine, buffers| engine.merge(buffers))
        .await?;
    write_output(output, &merged.bytes).await?;
    app.services.stats.record_operation(Operation::Merge);

    display_page_issues(&app.formatter, &merged.skipped);
    app.formatter.success(&format!(
        "Merged {} file(s) into {} ({} pages, {})",
        inputs.len(),
        output.display(),
        merged.page_count,
        format_file_size(merged.bytes.len() as u64)
    ));
    if merged.repaired_inputs > 0 {
        app.formatter
            .detail("Repaired inputs", &merged.repaired_inputs.to_string());
    }
    Ok(())
}

async fn split(app: &App, args: SplitArgs) -> Result<()> {
    let upload = single_upload(app, &args.input).await?;
    let mode = args.mode.clone();
    let pages = args.pages.clone();

    let result = app
        .process(vec![upload.bytes], move |engine, buffers| {
            engine.split(&buffers[0], &mode, &pages)
        })
        .await?;

    for fragment in &result.ignored_fragments {
        app.formatter
            .warning(&format!("Ignored page selection '{fragment}'"));
    }
    display_page_issues(&app.formatter, &result.skipped);

    if result.is_empty() {
        return Err(PdfOpsError::other("No document was produced from the selection").into());
    }

    if let Some(zip_path) = &args.zip {
        let name = zip_path.file_name().and_then(|name| name.to_str());
        let archive = app.engine.archive(&result.documents, name)?;
        write_output(zip_path, &archive.bytes).await?;

        app.services.stats.record_operation(Operation::Split);
        app.services.stats.record_operation(Operation::ZipDownload);
        app.formatter.success(&format!(
            "Wrote {} document(s) to {}",
            archive.entries.len(),
            zip_path.display()
        ));
    } else if let Some(dir) = &args.output_dir {
        let written = write_documents(dir, &result.documents).await?;

        app.services.stats.record_operation(Operation::Split);
        app.formatter.success(&format!(
            "Wrote {} document(s) to {}",
            written.len(),
            dir.display()
        ));
        for (index, path) in written.iter().enumerate() {
            app.formatter.detail(&(index + 1).to_string(), &path.display().to_string());
        }
    }

    Ok(())
}

async fn rotate(app: &App, input: &Path, angle: i64, pages: String, output: &Path) -> Result<()> {
    let upload = single_upload(app, input).await?;

    let rotated = app
        .process(vec![upload.bytes], move |engine, buffers| {
            engine.rotate(&buffers[0], angle, &pages)
        })
        .await?;
    write_output(output, &rotated.bytes).await?;
    app.services.stats.record_operation(Operation::Rotate);

    if rotated.selection_fallback {
        app.formatter
            .warning("Page selection not understood; rotated every page");
    }
    display_page_issues(&app.formatter, &rotated.skipped);
    app.formatter.success(&format!(
        "Rotated {} of {} page(s) into {}",
        rotated.rotated_count,
        rotated.total_pages,
        output.display()
    ));
    Ok(())
}

async fn compress(app: &App, input: &Path, output: &Path) -> Result<()> {
    let upload = single_upload(app, input).await?;

    let compressed = app
        .process(vec![upload.bytes], |engine, buffers| engine.compress(&buffers[0]))
        .await?;
    write_output(output, &compressed.bytes).await?;
    app.services.stats.record_operation(Operation::Compress);

    display_page_issues(&app.formatter, &compressed.skipped);
    display_compress_summary(&app.formatter, &compressed);
    Ok(())
}

async fn preview(app: &App, input: &Path, max_pages: Option<usize>) -> Result<()> {
    let upload = single_upload(app, input).await?;
    let max_pages = max_pages.unwrap_or(app.config.preview_pages);

    let previews = app
        .process(vec![upload.bytes], move |engine, buffers| {
            engine.preview_pages_of(&buffers[0], max_pages)
        })
        .await?;
    app.services.stats.record_operation(Operation::Preview);

    println!("{}", serde_json::to_string_pretty(&previews)?);
    Ok(())
}

fn contact(app: &App, command: ContactCommand) -> Result<()> {
    let contacts = &app.services.contacts;
    let formatter = &app.formatter;

    match command {
        ContactCommand::Send {
            first_name,
            last_name,
            email,
            phone,
            subject,
            message,
        } => {
            let stored = contacts.submit(ContactForm {
                first_name,
                last_name,
                email,
                phone,
                subject,
                message,
            })?;
            formatter.success(&format!("Message sent ({})", stored.id));
        }
        ContactCommand::List => {
            let messages = contacts.all()?;
            if messages.is_empty() {
                formatter.info("No messages");
            }
            for (index, message) in messages.iter().enumerate() {
                let marker = if message.seen { " " } else { "*" };
                formatter.list_item(
                    index + 1,
                    &format!(
                        "{marker} {} | {} {} <{}> | {}",
                        message.id,
                        message.form.first_name,
                        message.form.last_name,
                        message.form.email,
                        message.form.subject
                    ),
                );
                formatter.detail("Message", &message.form.message);
            }
        }
        ContactCommand::MarkSeen => {
            let marked = contacts.mark_all_seen()?;
            formatter.success(&format!("Marked {marked} message(s) as read"));
        }
        ContactCommand::Delete { id } => {
            if !contacts.delete(&id)? {
                anyhow::bail!("No message with id {id}");
            }
            formatter.success(&format!("Deleted {id}"));
        }
        ContactCommand::Archive { id } => {
            if !contacts.archive(&id)? {
                anyhow::bail!("No message with id {id}");
            }
            formatter.success(&format!("Archived {id}"));
        }
    }

    Ok(())
}

fn stats(app: &App, json: bool) -> Result<()> {
    let usage = app.services.stats.snapshot()?;
    let ratings = app.services.ratings.summary(Utc::now())?;
    let unseen_messages = app.services.contacts.unseen_count()?;

    if json {
        let report = serde_json::json!({
            "usage": usage,
            "ratings": ratings,
            "unseen_messages": unseen_messages,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let formatter = &app.formatter;
    formatter.section("Usage");
    if usage.counters.is_empty() {
        formatter.info("No operations recorded yet");
    }
    for (key, value) in &usage.counters {
        formatter.info(&format!("  {key}: {value}"));
    }
    if let (Some(first), Some(last)) = (usage.first_use, usage.last_use) {
        formatter.info(&format!("  first use: {first}"));
        formatter.info(&format!("  last use: {last}"));
    }

    display_rating_summary(formatter, &ratings);

    formatter.section("Messages");
    formatter.info(&format!("{unseen_messages} unread message(s)"));
    Ok(())
}

async fn single_upload(app: &App, path: &Path) -> Result<Upload> {
    let paths = [path.to_path_buf()];
    let mut uploads = app.uploads(&paths).await?;
    uploads
        .pop()
        .ok_or_else(|| anyhow::anyhow!("No input read from {}", path.display()))
}

/// Read files concurrently, returning them in input order.
async fn read_inputs(paths: &[PathBuf]) -> Result<Vec<Upload>> {
    let reads = paths.iter().map(|path| async move {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Input read");
        Ok::<_, anyhow::Error>(Upload {
            name: display_name(path),
            bytes,
        })
    });

    stream::iter(reads)
        .buffered(READ_CONCURRENCY)
        .try_collect()
        .await
}

/// File name shown to the validator and in messages.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write split results as `pdf_page_001.pdf`, ... into `dir`.
async fn write_documents(dir: &Path, documents: &[Vec<u8>]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let path = dir.join(entry_name(index));
        write_output(&path, document).await?;
        written.push(path);
    }
    Ok(written)
}
