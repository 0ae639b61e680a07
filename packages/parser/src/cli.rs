//! Command-line interface for the parser.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{BatchReport, DocumentProcessor, ProcessOptions, ProcessedDocument};
use crate::config::{document_id_from_path, DEFAULT_FILE_PREFIX, DEFAULT_OUTPUT_DIR};
use crate::decode::read_document;
use crate::error::{ParserError, Result};
use crate::extraction::{ChatCompletionsClient, ExtractionConfig, Extractor};
use crate::output::{render_document, save_document, OutputFormat};
use crate::validation::{check_postconditions, ensure_publishable, Severity};

/// Leyes Parser - Segment cleaned Mexican statutory texts into JSON.
#[derive(Parser)]
#[command(name = "leyes-parser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Segment one text file.
    Parse {
        /// Cleaned text file (e.g., clean_ley_de_amparo.txt)
        file: PathBuf,

        /// Output directory (default: Refined/json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print the document to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Skip publication year inference
        #[arg(long)]
        no_year: bool,

        /// Prefix stripped from the file name to form the document id
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,
    },

    /// Segment every <prefix>*.txt file in a directory.
    Batch {
        /// Directory holding the cleaned text files
        dir: PathBuf,

        /// Output directory (default: Refined/json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name prefix of the inputs
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Extract one text file through the language-model service (LLM_* env vars).
    Extract {
        /// Cleaned text file
        file: PathBuf,

        /// Output directory (default: Refined/json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix stripped from the file name to form the document id
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse {
            file,
            output,
            format,
            stdout,
            no_year,
            prefix,
        } => {
            let options = ProcessOptions::default()
                .with_prefix(prefix)
                .with_format(format)
                .with_output_dir(output_dir(output.as_deref()))
                .with_infer_year(!no_year)
                .with_dry_run(stdout);
            parse_command(&file, options)
        }
        Commands::Batch {
            dir,
            output,
            prefix,
            format,
        } => {
            let options = ProcessOptions::default()
                .with_prefix(prefix)
                .with_format(format)
                .with_output_dir(output_dir(output.as_deref()));
            batch_command(&dir, options)
        }
        Commands::Extract {
            file,
            output,
            prefix,
        } => extract_command(&file, output.as_deref(), &prefix),
    }
}

fn output_dir(output: Option<&Path>) -> PathBuf {
    output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), Path::to_path_buf)
}

/// Execute the parse command.
fn parse_command(file: &Path, options: ProcessOptions) -> Result<()> {
    if !file.is_file() {
        return Err(ParserError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file does not exist: {}", file.display()),
        )));
    }

    let to_stdout = options.dry_run;
    let format = options.format;
    let processor = DocumentProcessor::new(options)?;
    let processed = processor.process_file(file)?;

    if to_stdout {
        let content = render_document(&processed.parsed.document, &processed.id, format)?;
        print!("{content}");
        return Ok(());
    }

    print_summary(&processed);
    if let Some(path) = &processed.output {
        println!();
        println!("{} {}", style("Saved to:").green().bold(), path.display());
    }

    Ok(())
}

/// Execute the batch command.
fn batch_command(dir: &Path, options: ProcessOptions) -> Result<()> {
    println!(
        "{} {} (prefix {})",
        style("Processing").bold(),
        style(dir.display()).cyan(),
        style(&options.prefix).green()
    );
    println!();

    let processor = DocumentProcessor::new(options)?;

    let pb = ProgressBar::new(0);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let report = processor.process_directory(dir, |index, total, path| {
        pb.set_length(total as u64);
        pb.set_position(index as u64);
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    });
    pb.finish_and_clear();
    let report = report?;

    print_batch_report(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(ParserError::BatchFailed {
            failed: report.failures.len(),
            total: report.total(),
        })
    }
}

/// Execute the extract command.
fn extract_command(file: &Path, output: Option<&Path>, prefix: &str) -> Result<()> {
    let id = document_id_from_path(file, prefix)?;
    let config = ExtractionConfig::from_env()?;
    let decoded = read_document(file)?;

    println!(
        "{} {} with {}",
        style("Extracting").bold(),
        style(&id).cyan(),
        style(&config.model).green()
    );
    println!();

    let client = ChatCompletionsClient::new(&config)?;
    let extractor = Extractor::new(&client)?;

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Waiting for extraction service...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = extractor.extract(&decoded.text, &id);
    pb.finish_and_clear();
    let report = report?;

    for failure in &report.failures {
        println!(
            "  {} fragment {} ({}): {}",
            style("Failed").red().bold(),
            failure.index,
            failure.kind.as_str(),
            failure.message
        );
    }

    let issues = check_postconditions(&report.document);
    for issue in &issues {
        print_issue(issue.severity, &issue.message);
    }
    ensure_publishable(&issues)?;

    println!("  Title: {}", style(&report.document.title).green());
    println!("  Chapters: {}", report.document.chapters.len());
    println!("  Articles: {}", report.document.permanent_article_count());
    println!("  Transitory: {}", report.document.transitory_article_count());
    println!(
        "  Tokens: {} in, {} out",
        report.usage.prompt_tokens, report.usage.completion_tokens
    );

    let path = save_document(
        &report.document,
        &id,
        OutputFormat::Json,
        Some(&output_dir(output)),
    )?;
    println!();
    println!("{} {}", style("Saved to:").green().bold(), path.display());

    Ok(())
}

fn print_summary(processed: &ProcessedDocument) {
    let doc = &processed.parsed.document;
    println!("{}", style(&processed.id).cyan().bold());
    println!("  Title: {}", style(&doc.title).green());
    if let Some(year) = doc.publication_year {
        println!("  Year: {year}");
    }
    println!("  Chapters: {}", doc.chapters.len());
    println!("  Articles: {}", doc.permanent_article_count());
    println!("  Transitory: {}", doc.transitory_article_count());
    if !processed.parsed.warnings.is_empty() {
        println!(
            "  Warnings: {}",
            style(processed.parsed.warnings.len()).yellow().bold()
        );
        for warning in &processed.parsed.warnings {
            println!("    - {warning}");
        }
    }
    for issue in &processed.issues {
        print_issue(issue.severity, &issue.message);
    }
}

fn print_issue(severity: Severity, message: &str) {
    match severity {
        Severity::Info => println!("  {} {message}", style("Note:").dim()),
        Severity::Error => println!("  {} {message}", style("Error:").red().bold()),
    }
}

fn print_batch_report(report: &BatchReport) {
    for processed in &report.processed {
        print_summary(processed);
    }
    for (path, error) in &report.failures {
        println!(
            "{} {}: {error}",
            style("Failed").red().bold(),
            path.display()
        );
    }

    println!();
    println!(
        "{} {} processed, {} failed",
        style("Done:").bold(),
        style(report.processed.len()).green(),
        style(report.failures.len()).red()
    );
}
