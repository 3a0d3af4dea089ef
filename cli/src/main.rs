//! docflat CLI - flatten document-parser output into retrieval-ready text

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docflat::corpus::{CorpusOptions, CorpusSource, FormatFilter, LocalCorpus, VolumeLocation};
use docflat::model::ParseResult;
use docflat::parser::{FlattenOptions, Flattener, SidecarParser, DEFAULT_SIDECAR_SUFFIX};
use docflat::pipeline::{BatchReport, DocumentOutcome, Pipeline, PipelineOptions};
use docflat::render::{self, AssembleOptions, Assembler, AssemblyStats, CleanupPreset, JsonFormat};
use docflat::PrimaryPagePolicy;

#[derive(Parser)]
#[command(name = "docflat")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Flatten document-parser output into elements and text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten parser output into element rows
    Flatten {
        /// Parser output JSON file
        #[arg(value_name = "PARSED_JSON")]
        input: PathBuf,

        /// Document uri (defaults to the input path)
        #[arg(long)]
        uri: Option<String>,

        /// How the primary page of a multi-box element is chosen
        #[arg(long, value_enum, default_value = "first-box")]
        policy: PagePolicy,

        /// Fail on malformed elements instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: RowFormat,
    },

    /// Assemble parser output into document text
    Assemble {
        /// Parser output JSON file
        #[arg(value_name = "PARSED_JSON")]
        input: PathBuf,

        /// Document uri (defaults to the input path)
        #[arg(long)]
        uri: Option<String>,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,

        /// Separator between element texts
        #[arg(long, default_value = "\n")]
        separator: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Process a corpus of documents with saved parser output
    Ingest {
        /// Corpus root directory
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,

        #[command(flatten)]
        volume: VolumeArgs,

        /// File name pattern
        #[arg(long, default_value = "*.pdf")]
        pattern: String,

        /// Format tag (binaryFile, or a list such as pdf,png)
        #[arg(long, default_value = "binaryFile")]
        format_tag: String,

        /// Maximum number of documents
        #[arg(long)]
        limit: Option<usize>,

        /// Directory holding parser output (defaults to next to each document)
        #[arg(long, value_name = "DIR")]
        parsed_dir: Option<PathBuf>,

        /// Parser output file suffix
        #[arg(long, default_value = DEFAULT_SIDECAR_SUFFIX)]
        suffix: String,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Fail documents with malformed elements
        #[arg(long)]
        strict: bool,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,

        /// Output JSON Lines file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Exit with an error if any document failed
        #[arg(long)]
        fail_on_error: bool,
    },

    /// Show information about parser output
    Info {
        /// Parser output JSON file
        #[arg(value_name = "PARSED_JSON")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct VolumeArgs {
    /// Catalog of the source volume
    #[arg(long, env = "DOCFLAT_CATALOG")]
    catalog: Option<String>,

    /// Schema of the source volume
    #[arg(long, env = "DOCFLAT_SCHEMA")]
    schema: Option<String>,

    /// Volume name
    #[arg(long, env = "DOCFLAT_VOLUME", default_value = docflat::corpus::DEFAULT_VOLUME)]
    volume: String,

    /// Local mount point of the volumes
    #[arg(long, value_name = "DIR", default_value = "/")]
    mount: PathBuf,
}

impl VolumeArgs {
    fn location(&self) -> Option<VolumeLocation> {
        match (&self.catalog, &self.schema) {
            (Some(catalog), Some(schema)) => {
                Some(VolumeLocation::new(catalog, schema).with_volume(&self.volume))
            }
            _ => None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Minimal cleanup (Unicode normalization only)
    Minimal,
    /// Standard cleanup
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PagePolicy {
    /// Page of the first bounding box
    FirstBox,
    /// Lowest page id among the bounding boxes
    LowestPage,
}

impl From<PagePolicy> for PrimaryPagePolicy {
    fn from(policy: PagePolicy) -> Self {
        match policy {
            PagePolicy::FirstBox => PrimaryPagePolicy::FirstBox,
            PagePolicy::LowestPage => PrimaryPagePolicy::LowestPage,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RowFormat {
    /// Pretty-printed JSON array
    Json,
    /// One compact JSON object per line
    Jsonl,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Flatten {
            input,
            uri,
            policy,
            strict,
            output,
            format,
        }) => cmd_flatten(&input, uri, policy, strict, output.as_deref(), format),
        Some(Commands::Assemble {
            input,
            uri,
            cleanup,
            separator,
            output,
        }) => cmd_assemble(&input, uri, cleanup, &separator, output.as_deref()),
        Some(Commands::Ingest {
            root,
            volume,
            pattern,
            format_tag,
            limit,
            parsed_dir,
            suffix,
            sequential,
            strict,
            cleanup,
            output,
            fail_on_error,
        }) => {
            let options = IngestArgs {
                pattern,
                format_tag,
                limit,
                parsed_dir,
                suffix,
                sequential,
                strict,
                cleanup,
            };
            cmd_ingest(root, &volume, options, output.as_deref(), fail_on_error)
        }
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docflat <COMMAND>".yellow());
            println!("       docflat --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_parse_result(input: &Path) -> Result<ParseResult, Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    Ok(ParseResult::from_slice(&data)?)
}

fn document_uri(input: &Path, uri: Option<String>) -> String {
    uri.unwrap_or_else(|| input.display().to_string())
}

/// Write content to a file, or to stdout followed by one newline.
fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Write JSON Lines, which already end every record with a newline.
fn write_lines(output: Option<&Path>, lines: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, lines)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", lines);
    }
    Ok(())
}

fn cmd_flatten(
    input: &Path,
    uri: Option<String>,
    policy: PagePolicy,
    strict: bool,
    output: Option<&Path>,
    format: RowFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let uri = document_uri(input, uri);
    let result = load_parse_result(input)?;

    let mut options = FlattenOptions::new().with_primary_page(policy.into());
    if strict {
        options = options.strict();
    }

    let flattener = Flattener::with_options(options);
    let flattened = flattener.flatten(&uri, &result)?;
    for skipped in &flattened.skipped {
        eprintln!(
            "{} element {}: {}",
            "Skipped".yellow(),
            skipped.index,
            skipped.reason
        );
    }

    let rows = flattener.rows(&uri, &flattened.elements);
    match format {
        RowFormat::Json => write_output(output, &render::to_json(&rows, JsonFormat::Pretty)?),
        RowFormat::Jsonl => write_lines(output, &render::to_json_lines(&rows)?),
    }
}

fn cmd_assemble(
    input: &Path,
    uri: Option<String>,
    cleanup: Option<CleanupLevel>,
    separator: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let uri = document_uri(input, uri);
    let result = load_parse_result(input)?;
    let elements = Flattener::new().flatten(&uri, &result)?.into_elements();

    let mut options = AssembleOptions::new().with_separator(separator);
    if let Some(level) = cleanup {
        options = options.with_cleanup_preset(level.into());
    }

    let text = Assembler::with_options(options).assemble(&elements);
    write_output(output, &text)
}

struct IngestArgs {
    pattern: String,
    format_tag: String,
    limit: Option<usize>,
    parsed_dir: Option<PathBuf>,
    suffix: String,
    sequential: bool,
    strict: bool,
    cleanup: Option<CleanupLevel>,
}

fn cmd_ingest(
    root: Option<PathBuf>,
    volume: &VolumeArgs,
    args: IngestArgs,
    output: Option<&Path>,
    fail_on_error: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut corpus_options = CorpusOptions::new()
        .with_pattern(&args.pattern)?
        .with_format(FormatFilter::parse(&args.format_tag)?);
    if let Some(limit) = args.limit {
        corpus_options = corpus_options.with_limit(limit);
    }

    let corpus = match (root, volume.location()) {
        (Some(root), _) => LocalCorpus::new(root),
        (None, Some(location)) => {
            log::info!("reading volume {}", location);
            LocalCorpus::from_volume(&location, &volume.mount)
        }
        (None, None) => {
            return Err("a corpus ROOT or both --catalog and --schema are required".into())
        }
    }
    .with_options(corpus_options);

    let mut parser = SidecarParser::new().with_suffix(args.suffix);
    if let Some(dir) = args.parsed_dir {
        parser = parser.with_output_dir(dir);
    }

    let mut flatten = FlattenOptions::new();
    if args.strict {
        flatten = flatten.strict();
    }
    let mut assemble = AssembleOptions::new().with_stats(true);
    if let Some(level) = args.cleanup {
        assemble = assemble.with_cleanup_preset(level.into());
    }
    let pipeline = Pipeline::new(Arc::new(parser)).with_options(
        PipelineOptions::new()
            .with_flatten_options(flatten)
            .with_assemble_options(assemble)
            .with_parallel(!args.sequential),
    );

    let documents = corpus.documents()?;
    log::debug!("{}: {} documents", corpus.location(), documents.len());

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let started_at = Utc::now();
    let (tx, rx) = crossbeam_channel::unbounded::<DocumentOutcome>();
    let mut outcomes = thread::scope(|scope| {
        scope.spawn(|| {
            pipeline.process_streaming(&documents, &tx);
            drop(tx);
        });

        let mut outcomes = Vec::with_capacity(documents.len());
        for outcome in rx.iter() {
            pb.set_message(outcome.uri.clone());
            if !outcome.is_success() {
                pb.println(format!(
                    "{} {}: {}",
                    "Failed".red(),
                    outcome.uri,
                    outcome.failure_reason().unwrap_or_default()
                ));
            }
            pb.inc(1);
            outcomes.push(outcome);
        }
        outcomes
    });
    pb.finish_with_message("Done!");

    // Streaming delivers in completion order; restore corpus order.
    let order: HashMap<&str, usize> = documents
        .iter()
        .enumerate()
        .map(|(i, d)| (d.uri.as_str(), i))
        .collect();
    outcomes.sort_by_key(|o| order.get(o.uri.as_str()).copied().unwrap_or(usize::MAX));

    let report = BatchReport::from_outcomes(outcomes, started_at);
    let lines = render::to_json_lines(&report.outcomes)?;
    write_lines(output, &lines)?;

    print_summary(&report);

    if fail_on_error && !report.all_succeeded() {
        return Err(format!("{} of {} documents failed", report.failed, report.total()).into());
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    eprintln!();
    eprintln!("{}", "Ingest Summary".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Documents".bold(), report.total());
    eprintln!("{}: {}", "Succeeded".bold(), report.succeeded.to_string().green());
    if report.failed > 0 {
        eprintln!("{}: {}", "Failed".bold(), report.failed.to_string().red());
    } else {
        eprintln!("{}: {}", "Failed".bold(), report.failed);
    }
    eprintln!("{}: {}", "Elements".bold(), report.stats.element_count);
    eprintln!("{}: {}", "Skipped".bold(), report.stats.skipped_count);
    eprintln!("{}: {}", "Words".bold(), report.stats.word_count);
    eprintln!(
        "{}: {} ms",
        "Duration".bold(),
        report.duration().num_milliseconds()
    );
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let uri = input.display().to_string();
    let result = load_parse_result(input)?;

    println!("{}", "Parser Output Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), uri);
    println!("{}: {}", "Pages".bold(), result.page_count());
    println!(
        "{}: {}",
        "Raw elements".bold(),
        result.elements().map_or(0, |e| e.len())
    );

    if let Some(reason) = result.failure_reason() {
        println!("{}: {}", "Status".bold(), "failed".red());
        println!("{}: {}", "Reason".bold(), reason);
        return Ok(());
    }
    println!("{}: {}", "Status".bold(), "ok".green());

    let flattened = Flattener::new().flatten(&uri, &result)?;
    let stats = AssemblyStats::from_elements(&flattened.elements, flattened.skipped.len());

    println!();
    println!("{}", "Element Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Elements".bold(), stats.element_count);
    println!("{}: {}", "With text".bold(), stats.text_element_count);
    println!("{}: {}", "From content".bold(), stats.content_count);
    println!("{}: {}", "From description".bold(), stats.description_count);
    println!("{}: {}", "Malformed".bold(), stats.skipped_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if !stats.type_counts.is_empty() {
        println!();
        println!("{}", "Element Types".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (element_type, count) in &stats.type_counts {
            println!("{}: {}", element_type.bold(), count);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docflat".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document parser output flattening tool");
    println!();
    println!("License: MIT");
}
